use thiserror::Error;

/// Errors raised while building, encoding or decoding a graph.
#[derive(Debug, Error)]
pub enum Error {
    /// The source is not well-formed XML or lacks a `graphml`/`graph` element.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An edge refers to a node label that does not exist.
    #[error("edge references unknown node `{label}`")]
    UnknownNode { label: String },

    /// A node with this label is already part of the graph.
    #[error("duplicate node label `{0}`")]
    DuplicateNode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
