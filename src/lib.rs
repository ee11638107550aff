pub mod decoder;
pub mod encoder;
pub mod error;
pub mod graph;
pub mod schema;
pub mod value;
pub mod xml_ast;
pub mod xml_parser;
pub mod xml_renderer;

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

pub use decoder::{DecodeOptions, EdgeDefault, xml_to_graph, xml_to_graph_with};
pub use encoder::graph_to_xml;
pub use error::{Error, Result};
pub use graph::{AttributeDecl, Edge, EdgeId, Graph, Node, NodeId};
pub use value::{AttrType, AttrValue};

/// Renders `graph` as yEd GraphML text.
pub fn to_string(graph: &Graph) -> String {
    xml_renderer::render(&graph_to_xml(graph))
}

pub fn write_to<W: Write>(graph: &Graph, mut out: W) -> Result<()> {
    let doc = graph_to_xml(graph);
    xml_renderer::render_to(&doc, &mut out, xml_renderer::DEFAULT_INDENT)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Writes `graph` to the file at `path`, replacing any previous content.
pub fn write(graph: &Graph, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_to(graph, BufWriter::new(file))
}

pub fn parse_from<R: Read>(mut source: R) -> Result<Graph> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;
    xml_to_graph(&text)
}

pub fn parse(path: impl AsRef<Path>) -> Result<Graph> {
    let text = std::fs::read_to_string(path)?;
    xml_to_graph(&text)
}

/// One line per node and edge, for quick inspection.
pub fn summary(graph: &Graph) -> String {
    let kind = if graph.is_directed() { "directed" } else { "undirected" };
    let mut out = format!(
        "graph \"{}\" ({kind}), {} nodes, {} edges\n",
        graph.name(),
        graph.node_count(),
        graph.edge_count()
    );
    for node in graph.nodes() {
        let _ = write!(out, "node {}", node.label());
        for (name, value) in node.attributes().filter(|(name, _)| *name != schema::LABEL) {
            let _ = write!(out, " {name}={value}");
        }
        out.push('\n');
    }
    for edge in graph.edges() {
        let (source, target) = graph.endpoints(edge);
        let arrow = if edge.is_directed() { "->" } else { "--" };
        let _ = write!(out, "edge {} {arrow} {}", source.label(), target.label());
        for (name, value) in edge.attributes() {
            let _ = write!(out, " {name}={value}");
        }
        out.push('\n');
    }
    out
}
