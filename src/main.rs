use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use yedgraph::{DecodeOptions, EdgeDefault};

#[derive(Parser)]
#[command(name = "yedgraph", about = "Read yEd GraphML and write it back normalized")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<std::path::PathBuf>,

    /// Print a node/edge listing instead of GraphML
    #[arg(long, short = 's')]
    summary: bool,

    /// Indentation width of the written XML
    #[arg(long, default_value_t = yedgraph::xml_renderer::DEFAULT_INDENT)]
    indent: usize,

    /// Keep the graph undirected regardless of `edgedefault`
    #[arg(long)]
    ignore_edgedefault: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let options = DecodeOptions {
        edge_default: if cli.ignore_edgedefault {
            EdgeDefault::Ignore
        } else {
            EdgeDefault::Read
        },
    };
    let graph = match yedgraph::xml_to_graph_with(&input, &options) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    let output = if cli.summary {
        yedgraph::summary(&graph)
    } else {
        let doc = yedgraph::graph_to_xml(&graph);
        format!("{}\n", yedgraph::xml_renderer::render_with_indent(&doc, cli.indent))
    };

    match cli.output {
        Some(path) => std::fs::write(&path, output).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to write {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => print!("{output}"),
    }
}
