use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::schema::{self, PresentationTag};
use crate::value::AttrValue;
use crate::xml_ast::{Document, Element};
use crate::xml_parser::parse_document;

/// How the `edgedefault` attribute of the `graph` element is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeDefault {
    /// `edgedefault="directed"` makes the decoded graph directed.
    #[default]
    Read,
    /// Leave the graph undirected whatever the document says.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub edge_default: EdgeDefault,
}

pub fn xml_to_graph(input: &str) -> Result<Graph> {
    xml_to_graph_with(input, &DecodeOptions::default())
}

pub fn xml_to_graph_with(input: &str, options: &DecodeOptions) -> Result<Graph> {
    let doc = parse_document(input)?;
    decode_document(&doc, options)
}

/// Rebuilds a graph from a parsed document.
///
/// Only the four presentation tags below `y:ShapeNode` are read back into
/// node attributes; any other node data is dropped. Edge `data` elements are
/// restored verbatim. An edge naming an unknown node fails the whole
/// document.
pub fn decode_document(doc: &Document, options: &DecodeOptions) -> Result<Graph> {
    if doc.root.local_name() != "graphml" {
        return Err(Error::MalformedInput(format!(
            "expected `graphml` root element, found `{}`",
            doc.root.name
        )));
    }
    let graph_el = doc
        .root
        .first_named("graph")
        .ok_or_else(|| Error::MalformedInput("missing `graph` element".to_string()))?;

    let mut graph = Graph::new(graph_el.attr("id").unwrap_or_default());
    if options.edge_default == EdgeDefault::Read {
        graph.set_directed(graph_el.attr("edgedefault") == Some("directed"));
    }

    for node_el in graph_el.elements_named("node") {
        let label = node_el.attr("id").unwrap_or_default();
        let id = graph.add_node(label).map_err(|e| match e {
            Error::DuplicateNode(l) => Error::MalformedInput(format!("duplicate node id `{l}`")),
            other => other,
        })?;
        for data in node_el.elements_named("data") {
            decode_presentation(&mut graph, id, data);
        }
    }

    for edge_el in graph_el.elements_named("edge") {
        let source = edge_el.attr("source").unwrap_or_default();
        let target = edge_el.attr("target").unwrap_or_default();
        let e = graph.add_edge_by_label(source, target)?;
        match edge_el.attr("directed") {
            Some("true") => graph.edge_mut(e).set_directed(true),
            Some("false") => graph.edge_mut(e).set_directed(false),
            _ => {}
        }
        for data in edge_el.elements_named("data") {
            let key = data.attr("key").unwrap_or_default();
            graph.edge_mut(e).set(key, data.text());
        }
    }

    debug!(
        graph = graph.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "decoded graph"
    );
    Ok(graph)
}

fn decode_presentation(graph: &mut Graph, id: NodeId, data: &Element) {
    for shape_node in data.elements_named("ShapeNode") {
        for child in shape_node.elements() {
            let Some(tag) = schema::lookup_local(child.local_name()) else {
                trace!(element = %child.name, "ignoring presentation element");
                continue;
            };
            let value = match tag.tag {
                PresentationTag::NodeLabel => AttrValue::Scalar(child.text()),
                PresentationTag::Fill => attribute_map(child, tag.tag, &["color"]),
                PresentationTag::Shape => attribute_map(child, tag.tag, &["type"]),
                PresentationTag::Geometry => AttrValue::Map(
                    child
                        .attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                ),
            };
            graph.node_mut(id).set(tag.attr_name, value);
        }
    }
}

/// Reads `keys` from the element, substituting registry defaults when absent.
fn attribute_map(element: &Element, tag: PresentationTag, keys: &[&str]) -> AttrValue {
    let schema = tag.schema();
    let map: BTreeMap<String, String> = keys
        .iter()
        .map(|&k| {
            let value = element
                .attr(k)
                .or_else(|| schema.default_for(k))
                .unwrap_or_default();
            (k.to_string(), value.to_string())
        })
        .collect();
    AttrValue::Map(map)
}
