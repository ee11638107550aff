use tracing::{debug, trace, warn};

use crate::graph::{Graph, Node};
use crate::schema::{self, LABEL, NODE_GRAPHICS_KEY, ROOT_ATTRIBUTES, SHAPE_NODE};
use crate::value::AttrValue;
use crate::xml_ast::{Document, Element};

/// Builds the yEd flavoured GraphML document for `graph`.
///
/// Attributes other than the four presentation tags get a `key` declaration.
/// On nodes they are still written inside `y:ShapeNode`, where yEd ignores
/// them and [`crate::decoder`] drops them again.
pub fn graph_to_xml(graph: &Graph) -> Document {
    let mut root = Element::new("graphml");
    for (name, value) in ROOT_ATTRIBUTES {
        root.set_attr(name, value);
    }
    root.push(
        Element::new("key")
            .with_attr("for", "node")
            .with_attr("id", NODE_GRAPHICS_KEY)
            .with_attr("yfiles.type", "nodegraphics"),
    );

    for decl in graph.attributes() {
        if schema::is_recognized(&decl.name) {
            continue;
        }
        if decl.name == NODE_GRAPHICS_KEY {
            // key ids are unique; the data still points at the existing key
            warn!(key = %decl.name, "attribute name clashes with the node graphics key");
            continue;
        }
        trace!(key = %decl.name, attr_type = %decl.attr_type, "declaring key");
        root.push(
            Element::new("key")
                .with_attr("id", decl.name.as_str())
                .with_attr("attr.name", decl.name.as_str())
                .with_attr("attr.type", decl.attr_type.as_str()),
        );
    }

    let mut graph_el = Element::new("graph")
        .with_attr("id", graph.name())
        .with_attr("edgedefault", edge_default(graph.is_directed()));

    for node in graph.nodes() {
        graph_el.push(node_element(node));
    }

    for edge in graph.edges() {
        let (source, target) = graph.endpoints(edge);
        let mut edge_el = Element::new("edge")
            .with_attr("source", source.label())
            .with_attr("target", target.label());
        if edge.is_directed() != graph.is_directed() {
            edge_el.set_attr("directed", edge.is_directed().to_string());
        }
        for (name, value) in edge.attributes() {
            if name == LABEL {
                continue;
            }
            let mut data = Element::new("data").with_attr("key", name);
            data.push_text(value);
            edge_el.push(data);
        }
        graph_el.push(edge_el);
    }

    root.push(graph_el);
    debug!(
        graph = graph.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "encoded graph"
    );
    Document { root }
}

fn edge_default(directed: bool) -> &'static str {
    if directed { "directed" } else { "undirected" }
}

fn node_element(node: &Node) -> Element {
    let mut shape_node = Element::new(SHAPE_NODE);
    for (name, value) in node.attributes() {
        if name == LABEL {
            continue;
        }
        let mut child = Element::new(element_name(name));
        match value {
            AttrValue::Map(map) => {
                for (k, v) in map {
                    let attr = element_name(k);
                    if child.attr(&attr).is_some() {
                        warn!(
                            attribute = name,
                            key = %k,
                            "`{attr}` already written, overwriting it"
                        );
                    }
                    child.set_attr(attr, v.as_str());
                }
            }
            AttrValue::Scalar(text) => child.push_text(text),
        }
        shape_node.push(child);
    }

    let mut data = Element::new("data").with_attr("key", NODE_GRAPHICS_KEY);
    data.push(shape_node);
    let mut node_el = Element::new("node").with_attr("id", node.label());
    node_el.push(data);
    node_el
}

/// Replaces characters that cannot appear in an XML name with `_`.
fn element_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let valid = c.is_alphanumeric()
                || c == '_'
                || c == ':'
                || (i > 0 && (c == '-' || c == '.'));
            if valid { c } else { '_' }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key_ids(doc: &Document) -> Vec<&str> {
        doc.root
            .elements_named("key")
            .filter_map(|k| k.attr("id"))
            .collect()
    }

    #[test]
    fn root_carries_namespaces() {
        let doc = graph_to_xml(&Graph::new("G"));
        assert_eq!(doc.root.name, "graphml");
        assert_eq!(doc.root.attr("xmlns"), Some(schema::GRAPHML_NS));
        assert_eq!(doc.root.attr("xmlns:y"), Some("http://www.yworks.com/xml/graphml"));
        assert!(doc.root.attr("xsi:schemaLocation").unwrap().ends_with("ygraphml.xsd"));
    }

    #[test]
    fn node_graphics_key_comes_first() {
        let doc = graph_to_xml(&Graph::new("G"));
        let first = doc.root.elements().next().unwrap();
        assert_eq!(first.attr("for"), Some("node"));
        assert_eq!(first.attr("id"), Some("d6"));
        assert_eq!(first.attr("yfiles.type"), Some("nodegraphics"));
    }

    #[test]
    fn edgedefault_follows_graph() {
        let directed = graph_to_xml(&Graph::with_direction("G", true));
        let undirected = graph_to_xml(&Graph::new("G"));
        let ed = |d: &Document| d.root.first_named("graph").unwrap().attr("edgedefault").map(str::to_string);
        assert_eq!(ed(&directed).as_deref(), Some("directed"));
        assert_eq!(ed(&undirected).as_deref(), Some("undirected"));
    }

    #[test]
    fn map_values_become_attributes_and_scalars_text() {
        let mut g = Graph::new("G");
        let a = g.add_node("a").unwrap();
        g.node_mut(a)
            .set("y:NodeLabel", "Alpha")
            .set("y:Geometry", AttrValue::map([("width", "100"), ("x", "5")]));
        let doc = graph_to_xml(&g);
        let node = doc.root.first_named("graph").unwrap().first_named("node").unwrap();
        assert_eq!(node.attr("id"), Some("a"));
        let shape_node = node.first_named("data").unwrap().first_named("ShapeNode").unwrap();
        let children: Vec<&str> = shape_node.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(children, vec!["y:NodeLabel", "y:Geometry"]);
        assert_eq!(shape_node.first_named("NodeLabel").unwrap().text(), "Alpha");
        let geometry = shape_node.first_named("Geometry").unwrap();
        assert_eq!(geometry.attr("width"), Some("100"));
        assert_eq!(geometry.attr("x"), Some("5"));
        assert!(!geometry.has_text());
    }

    #[test]
    fn edge_label_is_skipped() {
        let mut g = Graph::new("G");
        let a = g.add_node("a").unwrap();
        let b = g.add_node("b").unwrap();
        let e = g.add_edge(a, b);
        g.edge_mut(e).set("label", "ignored").set("weight", "3");
        let doc = graph_to_xml(&g);
        let edge = doc.root.first_named("graph").unwrap().first_named("edge").unwrap();
        let keys: Vec<&str> = edge.elements_named("data").filter_map(|d| d.attr("key")).collect();
        assert_eq!(keys, vec!["weight"]);
        assert_eq!(edge.attr("directed"), None);
    }

    #[test]
    fn unknown_attributes_declared_once() {
        let mut g = Graph::new("G");
        for label in ["a", "b", "c"] {
            let n = g.add_node(label).unwrap();
            g.node_mut(n)
                .set("weight", "1")
                .set("y:Fill", AttrValue::map([("color", "#000000")]));
        }
        let doc = graph_to_xml(&g);
        assert_eq!(key_ids(&doc), vec!["d6", "label", "weight"]);
        let weight = doc
            .root
            .elements_named("key")
            .find(|k| k.attr("id") == Some("weight"))
            .unwrap();
        assert_eq!(weight.attr("attr.name"), Some("weight"));
        assert_eq!(weight.attr("attr.type"), Some("int"));
    }

    #[test]
    fn attribute_named_like_graphics_key_is_not_redeclared() {
        let mut g = Graph::new("G");
        let a = g.add_node("a").unwrap();
        let b = g.add_node("b").unwrap();
        g.node_mut(a).set(NODE_GRAPHICS_KEY, "x");
        let e = g.add_edge(a, b);
        g.edge_mut(e).set(NODE_GRAPHICS_KEY, "y");
        let doc = graph_to_xml(&g);
        assert_eq!(key_ids(&doc), vec!["d6", "label"]);
    }

    #[test]
    fn sanitized_map_keys_collide_last_wins() {
        let mut g = Graph::new("G");
        let a = g.add_node("a").unwrap();
        g.node_mut(a)
            .set("y:Geometry", AttrValue::map([("a b", "1"), ("a_b", "2")]));
        let doc = graph_to_xml(&g);
        let geometry = doc
            .root
            .first_named("graph")
            .and_then(|g| g.first_named("node"))
            .and_then(|n| n.first_named("data"))
            .and_then(|d| d.first_named("ShapeNode"))
            .and_then(|s| s.first_named("Geometry"))
            .unwrap();
        assert_eq!(geometry.attributes, vec![("a_b".to_string(), "2".to_string())]);
    }

    #[test]
    fn element_name_sanitizing() {
        assert_eq!(element_name("y:Fill"), "y:Fill");
        assert_eq!(element_name("my attr"), "my_attr");
        assert_eq!(element_name("2nd"), "_2nd");
        assert_eq!(element_name("-x"), "_x");
        assert_eq!(element_name(""), "_");
    }
}
