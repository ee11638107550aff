use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{Error, Result};
use crate::schema::LABEL;
use crate::value::{AttrType, AttrValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// An attribute name together with the type it is declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub attr_type: AttrType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    attributes: IndexMap<String, AttrValue>,
}

impl Node {
    fn new(id: NodeId, label: String) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert(LABEL.to_string(), AttrValue::Scalar(label));
        Self { id, attributes }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        self.attributes
            .get(LABEL)
            .and_then(AttrValue::as_scalar)
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Sets an attribute. The reserved `label` attribute identifies the node
    /// and cannot be overwritten.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        let name = name.into();
        if name == LABEL {
            warn!(node = self.label(), "ignoring write to reserved attribute `label`");
            return self;
        }
        self.attributes.insert(name, value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        if name == LABEL {
            return None;
        }
        self.attributes.shift_remove(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes, `label` included.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    directed: bool,
    attributes: IndexMap<String, String>,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A named graph whose nodes are identified by unique labels.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    name: String,
    directed: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_label: HashMap<String, NodeId>,
}

impl Graph {
    /// Creates an empty undirected graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_direction(name, false)
    }

    pub fn with_direction(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Changes the default direction. Existing edges keep their own flag.
    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> Result<NodeId> {
        let label = label.into();
        if self.by_label.contains_key(&label) {
            return Err(Error::DuplicateNode(label));
        }
        let id = NodeId(self.nodes.len());
        self.by_label.insert(label.clone(), id);
        self.nodes.push(Node::new(id, label));
        Ok(id)
    }

    /// Adds an edge that follows the graph's current direction.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.add_edge_with_direction(source, target, self.directed)
    }

    pub fn add_edge_with_direction(
        &mut self,
        source: NodeId,
        target: NodeId,
        directed: bool,
    ) -> EdgeId {
        assert!(
            source.0 < self.nodes.len() && target.0 < self.nodes.len(),
            "edge endpoints must belong to this graph"
        );
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            id,
            source,
            target,
            directed,
            attributes: IndexMap::new(),
        });
        id
    }

    pub fn add_edge_by_label(&mut self, source: &str, target: &str) -> Result<EdgeId> {
        let s = self.resolve(source)?;
        let t = self.resolve(target)?;
        Ok(self.add_edge(s, t))
    }

    fn resolve(&self, label: &str) -> Result<NodeId> {
        self.node_id(label).ok_or_else(|| Error::UnknownNode {
            label: label.to_string(),
        })
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.by_label.get(label).copied()
    }

    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.node_id(label).map(|id| &self.nodes[id.0])
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn endpoints(&self, edge: &Edge) -> (&Node, &Node) {
        (self.node(edge.source), self.node(edge.target))
    }

    /// Distinct attribute names over all nodes, then all edges, in first-seen
    /// order. The type is the narrowest one that holds every value seen for
    /// the name, see [`AttrType::widen`].
    pub fn attributes(&self) -> Vec<AttributeDecl> {
        let mut decls: IndexMap<&str, AttrType> = IndexMap::new();
        for node in &self.nodes {
            for (name, value) in node.attributes() {
                declare(&mut decls, name, AttrType::infer(value));
            }
        }
        for edge in &self.edges {
            for (name, value) in edge.attributes() {
                declare(&mut decls, name, AttrType::infer_scalar(value));
            }
        }
        decls
            .into_iter()
            .map(|(name, attr_type)| AttributeDecl {
                name: name.to_string(),
                attr_type,
            })
            .collect()
    }
}

fn declare<'a>(decls: &mut IndexMap<&'a str, AttrType>, name: &'a str, attr_type: AttrType) {
    decls
        .entry(name)
        .and_modify(|seen| *seen = seen.widen(attr_type))
        .or_insert(attr_type);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_node_carries_label_attribute() {
        let mut g = Graph::new("g");
        let a = g.add_node("A").unwrap();
        assert_eq!(g.node(a).label(), "A");
        assert_eq!(g.node(a).get(LABEL), Some(&AttrValue::from("A")));
        assert_eq!(g.node(a).len(), 1);
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let mut g = Graph::new("g");
        g.add_node("A").unwrap();
        let err = g.add_node("A").unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(ref l) if l == "A"), "got: {err}");
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn label_attribute_is_read_only() {
        let mut g = Graph::new("g");
        let a = g.add_node("A").unwrap();
        g.node_mut(a).set(LABEL, "B").set("weight", "3");
        assert_eq!(g.node(a).label(), "A");
        assert_eq!(g.node_mut(a).remove(LABEL), None);
        assert_eq!(g.node_id("A"), Some(a));
        assert_eq!(g.node(a).get("weight"), Some(&AttrValue::from("3")));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut g = Graph::new("g");
        let a = g.add_node("A").unwrap();
        g.node_mut(a).set("z", "1").set("b", "2").set("m", "3");
        let names: Vec<&str> = g.node(a).attribute_names().collect();
        assert_eq!(names, vec!["label", "z", "b", "m"]);
    }

    #[test]
    fn edges_inherit_graph_direction() {
        let mut g = Graph::with_direction("g", true);
        let a = g.add_node("A").unwrap();
        let b = g.add_node("B").unwrap();
        let e1 = g.add_edge(a, b);
        let e2 = g.add_edge_with_direction(b, a, false);
        assert!(g.edge(e1).is_directed());
        assert!(!g.edge(e2).is_directed());
        let (s, t) = g.endpoints(g.edge(e2));
        assert_eq!((s.label(), t.label()), ("B", "A"));
    }

    #[test]
    fn add_edge_by_label_resolves_endpoints() {
        let mut g = Graph::new("g");
        let a = g.add_node("A").unwrap();
        let b = g.add_node("B").unwrap();
        let e = g.add_edge_by_label("A", "B").unwrap();
        assert_eq!(g.edge(e).source(), a);
        assert_eq!(g.edge(e).target(), b);
    }

    #[test]
    fn add_edge_by_label_unknown_endpoint() {
        let mut g = Graph::new("g");
        g.add_node("A").unwrap();
        let err = g.add_edge_by_label("A", "missing").unwrap_err();
        assert!(
            matches!(err, Error::UnknownNode { ref label } if label == "missing"),
            "got: {err}"
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn attributes_are_distinct_and_ordered() {
        let mut g = Graph::new("g");
        let a = g.add_node("A").unwrap();
        let b = g.add_node("B").unwrap();
        g.node_mut(a)
            .set("weight", "1")
            .set("y:Fill", AttrValue::map([("color", "#FF0000")]));
        g.node_mut(b).set("weight", "heavy").set("ratio", "0.5");
        let e = g.add_edge(a, b);
        g.edge_mut(e).set("weight", "2").set("active", "true");

        let decls = g.attributes();
        let summary: Vec<(&str, AttrType)> =
            decls.iter().map(|d| (d.name.as_str(), d.attr_type)).collect();
        assert_eq!(
            summary,
            vec![
                ("label", AttrType::String),
                ("weight", AttrType::String),
                ("y:Fill", AttrType::String),
                ("ratio", AttrType::Double),
                ("active", AttrType::Boolean),
            ]
        );
    }

    #[test]
    fn attribute_type_widens_over_all_values() {
        let mut g = Graph::new("g");
        let a = g.add_node("A").unwrap();
        let b = g.add_node("B").unwrap();
        g.node_mut(a).set("size", "1").set("rank", "1");
        g.node_mut(b).set("size", "8589934592").set("rank", "1.5");
        let e1 = g.add_edge(a, b);
        let e2 = g.add_edge(b, a);
        g.edge_mut(e1).set("weight", "1");
        g.edge_mut(e2).set("weight", "heavy");

        let summary: Vec<(String, AttrType)> = g
            .attributes()
            .into_iter()
            .map(|d| (d.name, d.attr_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("label".to_string(), AttrType::String),
                ("size".to_string(), AttrType::Long),
                ("rank".to_string(), AttrType::Double),
                ("weight".to_string(), AttrType::String),
            ]
        );
    }
}
