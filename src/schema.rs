//! The fixed table of yEd presentation tags understood by the codec.

use crate::value::AttrValue;

/// Id of the `key` that marks the nested yEd presentation block.
pub const NODE_GRAPHICS_KEY: &str = "d6";

/// Container element inside the presentation block.
pub const SHAPE_NODE: &str = "y:ShapeNode";

/// Attribute every node carries; equals the node's label.
pub const LABEL: &str = "label";

pub const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";

/// Namespace declarations and schema hint carried by the `graphml` root.
pub const ROOT_ATTRIBUTES: [(&str, &str); 8] = [
    ("xmlns", GRAPHML_NS),
    ("xmlns:java", "http://www.yworks.com/xml/yfiles-common/1.0/java"),
    (
        "xmlns:sys",
        "http://www.yworks.com/xml/yfiles-common/markup/primitives/2.0",
    ),
    ("xmlns:x", "http://www.yworks.com/xml/yfiles-common/markup/2.0"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns:y", "http://www.yworks.com/xml/graphml"),
    ("xmlns:yed", "http://www.yworks.com/xml/yed/3"),
    (
        "xsi:schemaLocation",
        "http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationTag {
    NodeLabel,
    Fill,
    Geometry,
    Shape,
}

/// Default value shape of a recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Text(&'static str),
    Map(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSchema {
    pub tag: PresentationTag,
    /// Attribute name on the node, also the emitted element name.
    pub attr_name: &'static str,
    /// Element name without the `y:` prefix.
    pub local_name: &'static str,
    pub shape: ValueShape,
}

impl TagSchema {
    pub fn default_value(&self) -> AttrValue {
        match self.shape {
            ValueShape::Text(s) => AttrValue::Scalar(s.to_string()),
            ValueShape::Map(pairs) => AttrValue::map(pairs.iter().copied()),
        }
    }

    /// Default for one key of a mapping-shaped tag.
    pub fn default_for(&self, key: &str) -> Option<&'static str> {
        match self.shape {
            ValueShape::Text(_) => None,
            ValueShape::Map(pairs) => pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v),
        }
    }
}

pub static TAGS: [TagSchema; 4] = [
    TagSchema {
        tag: PresentationTag::NodeLabel,
        attr_name: "y:NodeLabel",
        local_name: "NodeLabel",
        shape: ValueShape::Text(""),
    },
    TagSchema {
        tag: PresentationTag::Fill,
        attr_name: "y:Fill",
        local_name: "Fill",
        shape: ValueShape::Map(&[("color", "#FFFFFF")]),
    },
    TagSchema {
        tag: PresentationTag::Geometry,
        attr_name: "y:Geometry",
        local_name: "Geometry",
        shape: ValueShape::Map(&[
            ("height", "30.0"),
            ("width", "30.0"),
            ("x", "0.0"),
            ("y", "0.0"),
        ]),
    },
    TagSchema {
        tag: PresentationTag::Shape,
        attr_name: "y:Shape",
        local_name: "Shape",
        shape: ValueShape::Map(&[("type", "rectangle")]),
    },
];

pub fn lookup(attr_name: &str) -> Option<&'static TagSchema> {
    TAGS.iter().find(|t| t.attr_name == attr_name)
}

pub fn lookup_local(local_name: &str) -> Option<&'static TagSchema> {
    TAGS.iter().find(|t| t.local_name == local_name)
}

pub fn is_recognized(attr_name: &str) -> bool {
    lookup(attr_name).is_some()
}

impl PresentationTag {
    pub fn schema(self) -> &'static TagSchema {
        match self {
            PresentationTag::NodeLabel => &TAGS[0],
            PresentationTag::Fill => &TAGS[1],
            PresentationTag::Geometry => &TAGS[2],
            PresentationTag::Shape => &TAGS[3],
        }
    }

    pub fn attr_name(self) -> &'static str {
        self.schema().attr_name
    }
}
