use std::io::Write;

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::xml_ast::{Document, Element, XmlNode};

pub const DEFAULT_INDENT: usize = 4;

pub fn render(doc: &Document) -> String {
    render_with_indent(doc, DEFAULT_INDENT)
}

/// Renders the document with an XML declaration. Elements holding only text
/// stay on one line; every other element gets its own indented line.
pub fn render_with_indent(doc: &Document, indent: usize) -> String {
    let mut buf = Vec::new();
    render_to(doc, &mut buf, indent).expect("writing into a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn render_to<W: Write>(doc: &Document, out: W, indent: usize) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', indent);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, &doc.root)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (k, v) in &element.attributes {
        let value = attribute_value(v);
        start.push_attribute((k.as_bytes(), value.as_bytes()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    let text_only = element
        .children
        .iter()
        .all(|c| matches!(c, XmlNode::Text(_)));
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) if text_only => writer.write_event(Event::Text(BytesText::new(t)))?,
            // indentation between child elements is regenerated
            XmlNode::Text(t) if t.trim().is_empty() => {}
            XmlNode::Text(t) => writer.write_event(Event::Text(BytesText::new(t.trim())))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Escapes markup characters plus the whitespace a conforming reader would
/// otherwise normalize to spaces.
fn attribute_value(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
