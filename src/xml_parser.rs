use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::xml_ast::{Document, Element, XmlNode};

/// Parses well-formed XML text into an element tree.
///
/// Comments, processing instructions and the doctype are dropped. Entity
/// references and CDATA sections are folded into the surrounding text, and
/// whitespace-only text between child elements is discarded.
pub fn parse_document(input: &str) -> Result<Document> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("{e} (at byte {})", reader.buffer_position())))?;
        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without matching start"))?;
                drop_indentation(&mut element);
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => append_text(&mut stack, &String::from_utf8_lossy(&t))?,
            Event::CData(t) => append_text(&mut stack, &String::from_utf8_lossy(&t))?,
            Event::GeneralRef(r) => {
                let reference = format!("&{};", String::from_utf8_lossy(&r));
                let resolved = unescape(&reference)
                    .map_err(|e| malformed(format!("bad reference `{reference}`: {e}")))?;
                append_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed element `{}`", open.name)));
    }
    root.map(|root| Document { root })
        .ok_or_else(|| malformed("document has no root element"))
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(format!("bad attribute: {err}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)
            .map_err(|err| malformed(format!("bad value for attribute `{key}`: {err}")))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn drop_indentation(element: &mut Element) {
    if element.elements().next().is_some() {
        element
            .children
            .retain(|c| !matches!(c, XmlNode::Text(t) if t.trim().is_empty()));
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_some() => return Err(malformed("more than one root element")),
        None => *root = Some(element),
    }
    Ok(())
}

fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_text(text),
        None if text.trim().is_empty() => {}
        None => return Err(malformed("text outside the root element")),
    }
    Ok(())
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedInput(msg.into())
}
