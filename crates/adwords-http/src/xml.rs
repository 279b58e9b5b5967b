//! Minimal XML element tree and its flattening into [`RawValue`].
//!
//! SOAP responses are loosely typed: a field that repeats is a list, a field
//! that appears once is a single child, and leaf text carries every scalar.
//! The tree keeps local names only; namespace prefixes are dropped.

use anyhow::{anyhow, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeMap;
use sync_core::RawValue;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of a direct child, if present.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Depth-first search for the first element matching `predicate`.
    pub fn find<F>(&self, predicate: &F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(predicate))
    }

    /// Depth-first search by local name.
    pub fn find_named(&self, name: &str) -> Option<&Element> {
        self.find(&|e: &Element| e.name == name)
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}

/// Parse a document and return its root element.
pub fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| anyhow!("Unbalanced XML document"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(anyhow!("Truncated XML document"));
    }
    root.ok_or_else(|| anyhow!("Empty XML document"))
}

/// Flatten an element into a plain value tree.
///
/// Leaves become scalars. Children that share a name become a sequence in
/// document order; a child that appears once becomes a single value.
pub fn flatten(element: &Element) -> RawValue {
    if element.children.is_empty() {
        return RawValue::Scalar(element.text.clone());
    }

    let mut grouped: BTreeMap<String, Vec<RawValue>> = BTreeMap::new();
    for child in &element.children {
        grouped
            .entry(child.name.clone())
            .or_default()
            .push(flatten(child));
    }

    RawValue::Mapping(
        grouped
            .into_iter()
            .map(|(name, mut values)| {
                let value = if values.len() == 1 {
                    values.remove(0)
                } else {
                    RawValue::Sequence(values)
                };
                (name, value)
            })
            .collect(),
    )
}

/// Escape text for inclusion in an XML document.
pub fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
