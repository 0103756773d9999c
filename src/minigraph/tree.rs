//! Owned XML element tree built from the `xml-rs` event stream.
//!
//! Element and attribute names are stored by local name; namespaces are
//! dropped since minigraph documents mix several prefixes for the same
//! vocabulary.

use xml::reader::XmlEvent;
use xml::ParserConfig;

/// One XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(source: &str) -> Result<Element, String> {
        let reader = ParserConfig::new()
            .trim_whitespace(true)
            .create_reader(source.as_bytes());

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        for event in reader {
            match event.map_err(|e| e.to_string())? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    stack.push(Element {
                        name: name.local_name,
                        attributes: attributes
                            .into_iter()
                            .map(|a| (a.name.local_name, a.value))
                            .collect(),
                        ..Default::default()
                    });
                }
                XmlEvent::EndElement { .. } => {
                    let done = stack
                        .pop()
                        .ok_or_else(|| "unbalanced end element".to_string())?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => root = Some(done),
                    }
                }
                XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                _ => (),
            }
        }

        root.ok_or_else(|| "document has no root element".to_string())
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a chain of child names
    pub fn path(&self, names: &[&str]) -> Option<&Element> {
        names.iter().try_fold(self, |el, name| el.child(name))
    }

    /// All elements named by the last entry of `names` below the chain of the others
    pub fn collect<'a>(&'a self, names: &[&str]) -> Vec<&'a Element> {
        match names.split_last() {
            Some((last, parents)) => self
                .path(parents)
                .map(|p| p.children.iter().filter(|c| c.name == *last).collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Trimmed, non-empty text of a child
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
    }

    /// Attribute value by local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
