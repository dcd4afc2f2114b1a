//! Minimal XML element tree
//!
//! SOAP responses are small, so they are read into a tree of [`Node`]s
//! and queried by local element name. Namespace prefixes are dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regsync_core::{Error, Result};

/// One XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Local name (prefix stripped)
    pub name: String,
    /// Concatenated text content, `None` when empty
    pub text: Option<String>,
    /// Carries `xsi:nil="true"`
    pub nil: bool,
    pub children: Vec<Node>,
}

impl Node {
    fn open(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let nil = start.attributes().flatten().any(|attr| {
            attr.key.local_name().as_ref() == b"nil" && attr.value.as_ref() == b"true"
        });
        Self {
            name,
            nil,
            ..Self::default()
        }
    }

    /// First child with this local name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with this local name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Descend through a path of local names
    pub fn path(&self, names: &[&str]) -> Option<&Node> {
        names.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Text of a non-nil child
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name)
            .filter(|c| !c.nil)
            .and_then(|c| c.text.as_deref())
    }

    /// First descendant (depth-first) with this local name
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.find(name)
            }
        })
    }
}

/// Parse a document; the returned node is a nameless root holding the
/// document element
pub fn parse(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = vec![Node::default()];

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::transport(format!("Malformed XML at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(start) => stack.push(Node::open(&start)),
            Event::Empty(start) => {
                let node = Node::open(&start);
                attach(&mut stack, node)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| Error::transport(format!("Malformed XML text: {}", e)))?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append_text(&mut stack, &text);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(Error::transport("Malformed XML: unbalanced end tag"));
                }
                let node = stack.pop().unwrap_or_default();
                attach(&mut stack, node)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(Error::transport("Malformed XML: unexpected end of document"));
    }
    stack
        .pop()
        .ok_or_else(|| Error::transport("Malformed XML: empty document"))
}

fn attach(stack: &mut [Node], node: Node) -> Result<()> {
    stack
        .last_mut()
        .map(|parent| parent.children.push(node))
        .ok_or_else(|| Error::transport("Malformed XML: element outside document"))
}

fn append_text(stack: &mut [Node], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(node) = stack.last_mut() {
        node.text.get_or_insert_with(String::new).push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_without_prefixes() {
        let doc = parse(
            r#"<s:Envelope xmlns:s="urn:s"><s:Body><a:Item><a:Name>x &amp; y</a:Name><a:Empty/></a:Item></s:Body></s:Envelope>"#,
        )
        .unwrap();

        let item = doc.path(&["Envelope", "Body", "Item"]).unwrap();
        assert_eq!(item.text_of("Name"), Some("x & y"));
        assert!(item.child("Empty").is_some());
        assert_eq!(item.text_of("Empty"), None);
    }

    #[test]
    fn nil_elements_have_no_text() {
        let doc = parse(
            r#"<r xmlns:i="http://www.w3.org/2001/XMLSchema-instance"><v i:nil="true"/><w>1</w></r>"#,
        )
        .unwrap();
        let root = doc.child("r").unwrap();
        assert!(root.child("v").unwrap().nil);
        assert_eq!(root.text_of("v"), None);
        assert_eq!(root.text_of("w"), Some("1"));
    }

    #[test]
    fn find_descends() {
        let doc = parse("<a><b><c>deep</c></b></a>").unwrap();
        assert_eq!(doc.find("c").and_then(|c| c.text.as_deref()), Some("deep"));
    }

    #[test]
    fn truncated_document_is_transport_error() {
        let err = parse("<a><b>").unwrap_err();
        assert!(err.is_transport());
    }
}
