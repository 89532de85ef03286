//! XML reader: builds a [`Document`] from text using `quick-xml` events.
//!
//! Namespace prefixes are resolved here, with one scope per open element.
//! Character data is never trimmed.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{TreeError, TreeResult};
use crate::name::{Attribute, QName, XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::node::{Document, Node};

/// Parse a document part.
pub fn parse(xml: &str) -> TreeResult<Document> {
    let mut reader = Reader::from_str(xml);
    let mut lines = LineCounter::new(xml);
    let mut scopes = NamespaceScopes::default();
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let line = lines.line_at(offset);
        let event = reader.read_event().map_err(|e| {
            let at = lines.line_at(reader.buffer_position() as usize);
            TreeError::parse(at, e.to_string())
        })?;

        match event {
            Event::Start(start) => {
                let node = open_element(&start, line, &mut scopes)?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = open_element(&start, line, &mut scopes)?;
                scopes.pop();
                attach(node, &mut stack, &mut root, line)?;
            }
            Event::End(_) => {
                let mut node = stack
                    .pop()
                    .ok_or_else(|| TreeError::parse(line, "unexpected end tag"))?;
                scopes.pop();
                finish(&mut node);
                attach(node, &mut stack, &mut root, line)?;
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| TreeError::parse(line, e.to_string()))?;
                append_text(&mut stack, &content, line)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let content = std::str::from_utf8(&bytes)
                    .map_err(|e| TreeError::parse(line, e.to_string()))?;
                append_text(&mut stack, content, line)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TreeError::Unclosed {
            name: open.name.qualified(),
            line: open.line,
        });
    }
    let root = root.ok_or(TreeError::NoRoot)?;
    debug!(root = %root.name, elements = root.subtree_len(), "parsed document part");
    Ok(Document::new(root))
}

fn open_element(start: &BytesStart<'_>, line: usize, scopes: &mut NamespaceScopes) -> TreeResult<Node> {
    let raw_name = utf8(start.name().as_ref(), line)?.to_string();

    let mut raw_attrs = Vec::new();
    let mut bindings = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| TreeError::parse(line, e.to_string()))?;
        let key = utf8(attr.key.as_ref(), line)?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| TreeError::parse(line, e.to_string()))?
            .into_owned();
        if key == "xmlns" {
            bindings.push((String::new(), value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            bindings.push((prefix.to_string(), value.clone()));
        }
        raw_attrs.push((key, value));
    }
    scopes.push(bindings);

    let name = scopes.resolve(&raw_name, true, line)?;
    let mut attributes = Vec::with_capacity(raw_attrs.len());
    for (key, value) in raw_attrs {
        let name = if key == "xmlns" {
            QName::new(Some(XMLNS_NAMESPACE), None::<String>, "xmlns")
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            QName::prefixed(XMLNS_NAMESPACE, "xmlns", prefix)
        } else {
            scopes.resolve(&key, false, line)?
        };
        attributes.push(Attribute::new(name, value));
    }

    Ok(Node {
        name,
        attributes,
        children: Vec::new(),
        text: None,
        line,
    })
}

fn attach(node: Node, stack: &mut [Node], root: &mut Option<Node>, line: usize) -> TreeResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(TreeError::parse(line, "multiple root elements")),
    }
}

fn append_text(stack: &mut [Node], content: &str, line: usize) -> TreeResult<()> {
    match stack.last_mut() {
        Some(node) => {
            node.text.get_or_insert_with(String::new).push_str(content);
            Ok(())
        }
        None if content.chars().all(char::is_whitespace) => Ok(()),
        None => Err(TreeError::parse(line, "text outside the root element")),
    }
}

/// Drop formatting whitespace between child elements and empty text.
fn finish(node: &mut Node) {
    let insignificant = match &node.text {
        Some(text) if text.is_empty() => true,
        Some(text) => !node.children.is_empty() && text.chars().all(char::is_whitespace),
        None => false,
    };
    if insignificant {
        node.text = None;
    }
}

fn utf8(bytes: &[u8], line: usize) -> TreeResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| TreeError::parse(line, e.to_string()))
}

#[derive(Default)]
struct NamespaceScopes {
    scopes: Vec<Vec<(String, String)>>,
}

impl NamespaceScopes {
    fn push(&mut self, bindings: Vec<(String, String)>) {
        self.scopes.push(bindings);
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Resolve a raw `prefix:local` name. Unprefixed attributes have no
    /// namespace; unprefixed elements take the default namespace.
    fn resolve(&self, raw: &str, is_element: bool, line: usize) -> TreeResult<QName> {
        match raw.split_once(':') {
            Some(("xml", local)) => Ok(QName::prefixed(XML_NAMESPACE, "xml", local)),
            Some((prefix, local)) => {
                let uri = self.lookup(prefix).ok_or_else(|| TreeError::UnboundPrefix {
                    prefix: prefix.to_string(),
                    line,
                })?;
                Ok(QName::prefixed(uri, prefix, local))
            }
            None if is_element => {
                let namespace = self.lookup("").filter(|uri| !uri.is_empty());
                Ok(QName::new(namespace, None::<String>, raw))
            }
            None => Ok(QName::unqualified(raw)),
        }
    }
}

/// Maps byte offsets to 1-based line numbers. Offsets must be queried in
/// non-decreasing order, which holds for a forward-only reader.
struct LineCounter<'a> {
    input: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        let offset = offset.min(self.input.len());
        if offset > self.offset {
            self.line += self.input[self.offset..offset]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = offset;
        }
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::WORDPROCESSING_NAMESPACE;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:r><w:t xml:space="preserve"> Hello &amp; </w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn resolves_namespaces_and_keeps_text_verbatim() {
        let doc = parse(DOC).unwrap();
        assert!(doc.root.name.is(WORDPROCESSING_NAMESPACE, "document"));
        let t = doc
            .root
            .descendants()
            .find(|n| n.name.local == "t")
            .unwrap();
        assert_eq!(t.text.as_deref(), Some(" Hello & "));
        assert_eq!(t.attr(XML_NAMESPACE, "space"), Some("preserve"));
        assert_eq!(t.line, 5);
    }

    #[test]
    fn drops_formatting_whitespace_between_elements() {
        let doc = parse(DOC).unwrap();
        assert_eq!(doc.root.text, None);
        let body = &doc.root.children[0];
        assert_eq!(body.text, None);
    }

    #[test]
    fn keeps_namespace_declarations_as_attributes() {
        let doc = parse(DOC).unwrap();
        assert!(doc.root.attributes[0].is_namespace_declaration());
    }

    #[test]
    fn default_namespace_applies_to_elements_only() {
        let doc = parse(r#"<root xmlns="urn:a" id="1"><child/></root>"#).unwrap();
        assert!(doc.root.name.is("urn:a", "root"));
        assert!(doc.root.children[0].name.is("urn:a", "child"));
        let id = doc.root.attributes.iter().find(|a| a.name.local == "id").unwrap();
        assert_eq!(id.name.namespace, None);
    }

    #[test]
    fn cdata_is_text() {
        let doc = parse("<a><![CDATA[x < y]]></a>").unwrap();
        assert_eq!(doc.root.text.as_deref(), Some("x < y"));
    }

    #[test]
    fn unbound_prefix_is_an_error() {
        let err = parse("<w:p/>").unwrap_err();
        assert!(matches!(err, TreeError::UnboundPrefix { ref prefix, .. } if prefix == "w"));
    }

    #[test]
    fn unclosed_element_is_an_error() {
        let err = parse("<a><b></b>").unwrap_err();
        assert!(matches!(err, TreeError::Unclosed { ref name, .. } if name == "a"));
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        assert!(parse("<a><b></a></b>").is_err());
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(parse("  ").unwrap_err(), TreeError::NoRoot));
    }

    #[test]
    fn multiple_roots_rejected() {
        assert!(parse("<a/><b/>").is_err());
    }
}
