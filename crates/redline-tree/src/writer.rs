//! XML writer for derived trees.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{TreeError, TreeResult};
use crate::node::{Document, Node};

/// Serialize a document with an XML declaration. Attribute and text values
/// are escaped; element and attribute names keep their source prefixes.
pub fn write(doc: &Document) -> TreeResult<String> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(|e| TreeError::Write(e.to_string()))?;
    write_node(&mut writer, &doc.root)?;
    String::from_utf8(writer.into_inner()).map_err(|e| TreeError::Write(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> TreeResult<()> {
    let name = node.name.qualified();
    let mut start = BytesStart::new(name.as_str());
    for attr in &node.attributes {
        let key = attr.name.qualified();
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    let text = node.text.as_deref().filter(|t| !t.is_empty());
    if node.children.is_empty() && text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| TreeError::Write(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| TreeError::Write(e.to_string()))?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| TreeError::Write(e.to_string()))?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(|e| TreeError::Write(e.to_string()))
}
