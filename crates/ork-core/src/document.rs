//! Rocket document loading
//!
//! OpenRocket stores designs as XML, either bare, gzip-compressed, or inside a
//! zip archive next to decals and other resources. Whatever the container,
//! the document is read into an owned labeled tree ([`DocNode`]) that the
//! resolvers walk without holding on to the raw XML buffer.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::constants::ROCKET_ENTRY_NAME;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

/// Errors that can occur while reading a rocket document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Archive has no '{0}' entry")]
    MissingEntry(String),

    #[error("Invalid UTF-8 in document: {0}")]
    Encoding(String),

    #[error("Failed to parse XML: {0}")]
    Xml(String),
}

/// One element of the parsed document: name, attributes, text and children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Trimmed text content directly under this element
    pub text: String,
    pub children: Vec<DocNode>,
}

impl DocNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: DocNode) -> Self {
        self.children.push(child);
        self
    }

    /// Value of an attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&DocNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child element with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Parse an XML string into a tree rooted at the document element
    pub fn parse_xml(text: &str) -> Result<DocNode, DocumentError> {
        let doc = roxmltree::Document::parse(text).map_err(|e| DocumentError::Xml(e.to_string()))?;
        Ok(convert_element(doc.root_element()))
    }
}

fn convert_element(node: roxmltree::Node) -> DocNode {
    let text: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();

    DocNode {
        name: node.tag_name().name().to_string(),
        attributes: node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect(),
        text: text.trim().to_string(),
        children: node
            .children()
            .filter(|n| n.is_element())
            .map(convert_element)
            .collect(),
    }
}

/// Load an `.ork` file (zip archive, gzip stream, or plain XML)
pub fn load_ork(path: impl AsRef<Path>) -> Result<DocNode, DocumentError> {
    load_ork_with_entry(path, ROCKET_ENTRY_NAME)
}

/// Load an `.ork` file, looking for a specific entry name inside zip archives
pub fn load_ork_with_entry(
    path: impl AsRef<Path>,
    entry_name: &str,
) -> Result<DocNode, DocumentError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| DocumentError::Io(e.to_string()))?;
    tracing::debug!("Read {} bytes from {}", data.len(), path.display());
    load_ork_from_bytes(&data, entry_name)
}

/// Decode an `.ork` payload from memory
pub fn load_ork_from_bytes(data: &[u8], entry_name: &str) -> Result<DocNode, DocumentError> {
    let xml = if data.starts_with(ZIP_MAGIC) {
        read_zip_entry(data, entry_name)?
    } else if data.starts_with(GZIP_MAGIC) {
        let mut text = String::new();
        flate2::read::GzDecoder::new(data)
            .read_to_string(&mut text)
            .map_err(|e| DocumentError::Archive(e.to_string()))?;
        text
    } else {
        std::str::from_utf8(data)
            .map_err(|e| DocumentError::Encoding(e.to_string()))?
            .to_string()
    };

    DocNode::parse_xml(&xml)
}

fn read_zip_entry(data: &[u8], entry_name: &str) -> Result<String, DocumentError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| DocumentError::Archive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| DocumentError::Archive(e.to_string()))?;

        // Match on the file name only, entries may live in a sub-folder
        let matches = entry
            .name()
            .rsplit('/')
            .next()
            .is_some_and(|name| name == entry_name);
        if !matches {
            continue;
        }

        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|e| DocumentError::Encoding(e.to_string()))?;
        return Ok(text);
    }

    Err(DocumentError::MissingEntry(entry_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<openrocket version="1.0">
  <rocket>
    <name>Sample</name>
    <subcomponents>
      <stage><name>Sustainer</name></stage>
    </subcomponents>
  </rocket>
</openrocket>"#;

    #[test]
    fn test_parse_xml_tree() {
        let root = DocNode::parse_xml(SAMPLE).unwrap();
        assert_eq!(root.name, "openrocket");
        assert_eq!(root.attribute("version"), Some("1.0"));

        let rocket = root.child("rocket").unwrap();
        assert_eq!(rocket.child_text("name"), Some("Sample"));
        let stages: Vec<_> = rocket
            .child("subcomponents")
            .unwrap()
            .children_named("stage")
            .collect();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].child_text("name"), Some("Sustainer"));
    }

    #[test]
    fn test_parse_xml_error() {
        let result = DocNode::parse_xml("<openrocket><rocket></openrocket>");
        assert!(matches!(result, Err(DocumentError::Xml(_))));
    }

    #[test]
    fn test_builder_matches_parsed() {
        let built = DocNode::new("position")
            .with_attr("type", "top")
            .with_text("0.5");
        let parsed = DocNode::parse_xml(r#"<position type="top"> 0.5 </position>"#).unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_load_plain_xml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let root = load_ork(file.path()).unwrap();
        assert_eq!(root.name, "openrocket");
    }

    #[test]
    fn test_load_gzip_payload() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let data = encoder.finish().unwrap();

        let root = load_ork_from_bytes(&data, ROCKET_ENTRY_NAME).unwrap();
        assert!(root.child("rocket").is_some());
    }

    fn zip_with_entry(name: &str, content: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_load_zip_archive() {
        let data = zip_with_entry("rocket.ork", SAMPLE);
        let root = load_ork_from_bytes(&data, ROCKET_ENTRY_NAME).unwrap();
        assert_eq!(root.name, "openrocket");
    }

    #[test]
    fn test_zip_without_rocket_entry() {
        let data = zip_with_entry("decals/logo.png", "not a rocket");
        let result = load_ork_from_bytes(&data, ROCKET_ENTRY_NAME);
        assert!(matches!(result, Err(DocumentError::MissingEntry(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_ork("/definitely/not/here.ork");
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
