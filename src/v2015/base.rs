//! Base types shared by every 2015 entity

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{
    is_element, string_attr, text_content, timestamp_attr, xlink_attr, xml_base_attr,
    ElementStart, FromXml, ParseOptions, Timestamp, ToXml, XmlWriter,
};
use crate::error::Result;
use crate::namespaces::{SCTE224_2015_NAMESPACE, XLINK_NAMESPACE, XML_NAMESPACE};
use crate::wildcards::RawMarkup;

/// Alternate identifier of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltId {
    /// Identifier value
    pub value: String,
}

impl AltId {
    /// Identifier with the given value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl FromXml for AltId {
    const ELEMENT: &'static str = "AltID";
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(text_content(node)))
    }
}

impl ToXml for AltId {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(SCTE224_2015_NAMESPACE, Self::ELEMENT),
            &self.value,
        )
    }
}

/// Identity attributes and common children of every entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiableType {
    /// Entity id
    pub id: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
    /// Last modification time
    pub last_updated: Option<Timestamp>,
    /// `xml:base`
    pub xml_base: Option<String>,
    /// Alternate identifiers, in document order
    pub alt_ids: Vec<AltId>,
    /// `Metadata` content, uninterpreted
    pub metadata: Option<RawMarkup>,
    /// `Ext` content, uninterpreted
    pub ext: Option<RawMarkup>,
}

impl IdentifiableType {
    /// Identity with just an id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Read the identity attributes of `node`
    pub fn read_attributes(node: Node<'_, '_>) -> Result<Self> {
        Ok(Self {
            id: string_attr(node, "id"),
            description: string_attr(node, "description"),
            last_updated: timestamp_attr(node, "lastUpdated")?,
            xml_base: xml_base_attr(node),
            ..Self::default()
        })
    }

    /// Consume `child` if it is one of the common children
    pub fn read_child(&mut self, child: Node<'_, '_>, options: &ParseOptions) -> Result<bool> {
        if is_element(child, SCTE224_2015_NAMESPACE, AltId::ELEMENT) {
            self.alt_ids.push(AltId::from_node(child, options)?);
        } else if is_element(child, SCTE224_2015_NAMESPACE, "Metadata") {
            self.metadata = Some(RawMarkup::capture(child));
        } else if is_element(child, SCTE224_2015_NAMESPACE, "Ext") {
            self.ext = Some(RawMarkup::capture(child));
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// Start tag for `local_name` carrying the identity attributes
    pub fn start(&self, local_name: &str) -> ElementStart {
        ElementStart::new(SCTE224_2015_NAMESPACE, local_name)
            .attr_opt("id", self.id.as_ref())
            .attr_opt("description", self.description.as_ref())
            .timestamp_opt("lastUpdated", self.last_updated.as_ref())
            .ns_attr_opt(XML_NAMESPACE, "base", self.xml_base.as_ref())
    }

    /// Write the common children
    pub fn write_children(&self, writer: &mut XmlWriter) -> Result<()> {
        for alt_id in &self.alt_ids {
            alt_id.write_xml(writer)?;
        }
        if let Some(metadata) = &self.metadata {
            metadata.write_as(writer, SCTE224_2015_NAMESPACE, "Metadata")?;
        }
        if let Some(ext) = &self.ext {
            ext.write_as(writer, SCTE224_2015_NAMESPACE, "Ext")?;
        }
        Ok(())
    }
}

/// Identity plus an optional `xlink:href` reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReusableType {
    /// Identity attributes and common children
    pub identity: IdentifiableType,
    /// Reference to a definition held elsewhere
    pub href: Option<String>,
}

impl ReusableType {
    /// Reference-only instance
    pub fn reference(href: impl Into<String>) -> Self {
        Self {
            identity: IdentifiableType::default(),
            href: Some(href.into()),
        }
    }

    /// Whether this instance is a reference
    pub fn is_reference(&self) -> bool {
        self.href.is_some()
    }

    /// Read the identity and reference attributes of `node`
    pub fn read_attributes(node: Node<'_, '_>) -> Result<Self> {
        Ok(Self {
            identity: IdentifiableType::read_attributes(node)?,
            href: xlink_attr(node, "href"),
        })
    }

    /// Start tag for `local_name` carrying identity and reference attributes
    pub fn start(&self, local_name: &str) -> ElementStart {
        self.identity
            .start(local_name)
            .ns_attr_opt(XLINK_NAMESPACE, "href", self.href.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::parse_document;

    #[test]
    fn test_metadata_is_kept_as_markup() {
        let xml = r#"<Media xmlns="http://www.scte.org/schemas/224/2015" xmlns:c="http://ctsrmm.com/ctsesni" id="m"><Metadata><c:MetadataDetail name="Sport">Documentary</c:MetadataDetail></Metadata></Media>"#;
        let options = ParseOptions::default();
        let doc = parse_document(xml, &options).unwrap();
        let node = doc.root_element();
        let mut identity = IdentifiableType::read_attributes(node).unwrap();
        let metadata = node.first_element_child().unwrap();
        assert!(identity.read_child(metadata, &options).unwrap());

        let raw = identity.metadata.unwrap();
        assert_eq!(
            raw.markup,
            r#"<c:MetadataDetail name="Sport">Documentary</c:MetadataDetail>"#
        );
        assert_eq!(raw.namespaces[0].prefix, "c");
    }

    #[test]
    fn test_foreign_child_is_not_consumed() {
        let xml = r#"<Media xmlns="http://www.scte.org/schemas/224/2015"><AltID xmlns="http://www.scte.org/schemas/224">x</AltID></Media>"#;
        let options = ParseOptions::default();
        let doc = parse_document(xml, &options).unwrap();
        let mut identity = IdentifiableType::default();
        let child = doc.root_element().first_element_child().unwrap();
        assert!(!identity.read_child(child, &options).unwrap());
    }
}
