//! Base types shared by every 2018 entity

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{
    is_element, string_attr, text_content, timestamp_attr, xlink_attr, xml_base_attr,
    ElementStart, FromXml, ParseOptions, Timestamp, ToXml, XmlWriter,
};
use crate::error::Result;
use crate::namespaces::{SCTE224_NAMESPACE, XLINK_NAMESPACE, XML_NAMESPACE};
use crate::wildcards::Extension;

/// Alternate identifier of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltId {
    /// Identifier value
    pub value: String,
    /// Human-readable description
    pub description: Option<String>,
}

impl AltId {
    /// Identifier without a description
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }
}

impl FromXml for AltId {
    const ELEMENT: &'static str = "AltID";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            value: text_content(node),
            description: string_attr(node, "description"),
        })
    }
}

impl ToXml for AltId {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT)
                .attr_opt("description", self.description.as_ref()),
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
    /// `Metadata` extension block
    pub metadata: Option<Extension>,
    /// `Ext` extension block
    pub ext: Option<Extension>,
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

    /// Consume `child` if it is one of the common children.
    ///
    /// Returns whether the child was consumed.
    pub fn read_child(&mut self, child: Node<'_, '_>, options: &ParseOptions) -> Result<bool> {
        if is_element(child, SCTE224_NAMESPACE, AltId::ELEMENT) {
            self.alt_ids.push(AltId::from_node(child, options)?);
        } else if is_element(child, SCTE224_NAMESPACE, "Metadata") {
            self.metadata = Some(Extension::capture(child));
        } else if is_element(child, SCTE224_NAMESPACE, "Ext") {
            self.ext = Some(Extension::capture(child));
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// Start tag for `local_name` carrying the identity attributes
    pub fn start(&self, local_name: &str) -> ElementStart {
        ElementStart::new(SCTE224_NAMESPACE, local_name)
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
            metadata.write_as(writer, SCTE224_NAMESPACE, "Metadata")?;
        }
        if let Some(ext) = &self.ext {
            ext.write_as(writer, SCTE224_NAMESPACE, "Ext")?;
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
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identity_attributes_and_children() {
        let xml = r#"<Media xmlns="http://www.scte.org/schemas/224" xmlns:xlink="http://www.w3.org/1999/xlink" id="m1" description="CALIFORNIA" lastUpdated="2018-05-29T00:44:57Z" xml:base="http://example.com/" xlink:href="x/media/1">
  <AltID description="content id">CID:1</AltID>
  <Ext><Thing xmlns="urn:x">1</Thing></Ext>
</Media>"#;
        let options = ParseOptions::default();
        let doc = parse_document(xml, &options).unwrap();
        let node = doc.root_element();
        let mut reusable = ReusableType::read_attributes(node).unwrap();
        for child in node.children().filter(|n| n.is_element()) {
            assert!(reusable.identity.read_child(child, &options).unwrap());
        }
        assert_eq!(reusable.identity.id.as_deref(), Some("m1"));
        assert_eq!(reusable.identity.xml_base.as_deref(), Some("http://example.com/"));
        assert_eq!(reusable.href.as_deref(), Some("x/media/1"));
        assert!(reusable.is_reference());
        assert_eq!(reusable.identity.alt_ids[0].description.as_deref(), Some("content id"));
        assert_eq!(reusable.identity.ext.as_ref().unwrap().nodes.len(), 1);
        assert!(reusable.identity.metadata.is_none());
    }

    #[test]
    fn test_start_attribute_order() {
        let reusable = ReusableType {
            identity: IdentifiableType {
                description: Some("d".to_string()),
                xml_base: Some("b".to_string()),
                ..IdentifiableType::with_id("i")
            },
            href: Some("h".to_string()),
        };
        let mut writer = XmlWriter::new();
        writer.empty(reusable.start("Policy")).unwrap();
        assert_eq!(
            writer.into_string().unwrap(),
            r#"<Policy xmlns="http://www.scte.org/schemas/224" id="i" description="d" xml:base="b" xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="h"></Policy>"#
        );
    }
}
