//! Base types shared by every 2020 entity

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{
    is_element, string_attr, text_content, timestamp_attr, xlink_attr, xml_base_attr,
    ElementStart, FromXml, ParseOptions, Timestamp, ToXml, XmlWriter,
};
use crate::error::Result;
use crate::namespaces::{SCTE224_NAMESPACE, XLINK_NAMESPACE, XML_NAMESPACE};
use crate::wildcards::Extension;

use super::adi3::Adi3;

/// Alternate identifier of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltId {
    /// Identifier value
    pub value: String,
    /// Human-readable description
    pub description: Option<String>,
    /// Identifier scheme
    pub id_type: Option<String>,
}

impl AltId {
    /// Identifier without a description or scheme
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
            id_type: None,
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
            id_type: string_attr(node, "type"),
        })
    }
}

impl ToXml for AltId {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT)
                .attr_opt("description", self.description.as_ref())
                .attr_opt("type", self.id_type.as_ref()),
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
    /// ADI 3.0 asset metadata held in `Metadata`, if any
    pub fn adi3(&self, options: &ParseOptions) -> Result<Option<Adi3>> {
        match &self.metadata {
            Some(metadata) => metadata.find::<Adi3>(options),
            None => Ok(None),
        }
    }

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
    use crate::documents::{from_str, to_string};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alt_id_type() {
        let xml = r#"<AltID xmlns="http://www.scte.org/schemas/224" description="Gracenote" type="TMSID">SH012345670000</AltID>"#;
        let alt_id: AltId = from_str(xml).unwrap();
        assert_eq!(alt_id.id_type.as_deref(), Some("TMSID"));
        assert_eq!(to_string(&alt_id).unwrap(), xml);
    }
}
