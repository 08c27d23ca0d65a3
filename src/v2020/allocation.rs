//! `Allocation` action: ad slots handed to an owner
//!
//! Producers are inconsistent about qualifying the descendants of
//! `Allocation`, so they are matched by local name in any namespace. They are
//! always written in the action namespace.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{
    bool_attr, duration_attr, element_children, string_attr, text_content, ElementStart, FromXml,
    ParseOptions, ToXml, XmlWriter,
};
use crate::duration::Duration;
use crate::error::Result;
use crate::namespaces::ACTION_NAMESPACE;

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    local_name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    element_children(node).filter(move |n| n.tag_name().name() == local_name)
}

/// Ad slots allocated to an owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Kind of owner (network, distributor, ...)
    pub owner_type: Option<String>,
    /// Owner name
    pub owner_name: Option<String>,
    /// Total allocated time
    pub duration: Option<Duration>,
    /// Ad decision reference
    pub ads: Option<String>,
    /// Slot groups, in document order
    pub slots: Vec<Slots>,
}

impl FromXml for Allocation {
    const ELEMENT: &'static str = "Allocation";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            owner_type: string_attr(node, "ownerType"),
            owner_name: string_attr(node, "ownerName"),
            duration: duration_attr(node, "duration", options)?,
            ads: string_attr(node, "ads"),
            slots: children_named(node, Slots::ELEMENT)
                .map(|child| Slots::from_node(child, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl ToXml for Allocation {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT)
                .attr_opt("ownerType", self.owner_type.as_ref())
                .attr_opt("ownerName", self.owner_name.as_ref())
                .attr_opt("duration", self.duration.as_ref())
                .attr_opt("ads", self.ads.as_ref()),
        )?;
        for slots in &self.slots {
            slots.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Group of slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    /// Slots, in document order
    pub slots: Vec<Slot>,
}

impl FromXml for Slots {
    const ELEMENT: &'static str = "Slots";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            slots: children_named(node, Slot::ELEMENT)
                .map(|child| Slot::from_node(child, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl ToXml for Slots {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT))?;
        for slot in &self.slots {
            slot.write_xml(writer)?;
        }
        writer.end()
    }
}

/// One ad slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot length
    pub duration: Option<Duration>,
    /// Offset into the break
    pub offset: Option<Duration>,
    /// Ads eligible or excluded for this slot
    pub ads_reference_ids: Vec<AdsReferenceId>,
    /// Placement rules
    pub slot_rules: Option<SlotRules>,
}

impl FromXml for Slot {
    const ELEMENT: &'static str = "Slot";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            duration: duration_attr(node, "duration", options)?,
            offset: duration_attr(node, "offset", options)?,
            ads_reference_ids: children_named(node, AdsReferenceId::ELEMENT)
                .map(|child| AdsReferenceId::from_node(child, options))
                .collect::<Result<_>>()?,
            slot_rules: children_named(node, SlotRules::ELEMENT)
                .next()
                .map(|child| SlotRules::from_node(child, options))
                .transpose()?,
        })
    }
}

impl ToXml for Slot {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT)
                .attr_opt("duration", self.duration.as_ref())
                .attr_opt("offset", self.offset.as_ref()),
        )?;
        for reference in &self.ads_reference_ids {
            reference.write_xml(writer)?;
        }
        if let Some(rules) = &self.slot_rules {
            rules.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Reference to an ad
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdsReferenceId {
    /// Referenced id
    pub value: String,
    /// Kind of reference
    pub reference_type: Option<String>,
    /// Whether the reference excludes rather than selects
    pub exclude: Option<bool>,
}

impl FromXml for AdsReferenceId {
    const ELEMENT: &'static str = "AdsReferenceId";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            value: text_content(node),
            reference_type: string_attr(node, "referenceType"),
            exclude: bool_attr(node, "exclude")?,
        })
    }
}

impl ToXml for AdsReferenceId {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT)
                .attr_opt("referenceType", self.reference_type.as_ref())
                .display_opt("exclude", self.exclude),
            &self.value,
        )
    }
}

/// Placement rules of a slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRules {
    /// Rules, in document order
    pub rules: Vec<SlotRule>,
}

impl FromXml for SlotRules {
    const ELEMENT: &'static str = "SlotRules";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            rules: children_named(node, SlotRule::ELEMENT)
                .map(|child| SlotRule::from_node(child, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl ToXml for SlotRules {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT))?;
        for rule in &self.rules {
            rule.write_xml(writer)?;
        }
        writer.end()
    }
}

/// A named rule with parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRule {
    /// Rule name
    pub rule: Option<String>,
    /// Parameters, in document order
    pub parameters: Vec<Parameter>,
}

impl FromXml for SlotRule {
    const ELEMENT: &'static str = "SlotRule";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            rule: string_attr(node, "rule"),
            parameters: children_named(node, Parameter::ELEMENT)
                .map(|child| Parameter::from_node(child, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl ToXml for SlotRule {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT).attr_opt("rule", self.rule.as_ref()),
        )?;
        for parameter in &self.parameters {
            parameter.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Rule parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: Option<String>,
    /// Parameter value
    pub value: String,
}

impl FromXml for Parameter {
    const ELEMENT: &'static str = "Parameter";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            name: string_attr(node, "parameterName"),
            value: text_content(node),
        })
    }
}

impl ToXml for Parameter {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT)
                .attr_opt("parameterName", self.name.as_ref()),
            &self.value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_str, to_string_pretty};
    use pretty_assertions::assert_eq;

    const ALLOCATION: &str = r#"<Allocation xmlns="urn:scte:224:action" ownerType="distributor" ownerName="superflaco" duration="PT2M" ads="ads.example.com">
  <Slots xmlns="urn:scte:224:action">
    <Slot xmlns="urn:scte:224:action" duration="PT30S" offset="PT0S">
      <AdsReferenceId xmlns="urn:scte:224:action" referenceType="campaign">98765</AdsReferenceId>
      <AdsReferenceId xmlns="urn:scte:224:action" referenceType="advertiser" exclude="true">111</AdsReferenceId>
      <SlotRules xmlns="urn:scte:224:action">
        <SlotRule xmlns="urn:scte:224:action" rule="separation">
          <Parameter xmlns="urn:scte:224:action" parameterName="minutes">15</Parameter>
        </SlotRule>
      </SlotRules>
    </Slot>
    <Slot xmlns="urn:scte:224:action" duration="PT30S" offset="PT30S"></Slot>
  </Slots>
</Allocation>"#;

    #[test]
    fn test_allocation_tree() {
        let allocation: Allocation = from_str(ALLOCATION).unwrap();
        assert_eq!(allocation.owner_type.as_deref(), Some("distributor"));
        assert_eq!(allocation.duration.as_ref().unwrap().value().num_seconds(), 120);
        let slots = &allocation.slots[0].slots;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].ads_reference_ids[1].exclude, Some(true));
        let rule = &slots[0].slot_rules.as_ref().unwrap().rules[0];
        assert_eq!(rule.rule.as_deref(), Some("separation"));
        assert_eq!(rule.parameters[0].name.as_deref(), Some("minutes"));
        assert_eq!(rule.parameters[0].value, "15");
        assert!(slots[1].slot_rules.is_none());
    }

    #[test]
    fn test_allocation_serializes_as_read() {
        let allocation: Allocation = from_str(ALLOCATION).unwrap();
        assert_eq!(to_string_pretty(&allocation).unwrap(), ALLOCATION);
    }

    #[test]
    fn test_unqualified_descendants() {
        let xml = r#"<a:Allocation xmlns:a="urn:scte:224:action"><Slots><Slot><AdsReferenceId>1</AdsReferenceId></Slot></Slots></a:Allocation>"#;
        let allocation: Allocation = from_str(xml).unwrap();
        assert_eq!(allocation.slots[0].slots[0].ads_reference_ids[0].value, "1");
    }
}
