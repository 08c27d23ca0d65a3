//! Policy, ViewingPolicy and Audience

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use super::allocation::Allocation;
use super::base::ReusableType;
use crate::actions::{ContentAction, SignalPointDeletionAction, SignalPointInsertionAction};
use crate::documents::{
    element_children, is_element, FromXml, Match, ParseOptions, ToXml, XmlWriter,
};
use crate::error::Result;
use crate::namespaces::{ACTION_NAMESPACE, SCTE224_NAMESPACE};
use crate::wildcards::AnyElement;

/// A named set of viewing policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Identity and reference
    pub reusable: ReusableType,
    /// Viewing policies, in document order
    pub viewing_policies: Vec<ViewingPolicy>,
}

impl Policy {
    /// Reference-only policy
    pub fn reference(href: impl Into<String>) -> Self {
        Self {
            reusable: ReusableType::reference(href),
            viewing_policies: Vec::new(),
        }
    }
}

impl FromXml for Policy {
    const ELEMENT: &'static str = "Policy";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut policy = Self {
            reusable: ReusableType::read_attributes(node)?,
            viewing_policies: Vec::new(),
        };
        for child in element_children(node) {
            if policy.reusable.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_NAMESPACE, ViewingPolicy::ELEMENT) {
                policy
                    .viewing_policies
                    .push(ViewingPolicy::from_node(child, options)?);
            }
        }
        Ok(policy)
    }
}

impl ToXml for Policy {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(self.reusable.start(Self::ELEMENT))?;
        self.reusable.identity.write_children(writer)?;
        for viewing_policy in &self.viewing_policies {
            viewing_policy.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Actions selected for an audience
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingPolicy {
    /// Identity and reference
    pub reusable: ReusableType,
    /// Viewers the policy targets
    pub audience: Option<Audience>,
    /// Signal deletion action
    pub signal_point_deletion: Option<SignalPointDeletionAction>,
    /// Signal insertion action
    pub signal_point_insertion: Option<SignalPointInsertionAction>,
    /// Content substitution action
    pub content: Option<ContentAction>,
    /// Ad slot allocation action
    pub allocation: Option<Allocation>,
    /// Other action elements, in document order
    pub action_properties: Vec<AnyElement>,
}

impl FromXml for ViewingPolicy {
    const ELEMENT: &'static str = "ViewingPolicy";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut vp = Self {
            reusable: ReusableType::read_attributes(node)?,
            ..Self::default()
        };
        for child in element_children(node) {
            if vp.reusable.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_NAMESPACE, Audience::ELEMENT) {
                vp.audience = Some(Audience::from_node(child, options)?);
            } else if is_element(child, ACTION_NAMESPACE, SignalPointDeletionAction::ELEMENT) {
                vp.signal_point_deletion = Some(SignalPointDeletionAction::from_node(child, options)?);
            } else if is_element(child, ACTION_NAMESPACE, SignalPointInsertionAction::ELEMENT) {
                vp.signal_point_insertion =
                    Some(SignalPointInsertionAction::from_node(child, options)?);
            } else if is_element(child, ACTION_NAMESPACE, ContentAction::ELEMENT) {
                vp.content = Some(ContentAction::from_node(child, options)?);
            } else if is_element(child, ACTION_NAMESPACE, Allocation::ELEMENT) {
                vp.allocation = Some(Allocation::from_node(child, options)?);
            } else {
                vp.action_properties.push(AnyElement::capture(child));
            }
        }
        Ok(vp)
    }
}

impl ToXml for ViewingPolicy {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(self.reusable.start(Self::ELEMENT))?;
        self.reusable.identity.write_children(writer)?;
        if let Some(audience) = &self.audience {
            audience.write_xml(writer)?;
        }
        if let Some(action) = &self.signal_point_deletion {
            action.write_xml(writer)?;
        }
        if let Some(action) = &self.signal_point_insertion {
            action.write_xml(writer)?;
        }
        if let Some(action) = &self.content {
            action.write_xml(writer)?;
        }
        if let Some(allocation) = &self.allocation {
            allocation.write_xml(writer)?;
        }
        for property in &self.action_properties {
            property.write_to(writer)?;
        }
        writer.end()
    }
}

/// Viewer segment: qualifiers and nested audiences combined by `match`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    /// Identity and reference
    pub reusable: ReusableType,
    /// How nested audiences and qualifiers combine
    pub match_mode: Option<Match>,
    /// Nested audiences, in document order
    pub audiences: Vec<Audience>,
    /// Qualifier elements, in document order
    pub audience_properties: Vec<AnyElement>,
}

impl FromXml for Audience {
    const ELEMENT: &'static str = "Audience";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut audience = Self {
            reusable: ReusableType::read_attributes(node)?,
            match_mode: Match::from_attr(node),
            ..Self::default()
        };
        for child in element_children(node) {
            if audience.reusable.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_NAMESPACE, Self::ELEMENT) {
                audience.audiences.push(Self::from_node(child, options)?);
            } else {
                audience.audience_properties.push(AnyElement::capture(child));
            }
        }
        Ok(audience)
    }
}

impl ToXml for Audience {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            self.reusable
                .start(Self::ELEMENT)
                .display_opt("match", self.match_mode.as_ref()),
        )?;
        self.reusable.identity.write_children(writer)?;
        for audience in &self.audiences {
            audience.write_xml(writer)?;
        }
        for property in &self.audience_properties {
            property.write_to(writer)?;
        }
        writer.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::from_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_viewing_policy_with_allocation() {
        let xml = r#"<ViewingPolicy xmlns="http://www.scte.org/schemas/224" id="vp/alloc">
  <Audience xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="aud/national"/>
  <Allocation xmlns="urn:scte:224:action" ownerType="network" ownerName="superflaco" duration="PT2M">
    <Slots><Slot duration="PT30S"><AdsReferenceId>98765</AdsReferenceId></Slot></Slots>
  </Allocation>
  <Blackout xmlns="urn:scte:224:action">true</Blackout>
</ViewingPolicy>"#;
        let vp: ViewingPolicy = from_str(xml).unwrap();
        let allocation = vp.allocation.as_ref().unwrap();
        assert_eq!(allocation.owner_name.as_deref(), Some("superflaco"));
        assert_eq!(allocation.slots[0].slots[0].ads_reference_ids[0].value, "98765");
        assert_eq!(vp.action_properties.len(), 1);
    }

    #[test]
    fn test_audience_tree() {
        let xml = r#"<Audience xmlns="http://www.scte.org/schemas/224" id="regional" match="ANY">
  <Audience id="regional/west"><Zip xmlns="urn:scte:224:audience">80111</Zip></Audience>
  <Audience id="regional/east"><Zip xmlns="urn:scte:224:audience">10001</Zip></Audience>
</Audience>"#;
        let audience: Audience = from_str(xml).unwrap();
        let ids: Vec<_> = audience
            .audiences
            .iter()
            .filter_map(|a| a.reusable.identity.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["regional/west", "regional/east"]);
    }
}
