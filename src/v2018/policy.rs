//! Policy, ViewingPolicy and Audience

use roxmltree::Node;
use serde::{Deserialize, Serialize};

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
