//! Query results envelope and audit trail

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use super::base::IdentifiableType;
use super::media::{Media, MediaPoint};
use super::policy::{Audience, Policy, ViewingPolicy};
use crate::documents::{
    element_children, is_element, string_attr, unsigned_attr, xlink_attr, ElementStart, FromXml,
    ParseOptions, ToXml, XmlWriter,
};
use crate::error::Result;
use crate::namespaces::{SCTE224_NAMESPACE, XLINK_NAMESPACE};

/// Entities returned by a data service query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    /// Number of results reported by the service
    pub size: Option<u32>,
    /// Media results
    pub medias: Vec<Media>,
    /// MediaPoint results
    pub media_points: Vec<MediaPoint>,
    /// Policy results
    pub policies: Vec<Policy>,
    /// ViewingPolicy results
    pub viewing_policies: Vec<ViewingPolicy>,
    /// Audience results
    pub audiences: Vec<Audience>,
    /// Audit results
    pub audits: Vec<Audit>,
}

impl FromXml for Results {
    const ELEMENT: &'static str = "Results";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut results = Self {
            size: unsigned_attr(node, "size")?,
            ..Self::default()
        };
        for child in element_children(node) {
            if is_element(child, SCTE224_NAMESPACE, Media::ELEMENT) {
                results.medias.push(Media::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, MediaPoint::ELEMENT) {
                results.media_points.push(MediaPoint::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, Policy::ELEMENT) {
                results.policies.push(Policy::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, ViewingPolicy::ELEMENT) {
                results
                    .viewing_policies
                    .push(ViewingPolicy::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, Audience::ELEMENT) {
                results.audiences.push(Audience::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, Audit::ELEMENT) {
                results.audits.push(Audit::from_node(child, options)?);
            }
        }
        Ok(results)
    }
}

impl ToXml for Results {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT).display_opt("size", self.size),
        )?;
        for media in &self.medias {
            media.write_xml(writer)?;
        }
        for point in &self.media_points {
            point.write_xml(writer)?;
        }
        for policy in &self.policies {
            policy.write_xml(writer)?;
        }
        for viewing_policy in &self.viewing_policies {
            viewing_policy.write_xml(writer)?;
        }
        for audience in &self.audiences {
            audience.write_xml(writer)?;
        }
        for audit in &self.audits {
            audit.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Record of a policy decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    /// Identity
    pub identity: IdentifiableType,
    /// Audited entity
    pub href: Option<String>,
    /// Role of the audited entity
    pub role: Option<String>,
    /// Authorization under which the decision was made
    pub authorization: Option<String>,
    /// Policy mode in force
    pub policy_mode: Option<String>,
    /// What triggered the decision
    pub trigger: Option<String>,
    /// Outcome
    pub result: Option<String>,
    /// Nested audit records
    pub audits: Vec<Audit>,
}

impl FromXml for Audit {
    const ELEMENT: &'static str = "Audit";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut audit = Self {
            identity: IdentifiableType::read_attributes(node)?,
            href: xlink_attr(node, "href"),
            role: xlink_attr(node, "role"),
            authorization: string_attr(node, "authorization"),
            policy_mode: string_attr(node, "policyMode"),
            trigger: string_attr(node, "trigger"),
            result: string_attr(node, "result"),
            audits: Vec::new(),
        };
        for child in element_children(node) {
            if audit.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_NAMESPACE, Self::ELEMENT) {
                audit.audits.push(Self::from_node(child, options)?);
            }
        }
        Ok(audit)
    }
}

impl ToXml for Audit {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            self.identity
                .start(Self::ELEMENT)
                .ns_attr_opt(XLINK_NAMESPACE, "href", self.href.as_ref())
                .ns_attr_opt(XLINK_NAMESPACE, "role", self.role.as_ref())
                .attr_opt("authorization", self.authorization.as_ref())
                .attr_opt("policyMode", self.policy_mode.as_ref())
                .attr_opt("trigger", self.trigger.as_ref())
                .attr_opt("result", self.result.as_ref()),
        )?;
        self.identity.write_children(writer)?;
        for audit in &self.audits {
            audit.write_xml(writer)?;
        }
        writer.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_str, to_string_pretty};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_results_envelope() {
        let xml = r#"<Results xmlns="http://www.scte.org/schemas/224" size="3">
  <Media id="m1"/>
  <Policy id="p1"/>
  <Audience id="a1"/>
</Results>"#;
        let results: Results = from_str(xml).unwrap();
        assert_eq!(results.size, Some(3));
        assert_eq!(results.medias.len(), 1);
        assert_eq!(results.policies.len(), 1);
        assert_eq!(results.audiences.len(), 1);
        assert!(results.audits.is_empty());
    }

    #[test]
    fn test_audit_round_trip() {
        let xml = r#"<Audit xmlns="http://www.scte.org/schemas/224" id="audit/1" xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="mp/1" xlink:role="MediaPoint" authorization="ok" policyMode="live" trigger="signal" result="applied">
  <Audit xmlns="http://www.scte.org/schemas/224" id="audit/1/a" result="skipped"></Audit>
</Audit>"#;
        let audit: Audit = from_str(xml).unwrap();
        assert_eq!(audit.role.as_deref(), Some("MediaPoint"));
        assert_eq!(audit.audits[0].result.as_deref(), Some("skipped"));
        assert_eq!(to_string_pretty(&audit).unwrap(), xml);
    }
}
