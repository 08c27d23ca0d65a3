//! Schema revisions and revision-independent documents
//!
//! [`Document`] holds the root entity of a document in whichever revision it
//! was written in. [`Document::parse`] detects the revision: the 2015 core
//! namespace is unambiguous, while 2018 and 2020 share a namespace and are
//! told apart by the presence of 2020-only content.

use roxmltree::Node;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::converters::{ConversionReport, Downgrade, Upgrade};
use crate::documents::{describe, parse_document, to_string, to_string_pretty, ParseOptions};
use crate::error::{Error, Result};
use crate::namespaces::{ACTION_NAMESPACE, SCTE224_2015_NAMESPACE, SCTE224_NAMESPACE};
use crate::{v2015, v2018, v2020};

/// SCTE-224 schema revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SchemaVersion {
    /// SCTE 224 2015
    #[serde(rename = "2015")]
    V2015,
    /// SCTE 224 2018 (20180501)
    #[serde(rename = "2018")]
    V2018,
    /// SCTE 224 2020 (20200407)
    #[serde(rename = "2020")]
    V2020,
}

impl SchemaVersion {
    /// Every revision, oldest first
    pub const ALL: [SchemaVersion; 3] =
        [SchemaVersion::V2015, SchemaVersion::V2018, SchemaVersion::V2020];

    /// Year label
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V2015 => "2015",
            SchemaVersion::V2018 => "2018",
            SchemaVersion::V2020 => "2020",
        }
    }

    /// Core namespace of the revision
    pub fn namespace(&self) -> &'static str {
        match self {
            SchemaVersion::V2015 => SCTE224_2015_NAMESPACE,
            SchemaVersion::V2018 | SchemaVersion::V2020 => SCTE224_NAMESPACE,
        }
    }

    /// Detect the revision of the document rooted at `root`
    pub fn detect(root: Node<'_, '_>) -> Result<Self> {
        match root.tag_name().namespace() {
            Some(SCTE224_2015_NAMESPACE) => Ok(SchemaVersion::V2015),
            Some(SCTE224_NAMESPACE) => {
                if root.descendants().any(is_2020_marker) {
                    Ok(SchemaVersion::V2020)
                } else {
                    Ok(SchemaVersion::V2018)
                }
            }
            _ => Err(Error::UnexpectedRoot {
                expected: "an element in an SCTE-224 namespace".to_string(),
                found: describe(root),
            }),
        }
    }
}

/// Content that only exists in the 2020 revision
fn is_2020_marker(node: Node<'_, '_>) -> bool {
    if !node.is_element() {
        return false;
    }
    let name = node.tag_name();
    match (name.namespace(), name.name()) {
        (Some(SCTE224_NAMESPACE), "AltID") => node.has_attribute("type"),
        (Some(SCTE224_NAMESPACE), "MatchSignal") => node.has_attribute("schema"),
        (Some(ACTION_NAMESPACE), "Allocation") => true,
        _ => false,
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "2015" => Ok(SchemaVersion::V2015),
            "2018" | "20180501" => Ok(SchemaVersion::V2018),
            "2020" | "20200407" => Ok(SchemaVersion::V2020),
            other => Err(Error::UnsupportedConversion(format!(
                "unknown schema revision '{}', expected 2015, 2018 or 2020",
                other
            ))),
        }
    }
}

/// Entity at the root of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentKind {
    /// `Media`
    Media,
    /// `MediaPoint`
    MediaPoint,
    /// `Policy`
    Policy,
    /// `ViewingPolicy`
    ViewingPolicy,
    /// `Audience`
    Audience,
    /// `Results`
    Results,
    /// `Audit`
    Audit,
}

impl DocumentKind {
    /// Element local name
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Media => "Media",
            DocumentKind::MediaPoint => "MediaPoint",
            DocumentKind::Policy => "Policy",
            DocumentKind::ViewingPolicy => "ViewingPolicy",
            DocumentKind::Audience => "Audience",
            DocumentKind::Results => "Results",
            DocumentKind::Audit => "Audit",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed document in any revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "schema", content = "root")]
pub enum Document {
    /// 2015 document
    #[serde(rename = "2015")]
    V2015(v2015::Root),
    /// 2018 document
    #[serde(rename = "2018")]
    V2018(v2018::Root),
    /// 2020 document
    #[serde(rename = "2020")]
    V2020(v2020::Root),
}

impl Document {
    /// Parse a document, detecting its revision
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(xml, &ParseOptions::default())
    }

    /// Parse a document with explicit options, detecting its revision
    pub fn parse_with(xml: &str, options: &ParseOptions) -> Result<Self> {
        let doc = parse_document(xml, options)?;
        let root = doc.root_element();
        let version = SchemaVersion::detect(root)?;
        tracing::debug!(%version, root = root.tag_name().name(), "detected schema revision");
        Self::from_root(root, version, options)
    }

    /// Parse a document as a given revision, skipping detection
    pub fn parse_as(xml: &str, version: SchemaVersion, options: &ParseOptions) -> Result<Self> {
        let doc = parse_document(xml, options)?;
        Self::from_root(doc.root_element(), version, options)
    }

    fn from_root(root: Node<'_, '_>, version: SchemaVersion, options: &ParseOptions) -> Result<Self> {
        Ok(match version {
            SchemaVersion::V2015 => Document::V2015(v2015::Root::from_node(root, options)?),
            SchemaVersion::V2018 => Document::V2018(v2018::Root::from_node(root, options)?),
            SchemaVersion::V2020 => Document::V2020(v2020::Root::from_node(root, options)?),
        })
    }

    /// Revision of the document
    pub fn version(&self) -> SchemaVersion {
        match self {
            Document::V2015(_) => SchemaVersion::V2015,
            Document::V2018(_) => SchemaVersion::V2018,
            Document::V2020(_) => SchemaVersion::V2020,
        }
    }

    /// Root entity kind
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::V2015(root) => root.kind(),
            Document::V2018(root) => root.kind(),
            Document::V2020(root) => root.kind(),
        }
    }

    /// Id of the root entity
    pub fn id(&self) -> Option<&str> {
        match self {
            Document::V2015(root) => root.id(),
            Document::V2018(root) => root.id(),
            Document::V2020(root) => root.id(),
        }
    }

    /// Convert to `target`, discarding the loss report
    pub fn convert(&self, target: SchemaVersion) -> Document {
        self.convert_to(target).0
    }

    /// Convert to `target`, chaining through 2018 where needed.
    ///
    /// Converting to the document's own revision returns a copy with an
    /// empty report.
    pub fn convert_to(&self, target: SchemaVersion) -> (Document, ConversionReport) {
        let mut report = ConversionReport::new();
        let converted = match (self, target) {
            (Document::V2015(root), SchemaVersion::V2015) => Document::V2015(root.clone()),
            (Document::V2015(root), SchemaVersion::V2018) => {
                Document::V2018(root.upgrade_with(&mut report))
            }
            (Document::V2015(root), SchemaVersion::V2020) => {
                Document::V2020(root.upgrade_with(&mut report).upgrade_with(&mut report))
            }
            (Document::V2018(root), SchemaVersion::V2015) => {
                Document::V2015(root.downgrade_with(&mut report))
            }
            (Document::V2018(root), SchemaVersion::V2018) => Document::V2018(root.clone()),
            (Document::V2018(root), SchemaVersion::V2020) => {
                Document::V2020(root.upgrade_with(&mut report))
            }
            (Document::V2020(root), SchemaVersion::V2015) => {
                Document::V2015(root.downgrade_with(&mut report).downgrade_with(&mut report))
            }
            (Document::V2020(root), SchemaVersion::V2018) => {
                Document::V2018(root.downgrade_with(&mut report))
            }
            (Document::V2020(root), SchemaVersion::V2020) => Document::V2020(root.clone()),
        };
        tracing::debug!(
            from = %self.version(),
            to = %target,
            losses = report.losses().len(),
            "converted document"
        );
        (converted, report)
    }

    /// Serialize without indentation
    pub fn to_xml(&self) -> Result<String> {
        match self {
            Document::V2015(root) => to_string(root),
            Document::V2018(root) => to_string(root),
            Document::V2020(root) => to_string(root),
        }
    }

    /// Serialize with two-space indentation
    pub fn to_xml_pretty(&self) -> Result<String> {
        match self {
            Document::V2015(root) => to_string_pretty(root),
            Document::V2018(root) => to_string_pretty(root),
            Document::V2020(root) => to_string_pretty(root),
        }
    }

    /// Export the model as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Entity counts, taken over the document viewed as 2020
    pub fn summary(&self) -> Summary {
        let latest = self.convert(SchemaVersion::V2020);
        let mut summary = Summary {
            version: self.version(),
            kind: self.kind(),
            id: self.id().map(str::to_string),
            ..Summary::default()
        };
        if let Document::V2020(root) = &latest {
            summary.count_root(root);
        }
        summary
    }
}

impl From<v2015::Root> for Document {
    fn from(root: v2015::Root) -> Self {
        Document::V2015(root)
    }
}

impl From<v2018::Root> for Document {
    fn from(root: v2018::Root) -> Self {
        Document::V2018(root)
    }
}

impl From<v2020::Root> for Document {
    fn from(root: v2020::Root) -> Self {
        Document::V2020(root)
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

/// Entity counts of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Revision
    pub version: SchemaVersion,
    /// Root entity
    pub kind: DocumentKind,
    /// Root id
    pub id: Option<String>,
    /// `Media` entities
    pub medias: usize,
    /// `MediaPoint` entities
    pub media_points: usize,
    /// `Policy` entities, references included
    pub policies: usize,
    /// `ViewingPolicy` entities
    pub viewing_policies: usize,
    /// `Audience` entities, nested ones included
    pub audiences: usize,
    /// `Audit` entities, nested ones included
    pub audits: usize,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            version: SchemaVersion::V2020,
            kind: DocumentKind::Media,
            id: None,
            medias: 0,
            media_points: 0,
            policies: 0,
            viewing_policies: 0,
            audiences: 0,
            audits: 0,
        }
    }
}

impl Summary {
    fn count_root(&mut self, root: &v2020::Root) {
        match root {
            v2020::Root::Media(v) => self.count_media(v),
            v2020::Root::MediaPoint(v) => self.count_media_point(v),
            v2020::Root::Policy(v) => self.count_policy(v),
            v2020::Root::ViewingPolicy(v) => self.count_viewing_policy(v),
            v2020::Root::Audience(v) => self.count_audience(v),
            v2020::Root::Audit(v) => self.count_audit(v),
            v2020::Root::Results(results) => {
                results.medias.iter().for_each(|v| self.count_media(v));
                results.media_points.iter().for_each(|v| self.count_media_point(v));
                results.policies.iter().for_each(|v| self.count_policy(v));
                results.viewing_policies.iter().for_each(|v| self.count_viewing_policy(v));
                results.audiences.iter().for_each(|v| self.count_audience(v));
                results.audits.iter().for_each(|v| self.count_audit(v));
            }
        }
    }

    fn count_media(&mut self, media: &v2020::Media) {
        self.medias += 1;
        media.media_points.iter().for_each(|p| self.count_media_point(p));
    }

    fn count_media_point(&mut self, point: &v2020::MediaPoint) {
        self.media_points += 1;
        let policies = point
            .applies
            .iter()
            .filter_map(|a| a.policy.as_ref())
            .chain(point.removes.iter().filter_map(|r| r.policy.as_ref()));
        for policy in policies {
            self.count_policy(policy);
        }
    }

    fn count_policy(&mut self, policy: &v2020::Policy) {
        self.policies += 1;
        policy
            .viewing_policies
            .iter()
            .for_each(|vp| self.count_viewing_policy(vp));
    }

    fn count_viewing_policy(&mut self, vp: &v2020::ViewingPolicy) {
        self.viewing_policies += 1;
        if let Some(audience) = &vp.audience {
            self.count_audience(audience);
        }
    }

    fn count_audience(&mut self, audience: &v2020::Audience) {
        self.audiences += 1;
        audience.audiences.iter().for_each(|a| self.count_audience(a));
    }

    fn count_audit(&mut self, audit: &v2020::Audit) {
        self.audits += 1;
        audit.audits.iter().for_each(|a| self.count_audit(a));
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema:           {}", self.version)?;
        writeln!(f, "root:             {}", self.kind)?;
        writeln!(f, "id:               {}", self.id.as_deref().unwrap_or("-"))?;
        writeln!(f, "media:            {}", self.medias)?;
        writeln!(f, "media points:     {}", self.media_points)?;
        writeln!(f, "policies:         {}", self.policies)?;
        writeln!(f, "viewing policies: {}", self.viewing_policies)?;
        writeln!(f, "audiences:        {}", self.audiences)?;
        write!(f, "audits:           {}", self.audits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::LostFeature;
    use pretty_assertions::assert_eq;

    const MEDIA_2018: &str = r#"<Media xmlns="http://www.scte.org/schemas/224" id="m">
  <MediaPoint id="mp/1" order="1"><Apply duration="PT1H" priority="2"/></MediaPoint>
</Media>"#;

    #[test]
    fn test_detect_2015() {
        let doc = Document::parse(r#"<Audience xmlns="http://www.scte.org/schemas/224/2015" id="a"/>"#)
            .unwrap();
        assert_eq!(doc.version(), SchemaVersion::V2015);
        assert_eq!(doc.kind(), DocumentKind::Audience);
        assert_eq!(doc.id(), Some("a"));
    }

    #[test]
    fn test_detect_2018() {
        let doc = Document::parse(MEDIA_2018).unwrap();
        assert_eq!(doc.version(), SchemaVersion::V2018);
    }

    #[test]
    fn test_detect_2020_markers() {
        let alt_id = r#"<Media xmlns="http://www.scte.org/schemas/224"><AltID type="TMSID">1</AltID></Media>"#;
        let schema = r#"<MediaPoint xmlns="http://www.scte.org/schemas/224"><MatchSignal schema="urn:x"/></MediaPoint>"#;
        let allocation = r#"<ViewingPolicy xmlns="http://www.scte.org/schemas/224"><Allocation xmlns="urn:scte:224:action"/></ViewingPolicy>"#;
        for xml in [alt_id, schema, allocation] {
            assert_eq!(Document::parse(xml).unwrap().version(), SchemaVersion::V2020, "{}", xml);
        }
    }

    #[test]
    fn test_unknown_namespace_is_rejected() {
        let result = Document::parse(r#"<Media xmlns="urn:other"/>"#);
        assert!(matches!(result, Err(Error::UnexpectedRoot { .. })));
    }

    #[test]
    fn test_parse_as_overrides_detection() {
        let doc = Document::parse_as(MEDIA_2018, SchemaVersion::V2020, &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.version(), SchemaVersion::V2020);
    }

    #[test]
    fn test_convert_to_same_revision_is_identity() {
        let doc = Document::parse(MEDIA_2018).unwrap();
        let (same, report) = doc.convert_to(SchemaVersion::V2018);
        assert_eq!(same, doc);
        assert!(report.is_lossless());
    }

    #[test]
    fn test_convert_chains_losses() {
        let doc = Document::parse(MEDIA_2018)
            .unwrap()
            .convert(SchemaVersion::V2020);
        let (downgraded, report) = doc.convert_to(SchemaVersion::V2015);
        assert_eq!(downgraded.version(), SchemaVersion::V2015);
        assert!(report.contains(LostFeature::MediaPointOrder));
        assert!(report.contains(LostFeature::ApplyPriority));
    }

    #[test]
    fn test_version_strings() {
        assert_eq!("2018".parse::<SchemaVersion>().unwrap(), SchemaVersion::V2018);
        assert_eq!("20200407".parse::<SchemaVersion>().unwrap(), SchemaVersion::V2020);
        assert!("2019".parse::<SchemaVersion>().is_err());
        assert_eq!(SchemaVersion::V2015.to_string(), "2015");
    }

    #[test]
    fn test_summary_counts() {
        let xml = r#"<Media xmlns="http://www.scte.org/schemas/224/2015" id="m">
  <MediaPoint id="a"><Apply><Policy id="p"><ViewingPolicy id="vp"><Audience id="outer"><Audience id="inner"/></Audience></ViewingPolicy></Policy></Apply></MediaPoint>
  <MediaPoint id="b"><Remove><Policy id="p"/></Remove></MediaPoint>
</Media>"#;
        let summary = Document::parse(xml).unwrap().summary();
        assert_eq!(summary.version, SchemaVersion::V2015);
        assert_eq!(summary.medias, 1);
        assert_eq!(summary.media_points, 2);
        assert_eq!(summary.policies, 2);
        assert_eq!(summary.viewing_policies, 1);
        assert_eq!(summary.audiences, 2);
    }

    #[test]
    fn test_json_export() {
        let doc = Document::parse(MEDIA_2018).unwrap();
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["schema"], "2018");
        assert_eq!(json["root"]["Media"]["reusable"]["identity"]["id"], "m");
    }
}
