//! Media, MediaPoint and their decision children

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use super::base::{IdentifiableType, ReusableType};
use super::policy::Policy;
use crate::documents::{
    bool_attr, duration_attr, element_children, is_element, string_attr, text_content,
    timestamp_attr, unsigned_attr, ElementStart, FromXml, Match, ParseOptions, Timestamp, ToXml,
    XmlWriter,
};
use crate::duration::Duration;
use crate::error::Result;
use crate::namespaces::{SCTE224_NAMESPACE, SCTE35_NAMESPACE};

/// A content stream and its schedule of decision points
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Identity and reference
    pub reusable: ReusableType,
    /// Start of validity
    pub effective: Option<Timestamp>,
    /// End of validity
    pub expires: Option<Timestamp>,
    /// Source stream
    pub source: Option<String>,
    /// Decision points, in document order
    pub media_points: Vec<MediaPoint>,
}

impl Media {
    /// Entity id
    pub fn id(&self) -> Option<&str> {
        self.reusable.identity.id.as_deref()
    }
}

impl FromXml for Media {
    const ELEMENT: &'static str = "Media";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut media = Self {
            reusable: ReusableType::read_attributes(node)?,
            effective: timestamp_attr(node, "effective")?,
            expires: timestamp_attr(node, "expires")?,
            source: string_attr(node, "source"),
            media_points: Vec::new(),
        };
        for child in element_children(node) {
            if media.reusable.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_NAMESPACE, MediaPoint::ELEMENT) {
                media.media_points.push(MediaPoint::from_node(child, options)?);
            }
        }
        Ok(media)
    }
}

impl ToXml for Media {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            self.reusable
                .start(Self::ELEMENT)
                .timestamp_opt("effective", self.effective.as_ref())
                .timestamp_opt("expires", self.expires.as_ref())
                .attr_opt("source", self.source.as_ref()),
        )?;
        self.reusable.identity.write_children(writer)?;
        for point in &self.media_points {
            point.write_xml(writer)?;
        }
        writer.end()
    }
}

/// A decision point in a Media timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPoint {
    /// Identity
    pub identity: IdentifiableType,
    /// Start of validity
    pub effective: Option<Timestamp>,
    /// End of validity
    pub expires: Option<Timestamp>,
    /// Wall-clock match time
    pub match_time: Option<Timestamp>,
    /// Offset from the match
    pub match_offset: Option<Duration>,
    /// Source stream
    pub source: Option<String>,
    /// Expected duration of the event the point opens
    pub expected_duration: Option<Duration>,
    /// Evaluation order among points with the same match
    pub order: Option<u32>,
    /// Whether the point may match more than once
    pub reusable: Option<bool>,
    /// Policies withdrawn at this point
    pub removes: Vec<Remove>,
    /// Policies applied at this point
    pub applies: Vec<Apply>,
    /// In-band signal condition
    pub match_signal: Option<MatchSignal>,
}

impl MediaPoint {
    /// Entity id
    pub fn id(&self) -> Option<&str> {
        self.identity.id.as_deref()
    }

    /// Order used for sorting; absent is 0
    pub fn order_or_default(&self) -> u32 {
        self.order.unwrap_or(0)
    }
}

impl FromXml for MediaPoint {
    const ELEMENT: &'static str = "MediaPoint";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut point = Self {
            identity: IdentifiableType::read_attributes(node)?,
            effective: timestamp_attr(node, "effective")?,
            expires: timestamp_attr(node, "expires")?,
            match_time: timestamp_attr(node, "matchTime")?,
            match_offset: duration_attr(node, "matchOffset", options)?,
            source: string_attr(node, "source"),
            expected_duration: duration_attr(node, "expectedDuration", options)?,
            order: unsigned_attr(node, "order")?,
            reusable: bool_attr(node, "reusable")?,
            ..Self::default()
        };
        for child in element_children(node) {
            if point.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_NAMESPACE, Remove::ELEMENT) {
                point.removes.push(Remove::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, Apply::ELEMENT) {
                point.applies.push(Apply::from_node(child, options)?);
            } else if is_element(child, SCTE224_NAMESPACE, MatchSignal::ELEMENT) {
                point.match_signal = Some(MatchSignal::from_node(child, options)?);
            }
        }
        Ok(point)
    }
}

impl ToXml for MediaPoint {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            self.identity
                .start(Self::ELEMENT)
                .timestamp_opt("effective", self.effective.as_ref())
                .timestamp_opt("expires", self.expires.as_ref())
                .timestamp_opt("matchTime", self.match_time.as_ref())
                .attr_opt("matchOffset", self.match_offset.as_ref())
                .attr_opt("source", self.source.as_ref())
                .attr_opt("expectedDuration", self.expected_duration.as_ref())
                .display_opt("order", self.order)
                .display_opt("reusable", self.reusable),
        )?;
        self.identity.write_children(writer)?;
        for remove in &self.removes {
            remove.write_xml(writer)?;
        }
        for apply in &self.applies {
            apply.write_xml(writer)?;
        }
        if let Some(signal) = &self.match_signal {
            signal.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Policy applied at a MediaPoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apply {
    /// How long the policy stays in force
    pub duration: Option<Duration>,
    /// Precedence among concurrent applies
    pub priority: Option<u32>,
    /// The applied policy, inline or by reference
    pub policy: Option<Policy>,
}

impl Apply {
    /// Priority used for ranking; absent is 0
    pub fn priority_or_default(&self) -> u32 {
        self.priority.unwrap_or(0)
    }
}

impl FromXml for Apply {
    const ELEMENT: &'static str = "Apply";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            duration: duration_attr(node, "duration", options)?,
            priority: unsigned_attr(node, "priority")?,
            policy: read_policy(node, options)?,
        })
    }
}

impl ToXml for Apply {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT)
                .attr_opt("duration", self.duration.as_ref())
                .display_opt("priority", self.priority),
        )?;
        if let Some(policy) = &self.policy {
            policy.write_xml(writer)?;
        }
        writer.end()
    }
}

/// Policy withdrawn at a MediaPoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remove {
    /// The withdrawn policy, inline or by reference
    pub policy: Option<Policy>,
}

impl FromXml for Remove {
    const ELEMENT: &'static str = "Remove";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            policy: read_policy(node, options)?,
        })
    }
}

impl ToXml for Remove {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT))?;
        if let Some(policy) = &self.policy {
            policy.write_xml(writer)?;
        }
        writer.end()
    }
}

fn read_policy(node: Node<'_, '_>, options: &ParseOptions) -> Result<Option<Policy>> {
    element_children(node)
        .find(|child| is_element(*child, SCTE224_NAMESPACE, Policy::ELEMENT))
        .map(|child| Policy::from_node(child, options))
        .transpose()
}

/// In-band signal condition of a MediaPoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSignal {
    /// How the assertions combine
    pub match_mode: Option<Match>,
    /// Tolerance around the signal time
    pub signal_tolerance: Option<Duration>,
    /// Schema the assertions are evaluated against
    pub schema: Option<String>,
    /// XPath assertions over the signal, in document order
    pub assertions: Vec<Assert>,
}

impl MatchSignal {
    /// Schema in force; SCTE-35 when absent
    pub fn schema_or_default(&self) -> &str {
        self.schema.as_deref().unwrap_or(SCTE35_NAMESPACE)
    }
}

impl FromXml for MatchSignal {
    const ELEMENT: &'static str = "MatchSignal";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            match_mode: Match::from_attr(node),
            signal_tolerance: duration_attr(node, "signalTolerance", options)?,
            schema: string_attr(node, "schema"),
            assertions: element_children(node)
                .filter(|child| is_element(*child, SCTE224_NAMESPACE, Assert::ELEMENT))
                .map(|child| Assert::from_node(child, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl ToXml for MatchSignal {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT)
                .display_opt("match", self.match_mode.as_ref())
                .attr_opt("signalTolerance", self.signal_tolerance.as_ref())
                .attr_opt("schema", self.schema.as_ref()),
        )?;
        for assertion in &self.assertions {
            assertion.write_xml(writer)?;
        }
        writer.end()
    }
}

/// One assertion of a MatchSignal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assert {
    /// XPath declaration
    pub declaration: String,
}

impl Assert {
    /// Assertion with the given declaration
    pub fn new(declaration: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
        }
    }
}

impl FromXml for Assert {
    const ELEMENT: &'static str = "Assert";
    const NAMESPACE: &'static str = SCTE224_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(text_content(node)))
    }
}

impl ToXml for Assert {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(SCTE224_NAMESPACE, Self::ELEMENT),
            &self.declaration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_str, to_string_pretty};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_signal_schema() {
        let xml = r#"<MatchSignal xmlns="http://www.scte.org/schemas/224" match="ANY" schema="urn:example:signal">
  <Assert xmlns="http://www.scte.org/schemas/224">/Signal</Assert>
</MatchSignal>"#;
        let signal: MatchSignal = from_str(xml).unwrap();
        assert_eq!(signal.schema_or_default(), "urn:example:signal");
        assert_eq!(to_string_pretty(&signal).unwrap(), xml);

        let plain: MatchSignal =
            from_str(r#"<MatchSignal xmlns="http://www.scte.org/schemas/224"/>"#).unwrap();
        assert_eq!(plain.schema, None);
        assert_eq!(plain.schema_or_default(), SCTE35_NAMESPACE);
    }

    #[test]
    fn test_media_with_ordered_points() {
        let xml = r#"<Media xmlns="http://www.scte.org/schemas/224" id="m">
  <MediaPoint xmlns="http://www.scte.org/schemas/224" id="m/end" order="2"></MediaPoint>
  <MediaPoint xmlns="http://www.scte.org/schemas/224" id="m/start" order="1" reusable="false"></MediaPoint>
</Media>"#;
        let media: Media = from_str(xml).unwrap();
        let orders: Vec<u32> = media.media_points.iter().map(|p| p.order_or_default()).collect();
        assert_eq!(orders, vec![2, 1]);
        assert_eq!(media.media_points[1].reusable, Some(false));
        assert_eq!(to_string_pretty(&media).unwrap(), xml);
    }
}
