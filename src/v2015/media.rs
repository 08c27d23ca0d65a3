//! Media, MediaPoint and their decision children

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use super::base::{IdentifiableType, ReusableType};
use super::policy::Policy;
use crate::documents::{
    duration_attr, element_children, is_element, string_attr, text_content, timestamp_attr,
    ElementStart, FromXml, Match, ParseOptions, Timestamp, ToXml, XmlWriter,
};
use crate::duration::Duration;
use crate::error::Result;
use crate::namespaces::SCTE224_2015_NAMESPACE;

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

impl FromXml for Media {
    const ELEMENT: &'static str = "Media";
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

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
            if is_element(child, SCTE224_2015_NAMESPACE, MediaPoint::ELEMENT) {
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
    /// Policies withdrawn at this point
    pub removes: Vec<Remove>,
    /// Policies applied at this point
    pub applies: Vec<Apply>,
    /// In-band signal condition
    pub match_signal: Option<MatchSignal>,
}

impl FromXml for MediaPoint {
    const ELEMENT: &'static str = "MediaPoint";
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut point = Self {
            identity: IdentifiableType::read_attributes(node)?,
            effective: timestamp_attr(node, "effective")?,
            expires: timestamp_attr(node, "expires")?,
            match_time: timestamp_attr(node, "matchTime")?,
            match_offset: duration_attr(node, "matchOffset", options)?,
            source: string_attr(node, "source"),
            ..Self::default()
        };
        for child in element_children(node) {
            if point.identity.read_child(child, options)? {
                continue;
            }
            if is_element(child, SCTE224_2015_NAMESPACE, Remove::ELEMENT) {
                point.removes.push(Remove::from_node(child, options)?);
            } else if is_element(child, SCTE224_2015_NAMESPACE, Apply::ELEMENT) {
                point.applies.push(Apply::from_node(child, options)?);
            } else if is_element(child, SCTE224_2015_NAMESPACE, MatchSignal::ELEMENT) {
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
                .attr_opt("source", self.source.as_ref()),
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
    /// The applied policy
    pub policy: Option<Policy>,
}

impl FromXml for Apply {
    const ELEMENT: &'static str = "Apply";
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            duration: duration_attr(node, "duration", options)?,
            policy: read_policy(node, options)?,
        })
    }
}

impl ToXml for Apply {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(SCTE224_2015_NAMESPACE, Self::ELEMENT)
                .attr_opt("duration", self.duration.as_ref()),
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
    /// The withdrawn policy
    pub policy: Option<Policy>,
}

impl FromXml for Remove {
    const ELEMENT: &'static str = "Remove";
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            policy: read_policy(node, options)?,
        })
    }
}

impl ToXml for Remove {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(ElementStart::new(SCTE224_2015_NAMESPACE, Self::ELEMENT))?;
        if let Some(policy) = &self.policy {
            policy.write_xml(writer)?;
        }
        writer.end()
    }
}

fn read_policy(node: Node<'_, '_>, options: &ParseOptions) -> Result<Option<Policy>> {
    element_children(node)
        .find(|child| is_element(*child, SCTE224_2015_NAMESPACE, Policy::ELEMENT))
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
    /// XPath assertions, in document order
    pub assertions: Vec<Assert>,
}

impl FromXml for MatchSignal {
    const ELEMENT: &'static str = "MatchSignal";
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            match_mode: Match::from_attr(node),
            signal_tolerance: duration_attr(node, "signalTolerance", options)?,
            assertions: element_children(node)
                .filter(|child| is_element(*child, SCTE224_2015_NAMESPACE, Assert::ELEMENT))
                .map(|child| Assert::from_node(child, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl ToXml for MatchSignal {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(SCTE224_2015_NAMESPACE, Self::ELEMENT)
                .display_opt("match", self.match_mode.as_ref())
                .attr_opt("signalTolerance", self.signal_tolerance.as_ref()),
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
    const NAMESPACE: &'static str = SCTE224_2015_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(text_content(node)))
    }
}

impl ToXml for Assert {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(
            ElementStart::new(SCTE224_2015_NAMESPACE, Self::ELEMENT),
            &self.declaration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_str, to_string_pretty};
    use pretty_assertions::assert_eq;

    const CALI: &str = r#"<Media xmlns="http://www.scte.org/schemas/224/2015" id="superflaco.com/media/CALIFORNIA/BROADCAST" description="CALIFORNIA" lastUpdated="2018-05-29T00:44:57Z" source="CURRENT_CHANNEL">
  <MediaPoint xmlns="http://www.scte.org/schemas/224/2015" id="superflaco.com/media/CALIFORNIA/program/AIRING_ID/BROADCAST/start" description="I am a MediaPoint" lastUpdated="2018-05-08T00:49:37Z" effective="2018-05-29T00:00:00Z" expires="2018-05-29T10:00:00Z" source="CURRENT_CHANNEL">
    <AltID xmlns="http://www.scte.org/schemas/224/2015">CID:e0be5016-5ac2-4c36-8cef-fc00ce40372e</AltID>
    <Metadata xmlns="http://www.scte.org/schemas/224/2015">
      <MetadataDetail xmlns="http://ctsrmm.com/ctsesni" name="Sport" type="string" provider="superflaco">Documentary</MetadataDetail>
      <MetadataDetail xmlns="http://ctsrmm.com/ctsesni" name="Lookback" type="bool" provider="superflaco">false</MetadataDetail>
    </Metadata>
    <Apply xmlns="http://www.scte.org/schemas/224/2015">
      <Policy xmlns="http://www.scte.org/schemas/224/2015" xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="superflaco.com/policy/SWITCH_to_CA"></Policy>
    </Apply>
    <MatchSignal xmlns="http://www.scte.org/schemas/224/2015" match="ANY">
      <Assert xmlns="http://www.scte.org/schemas/224/2015">/SpliceInfoSection/SegmentationDescriptor[@segmentationTypeId=16]/SegmentationUpid[@segmentationUpidType=1 and text()='AIRING_ID']</Assert>
      <Assert xmlns="http://www.scte.org/schemas/224/2015">/SpliceInfoSection/SegmentationDescriptor[@segmentationTypeId=1]/SegmentationUpid[@segmentationUpidType=1 and text()='AIRING_ID']</Assert>
    </MatchSignal>
  </MediaPoint>
</Media>"#;

    #[test]
    fn test_media_fields() {
        let media: Media = from_str(CALI).unwrap();
        assert_eq!(media.source.as_deref(), Some("CURRENT_CHANNEL"));
        let point = &media.media_points[0];
        assert_eq!(point.identity.alt_ids[0].value, "CID:e0be5016-5ac2-4c36-8cef-fc00ce40372e");
        assert!(point.identity.metadata.as_ref().unwrap().markup.contains("Lookback"));
        assert_eq!(point.match_signal.as_ref().unwrap().assertions.len(), 2);
        assert!(point.match_signal.as_ref().unwrap().assertions[0]
            .declaration
            .ends_with("text()='AIRING_ID']"));
    }

    #[test]
    fn test_media_serializes_as_read() {
        let media: Media = from_str(CALI).unwrap();
        assert_eq!(to_string_pretty(&media).unwrap(), CALI);
    }
}
