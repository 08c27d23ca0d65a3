//! ViewingPolicy action elements
//!
//! The 2018 and 2020 revisions model three actions explicitly, all in the
//! `urn:scte:224:action` namespace: `Content`, `SignalPointDeletion` and
//! `SignalPointInsertion`. The 2015 revision carries the same elements as
//! opaque entries of the ViewingPolicy action bag.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{
    duration_attr, element_children, is_element, string_attr, text_content, timestamp_attr, unsigned_attr,
    ElementStart, FromXml, ParseOptions, Timestamp, ToXml, XmlWriter,
};
use crate::duration::Duration;
use crate::error::Result;
use crate::namespaces::ACTION_NAMESPACE;
use crate::wildcards::AnyElement;

/// `Content` action: the alternate content to present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAction {
    /// Content reference, as character data
    pub value: String,
}

impl ContentAction {
    /// Action with the given content reference
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl FromXml for ContentAction {
    const ELEMENT: &'static str = "Content";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(text_content(node)))
    }
}

impl ToXml for ContentAction {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT), &self.value)
    }
}

/// `SignalPointDeletion` action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPointDeletionAction {
    /// Deletion directive, as character data
    pub value: String,
}

impl SignalPointDeletionAction {
    /// Action with the given directive
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl FromXml for SignalPointDeletionAction {
    const ELEMENT: &'static str = "SignalPointDeletion";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        Ok(Self::new(text_content(node)))
    }
}

impl ToXml for SignalPointDeletionAction {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.leaf(ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT), &self.value)
    }
}

/// One signal to insert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPoint {
    /// Offset from the matched point
    pub offset: Option<Duration>,
    /// SCTE-35 segmentation type id
    pub segmentation_type_id: Option<u32>,
    /// SCTE-35 segmentation UPID type
    pub segmentation_upid_type: Option<u32>,
    /// SCTE-35 segmentation UPID
    pub segmentation_upid: Option<String>,
    /// SCTE-35 segmentation event id
    pub segmentation_event_id: Option<u32>,
    /// Duration carried in the segmentation descriptor
    pub segmentation_duration: Option<Duration>,
    /// Repeat period
    pub repeat_interval: Option<Duration>,
    /// First repetition
    pub repeat_start: Option<Timestamp>,
    /// Last repetition
    pub repeat_stop: Option<Timestamp>,
}

impl FromXml for SignalPoint {
    const ELEMENT: &'static str = "SignalPoint";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            offset: duration_attr(node, "offset", options)?,
            segmentation_type_id: unsigned_attr(node, "segmentationTypeId")?,
            segmentation_upid_type: unsigned_attr(node, "segmentationUpidType")?,
            segmentation_upid: string_attr(node, "segmentationUpid"),
            segmentation_event_id: unsigned_attr(node, "segmentationEventId")?,
            segmentation_duration: duration_attr(node, "segmentationDuration", options)?,
            repeat_interval: duration_attr(node, "repeatInterval", options)?,
            repeat_start: timestamp_attr(node, "repeatStart")?,
            repeat_stop: timestamp_attr(node, "repeatStop")?,
        })
    }
}

impl ToXml for SignalPoint {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.empty(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT)
                .attr_opt("offset", self.offset.as_ref())
                .display_opt("segmentationTypeId", self.segmentation_type_id)
                .display_opt("segmentationUpidType", self.segmentation_upid_type)
                .attr_opt("segmentationUpid", self.segmentation_upid.as_ref())
                .display_opt("segmentationEventId", self.segmentation_event_id)
                .attr_opt("segmentationDuration", self.segmentation_duration.as_ref())
                .attr_opt("repeatInterval", self.repeat_interval.as_ref())
                .timestamp_opt("repeatStart", self.repeat_start.as_ref())
                .timestamp_opt("repeatStop", self.repeat_stop.as_ref()),
        )
    }
}

/// `SignalPointInsertion` action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPointInsertionAction {
    /// Offset applied to every inserted signal
    pub offset: Option<Duration>,
    /// Signals to insert, in document order
    pub signal_points: Vec<SignalPoint>,
    /// Other children, such as a literal SCTE-35 `SpliceInfoSection`
    pub extensions: Vec<AnyElement>,
}

impl FromXml for SignalPointInsertionAction {
    const ELEMENT: &'static str = "SignalPointInsertion";
    const NAMESPACE: &'static str = ACTION_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        let mut action = Self {
            offset: duration_attr(node, "offset", options)?,
            ..Self::default()
        };
        for child in element_children(node) {
            if is_element(child, ACTION_NAMESPACE, SignalPoint::ELEMENT) {
                action.signal_points.push(SignalPoint::from_node(child, options)?);
            } else {
                action.extensions.push(AnyElement::capture(child));
            }
        }
        Ok(action)
    }
}

impl ToXml for SignalPointInsertionAction {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        writer.start(
            ElementStart::new(ACTION_NAMESPACE, Self::ELEMENT).attr_opt("offset", self.offset.as_ref()),
        )?;
        for point in &self.signal_points {
            point.write_xml(writer)?;
        }
        for extension in &self.extensions {
            extension.write_to(writer)?;
        }
        writer.end()
    }
}

/// Read an action out of a captured bag entry.
///
/// The entry must have the action's name, decode cleanly and re-encode to
/// exactly the same element; anything the model would not carry keeps the
/// entry in the bag.
pub fn lift<T: FromXml + ToXml>(element: &AnyElement, options: &ParseOptions) -> Option<T> {
    if !element.is(T::NAMESPACE, T::ELEMENT) {
        return None;
    }
    let value = match element.decode::<T>(options) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(element = %element.name, error = %err, "action left in the property bag");
            return None;
        }
    };
    match AnyElement::encode(&value) {
        Ok(encoded) if encoded == *element => Some(value),
        _ => {
            tracing::debug!(element = %element.name, "action does not re-encode exactly, left in the property bag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_str, to_string};
    use crate::namespaces::QName;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_action() {
        let action: ContentAction =
            from_str(r#"<Content xmlns="urn:scte:224:action">Slate</Content>"#).unwrap();
        assert_eq!(action.value, "Slate");
        assert_eq!(
            to_string(&action).unwrap(),
            r#"<Content xmlns="urn:scte:224:action">Slate</Content>"#
        );
    }

    #[test]
    fn test_signal_point_insertion() {
        let xml = r#"<SignalPointInsertion xmlns="urn:scte:224:action">
  <SignalPoint offset="PT10S" segmentationTypeId="52" segmentationUpidType="8" segmentationUpid="0x1234"/>
  <SignalPoint repeatInterval="PT30M" repeatStart="2020-04-07T00:00:00Z"/>
  <SpliceInfoSection xmlns="http://www.scte.org/schemas/35" ptsAdjustment="0"/>
</SignalPointInsertion>"#;
        let action: SignalPointInsertionAction = from_str(xml).unwrap();
        assert_eq!(action.signal_points.len(), 2);
        assert_eq!(action.signal_points[0].segmentation_type_id, Some(52));
        assert_eq!(action.signal_points[0].offset, Some(Duration::new("PT10S")));
        assert!(action.signal_points[1].repeat_start.is_some());
        assert_eq!(action.extensions.len(), 1);
        assert_eq!(action.extensions[0].name.local_name, "SpliceInfoSection");

        let reparsed: SignalPointInsertionAction = from_str(&to_string(&action).unwrap()).unwrap();
        assert_eq!(reparsed, action);
    }

    #[test]
    fn test_lift_from_bag() {
        let entry = AnyElement::with_text(QName::namespaced(ACTION_NAMESPACE, "Content"), "Slate");
        let action: Option<ContentAction> = lift(&entry, &ParseOptions::default());
        assert_eq!(action, Some(ContentAction::new("Slate")));

        let other = AnyElement::with_text(QName::namespaced("urn:x", "Content"), "Slate");
        assert_eq!(lift::<ContentAction>(&other, &ParseOptions::default()), None);
    }

    #[test]
    fn test_lift_rejects_malformed_entry() {
        let entry = AnyElement::new(QName::namespaced(ACTION_NAMESPACE, "SignalPointInsertion"))
            .child(AnyElement::new(QName::namespaced(ACTION_NAMESPACE, "SignalPoint")).attribute(
                QName::local("segmentationTypeId"),
                "not-a-number",
            ));
        assert_eq!(
            lift::<SignalPointInsertionAction>(&entry, &ParseOptions::default()),
            None
        );
    }

    #[test]
    fn test_lift_rejects_unmodelled_content() {
        let attributed = AnyElement::with_text(QName::namespaced(ACTION_NAMESPACE, "Content"), "Slate")
            .attribute(QName::local("mode"), "x");
        assert_eq!(lift::<ContentAction>(&attributed, &ParseOptions::default()), None);

        let nested = AnyElement::new(QName::namespaced(ACTION_NAMESPACE, "Content"))
            .child(AnyElement::with_text(QName::namespaced("urn:x", "Slate"), "a"));
        assert_eq!(lift::<ContentAction>(&nested, &ParseOptions::default()), None);
    }

    #[test]
    fn test_encode_as_bag_entry() {
        let entry = AnyElement::encode(&SignalPointDeletionAction::new("all")).unwrap();
        assert!(entry.is(ACTION_NAMESPACE, "SignalPointDeletion"));
        assert_eq!(entry.text(), "all");
    }
}
