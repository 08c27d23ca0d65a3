//! Record of information a conversion could not carry

use serde::Serialize;
use std::fmt;

/// A newer-revision feature with no counterpart in the target revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LostFeature {
    /// `Apply/@priority`
    ApplyPriority,
    /// `MediaPoint/@order`
    MediaPointOrder,
    /// `MediaPoint/@reusable`
    MediaPointReusable,
    /// `MediaPoint/@expectedDuration`
    MediaPointExpectedDuration,
    /// ViewingPolicy `SignalPointInsertion` action
    SignalPointInsertion,
    /// ViewingPolicy `Allocation` action
    Allocation,
    /// `AltID/@type`
    AltIdType,
    /// `AltID/@description`
    AltIdDescription,
    /// A non-default `MatchSignal/@schema`
    MatchSignalSchema,
    /// `Metadata`/`Ext` markup that is not well-formed
    UnreadableMetadata,
}

impl LostFeature {
    /// Short name of the feature
    pub fn as_str(&self) -> &'static str {
        match self {
            LostFeature::ApplyPriority => "Apply/@priority",
            LostFeature::MediaPointOrder => "MediaPoint/@order",
            LostFeature::MediaPointReusable => "MediaPoint/@reusable",
            LostFeature::MediaPointExpectedDuration => "MediaPoint/@expectedDuration",
            LostFeature::SignalPointInsertion => "SignalPointInsertion",
            LostFeature::Allocation => "Allocation",
            LostFeature::AltIdType => "AltID/@type",
            LostFeature::AltIdDescription => "AltID/@description",
            LostFeature::MatchSignalSchema => "MatchSignal/@schema",
            LostFeature::UnreadableMetadata => "Metadata",
        }
    }
}

impl fmt::Display for LostFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dropped value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loss {
    /// What was dropped
    pub feature: LostFeature,
    /// Id of the entity it was dropped from
    pub entity: Option<String>,
    /// The dropped value or reason
    pub detail: String,
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(id) => write!(f, "{} dropped from '{}': {}", self.feature, id, self.detail),
            None => write!(f, "{} dropped: {}", self.feature, self.detail),
        }
    }
}

/// Losses collected over one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    losses: Vec<Loss>,
}

impl ConversionReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loss and log it
    pub fn record(&mut self, feature: LostFeature, entity: Option<&str>, detail: impl Into<String>) {
        let loss = Loss {
            feature,
            entity: entity.map(str::to_string),
            detail: detail.into(),
        };
        tracing::warn!(
            feature = %loss.feature,
            entity = loss.entity.as_deref().unwrap_or(""),
            detail = %loss.detail,
            "feature not representable in target schema"
        );
        self.losses.push(loss);
    }

    /// Recorded losses, in the order they occurred
    pub fn losses(&self) -> &[Loss] {
        &self.losses
    }

    /// Whether nothing was lost
    pub fn is_lossless(&self) -> bool {
        self.losses.is_empty()
    }

    /// Whether any loss of `feature` was recorded
    pub fn contains(&self, feature: LostFeature) -> bool {
        self.losses.iter().any(|l| l.feature == feature)
    }

    /// Number of recorded losses of `feature`
    pub fn count(&self, feature: LostFeature) -> usize {
        self.losses.iter().filter(|l| l.feature == feature).count()
    }

    /// Move the losses of `other` into this report
    pub fn merge(&mut self, other: ConversionReport) {
        self.losses.extend(other.losses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_query() {
        let mut report = ConversionReport::new();
        assert!(report.is_lossless());
        report.record(LostFeature::ApplyPriority, Some("mp/1"), "5");
        report.record(LostFeature::ApplyPriority, Some("mp/2"), "1");
        report.record(LostFeature::Allocation, None, "removed");
        assert!(!report.is_lossless());
        assert_eq!(report.count(LostFeature::ApplyPriority), 2);
        assert!(report.contains(LostFeature::Allocation));
        assert!(!report.contains(LostFeature::AltIdType));
    }

    #[test]
    fn test_loss_display() {
        let loss = Loss {
            feature: LostFeature::MediaPointOrder,
            entity: Some("mp/1".to_string()),
            detail: "3".to_string(),
        };
        assert_eq!(loss.to_string(), "MediaPoint/@order dropped from 'mp/1': 3");
    }

    #[test]
    fn test_merge() {
        let mut first = ConversionReport::new();
        first.record(LostFeature::AltIdType, Some("a"), "TMSID");
        let mut second = ConversionReport::new();
        second.record(LostFeature::AltIdDescription, Some("a"), "Gracenote");
        first.merge(second);
        assert_eq!(first.losses().len(), 2);
        assert_eq!(first.losses()[1].feature, LostFeature::AltIdDescription);
    }
}
