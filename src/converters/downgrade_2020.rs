//! 2020 → 2018

use super::{ConversionReport, Downgrade, LostFeature};
use crate::namespaces::SCTE35_NAMESPACE;
use crate::{v2018, v2020};

impl Downgrade for v2020::AltId {
    type Target = v2018::AltId;

    fn downgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2018::AltId {
            value: self.value.clone(),
            description: self.description.clone(),
        }
    }
}

impl Downgrade for v2020::IdentifiableType {
    type Target = v2018::IdentifiableType;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        for alt_id in &self.alt_ids {
            if let Some(id_type) = &alt_id.id_type {
                report.record(LostFeature::AltIdType, self.id.as_deref(), id_type.clone());
            }
        }
        v2018::IdentifiableType {
            id: self.id.clone(),
            description: self.description.clone(),
            last_updated: self.last_updated,
            xml_base: self.xml_base.clone(),
            alt_ids: self.alt_ids.downgrade_with(report),
            metadata: self.metadata.clone(),
            ext: self.ext.clone(),
        }
    }
}

impl Downgrade for v2020::ReusableType {
    type Target = v2018::ReusableType;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::ReusableType {
            identity: self.identity.downgrade_with(report),
            href: self.href.clone(),
        }
    }
}

impl Downgrade for v2020::Media {
    type Target = v2018::Media;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Media {
            reusable: self.reusable.downgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            source: self.source.clone(),
            media_points: self.media_points.downgrade_with(report),
        }
    }
}

impl Downgrade for v2020::MediaPoint {
    type Target = v2018::MediaPoint;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        let match_signal = self.match_signal.as_ref().map(|signal| {
            if let Some(schema) = signal.schema.as_deref().filter(|s| *s != SCTE35_NAMESPACE) {
                report.record(LostFeature::MatchSignalSchema, self.id(), schema);
            }
            signal.downgrade_with(report)
        });
        v2018::MediaPoint {
            identity: self.identity.downgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            match_time: self.match_time,
            match_offset: self.match_offset.clone(),
            source: self.source.clone(),
            expected_duration: self.expected_duration.clone(),
            order: self.order,
            reusable: self.reusable,
            removes: self.removes.downgrade_with(report),
            applies: self.applies.downgrade_with(report),
            match_signal,
        }
    }
}

impl Downgrade for v2020::Apply {
    type Target = v2018::Apply;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Apply {
            duration: self.duration.clone(),
            priority: self.priority,
            policy: self.policy.downgrade_with(report),
        }
    }
}

impl Downgrade for v2020::Remove {
    type Target = v2018::Remove;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Remove {
            policy: self.policy.downgrade_with(report),
        }
    }
}

/// Drops `schema`; the caller reports it when it is not the SCTE-35 default.
impl Downgrade for v2020::MatchSignal {
    type Target = v2018::MatchSignal;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::MatchSignal {
            match_mode: self.match_mode.clone(),
            signal_tolerance: self.signal_tolerance.clone(),
            assertions: self.assertions.downgrade_with(report),
        }
    }
}

impl Downgrade for v2020::Assert {
    type Target = v2018::Assert;

    fn downgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2018::Assert::new(self.declaration.clone())
    }
}

impl Downgrade for v2020::Policy {
    type Target = v2018::Policy;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Policy {
            reusable: self.reusable.downgrade_with(report),
            viewing_policies: self.viewing_policies.downgrade_with(report),
        }
    }
}

impl Downgrade for v2020::ViewingPolicy {
    type Target = v2018::ViewingPolicy;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        if let Some(allocation) = &self.allocation {
            let owner = allocation.owner_name.as_deref().unwrap_or("unnamed owner");
            report.record(
                LostFeature::Allocation,
                self.reusable.identity.id.as_deref(),
                format!("{} slot group(s) for {}", allocation.slots.len(), owner),
            );
        }
        v2018::ViewingPolicy {
            reusable: self.reusable.downgrade_with(report),
            audience: self.audience.downgrade_with(report),
            signal_point_deletion: self.signal_point_deletion.clone(),
            signal_point_insertion: self.signal_point_insertion.clone(),
            content: self.content.clone(),
            action_properties: self.action_properties.clone(),
        }
    }
}

impl Downgrade for v2020::Audience {
    type Target = v2018::Audience;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Audience {
            reusable: self.reusable.downgrade_with(report),
            match_mode: self.match_mode.clone(),
            audiences: self.audiences.downgrade_with(report),
            audience_properties: self.audience_properties.clone(),
        }
    }
}

impl Downgrade for v2020::Results {
    type Target = v2018::Results;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Results {
            size: self.size,
            medias: self.medias.downgrade_with(report),
            media_points: self.media_points.downgrade_with(report),
            policies: self.policies.downgrade_with(report),
            viewing_policies: self.viewing_policies.downgrade_with(report),
            audiences: self.audiences.downgrade_with(report),
            audits: self.audits.downgrade_with(report),
        }
    }
}

impl Downgrade for v2020::Audit {
    type Target = v2018::Audit;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Audit {
            identity: self.identity.downgrade_with(report),
            href: self.href.clone(),
            role: self.role.clone(),
            authorization: self.authorization.clone(),
            policy_mode: self.policy_mode.clone(),
            trigger: self.trigger.clone(),
            result: self.result.clone(),
            audits: self.audits.downgrade_with(report),
        }
    }
}

impl Downgrade for v2020::Root {
    type Target = v2018::Root;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        match self {
            v2020::Root::Media(v) => v2018::Root::Media(v.downgrade_with(report)),
            v2020::Root::MediaPoint(v) => v2018::Root::MediaPoint(v.downgrade_with(report)),
            v2020::Root::Policy(v) => v2018::Root::Policy(v.downgrade_with(report)),
            v2020::Root::ViewingPolicy(v) => v2018::Root::ViewingPolicy(v.downgrade_with(report)),
            v2020::Root::Audience(v) => v2018::Root::Audience(v.downgrade_with(report)),
            v2020::Root::Results(v) => v2018::Root::Results(v.downgrade_with(report)),
            v2020::Root::Audit(v) => v2018::Root::Audit(v.downgrade_with(report)),
        }
    }
}
