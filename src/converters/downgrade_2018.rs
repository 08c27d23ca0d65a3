//! 2018 → 2015

use super::{remap_all, ConversionReport, Downgrade, LostFeature};
use crate::documents::{FromXml, ToXml};
use crate::namespaces::{QName, SCTE224_2015_NAMESPACE, SCTE224_NAMESPACE};
use crate::wildcards::{AnyElement, Extension, RawMarkup};
use crate::{v2015, v2018};

/// Serialize structured extension nodes into one markup stream, each node
/// declaring its namespaces inline
fn downgrade_extension(
    extension: &Extension,
    entity: Option<&str>,
    report: &mut ConversionReport,
) -> RawMarkup {
    let mut markup = String::new();
    for node in &extension.nodes {
        let node = node.remapped(SCTE224_NAMESPACE, SCTE224_2015_NAMESPACE);
        match node.to_markup(Some(SCTE224_2015_NAMESPACE)) {
            Ok(text) => markup.push_str(&text),
            Err(err) => report.record(LostFeature::UnreadableMetadata, entity, err.to_string()),
        }
    }
    RawMarkup {
        markup,
        default_namespace: Some(SCTE224_2015_NAMESPACE.to_string()),
        namespaces: Vec::new(),
    }
}

impl Downgrade for v2018::AltId {
    type Target = v2015::AltId;

    fn downgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2015::AltId::new(self.value.clone())
    }
}

impl Downgrade for v2018::IdentifiableType {
    type Target = v2015::IdentifiableType;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        let entity = self.id.as_deref();
        for alt_id in &self.alt_ids {
            if let Some(description) = &alt_id.description {
                report.record(LostFeature::AltIdDescription, entity, description.clone());
            }
        }
        v2015::IdentifiableType {
            id: self.id.clone(),
            description: self.description.clone(),
            last_updated: self.last_updated,
            xml_base: self.xml_base.clone(),
            alt_ids: self.alt_ids.downgrade_with(report),
            metadata: self
                .metadata
                .as_ref()
                .map(|ext| downgrade_extension(ext, entity, report)),
            ext: self
                .ext
                .as_ref()
                .map(|ext| downgrade_extension(ext, entity, report)),
        }
    }
}

impl Downgrade for v2018::ReusableType {
    type Target = v2015::ReusableType;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::ReusableType {
            identity: self.identity.downgrade_with(report),
            href: self.href.clone(),
        }
    }
}

impl Downgrade for v2018::Media {
    type Target = v2015::Media;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Media {
            reusable: self.reusable.downgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            source: self.source.clone(),
            media_points: self.media_points.downgrade_with(report),
        }
    }
}

impl Downgrade for v2018::MediaPoint {
    type Target = v2015::MediaPoint;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        let entity = self.identity.id.as_deref();
        if let Some(expected) = &self.expected_duration {
            report.record(LostFeature::MediaPointExpectedDuration, entity, expected.as_str());
        }
        if let Some(order) = self.order {
            report.record(LostFeature::MediaPointOrder, entity, order.to_string());
        }
        if let Some(reusable) = self.reusable {
            report.record(LostFeature::MediaPointReusable, entity, reusable.to_string());
        }

        let mut applies = Vec::with_capacity(self.applies.len());
        for apply in &self.applies {
            if let Some(priority) = apply.priority {
                report.record(LostFeature::ApplyPriority, entity, priority.to_string());
            }
            applies.push(apply.downgrade_with(report));
        }

        v2015::MediaPoint {
            identity: self.identity.downgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            match_time: self.match_time,
            match_offset: self.match_offset.clone(),
            source: self.source.clone(),
            removes: self.removes.downgrade_with(report),
            applies,
            match_signal: self.match_signal.downgrade_with(report),
        }
    }
}

impl Downgrade for v2018::Apply {
    type Target = v2015::Apply;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Apply {
            duration: self.duration.clone(),
            policy: self.policy.downgrade_with(report),
        }
    }
}

impl Downgrade for v2018::Remove {
    type Target = v2015::Remove;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Remove {
            policy: self.policy.downgrade_with(report),
        }
    }
}

impl Downgrade for v2018::MatchSignal {
    type Target = v2015::MatchSignal;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::MatchSignal {
            match_mode: self.match_mode.clone(),
            signal_tolerance: self.signal_tolerance.clone(),
            assertions: self.assertions.downgrade_with(report),
        }
    }
}

impl Downgrade for v2018::Assert {
    type Target = v2015::Assert;

    fn downgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2015::Assert::new(self.declaration.clone())
    }
}

impl Downgrade for v2018::Policy {
    type Target = v2015::Policy;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Policy {
            reusable: self.reusable.downgrade_with(report),
            viewing_policies: self.viewing_policies.downgrade_with(report),
        }
    }
}

impl Downgrade for v2018::ViewingPolicy {
    type Target = v2015::ViewingPolicy;

    /// `Content` and `SignalPointDeletion` become action bag entries ahead
    /// of the existing ones. `SignalPointInsertion` has no 2015 form and is
    /// dropped.
    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        let entity = self.reusable.identity.id.as_deref();
        let mut action_properties = Vec::with_capacity(self.action_properties.len() + 2);

        if let Some(content) = &self.content {
            action_properties.push(bag_entry(content, entity));
        }
        if let Some(deletion) = &self.signal_point_deletion {
            action_properties.push(bag_entry(deletion, entity));
        }
        if let Some(insertion) = &self.signal_point_insertion {
            report.record(
                LostFeature::SignalPointInsertion,
                entity,
                format!(
                    "{} signal point(s) not supported by the 2015 schema",
                    insertion.signal_points.len()
                ),
            );
        }
        action_properties.extend(remap_all(
            &self.action_properties,
            SCTE224_NAMESPACE,
            SCTE224_2015_NAMESPACE,
        ));

        v2015::ViewingPolicy {
            reusable: self.reusable.downgrade_with(report),
            audience: self.audience.downgrade_with(report),
            action_properties,
        }
    }
}

fn bag_entry<T: ToXml + FromXml>(action: &T, entity: Option<&str>) -> AnyElement {
    AnyElement::encode(action).unwrap_or_else(|err| {
        // only reachable through a writer failure
        tracing::error!(entity, error = %err, "could not encode action");
        AnyElement::new(QName::namespaced(T::NAMESPACE, T::ELEMENT))
    })
}

impl Downgrade for v2018::Audience {
    type Target = v2015::Audience;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Audience {
            reusable: self.reusable.downgrade_with(report),
            match_mode: self.match_mode.clone(),
            audiences: self.audiences.downgrade_with(report),
            audience_properties: remap_all(
                &self.audience_properties,
                SCTE224_NAMESPACE,
                SCTE224_2015_NAMESPACE,
            ),
        }
    }
}

impl Downgrade for v2018::Results {
    type Target = v2015::Results;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Results {
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

impl Downgrade for v2018::Audit {
    type Target = v2015::Audit;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2015::Audit {
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

impl Downgrade for v2018::Root {
    type Target = v2015::Root;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        match self {
            v2018::Root::Media(v) => v2015::Root::Media(v.downgrade_with(report)),
            v2018::Root::MediaPoint(v) => v2015::Root::MediaPoint(v.downgrade_with(report)),
            v2018::Root::Policy(v) => v2015::Root::Policy(v.downgrade_with(report)),
            v2018::Root::ViewingPolicy(v) => v2015::Root::ViewingPolicy(v.downgrade_with(report)),
            v2018::Root::Audience(v) => v2015::Root::Audience(v.downgrade_with(report)),
            v2018::Root::Results(v) => v2015::Root::Results(v.downgrade_with(report)),
            v2018::Root::Audit(v) => v2015::Root::Audit(v.downgrade_with(report)),
        }
    }
}
