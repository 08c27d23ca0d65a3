//! 2015 → 2018

use super::{remap_all, ConversionReport, LostFeature, Upgrade};
use crate::actions::{lift, ContentAction, SignalPointDeletionAction};
use crate::documents::ParseOptions;
use crate::namespaces::{SCTE224_2015_NAMESPACE, SCTE224_NAMESPACE};
use crate::wildcards::{Extension, RawMarkup};
use crate::{v2015, v2018};

fn upgrade_markup(
    raw: &RawMarkup,
    entity: Option<&str>,
    report: &mut ConversionReport,
) -> Option<Extension> {
    match raw.parse_nodes(&ParseOptions::default()) {
        Ok(nodes) => Some(Extension::new(remap_all(
            &nodes,
            SCTE224_2015_NAMESPACE,
            SCTE224_NAMESPACE,
        ))),
        Err(err) => {
            report.record(LostFeature::UnreadableMetadata, entity, err.to_string());
            None
        }
    }
}

impl Upgrade for v2015::AltId {
    type Target = v2018::AltId;

    fn upgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2018::AltId::new(self.value.clone())
    }
}

impl Upgrade for v2015::IdentifiableType {
    type Target = v2018::IdentifiableType;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        let entity = self.id.as_deref();
        v2018::IdentifiableType {
            id: self.id.clone(),
            description: self.description.clone(),
            last_updated: self.last_updated,
            xml_base: self.xml_base.clone(),
            alt_ids: self.alt_ids.upgrade_with(report),
            metadata: self
                .metadata
                .as_ref()
                .and_then(|raw| upgrade_markup(raw, entity, report)),
            ext: self
                .ext
                .as_ref()
                .and_then(|raw| upgrade_markup(raw, entity, report)),
        }
    }
}

impl Upgrade for v2015::ReusableType {
    type Target = v2018::ReusableType;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::ReusableType {
            identity: self.identity.upgrade_with(report),
            href: self.href.clone(),
        }
    }
}

impl Upgrade for v2015::Media {
    type Target = v2018::Media;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Media {
            reusable: self.reusable.upgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            source: self.source.clone(),
            media_points: self.media_points.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::MediaPoint {
    type Target = v2018::MediaPoint;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::MediaPoint {
            identity: self.identity.upgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            match_time: self.match_time,
            match_offset: self.match_offset.clone(),
            source: self.source.clone(),
            expected_duration: None,
            order: None,
            reusable: None,
            removes: self.removes.upgrade_with(report),
            applies: self.applies.upgrade_with(report),
            match_signal: self.match_signal.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::Apply {
    type Target = v2018::Apply;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Apply {
            duration: self.duration.clone(),
            priority: None,
            policy: self.policy.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::Remove {
    type Target = v2018::Remove;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Remove {
            policy: self.policy.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::MatchSignal {
    type Target = v2018::MatchSignal;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::MatchSignal {
            match_mode: self.match_mode.clone(),
            signal_tolerance: self.signal_tolerance.clone(),
            assertions: self.assertions.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::Assert {
    type Target = v2018::Assert;

    fn upgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2018::Assert::new(self.declaration.clone())
    }
}

impl Upgrade for v2015::Policy {
    type Target = v2018::Policy;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Policy {
            reusable: self.reusable.upgrade_with(report),
            viewing_policies: self.viewing_policies.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::ViewingPolicy {
    type Target = v2018::ViewingPolicy;

    /// A `Content` entry heading the action bag, and a `SignalPointDeletion`
    /// entry right after it (or heading the bag), become explicit actions
    /// when they re-encode to the same element. The 2018 downgrade writes
    /// those two actions back at the front of the bag, so the 2015 bag comes
    /// back unchanged. `SignalPointInsertion` has no 2015 form and stays in
    /// the bag.
    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        let options = ParseOptions::default();
        let mut vp = v2018::ViewingPolicy {
            reusable: self.reusable.upgrade_with(report),
            audience: self.audience.upgrade_with(report),
            ..v2018::ViewingPolicy::default()
        };

        let mut rest = self.action_properties.as_slice();
        if let Some((first, tail)) = rest.split_first() {
            if let Some(action) = lift::<ContentAction>(first, &options) {
                vp.content = Some(action);
                rest = tail;
            }
        }
        if let Some((first, tail)) = rest.split_first() {
            if let Some(action) = lift::<SignalPointDeletionAction>(first, &options) {
                vp.signal_point_deletion = Some(action);
                rest = tail;
            }
        }
        vp.action_properties = remap_all(rest, SCTE224_2015_NAMESPACE, SCTE224_NAMESPACE);
        vp
    }
}

impl Upgrade for v2015::Audience {
    type Target = v2018::Audience;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Audience {
            reusable: self.reusable.upgrade_with(report),
            match_mode: self.match_mode.clone(),
            audiences: self.audiences.upgrade_with(report),
            audience_properties: remap_all(
                &self.audience_properties,
                SCTE224_2015_NAMESPACE,
                SCTE224_NAMESPACE,
            ),
        }
    }
}

impl Upgrade for v2015::Results {
    type Target = v2018::Results;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Results {
            size: self.size,
            medias: self.medias.upgrade_with(report),
            media_points: self.media_points.upgrade_with(report),
            policies: self.policies.upgrade_with(report),
            viewing_policies: self.viewing_policies.upgrade_with(report),
            audiences: self.audiences.upgrade_with(report),
            audits: self.audits.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::Audit {
    type Target = v2018::Audit;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2018::Audit {
            identity: self.identity.upgrade_with(report),
            href: self.href.clone(),
            role: self.role.clone(),
            authorization: self.authorization.clone(),
            policy_mode: self.policy_mode.clone(),
            trigger: self.trigger.clone(),
            result: self.result.clone(),
            audits: self.audits.upgrade_with(report),
        }
    }
}

impl Upgrade for v2015::Root {
    type Target = v2018::Root;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        match self {
            v2015::Root::Media(v) => v2018::Root::Media(v.upgrade_with(report)),
            v2015::Root::MediaPoint(v) => v2018::Root::MediaPoint(v.upgrade_with(report)),
            v2015::Root::Policy(v) => v2018::Root::Policy(v.upgrade_with(report)),
            v2015::Root::ViewingPolicy(v) => v2018::Root::ViewingPolicy(v.upgrade_with(report)),
            v2015::Root::Audience(v) => v2018::Root::Audience(v.upgrade_with(report)),
            v2015::Root::Results(v) => v2018::Root::Results(v.upgrade_with(report)),
            v2015::Root::Audit(v) => v2018::Root::Audit(v.upgrade_with(report)),
        }
    }
}
