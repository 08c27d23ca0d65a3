//! 2018 → 2020
//!
//! Both revisions share the core namespace, so captured content is copied
//! unchanged. The 2020 additions start out absent.

use super::{ConversionReport, Upgrade};
use crate::{v2018, v2020};

impl Upgrade for v2018::AltId {
    type Target = v2020::AltId;

    fn upgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2020::AltId {
            value: self.value.clone(),
            description: self.description.clone(),
            id_type: None,
        }
    }
}

impl Upgrade for v2018::IdentifiableType {
    type Target = v2020::IdentifiableType;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::IdentifiableType {
            id: self.id.clone(),
            description: self.description.clone(),
            last_updated: self.last_updated,
            xml_base: self.xml_base.clone(),
            alt_ids: self.alt_ids.upgrade_with(report),
            metadata: self.metadata.clone(),
            ext: self.ext.clone(),
        }
    }
}

impl Upgrade for v2018::ReusableType {
    type Target = v2020::ReusableType;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::ReusableType {
            identity: self.identity.upgrade_with(report),
            href: self.href.clone(),
        }
    }
}

impl Upgrade for v2018::Media {
    type Target = v2020::Media;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Media {
            reusable: self.reusable.upgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            source: self.source.clone(),
            media_points: self.media_points.upgrade_with(report),
        }
    }
}

impl Upgrade for v2018::MediaPoint {
    type Target = v2020::MediaPoint;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::MediaPoint {
            identity: self.identity.upgrade_with(report),
            effective: self.effective,
            expires: self.expires,
            match_time: self.match_time,
            match_offset: self.match_offset.clone(),
            source: self.source.clone(),
            expected_duration: self.expected_duration.clone(),
            order: self.order,
            reusable: self.reusable,
            removes: self.removes.upgrade_with(report),
            applies: self.applies.upgrade_with(report),
            match_signal: self.match_signal.upgrade_with(report),
        }
    }
}

impl Upgrade for v2018::Apply {
    type Target = v2020::Apply;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Apply {
            duration: self.duration.clone(),
            priority: self.priority,
            policy: self.policy.upgrade_with(report),
        }
    }
}

impl Upgrade for v2018::Remove {
    type Target = v2020::Remove;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Remove {
            policy: self.policy.upgrade_with(report),
        }
    }
}

impl Upgrade for v2018::MatchSignal {
    type Target = v2020::MatchSignal;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::MatchSignal {
            match_mode: self.match_mode.clone(),
            signal_tolerance: self.signal_tolerance.clone(),
            schema: None,
            assertions: self.assertions.upgrade_with(report),
        }
    }
}

impl Upgrade for v2018::Assert {
    type Target = v2020::Assert;

    fn upgrade_with(&self, _report: &mut ConversionReport) -> Self::Target {
        v2020::Assert::new(self.declaration.clone())
    }
}

impl Upgrade for v2018::Policy {
    type Target = v2020::Policy;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Policy {
            reusable: self.reusable.upgrade_with(report),
            viewing_policies: self.viewing_policies.upgrade_with(report),
        }
    }
}

impl Upgrade for v2018::ViewingPolicy {
    type Target = v2020::ViewingPolicy;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::ViewingPolicy {
            reusable: self.reusable.upgrade_with(report),
            audience: self.audience.upgrade_with(report),
            signal_point_deletion: self.signal_point_deletion.clone(),
            signal_point_insertion: self.signal_point_insertion.clone(),
            content: self.content.clone(),
            allocation: None,
            action_properties: self.action_properties.clone(),
        }
    }
}

impl Upgrade for v2018::Audience {
    type Target = v2020::Audience;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Audience {
            reusable: self.reusable.upgrade_with(report),
            match_mode: self.match_mode.clone(),
            audiences: self.audiences.upgrade_with(report),
            audience_properties: self.audience_properties.clone(),
        }
    }
}

impl Upgrade for v2018::Results {
    type Target = v2020::Results;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Results {
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

impl Upgrade for v2018::Audit {
    type Target = v2020::Audit;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        v2020::Audit {
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

impl Upgrade for v2018::Root {
    type Target = v2020::Root;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        match self {
            v2018::Root::Media(v) => v2020::Root::Media(v.upgrade_with(report)),
            v2018::Root::MediaPoint(v) => v2020::Root::MediaPoint(v.upgrade_with(report)),
            v2018::Root::Policy(v) => v2020::Root::Policy(v.upgrade_with(report)),
            v2018::Root::ViewingPolicy(v) => v2020::Root::ViewingPolicy(v.upgrade_with(report)),
            v2018::Root::Audience(v) => v2020::Root::Audience(v.upgrade_with(report)),
            v2018::Root::Results(v) => v2020::Root::Results(v.upgrade_with(report)),
            v2018::Root::Audit(v) => v2020::Root::Audit(v.upgrade_with(report)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{from_str, to_string_pretty};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_upgrade_keeps_markup() {
        let xml = r#"<MediaPoint xmlns="http://www.scte.org/schemas/224" id="mp/start" matchTime="2018-05-29T01:00:00Z" matchOffset="PT1M15S" expectedDuration="PT30M" order="0" reusable="true">
  <Apply xmlns="http://www.scte.org/schemas/224" duration="PT2H" priority="5">
    <Policy xmlns="http://www.scte.org/schemas/224" xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="p/new"></Policy>
  </Apply>
  <MatchSignal xmlns="http://www.scte.org/schemas/224" match="ALL" signalTolerance="PT2S">
    <Assert xmlns="http://www.scte.org/schemas/224">/SpliceInfoSection</Assert>
  </MatchSignal>
</MediaPoint>"#;
        let point: v2018::MediaPoint = from_str(xml).unwrap();
        let mut report = ConversionReport::new();
        let upgraded = point.upgrade_with(&mut report);
        assert!(report.is_lossless());
        assert_eq!(upgraded.match_signal.as_ref().unwrap().schema, None);
        assert_eq!(to_string_pretty(&upgraded).unwrap(), xml);
    }

    #[test]
    fn test_new_fields_start_absent() {
        let xml = r#"<ViewingPolicy xmlns="http://www.scte.org/schemas/224" id="vp">
  <AltID description="Gracenote">EP1</AltID>
  <Content xmlns="urn:scte:224:action">Slate</Content>
</ViewingPolicy>"#;
        let vp: v2018::ViewingPolicy = from_str(xml).unwrap();
        let upgraded = vp.upgrade();
        assert!(upgraded.allocation.is_none());
        let alt_id = &upgraded.reusable.identity.alt_ids[0];
        assert_eq!(alt_id.description.as_deref(), Some("Gracenote"));
        assert_eq!(alt_id.id_type, None);
        assert_eq!(upgraded.content, vp.content);
    }
}
