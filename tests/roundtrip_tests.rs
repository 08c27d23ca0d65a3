//! Round-trip tests over every fixture
//!
//! Each document is parsed, re-serialized and compared structurally with its
//! input using the `comparison` module.

use scte224::comparison::{compare_xml, ElementDump};
use scte224::documents::ParseOptions;
use scte224::duration::DurationPolicy;
use scte224::{Document, DocumentKind, SchemaVersion};

const FIXTURES: &[(&str, &str, SchemaVersion, DocumentKind)] = &[
    (
        "cali_2015.xml",
        include_str!("fixtures/cali_2015.xml"),
        SchemaVersion::V2015,
        DocumentKind::Media,
    ),
    (
        "cali_2018.xml",
        include_str!("fixtures/cali_2018.xml"),
        SchemaVersion::V2018,
        DocumentKind::Media,
    ),
    (
        "those_guys_2015.xml",
        include_str!("fixtures/those_guys_2015.xml"),
        SchemaVersion::V2015,
        DocumentKind::Audience,
    ),
    (
        "those_guys_2018.xml",
        include_str!("fixtures/those_guys_2018.xml"),
        SchemaVersion::V2018,
        DocumentKind::Audience,
    ),
    (
        "audience_2018_nested.xml",
        include_str!("fixtures/audience_2018_nested.xml"),
        SchemaVersion::V2018,
        DocumentKind::Audience,
    ),
    (
        "audience_2020_nested.xml",
        include_str!("fixtures/audience_2020_nested.xml"),
        // nothing 2020-only in it
        SchemaVersion::V2018,
        DocumentKind::Audience,
    ),
    (
        "viewing_policy_2015_content.xml",
        include_str!("fixtures/viewing_policy_2015_content.xml"),
        SchemaVersion::V2015,
        DocumentKind::ViewingPolicy,
    ),
    (
        "viewing_policy_2018_content.xml",
        include_str!("fixtures/viewing_policy_2018_content.xml"),
        SchemaVersion::V2018,
        DocumentKind::ViewingPolicy,
    ),
    (
        "viewing_policy_2020_allocation.xml",
        include_str!("fixtures/viewing_policy_2020_allocation.xml"),
        SchemaVersion::V2020,
        DocumentKind::ViewingPolicy,
    ),
    (
        "viewing_policy_2020_splice.xml",
        include_str!("fixtures/viewing_policy_2020_splice.xml"),
        SchemaVersion::V2018,
        DocumentKind::ViewingPolicy,
    ),
    (
        "media_2020.xml",
        include_str!("fixtures/media_2020.xml"),
        SchemaVersion::V2020,
        DocumentKind::Media,
    ),
    (
        "media_2020_removes.xml",
        include_str!("fixtures/media_2020_removes.xml"),
        SchemaVersion::V2020,
        DocumentKind::Media,
    ),
    (
        "media_point_2020_adi3.xml",
        include_str!("fixtures/media_point_2020_adi3.xml"),
        SchemaVersion::V2020,
        DocumentKind::MediaPoint,
    ),
    (
        "media_template.xml",
        include_str!("fixtures/media_template.xml"),
        SchemaVersion::V2018,
        DocumentKind::Media,
    ),
];

#[test]
fn test_fixture_revisions_are_detected() {
    for (name, xml, version, kind) in FIXTURES {
        let doc = Document::parse(xml).unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert_eq!(doc.version(), *version, "{}", name);
        assert_eq!(doc.kind(), *kind, "{}", name);
    }
}

#[test]
fn test_fixtures_round_trip() {
    for (name, xml, _, _) in FIXTURES {
        let doc = Document::parse(xml).unwrap();
        for written in [doc.to_xml().unwrap(), doc.to_xml_pretty().unwrap()] {
            let differences = compare_xml(xml, &written).unwrap();
            assert!(
                differences.is_empty(),
                "{} changed on round trip: {:?}",
                name,
                differences
            );
        }
    }
}

#[test]
fn test_serialization_is_idempotent() {
    for (name, xml, _, _) in FIXTURES {
        let once = Document::parse(xml).unwrap().to_xml_pretty().unwrap();
        let twice = Document::parse(&once).unwrap().to_xml_pretty().unwrap();
        assert_eq!(once, twice, "{}", name);
    }
}

#[test]
fn test_every_fixture_upgrades_to_2020() {
    for (name, xml, _, _) in FIXTURES {
        let doc = Document::parse(xml).unwrap();
        let (latest, report) = doc.convert_to(SchemaVersion::V2020);
        assert!(report.is_lossless(), "{}: {:?}", name, report.losses());
        assert_eq!(latest.kind(), doc.kind(), "{}", name);
    }
}

#[test]
fn test_every_fixture_downgrades_to_2015() {
    for (name, xml, _, _) in FIXTURES {
        let doc = Document::parse(xml).unwrap();
        let (oldest, _) = doc.convert_to(SchemaVersion::V2015);
        let written = oldest.to_xml_pretty().unwrap();
        let reparsed = Document::parse(&written).unwrap();
        assert_eq!(reparsed.version(), SchemaVersion::V2015, "{}", name);
        assert_eq!(reparsed.kind(), doc.kind(), "{}", name);
        assert_eq!(reparsed.to_xml_pretty().unwrap(), written, "{}", name);
    }
}

#[test]
fn test_leaf_text_is_preserved_exactly() {
    let xml = include_str!("fixtures/media_2020.xml");
    let written = Document::parse(xml).unwrap().to_xml().unwrap();
    let before = ElementDump::parse(xml).unwrap();
    let after = ElementDump::parse(&written).unwrap();
    let assert_text = |dump: &ElementDump| dump.children[1].children[3].children[0].text.clone();
    assert_eq!(assert_text(&before), assert_text(&after));
    assert!(assert_text(&after).contains("contains(text(),'12345')"));
}

#[test]
fn test_strict_durations_reject_malformed_values() {
    let xml = r#"<MediaPoint xmlns="http://www.scte.org/schemas/224" matchOffset="1m15s"/>"#;
    let strict = ParseOptions::new().with_duration_policy(DurationPolicy::Strict);
    assert!(Document::parse_with(xml, &strict).is_err());

    let lenient = Document::parse(xml).unwrap();
    assert_eq!(lenient.kind(), DocumentKind::MediaPoint);
}
