//! Namespace-resolved XML model for comparison testing
//!
//! Names are written in Clark notation (`{namespace}localName`). Attribute
//! order is not significant; element order is. Whitespace-only text next to
//! child elements is treated as indentation and dropped.

use indexmap::IndexMap;
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::documents::{parse_document, ParseOptions};
use crate::error::Result;

/// Element as seen by the comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDump {
    /// Expanded element name
    pub name: String,

    /// Attributes by expanded name
    pub attributes: IndexMap<String, String>,

    /// Character data directly inside the element
    pub text: String,

    /// Child elements, in document order
    pub children: Vec<ElementDump>,
}

impl ElementDump {
    /// Parse `xml` and dump its root element
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = parse_document(xml, &ParseOptions::default())?;
        Ok(Self::from_node(doc.root_element()))
    }

    /// Dump the element `node`
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let children: Vec<_> = node
            .children()
            .filter(|n| n.is_element())
            .map(Self::from_node)
            .collect();
        let mut text: String = node
            .children()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        if !children.is_empty() && text.trim().is_empty() {
            text.clear();
        }
        Self {
            name: clark(node.tag_name().namespace(), node.tag_name().name()),
            attributes: node
                .attributes()
                .map(|a| (clark(a.namespace(), a.name()), a.value().to_string()))
                .collect(),
            text,
            children,
        }
    }
}

fn clark(namespace: Option<&str>, local_name: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local_name),
        None => local_name.to_string(),
    }
}

/// One point where two documents disagree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Difference {
    /// Slash-separated element path, with 1-based child positions
    pub path: String,

    /// What differs
    pub message: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every difference between `expected` and `actual`
pub fn differences(expected: &ElementDump, actual: &ElementDump) -> Vec<Difference> {
    let mut out = Vec::new();
    diff_element(expected, actual, &format!("/{}", expected.name), &mut out);
    out
}

fn diff_element(expected: &ElementDump, actual: &ElementDump, path: &str, out: &mut Vec<Difference>) {
    let mut push = |message: String| {
        out.push(Difference {
            path: path.to_string(),
            message,
        })
    };

    if expected.name != actual.name {
        push(format!("element {} became {}", expected.name, actual.name));
        return;
    }
    for (name, value) in &expected.attributes {
        match actual.attributes.get(name) {
            None => push(format!("attribute {} missing", name)),
            Some(other) if other != value => {
                push(format!("attribute {} is '{}', expected '{}'", name, other, value))
            }
            Some(_) => {}
        }
    }
    for name in actual.attributes.keys() {
        if !expected.attributes.contains_key(name) {
            push(format!("unexpected attribute {}", name));
        }
    }
    if expected.text != actual.text {
        push(format!("text is {:?}, expected {:?}", actual.text, expected.text));
    }
    if expected.children.len() != actual.children.len() {
        push(format!(
            "{} child elements, expected {}",
            actual.children.len(),
            expected.children.len()
        ));
    }

    for (i, (e, a)) in expected.children.iter().zip(&actual.children).enumerate() {
        let child_path = format!("{}/{}[{}]", path, e.name, i + 1);
        diff_element(e, a, &child_path, out);
    }
}

/// Compare two XML texts
pub fn compare_xml(expected: &str, actual: &str) -> Result<Vec<Difference>> {
    Ok(differences(
        &ElementDump::parse(expected)?,
        &ElementDump::parse(actual)?,
    ))
}

/// Whether two XML texts carry the same content
pub fn equivalent(expected: &str, actual: &str) -> Result<bool> {
    Ok(compare_xml(expected, actual)?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_and_indentation_are_ignored() {
        let a = r#"<Media xmlns="http://www.scte.org/schemas/224" id="m" description="d">
  <MediaPoint id="p"/>
</Media>"#;
        let b = r#"<s:Media xmlns:s="http://www.scte.org/schemas/224" description="d" id="m"><s:MediaPoint id="p"></s:MediaPoint></s:Media>"#;
        assert!(equivalent(a, b).unwrap());
    }

    #[test]
    fn test_attribute_difference() {
        let diffs = compare_xml(r#"<a x="1" y="2"/>"#, r#"<a x="3" z="2"/>"#).unwrap();
        assert_eq!(diffs.len(), 3);
        assert_eq!(diffs[0].path, "/a");
        assert!(diffs[0].message.contains("'3'"));
    }

    #[test]
    fn test_child_order_is_significant() {
        let diffs = compare_xml("<a><b/><c/></a>", "<a><c/><b/></a>").unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].path, "/a/b[1]");
    }

    #[test]
    fn test_namespace_difference() {
        let diffs = compare_xml(r#"<a xmlns="urn:one"/>"#, r#"<a xmlns="urn:two"/>"#).unwrap();
        assert_eq!(diffs[0].message, "element {urn:one}a became {urn:two}a");
    }

    #[test]
    fn test_leaf_text_is_exact() {
        assert!(!equivalent("<a> x </a>", "<a>x</a>").unwrap());
    }

    #[test]
    fn test_dump_to_json() {
        let dump = ElementDump::parse(r#"<a xmlns="urn:x" k="v">t</a>"#).unwrap();
        let json = serde_json::to_string(&dump).unwrap();
        let back: ElementDump = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dump);
        assert_eq!(back.name, "{urn:x}a");
    }
}
