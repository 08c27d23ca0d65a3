//! XML namespace handling
//!
//! Qualified names, the namespace URIs used by the three SCTE-224 schema
//! revisions, and the prefix bindings captured alongside opaque markup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Core namespace of the 2015 schema revision
pub const SCTE224_2015_NAMESPACE: &str = "http://www.scte.org/schemas/224/2015";

/// Core namespace shared by the 2018 and 2020 schema revisions
pub const SCTE224_NAMESPACE: &str = "http://www.scte.org/schemas/224";

/// Namespace of ViewingPolicy action elements (all revisions)
pub const ACTION_NAMESPACE: &str = "urn:scte:224:action";

/// Namespace of Audience qualifier elements (all revisions)
pub const AUDIENCE_NAMESPACE: &str = "urn:scte:224:audience";

/// Namespace of metadata extension elements
pub const METADATA_NAMESPACE: &str = "urn:scte:224:metadata";

/// SCTE-35 namespace, also the default MatchSignal schema in 2020
pub const SCTE35_NAMESPACE: &str = "http://www.scte.org/schemas/35";

/// SCTE 236 (ADI 3.0) core namespace, holding the `ADI3` metadata root
pub const ADI3_CORE_NAMESPACE: &str = "http://www.scte.org/schemas/236/2017/core";

/// SCTE 236 (ADI 3.0) title namespace
pub const ADI3_TITLE_NAMESPACE: &str = "http://www.scte.org/schemas/236/2017/title";

/// XLink namespace used for `href` references
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// XML namespace (`xml:` prefix)
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Take the expanded name of a parsed element or attribute
    pub fn from_expanded(name: roxmltree::ExpandedName<'_, '_>) -> Self {
        Self::new(name.namespace(), name.name())
    }

    /// Get the namespace URI, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether this name has the given namespace and local name
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// A prefix-to-URI binding in scope where markup was captured
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceBinding {
    /// Namespace prefix
    pub prefix: String,
    /// Namespace URI
    pub uri: String,
}

impl NamespaceBinding {
    /// Create a new binding
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// Conventional prefix for a well-known namespace
pub fn preferred_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        XLINK_NAMESPACE => Some("xlink"),
        XML_NAMESPACE => Some("xml"),
        XSI_NAMESPACE => Some("xsi"),
        ADI3_TITLE_NAMESPACE => Some("title"),
        _ => None,
    }
}

/// Prefixed bindings visible on a parsed node, excluding the implicit `xml` one
pub fn in_scope_bindings(node: roxmltree::Node<'_, '_>) -> Vec<NamespaceBinding> {
    let mut bindings: Vec<NamespaceBinding> = node
        .namespaces()
        .filter_map(|ns| match ns.name() {
            Some(prefix) if prefix != "xml" => Some(NamespaceBinding::new(prefix, ns.uri())),
            _ => None,
        })
        .collect();
    bindings.sort_by(|a, b| a.prefix.cmp(&b.prefix));
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_creation() {
        let qname = QName::namespaced(SCTE224_NAMESPACE, "Media");
        assert_eq!(qname.namespace, Some(SCTE224_NAMESPACE.to_string()));
        assert_eq!(qname.local_name, "Media");
        assert!(qname.is(SCTE224_NAMESPACE, "Media"));
        assert!(!qname.is(SCTE224_2015_NAMESPACE, "Media"));
    }

    #[test]
    fn test_qname_to_string() {
        let qname = QName::namespaced("urn:scte:224:audience", "Vird");
        assert_eq!(qname.to_string(), "{urn:scte:224:audience}Vird");

        let qname_local = QName::local("Slot");
        assert_eq!(qname_local.to_string(), "Slot");
    }

    #[test]
    fn test_from_expanded() {
        let doc = roxmltree::Document::parse(r#"<a:Vird xmlns:a="urn:scte:224:audience"/>"#)
            .unwrap();
        let qname = QName::from_expanded(doc.root_element().tag_name());
        assert!(qname.is(AUDIENCE_NAMESPACE, "Vird"));
    }

    #[test]
    fn test_in_scope_bindings() {
        let doc = roxmltree::Document::parse(
            r#"<Media xmlns="http://www.scte.org/schemas/224" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:cts="http://ctsrmm.com/ctsesni"><Metadata/></Media>"#,
        )
        .unwrap();
        let metadata = doc.root_element().first_element_child().unwrap();
        let bindings = in_scope_bindings(metadata);
        assert_eq!(
            bindings,
            vec![
                NamespaceBinding::new("cts", "http://ctsrmm.com/ctsesni"),
                NamespaceBinding::new("xlink", XLINK_NAMESPACE),
            ]
        );
    }

    #[test]
    fn test_preferred_prefix() {
        assert_eq!(preferred_prefix(XLINK_NAMESPACE), Some("xlink"));
        assert_eq!(preferred_prefix(ACTION_NAMESPACE), None);
    }
}
