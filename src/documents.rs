//! XML document reading and writing
//!
//! Parsing goes through `roxmltree`, which resolves every element and
//! attribute to its expanded name. Writing goes through a `quick-xml`
//! writer wrapped by [`XmlWriter`], which declares each element's namespace
//! inline (`<Media xmlns="...">`) and writes empty elements with an explicit
//! end tag. Pretty output puts child elements on their own lines and keeps
//! character data inline.

use chrono::{DateTime, FixedOffset, Timelike};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::duration::{Duration, DurationPolicy};
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{preferred_prefix, QName, XLINK_NAMESPACE, XML_NAMESPACE};

/// Timestamp attribute value (`xs:dateTime`)
pub type Timestamp = DateTime<FixedOffset>;

/// Options applied while reading a document
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Resource limits
    pub limits: Limits,
    /// Handling of unreadable duration literals
    pub duration_policy: DurationPolicy,
}

impl ParseOptions {
    /// Create options with default limits and lenient durations
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the duration policy
    pub fn with_duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.duration_policy = policy;
        self
    }
}

/// A model type bound to one XML element
pub trait FromXml: Sized {
    /// Local name of the bound element
    const ELEMENT: &'static str;
    /// Namespace of the bound element
    const NAMESPACE: &'static str;

    /// Build the value from an element already known to carry the bound name
    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self>;

    /// Expanded name of the bound element
    fn qname() -> QName {
        QName::namespaced(Self::NAMESPACE, Self::ELEMENT)
    }

    /// Check the element name, then build the value
    fn from_element(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        expect_element(node, Self::NAMESPACE, Self::ELEMENT)?;
        Self::from_node(node, options)
    }
}

/// A model type that can write itself as an XML element
pub trait ToXml {
    /// Write this value, including its own start and end tags
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()>;
}

/// Parse a document whose root element is bound to `T`
pub fn from_str<T: FromXml>(xml: &str) -> Result<T> {
    from_str_with(xml, &ParseOptions::default())
}

/// Parse a document whose root element is bound to `T`, with explicit options
pub fn from_str_with<T: FromXml>(xml: &str, options: &ParseOptions) -> Result<T> {
    let doc = parse_document(xml, options)?;
    T::from_element(doc.root_element(), options)
}

/// Parse XML text into a `roxmltree` document, enforcing limits
pub fn parse_document<'input>(
    xml: &'input str,
    options: &ParseOptions,
) -> Result<roxmltree::Document<'input>> {
    options.limits.check_xml_size(xml.len())?;
    let doc = roxmltree::Document::parse(xml.trim_start())?;
    options.limits.check_document(&doc)?;
    Ok(doc)
}

/// Serialize without indentation
pub fn to_string<T: ToXml + ?Sized>(value: &T) -> Result<String> {
    let mut writer = XmlWriter::new();
    value.write_xml(&mut writer)?;
    writer.into_string()
}

/// Serialize with two-space indentation
pub fn to_string_pretty<T: ToXml + ?Sized>(value: &T) -> Result<String> {
    let mut writer = XmlWriter::pretty(2);
    value.write_xml(&mut writer)?;
    writer.into_string()
}

// ============================================================================
// Reading helpers
// ============================================================================

/// Fail unless `node` is the element `{namespace}local_name`
pub fn expect_element(node: Node<'_, '_>, namespace: &str, local_name: &str) -> Result<()> {
    if is_element(node, namespace, local_name) {
        Ok(())
    } else {
        Err(Error::UnexpectedRoot {
            expected: QName::namespaced(namespace, local_name).to_string(),
            found: describe(node),
        })
    }
}

/// Whether `node` is the element `{namespace}local_name`
pub fn is_element(node: Node<'_, '_>, namespace: &str, local_name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local_name
        && node.tag_name().namespace() == Some(namespace)
}

/// Expanded name of a node, for messages
pub fn describe(node: Node<'_, '_>) -> String {
    if node.is_element() {
        QName::from_expanded(node.tag_name()).to_string()
    } else {
        format!("{:?} node", node.node_type())
    }
}

/// Element children of a node
pub fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// Unqualified attribute value
pub fn string_attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

/// `xlink:` attribute value
pub fn xlink_attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute((XLINK_NAMESPACE, name)).map(str::to_string)
}

/// `xml:base` attribute value
pub fn xml_base_attr(node: Node<'_, '_>) -> Option<String> {
    node.attribute((XML_NAMESPACE, "base")).map(str::to_string)
}

/// Concatenated character data of the direct text children
pub fn text_content(node: Node<'_, '_>) -> String {
    node.children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn value_error(node: Node<'_, '_>, name: &str, value: &str, expected: &str) -> Error {
    let pos = node.document().text_pos_at(node.range().start);
    Error::Parse(
        ParseError::new(format!(
            "invalid value '{}' for attribute '{}': expected {}",
            value, name, expected
        ))
        .with_location(format!("{}:{}", pos.row, pos.col))
        .with_source(describe(node)),
    )
}

/// Timestamp attribute (`xs:dateTime`)
pub fn timestamp_attr(node: Node<'_, '_>, name: &str) -> Result<Option<DateTime<FixedOffset>>> {
    match node.attribute(name) {
        Some(value) => DateTime::parse_from_rfc3339(value.trim())
            .map(Some)
            .map_err(|_| value_error(node, name, value, "an RFC 3339 timestamp")),
        None => Ok(None),
    }
}

/// Unsigned integer attribute
pub fn unsigned_attr(node: Node<'_, '_>, name: &str) -> Result<Option<u32>> {
    match node.attribute(name) {
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| value_error(node, name, value, "an unsigned integer")),
        None => Ok(None),
    }
}

/// Boolean attribute (`true`, `false`, `1`, `0`)
pub fn bool_attr(node: Node<'_, '_>, name: &str) -> Result<Option<bool>> {
    match node.attribute(name) {
        Some(value) => parse_xsd_bool(value)
            .map(Some)
            .ok_or_else(|| value_error(node, name, value, "a boolean")),
        None => Ok(None),
    }
}

/// Read an `xs:boolean` literal
pub fn parse_xsd_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Duration attribute, checked against the configured duration policy
pub fn duration_attr(
    node: Node<'_, '_>,
    name: &str,
    options: &ParseOptions,
) -> Result<Option<Duration>> {
    match node.attribute(name) {
        Some(value) => Ok(Some(Duration::parse_with(value, options.duration_policy)?)),
        None => Ok(None),
    }
}

/// Render a timestamp the way SCTE-224 producers do: UTC as `Z`, and
/// fractional seconds only when present, without trailing zeros
pub fn format_timestamp(value: &DateTime<FixedOffset>) -> String {
    let mut out = value.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = value.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let digits = format!("{:09}", nanos);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    if value.offset().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&value.format("%:z").to_string());
    }
    out
}

// ============================================================================
// Match mode
// ============================================================================

/// Match mode of a MatchSignal or Audience
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Match {
    /// Every condition must hold
    All,
    /// At least one condition must hold
    Any,
    /// No condition may hold
    None,
    /// A value outside the enumeration, kept verbatim
    Other(String),
}

impl Match {
    /// Read a match attribute value
    pub fn parse(value: &str) -> Self {
        match value {
            "ALL" => Match::All,
            "ANY" => Match::Any,
            "NONE" => Match::None,
            other => Match::Other(other.to_string()),
        }
    }

    /// Attribute value
    pub fn as_str(&self) -> &str {
        match self {
            Match::All => "ALL",
            Match::Any => "ANY",
            Match::None => "NONE",
            Match::Other(value) => value,
        }
    }

    /// Read the `match` attribute of a node
    pub fn from_attr(node: Node<'_, '_>) -> Option<Self> {
        node.attribute("match").map(Match::parse)
    }
}

impl From<String> for Match {
    fn from(value: String) -> Self {
        Match::parse(&value)
    }
}

impl From<Match> for String {
    fn from(value: Match) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Start tag under construction
#[derive(Debug, Clone)]
pub struct ElementStart {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    prefixes: Vec<(String, String)>,
}

impl ElementStart {
    /// Start tag for `{namespace}local_name`
    pub fn new(namespace: &str, local_name: &str) -> Self {
        Self::qualified(Some(namespace), local_name)
    }

    /// Start tag with an optional namespace
    pub fn qualified(namespace: Option<&str>, local_name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local_name: local_name.to_string(),
            attributes: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// Start tag for an expanded name
    pub fn from_qname(name: &QName) -> Self {
        Self::qualified(name.namespace(), &name.local_name)
    }

    /// Add an unqualified attribute
    pub fn attr(mut self, name: &str, value: impl AsRef<str>) -> Self {
        self.attributes
            .push((name.to_string(), value.as_ref().to_string()));
        self
    }

    /// Add an unqualified attribute when a value is present
    pub fn attr_opt<V: AsRef<str>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    /// Add a timestamp attribute when present
    pub fn timestamp_opt(self, name: &str, value: Option<&DateTime<FixedOffset>>) -> Self {
        self.attr_opt(name, value.map(format_timestamp))
    }

    /// Add a display-formatted attribute when present
    pub fn display_opt<V: fmt::Display>(self, name: &str, value: Option<V>) -> Self {
        self.attr_opt(name, value.map(|v| v.to_string()))
    }

    /// Add a namespaced attribute, declaring its prefix inline
    pub fn ns_attr(mut self, namespace: &str, local_name: &str, value: impl AsRef<str>) -> Self {
        let prefix = self.prefix_for(namespace);
        self.attributes
            .push((format!("{}:{}", prefix, local_name), value.as_ref().to_string()));
        self
    }

    /// Add a namespaced attribute when a value is present
    pub fn ns_attr_opt<V: AsRef<str>>(self, namespace: &str, local_name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.ns_attr(namespace, local_name, v),
            None => self,
        }
    }

    /// Add an attribute by expanded name
    pub fn qname_attr(self, name: &QName, value: impl AsRef<str>) -> Self {
        match name.namespace() {
            Some(ns) => self.ns_attr(ns, &name.local_name, value),
            None => self.attr(&name.local_name, value),
        }
    }

    fn prefix_for(&mut self, namespace: &str) -> String {
        if namespace == XML_NAMESPACE {
            return "xml".to_string();
        }
        if let Some((prefix, _)) = self.prefixes.iter().find(|(_, uri)| uri == namespace) {
            return prefix.clone();
        }

        let base = preferred_prefix(namespace)
            .map(str::to_string)
            .unwrap_or_else(|| derived_prefix(namespace));
        let mut prefix = base.clone();
        let mut n = 1;
        while self.prefixes.iter().any(|(p, _)| *p == prefix) {
            prefix = format!("{}{}", base, n);
            n += 1;
        }

        self.attributes
            .push((format!("xmlns:{}", prefix), namespace.to_string()));
        self.prefixes.push((prefix.clone(), namespace.to_string()));
        prefix
    }
}

/// Prefix from the last segment of a namespace URI, as Go's encoder does
fn derived_prefix(namespace: &str) -> String {
    let segment = namespace
        .trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or("");
    let valid = segment
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
    if valid && !segment.to_ascii_lowercase().starts_with("xml") {
        segment.to_string()
    } else {
        "ns".to_string()
    }
}

#[derive(Debug)]
struct Frame {
    local_name: String,
    default_namespace: Option<String>,
    has_children: bool,
    inline: bool,
}

/// Element writer over `quick-xml`
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
    indent: Option<usize>,
    base_namespace: Option<String>,
    stack: Vec<Frame>,
}

impl XmlWriter {
    /// Writer without indentation
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            indent: None,
            base_namespace: None,
            stack: Vec::new(),
        }
    }

    /// Writer that indents child elements by `indent` spaces per level
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::new()
        }
    }

    /// Treat `namespace` as the default namespace in scope around the output.
    ///
    /// Used when the output is spliced into an element that declares it, so
    /// un-namespaced elements still get `xmlns=""`.
    pub fn with_base_namespace(mut self, namespace: Option<&str>) -> Self {
        self.base_namespace = namespace.map(str::to_string);
        self
    }

    fn default_namespace(&self) -> Option<&str> {
        match self.stack.last() {
            Some(frame) => frame.default_namespace.as_deref(),
            None => self.base_namespace.as_deref(),
        }
    }

    fn newline(&mut self, depth: usize) -> Result<()> {
        if let Some(indent) = self.indent {
            let ws = format!("\n{}", " ".repeat(indent * depth));
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(ws)))?;
        }
        Ok(())
    }

    /// Open an element
    pub fn start(&mut self, element: ElementStart) -> Result<()> {
        let depth = self.stack.len();
        let parent_inline = match self.stack.last_mut() {
            Some(parent) => {
                parent.has_children = true;
                parent.inline
            }
            None => false,
        };
        if depth > 0 && !parent_inline {
            self.newline(depth)?;
        }

        let mut start = BytesStart::new(element.local_name.as_str());
        let default_namespace = match &element.namespace {
            Some(ns) => {
                start.push_attribute(("xmlns", ns.as_str()));
                Some(ns.clone())
            }
            None => {
                if self.default_namespace().map_or(false, |ns| !ns.is_empty()) {
                    start.push_attribute(("xmlns", ""));
                }
                None
            }
        };
        for (name, value) in &element.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }
        self.writer.write_event(Event::Start(start))?;

        self.stack.push(Frame {
            local_name: element.local_name,
            default_namespace,
            has_children: false,
            inline: parent_inline,
        });
        Ok(())
    }

    /// Close the innermost open element
    pub fn end(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::Encode("end tag without an open element".to_string()))?;
        if frame.has_children && !frame.inline {
            self.newline(self.stack.len())?;
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(frame.local_name.as_str())))?;
        Ok(())
    }

    /// Write character data
    pub fn text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        Ok(())
    }

    /// Write markup verbatim inside the current element
    pub fn raw(&mut self, markup: &str) -> Result<()> {
        if let Some(frame) = self.stack.last_mut() {
            frame.inline = true;
        }
        if markup.is_empty() {
            return Ok(());
        }
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(markup)))?;
        Ok(())
    }

    /// Stop indenting inside the current element (mixed content)
    pub fn set_inline(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.inline = true;
        }
    }

    /// Write an element holding only character data
    pub fn leaf(&mut self, element: ElementStart, text: &str) -> Result<()> {
        self.start(element)?;
        self.text(text)?;
        self.end()
    }

    /// Write an element with no content
    pub fn empty(&mut self, element: ElementStart) -> Result<()> {
        self.start(element)?;
        self.end()
    }

    /// Finish and return the output
    pub fn into_string(self) -> Result<String> {
        if let Some(frame) = self.stack.last() {
            return Err(Error::Encode(format!(
                "element '{}' was never closed",
                frame.local_name
            )));
        }
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::Encode(format!("output is not UTF-8: {}", e)))
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writer_pretty_layout() {
        let mut w = XmlWriter::pretty(2);
        w.start(ElementStart::new("urn:a", "Outer").attr("id", "x"))
            .unwrap();
        w.leaf(ElementStart::new("urn:a", "Inner"), "text").unwrap();
        w.empty(ElementStart::new("urn:a", "Empty")).unwrap();
        w.end().unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            "<Outer xmlns=\"urn:a\" id=\"x\">\n  <Inner xmlns=\"urn:a\">text</Inner>\n  <Empty xmlns=\"urn:a\"></Empty>\n</Outer>"
        );
    }

    #[test]
    fn test_writer_compact() {
        let mut w = XmlWriter::new();
        w.start(ElementStart::new("urn:a", "Outer")).unwrap();
        w.leaf(ElementStart::new("urn:a", "Inner"), "a < b").unwrap();
        w.end().unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            "<Outer xmlns=\"urn:a\"><Inner xmlns=\"urn:a\">a &lt; b</Inner></Outer>"
        );
    }

    #[test]
    fn test_writer_undeclares_default_for_unqualified_child() {
        let mut w = XmlWriter::new();
        w.start(ElementStart::new("urn:a", "Outer")).unwrap();
        w.empty(ElementStart::qualified(None, "Plain")).unwrap();
        w.end().unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            "<Outer xmlns=\"urn:a\"><Plain xmlns=\"\"></Plain></Outer>"
        );
    }

    #[test]
    fn test_writer_base_namespace() {
        let mut w = XmlWriter::new().with_base_namespace(Some("urn:a"));
        w.empty(ElementStart::qualified(None, "Plain")).unwrap();
        assert_eq!(w.into_string().unwrap(), "<Plain xmlns=\"\"></Plain>");
    }

    #[test]
    fn test_xlink_attribute_declares_prefix() {
        let mut w = XmlWriter::new();
        w.empty(
            ElementStart::new("urn:a", "Policy").ns_attr(XLINK_NAMESPACE, "href", "x/policy/1"),
        )
        .unwrap();
        assert_eq!(
            w.into_string().unwrap(),
            "<Policy xmlns=\"urn:a\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" xlink:href=\"x/policy/1\"></Policy>"
        );
    }

    #[test]
    fn test_derived_prefixes_do_not_collide() {
        let start = ElementStart::new("urn:a", "X")
            .ns_attr("http://one.example/ns", "a", "1")
            .ns_attr("http://two.example/ns", "b", "2");
        let names: Vec<&str> = start.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["xmlns:ns", "ns:a", "xmlns:ns1", "ns1:b"]);
    }

    #[test]
    fn test_unclosed_element_is_an_error() {
        let mut w = XmlWriter::new();
        w.start(ElementStart::new("urn:a", "Open")).unwrap();
        assert!(matches!(w.into_string(), Err(Error::Encode(_))));
    }

    #[test]
    fn test_format_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2018-07-17T17:14:32.359Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2018-07-17T17:14:32.359Z");

        let ts = DateTime::parse_from_rfc3339("2021-01-19T18:49:26.298986528Z").unwrap();
        assert_eq!(format_timestamp(&ts), "2021-01-19T18:49:26.298986528Z");

        let ts = DateTime::parse_from_rfc3339("2018-05-29T00:44:57+00:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2018-05-29T00:44:57Z");

        let ts = DateTime::parse_from_rfc3339("2018-05-29T00:44:57.500-05:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2018-05-29T00:44:57.5-05:00");
    }

    #[test]
    fn test_attribute_helpers() {
        let doc = roxmltree::Document::parse(
            r#"<MediaPoint order="3" reusable="1" lastUpdated="2018-05-08T00:49:37Z" matchOffset="PT1M"/>"#,
        )
        .unwrap();
        let node = doc.root_element();
        let options = ParseOptions::default();
        assert_eq!(unsigned_attr(node, "order").unwrap(), Some(3));
        assert_eq!(bool_attr(node, "reusable").unwrap(), Some(true));
        assert!(timestamp_attr(node, "lastUpdated").unwrap().is_some());
        assert_eq!(
            duration_attr(node, "matchOffset", &options).unwrap(),
            Some(Duration::new("PT1M"))
        );
        assert_eq!(unsigned_attr(node, "priority").unwrap(), None);
    }

    #[test]
    fn test_attribute_helpers_reject_bad_values() {
        let doc = roxmltree::Document::parse(r#"<MediaPoint order="-1" lastUpdated="yesterday"/>"#)
            .unwrap();
        let node = doc.root_element();
        assert!(unsigned_attr(node, "order").is_err());
        assert!(timestamp_attr(node, "lastUpdated").is_err());
    }

    #[test]
    fn test_strict_duration_policy() {
        let doc = roxmltree::Document::parse(r#"<Apply duration="soon"/>"#).unwrap();
        let strict = ParseOptions::new().with_duration_policy(DurationPolicy::Strict);
        assert!(duration_attr(doc.root_element(), "duration", &strict).is_err());
        let lenient = ParseOptions::new();
        assert!(duration_attr(doc.root_element(), "duration", &lenient).is_ok());
    }

    #[test]
    fn test_match_values() {
        assert_eq!(Match::parse("ANY"), Match::Any);
        assert_eq!(Match::parse("SOME"), Match::Other("SOME".to_string()));
        assert_eq!(Match::Other("SOME".to_string()).as_str(), "SOME");
        assert_eq!(Match::None.to_string(), "NONE");
    }
}
