//! Capture of elements outside the explicit document model
//!
//! SCTE-224 leaves several extension points open: `Metadata` and `Ext`
//! blocks, the action position of a `ViewingPolicy`, and the qualifier
//! position of an `Audience`. Elements found there are captured as
//! [`AnyElement`] trees (expanded name, attributes, content) and written back
//! with their namespaces declared inline, so they survive any number of
//! version conversions unchanged.
//!
//! The 2015 revision stores `Metadata`/`Ext` as uninterpreted inner markup;
//! that form is [`RawMarkup`].

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{parse_document, ElementStart, FromXml, ParseOptions, ToXml, XmlWriter};
use crate::error::Result;
use crate::namespaces::{in_scope_bindings, NamespaceBinding, QName};

/// Attribute of a captured element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnyAttribute {
    /// Expanded attribute name
    pub name: QName,
    /// Attribute value, unescaped
    pub value: String,
}

/// Content node of a captured element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnyNode {
    /// Nested element
    Element(AnyElement),
    /// Character data
    Text(String),
}

/// An element captured at an extension point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnyElement {
    /// Expanded element name
    pub name: QName,
    /// Attributes in document order, excluding namespace declarations
    pub attributes: Vec<AnyAttribute>,
    /// Content in document order
    pub children: Vec<AnyNode>,
}

impl AnyElement {
    /// Empty element
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Leaf element holding character data
    pub fn with_text(name: QName, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut element = Self::new(name);
        if !text.is_empty() {
            element.children.push(AnyNode::Text(text));
        }
        element
    }

    /// Add an attribute
    pub fn attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.push(AnyAttribute {
            name,
            value: value.into(),
        });
        self
    }

    /// Add a child element
    pub fn child(mut self, element: AnyElement) -> Self {
        self.children.push(AnyNode::Element(element));
        self
    }

    /// Capture a parsed element.
    ///
    /// Whitespace between child elements is formatting and is dropped;
    /// text in leaf or mixed content is kept as written.
    pub fn capture(node: Node<'_, '_>) -> Self {
        let has_elements = node.children().any(|n| n.is_element());
        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(AnyNode::Element(Self::capture(child)));
            } else if child.is_text() {
                let text = child.text().unwrap_or("");
                if has_elements && text.trim().is_empty() {
                    continue;
                }
                // adjacent text nodes (split by a comment) are merged
                if let Some(AnyNode::Text(prev)) = children.last_mut() {
                    prev.push_str(text);
                } else {
                    children.push(AnyNode::Text(text.to_string()));
                }
            }
        }

        Self {
            name: QName::from_expanded(node.tag_name()),
            attributes: node
                .attributes()
                .map(|a| AnyAttribute {
                    name: QName::new(a.namespace(), a.name()),
                    value: a.value().to_string(),
                })
                .collect(),
            children,
        }
    }

    /// Whether this element has the given expanded name
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.name.is(namespace, local_name)
    }

    /// Unqualified attribute value
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Concatenated direct character data
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                AnyNode::Text(t) => Some(t.as_str()),
                AnyNode::Element(_) => None,
            })
            .collect()
    }

    /// Child elements
    pub fn elements(&self) -> impl Iterator<Item = &AnyElement> {
        self.children.iter().filter_map(|c| match c {
            AnyNode::Element(e) => Some(e),
            AnyNode::Text(_) => None,
        })
    }

    /// Whether the content mixes significant text with elements
    pub fn is_mixed(&self) -> bool {
        let has_text = self
            .children
            .iter()
            .any(|c| matches!(c, AnyNode::Text(t) if !t.trim().is_empty()));
        has_text && self.elements().next().is_some()
    }

    /// Replace `from` with `to` in this element's name and descendants' names
    pub fn remap_namespace(&mut self, from: &str, to: &str) {
        if self.name.namespace.as_deref() == Some(from) {
            self.name.namespace = Some(to.to_string());
        }
        for child in &mut self.children {
            if let AnyNode::Element(e) = child {
                e.remap_namespace(from, to);
            }
        }
    }

    /// Copy with `from` remapped to `to`
    pub fn remapped(&self, from: &str, to: &str) -> Self {
        let mut copy = self.clone();
        copy.remap_namespace(from, to);
        copy
    }

    /// Write the element with inline namespace declarations
    pub fn write_to(&self, writer: &mut XmlWriter) -> Result<()> {
        let mut start = ElementStart::from_qname(&self.name);
        for attr in &self.attributes {
            start = start.qname_attr(&attr.name, &attr.value);
        }
        writer.start(start)?;
        if self.is_mixed() {
            writer.set_inline();
        }
        for child in &self.children {
            match child {
                AnyNode::Element(e) => e.write_to(writer)?,
                AnyNode::Text(t) => writer.text(t)?,
            }
        }
        writer.end()
    }

    /// Capture a modelled value as a generic element
    pub fn encode<T: ToXml + ?Sized>(value: &T) -> Result<Self> {
        let mut writer = XmlWriter::new();
        value.write_xml(&mut writer)?;
        let markup = writer.into_string()?;
        let doc = parse_document(&markup, &ParseOptions::default())?;
        Ok(Self::capture(doc.root_element()))
    }

    /// Read this element as a modelled value
    pub fn decode<T: FromXml>(&self, options: &ParseOptions) -> Result<T> {
        let markup = self.to_markup(None)?;
        let doc = parse_document(&markup, options)?;
        T::from_element(doc.root_element(), options)
    }

    /// Compact markup for this element, for splicing into an element whose
    /// default namespace is `context_namespace`
    pub fn to_markup(&self, context_namespace: Option<&str>) -> Result<String> {
        let mut writer = XmlWriter::new().with_base_namespace(context_namespace);
        self.write_to(&mut writer)?;
        writer.into_string()
    }
}

/// Ordered list of captured elements (`Metadata` and `Ext` in 2018 and later)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Captured elements in document order
    pub nodes: Vec<AnyElement>,
}

impl Extension {
    /// Extension holding the given nodes
    pub fn new(nodes: Vec<AnyElement>) -> Self {
        Self { nodes }
    }

    /// Capture the element children of a `Metadata` or `Ext` element
    pub fn capture(node: Node<'_, '_>) -> Self {
        Self {
            nodes: node
                .children()
                .filter(|n| n.is_element())
                .map(AnyElement::capture)
                .collect(),
        }
    }

    /// Write `<{namespace}local_name>` holding the captured nodes
    pub fn write_as(&self, writer: &mut XmlWriter, namespace: &str, local_name: &str) -> Result<()> {
        writer.start(ElementStart::new(namespace, local_name))?;
        for node in &self.nodes {
            node.write_to(writer)?;
        }
        writer.end()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Decode the first captured node bound to `T`, if there is one
    pub fn find<T: FromXml>(&self, options: &ParseOptions) -> Result<Option<T>> {
        self.nodes
            .iter()
            .find(|node| node.is(T::NAMESPACE, T::ELEMENT))
            .map(|node| node.decode::<T>(options))
            .transpose()
    }
}

/// Uninterpreted inner markup of a 2015 `Metadata` or `Ext` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMarkup {
    /// Markup between the start and end tags, as written in the source
    pub markup: String,
    /// Default namespace in scope where the markup was captured
    pub default_namespace: Option<String>,
    /// Prefixed namespace bindings in scope where the markup was captured
    pub namespaces: Vec<NamespaceBinding>,
}

impl RawMarkup {
    /// Markup with no captured bindings
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            default_namespace: None,
            namespaces: Vec::new(),
        }
    }

    /// Capture the inner markup of a parsed element, with its namespace scope
    pub fn capture(node: Node<'_, '_>) -> Self {
        let source = node.document().input_text();
        let range = node.range();
        let element = &source[range.clone()];

        let markup = match start_tag_len(element) {
            Some(open) if !element[..open].ends_with("/>") => {
                let inner_end = element.rfind("</").unwrap_or(element.len());
                element[open..inner_end.max(open)].to_string()
            }
            _ => String::new(),
        };

        Self {
            markup,
            default_namespace: node.lookup_namespace_uri(None).map(str::to_string),
            namespaces: in_scope_bindings(node),
        }
    }

    /// Whether the markup is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.markup.trim().is_empty()
    }

    /// Parse the markup into captured elements.
    ///
    /// The markup is wrapped in an element that re-declares the captured
    /// namespace scope, so prefixes bound on ancestors still resolve.
    pub fn parse_nodes(&self, options: &ParseOptions) -> Result<Vec<AnyElement>> {
        let mut start = ElementStart::qualified(self.default_namespace.as_deref(), "RawMarkup");
        for binding in &self.namespaces {
            start = start.attr(&format!("xmlns:{}", binding.prefix), &binding.uri);
        }
        let mut writer = XmlWriter::new();
        writer.start(start)?;
        writer.raw(&self.markup)?;
        writer.end()?;
        let wrapped = writer.into_string()?;

        let doc = parse_document(&wrapped, options)?;
        Ok(doc
            .root_element()
            .children()
            .filter(|n| n.is_element())
            .map(AnyElement::capture)
            .collect())
    }

    /// Write `<{namespace}local_name>` around the markup, re-declaring the
    /// captured prefixes so the output stays well-formed
    pub fn write_as(&self, writer: &mut XmlWriter, namespace: &str, local_name: &str) -> Result<()> {
        let mut start = ElementStart::new(namespace, local_name);
        for binding in &self.namespaces {
            if self.markup.contains(&format!("{}:", binding.prefix)) {
                start = start.attr(&format!("xmlns:{}", binding.prefix), &binding.uri);
            }
        }
        writer.start(start)?;
        writer.raw(&self.markup)?;
        writer.end()
    }
}

/// Length of the start tag at the beginning of `element`, honoring quoted
/// attribute values
fn start_tag_len(element: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in element.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i + 1),
            None => {}
        }
    }
    None
}
