//! Limits and constraints for document processing
//!
//! SCTE-224 documents arrive from remote data services, so parsing is
//! bounded in size, depth, node count and attribute count.

use crate::error::{Error, Result};

/// Global limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum XML document size in bytes
    pub max_xml_size: usize,

    /// Maximum number of nodes in a document
    pub max_nodes: usize,

    /// Maximum number of attributes per element
    pub max_attributes: usize,

    /// Maximum number of MediaPoints a generated schedule may hold
    pub max_generated_points: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 256,
            max_xml_size: 64 * 1024 * 1024, // 64 MB
            max_nodes: 1_000_000,
            max_attributes: 256,
            max_generated_points: 100_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 64,
            max_xml_size: 4 * 1024 * 1024, // 4 MB
            max_nodes: 100_000,
            max_attributes: 64,
            max_generated_points: 10_000,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 4096,
            max_xml_size: 1024 * 1024 * 1024, // 1 GB
            max_nodes: 100_000_000,
            max_attributes: 10_000,
            max_generated_points: 10_000_000,
        }
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the node count is within limits
    pub fn check_nodes(&self, count: usize) -> Result<()> {
        if count > self.max_nodes {
            Err(Error::LimitExceeded(format!(
                "Node count {} exceeds maximum {}",
                count, self.max_nodes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of attributes is within limits
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        if count > self.max_attributes {
            Err(Error::LimitExceeded(format!(
                "Attribute count {} exceeds maximum {}",
                count, self.max_attributes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a generated schedule size is within limits
    pub fn check_generated_points(&self, count: usize) -> Result<()> {
        if count > self.max_generated_points {
            Err(Error::LimitExceeded(format!(
                "Generated MediaPoint count {} exceeds maximum {}",
                count, self.max_generated_points
            )))
        } else {
            Ok(())
        }
    }

    /// Walk a parsed document and enforce depth, node and attribute limits
    pub fn check_document(&self, doc: &roxmltree::Document<'_>) -> Result<()> {
        let mut nodes = 0usize;
        let mut stack = vec![(doc.root(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            nodes += 1;
            self.check_nodes(nodes)?;
            if node.is_element() {
                self.check_xml_depth(depth)?;
                self.check_attributes(node.attributes().count())?;
            }
            for child in node.children() {
                stack.push((child, depth + 1));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_xml_depth, 256);
        assert!(limits.check_xml_depth(100).is_ok());
        assert!(limits.check_xml_depth(300).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_xml_depth < Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(100).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_xml_depth > Limits::default().max_xml_depth);
        assert!(limits.check_xml_depth(1000).is_ok());
    }

    #[test]
    fn test_check_xml_size() {
        let limits = Limits::default();
        assert!(limits.check_xml_size(1024).is_ok());
        assert!(limits.check_xml_size(200 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_check_generated_points() {
        let limits = Limits::strict();
        assert!(limits.check_generated_points(1344).is_ok());
        assert!(matches!(
            limits.check_generated_points(20_000),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_check_document_depth() {
        let limits = Limits {
            max_xml_depth: 2,
            ..Limits::default()
        };
        let shallow = roxmltree::Document::parse("<a><b/></a>").unwrap();
        assert!(limits.check_document(&shallow).is_ok());

        let deep = roxmltree::Document::parse("<a><b><c><d/></c></b></a>").unwrap();
        assert!(matches!(
            limits.check_document(&deep),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_check_document_attributes() {
        let limits = Limits {
            max_attributes: 1,
            ..Limits::default()
        };
        let doc = roxmltree::Document::parse(r#"<a x="1" y="2"/>"#).unwrap();
        assert!(limits.check_document(&doc).is_err());
    }
}
