//! Resource loading utilities
//!
//! This module reads SCTE-224 documents from files, strings or standard
//! input and parses them with the configured limits and duration policy.

use crate::documents::ParseOptions;
use crate::duration::DurationPolicy;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use crate::schema::{Document, SchemaVersion};
use std::fs;
use std::io::Read;

/// Document loader
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Handling of unreadable durations
    duration_policy: DurationPolicy,
}

impl Loader {
    /// Create a new loader with default settings
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

    /// Options used when parsing loaded text
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_limits(self.limits.clone())
            .with_duration_policy(self.duration_policy)
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        let content = match location {
            Location::Path(path) => fs::read_to_string(path).map_err(|e| {
                Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
            })?,
            Location::String(s) => s.clone(),
            Location::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .take(self.limits.max_xml_size as u64 + 1)
                    .read_to_string(&mut buf)?;
                buf
            }
        };

        // Check size limits
        self.limits.check_xml_size(content.len())?;
        tracing::debug!(%location, bytes = content.len(), "loaded document");
        Ok(content)
    }

    /// Load and parse a document, detecting its revision
    pub fn load_document(&self, location: &Location) -> Result<Document> {
        let text = self.load(location)?;
        Document::parse_with(&text, &self.parse_options())
    }

    /// Load and parse a document as the given revision
    pub fn load_document_as(&self, location: &Location, version: SchemaVersion) -> Result<Document> {
        let text = self.load(location)?;
        Document::parse_as(&text, version, &self.parse_options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const AUDIENCE: &str = r#"<Audience xmlns="http://www.scte.org/schemas/224/2015" id="a"/>"#;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", AUDIENCE).unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let loader = Loader::new();
        let content = loader.load(&location).unwrap();

        assert!(content.contains(r#"id="a""#));
    }

    #[test]
    fn test_load_document_detects_revision() {
        let location = Location::String(AUDIENCE.to_string());
        let doc = Loader::new().load_document(&location).unwrap();
        assert_eq!(doc.version(), SchemaVersion::V2015);
    }

    #[test]
    fn test_missing_file() {
        let location = Location::Path("/nonexistent/media.xml".into());
        let result = Loader::new().load(&location);
        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        let large_content = "x".repeat(5 * 1024 * 1024); // 5 MB
        write!(file, "{}", large_content).unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let loader = Loader::new().with_limits(Limits::strict());
        let result = loader.load(&location);

        // Strict limits (4 MB max) should reject a 5 MB file
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_strict_durations() {
        let location = Location::String(
            r#"<MediaPoint xmlns="http://www.scte.org/schemas/224" matchOffset="soon"/>"#.to_string(),
        );
        let loader = Loader::new().with_duration_policy(DurationPolicy::Strict);
        assert!(matches!(
            loader.load_document(&location),
            Err(Error::Duration(_))
        ));
        assert!(Loader::new().load_document(&location).is_ok());
    }
}
