//! # scte224
//!
//! SCTE-224 (ESNI) document models for the 2015, 2018 and 2020 schema
//! revisions, with conversion between them.
//!
//! ## Features
//!
//! - Typed models for Media, MediaPoint, Policy, ViewingPolicy, Audience,
//!   Results and Audit in every revision
//! - Upgrade (2015 → 2018 → 2020) and downgrade (2020 → 2018 → 2015) with a
//!   report of every feature the target revision cannot carry
//! - Unknown extension content preserved across parse, serialize and
//!   conversion
//! - Revision detection, JSON export and MediaPoint schedule generation
//! - Protection against oversized documents
//!
//! ## Example
//!
//! ```rust,ignore
//! use scte224::schema::{Document, SchemaVersion};
//!
//! let doc = Document::parse(&std::fs::read_to_string("media.xml")?)?;
//! let (downgraded, report) = doc.convert_to(SchemaVersion::V2015);
//! for loss in report.losses() {
//!     eprintln!("{}", loss);
//! }
//! println!("{}", downgraded.to_xml_pretty()?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules - foundation
pub mod error;
pub mod limits;

// Core modules - XML utilities
pub mod namespaces;
pub mod documents;
pub mod duration;
pub mod wildcards;
pub mod actions;

// Resource loading
pub mod locations;
pub mod loaders;

// Document models
pub mod v2015;
pub mod v2018;
pub mod v2020;

// Revision conversion
pub mod converters;
pub mod schema;

// Tools
pub mod generator;

// Testing support
pub mod comparison;

// Re-exports for convenience
pub use converters::{ConversionReport, Downgrade, Loss, LostFeature, Upgrade};
pub use documents::{from_str, from_str_with, to_string, to_string_pretty, FromXml, ParseOptions, ToXml};
pub use duration::{Duration, DurationPolicy};
pub use error::{Error, Result};
pub use schema::{Document, DocumentKind, SchemaVersion};

/// Version of the scte224 library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
