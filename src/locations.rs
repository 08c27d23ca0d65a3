//! Resource location resolution
//!
//! This module resolves command-line style arguments into the source a
//! document is read from.

use std::fmt;
use std::path::PathBuf;

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// In-memory document text
    String(String),
    /// Standard input
    Stdin,
}

impl Location {
    /// Resolve an argument: `-` is standard input, text starting with `<`
    /// is an inline document, anything else is a path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Location::Stdin
        } else if arg.trim_start().starts_with('<') {
            Location::String(arg.to_string())
        } else {
            Location::Path(PathBuf::from(arg))
        }
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::String(_) => f.write_str("<inline>"),
            Location::Stdin => f.write_str("<stdin>"),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}
