//! SCTE-224 2015 (20151115) document model
//!
//! Core elements live in `http://www.scte.org/schemas/224/2015`. Actions are
//! only carried in the ViewingPolicy action bag, and `Metadata`/`Ext` keep
//! their inner markup as written.

mod base;
mod media;
mod policy;
mod results;

pub use base::{AltId, IdentifiableType, ReusableType};
pub use media::{Apply, Assert, MatchSignal, Media, MediaPoint, Remove};
pub use policy::{Audience, Policy, ViewingPolicy};
pub use results::{Audit, Results};

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{describe, FromXml, ParseOptions, ToXml, XmlWriter};
use crate::error::{Error, Result};
use crate::namespaces::SCTE224_2015_NAMESPACE;
use crate::schema::DocumentKind;

/// Core namespace of this revision
pub const NAMESPACE: &str = SCTE224_2015_NAMESPACE;

/// Any entity that may appear as a document root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Root {
    /// `Media`
    Media(Media),
    /// `MediaPoint`
    MediaPoint(MediaPoint),
    /// `Policy`
    Policy(Policy),
    /// `ViewingPolicy`
    ViewingPolicy(ViewingPolicy),
    /// `Audience`
    Audience(Audience),
    /// `Results`
    Results(Results),
    /// `Audit`
    Audit(Audit),
}

impl Root {
    /// Read whichever entity `node` is
    pub fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        if node.tag_name().namespace() != Some(NAMESPACE) {
            return Err(unexpected(node));
        }
        Ok(match node.tag_name().name() {
            "Media" => Root::Media(Media::from_node(node, options)?),
            "MediaPoint" => Root::MediaPoint(MediaPoint::from_node(node, options)?),
            "Policy" => Root::Policy(Policy::from_node(node, options)?),
            "ViewingPolicy" => Root::ViewingPolicy(ViewingPolicy::from_node(node, options)?),
            "Audience" => Root::Audience(Audience::from_node(node, options)?),
            "Results" => Root::Results(Results::from_node(node, options)?),
            "Audit" => Root::Audit(Audit::from_node(node, options)?),
            _ => return Err(unexpected(node)),
        })
    }

    /// Entity kind
    pub fn kind(&self) -> DocumentKind {
        match self {
            Root::Media(_) => DocumentKind::Media,
            Root::MediaPoint(_) => DocumentKind::MediaPoint,
            Root::Policy(_) => DocumentKind::Policy,
            Root::ViewingPolicy(_) => DocumentKind::ViewingPolicy,
            Root::Audience(_) => DocumentKind::Audience,
            Root::Results(_) => DocumentKind::Results,
            Root::Audit(_) => DocumentKind::Audit,
        }
    }

    /// Entity id, if the root has one
    pub fn id(&self) -> Option<&str> {
        match self {
            Root::Media(v) => v.reusable.identity.id.as_deref(),
            Root::MediaPoint(v) => v.identity.id.as_deref(),
            Root::Policy(v) => v.reusable.identity.id.as_deref(),
            Root::ViewingPolicy(v) => v.reusable.identity.id.as_deref(),
            Root::Audience(v) => v.reusable.identity.id.as_deref(),
            Root::Results(_) => None,
            Root::Audit(v) => v.identity.id.as_deref(),
        }
    }
}

impl ToXml for Root {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        match self {
            Root::Media(v) => v.write_xml(writer),
            Root::MediaPoint(v) => v.write_xml(writer),
            Root::Policy(v) => v.write_xml(writer),
            Root::ViewingPolicy(v) => v.write_xml(writer),
            Root::Audience(v) => v.write_xml(writer),
            Root::Results(v) => v.write_xml(writer),
            Root::Audit(v) => v.write_xml(writer),
        }
    }
}

fn unexpected(node: Node<'_, '_>) -> Error {
    Error::UnexpectedRoot {
        expected: format!("an SCTE-224 2015 entity in {}", NAMESPACE),
        found: describe(node),
    }
}
