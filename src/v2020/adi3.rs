//! ADI 3.0 (SCTE 236) asset metadata carried in `Metadata`
//!
//! This is a read view: the `Metadata` block keeps the captured markup, which
//! is what gets written and converted, and [`Adi3`] is decoded from it on
//! demand. Descendants of `ADI3` are matched by local name, since producers
//! spread them over the core, title, offer and content namespaces.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::documents::{element_children, string_attr, text_content, FromXml, ParseOptions};
use crate::error::{Error, Result};
use crate::namespaces::{ADI3_CORE_NAMESPACE, XSI_NAMESPACE};

fn child<'a, 'input: 'a>(node: Node<'a, 'input>, local_name: &str) -> Option<Node<'a, 'input>> {
    element_children(node).find(|n| n.tag_name().name() == local_name)
}

fn child_text(node: Node<'_, '_>, local_name: &str) -> Option<String> {
    child(node, local_name).map(|n| text_content(n).trim().to_string())
}

/// `ADI3` root element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adi3 {
    /// Assets, in document order
    pub assets: Vec<Asset>,
}

impl FromXml for Adi3 {
    const ELEMENT: &'static str = "ADI3";
    const NAMESPACE: &'static str = ADI3_CORE_NAMESPACE;

    fn from_node(node: Node<'_, '_>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            assets: element_children(node)
                .filter(|n| n.tag_name().name() == Asset::ELEMENT)
                .map(|n| Asset::from_node(n, options))
                .collect::<Result<_>>()?,
        })
    }
}

impl Adi3 {
    /// The asset with the given `uriId`
    pub fn asset(&self, uri_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.uri_id.as_deref() == Some(uri_id))
    }
}

/// One `Asset`: a title, a movie, a poster or an offer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// `xsi:type`, e.g. `title:TitleType`
    pub asset_type: Option<String>,
    /// Globally unique asset URI
    pub uri_id: Option<String>,
    /// Provider version number
    pub provider_version_num: Option<String>,
    /// Internal version number
    pub internal_version_num: Option<String>,
    /// Creation time, as written
    pub creation_date_time: Option<String>,
    /// Start of availability, as written
    pub start_date_time: Option<String>,
    /// End of availability, as written
    pub end_date_time: Option<String>,
    /// Last modification time, as written
    pub last_modified_date_time: Option<String>,
    /// Identifier in another system
    pub alternate_id: Option<AlternateId>,
    /// Asset name
    pub asset_name: Option<String>,
    /// Provider name
    pub provider: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Titles and summary
    pub localizable_title: Option<LocalizableTitle>,
    /// Content rating
    pub rating: Option<Rating>,
    /// Closed captioning flag, as written
    pub is_closed_captioning: Option<String>,
    /// Display run time, as written
    pub display_run_time: Option<String>,
    /// Release year
    pub year: Option<u32>,
    /// Genre
    pub genre: Option<String>,
    /// Show type
    pub show_type: Option<String>,
    /// `Ext/App_Data` name/value pairs
    pub app_data: Vec<AppData>,
}

impl FromXml for Asset {
    const ELEMENT: &'static str = "Asset";
    const NAMESPACE: &'static str = ADI3_CORE_NAMESPACE;

    fn from_node(node: Node<'_, '_>, _options: &ParseOptions) -> Result<Self> {
        let year = match child_text(node, "Year") {
            Some(text) => Some(text.parse::<u32>().map_err(|_| {
                Error::Value(format!("invalid ADI3 Year '{}' in asset {:?}", text, string_attr(node, "uriId")))
            })?),
            None => None,
        };
        Ok(Self {
            asset_type: node
                .attribute((XSI_NAMESPACE, "type"))
                .map(str::to_string),
            uri_id: string_attr(node, "uriId"),
            provider_version_num: string_attr(node, "providerVersionNum"),
            internal_version_num: string_attr(node, "internalVersionNum"),
            creation_date_time: string_attr(node, "creationDateTime"),
            start_date_time: string_attr(node, "startDateTime"),
            end_date_time: string_attr(node, "endDateTime"),
            last_modified_date_time: string_attr(node, "lastModifiedDateTime"),
            alternate_id: child(node, "AlternateId").map(|n| AlternateId {
                identifier_system: string_attr(n, "identifierSystem"),
                value: text_content(n),
            }),
            asset_name: child_text(node, "AssetName"),
            provider: child_text(node, "Provider"),
            description: child_text(node, "Description"),
            localizable_title: child(node, "LocalizableTitle").map(LocalizableTitle::read),
            rating: child(node, "Rating").map(|n| Rating {
                rating_system: string_attr(n, "ratingSystem"),
                value: text_content(n),
            }),
            is_closed_captioning: child_text(node, "IsClosedCaptioning"),
            display_run_time: child_text(node, "DisplayRunTime"),
            year,
            genre: child_text(node, "Genre"),
            show_type: child_text(node, "ShowType"),
            app_data: child(node, "Ext")
                .map(|ext| {
                    element_children(ext)
                        .filter(|n| n.tag_name().name() == "App_Data")
                        .map(|n| AppData {
                            app: string_attr(n, "App"),
                            name: string_attr(n, "Name"),
                            value: string_attr(n, "Value"),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

/// `AlternateId`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateId {
    /// Identifier system, e.g. `VOD1.1`
    pub identifier_system: Option<String>,
    /// Identifier
    pub value: String,
}

/// `LocalizableTitle`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizableTitle {
    /// Short title
    pub title_brief: Option<String>,
    /// Medium title
    pub title_medium: Option<String>,
    /// Long title
    pub title_long: Option<String>,
    /// Short summary
    pub summary_short: Option<String>,
    /// Cast line
    pub actor_display: Option<String>,
}

impl LocalizableTitle {
    fn read(node: Node<'_, '_>) -> Self {
        Self {
            title_brief: child_text(node, "TitleBrief"),
            title_medium: child_text(node, "TitleMedium"),
            title_long: child_text(node, "TitleLong"),
            summary_short: child_text(node, "SummaryShort"),
            actor_display: child_text(node, "ActorDisplay"),
        }
    }
}

/// `Rating`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Rating system, e.g. `MPAA`
    pub rating_system: Option<String>,
    /// Rating
    pub value: String,
}

/// `App_Data`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    /// Application the entry is for
    pub app: Option<String>,
    /// Entry name
    pub name: Option<String>,
    /// Entry value
    pub value: Option<String>,
}
