use serde::{Deserialize, Serialize};

/// Chat channel id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Mentionable role id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoleId(pub u64);

impl RoleId {
    /// Renders the platform mention syntax for embedding in message text.
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.0)
    }
}

/// One scraped listing entry. Pure value object: equality is by field value,
/// and `url` is the unique lookup key within one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    pub url: String,
    pub document_id: Option<String>,
    pub filename: Option<String>,
}

impl DocumentRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let document_id = extract_document_id(&url);
        Self {
            title: title.into(),
            url,
            document_id,
            filename: None,
        }
    }
}

/// Outcome of diffing the current scrape against the previous snapshot.
/// `new` and `modified` are disjoint ordered subsets of the current scrape;
/// unchanged records appear in neither.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub new: Vec<DocumentRecord>,
    pub modified: Vec<DocumentRecord>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.modified.is_empty()
    }
}

/// Pulls the `DocumentID` query value out of a download URL, if present.
pub fn extract_document_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("DocumentID=")?;
    Some(rest.to_string())
}
