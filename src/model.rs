//! Wire types returned by the Remote Tree Service.

use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Deserializer};

use crate::format::format_size;

/// A file or folder entry in the remote hierarchy.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_folder: bool,
    /// MIME type, files only.
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub formatted_size: Option<String>,
    /// Only the length of the `children` array is kept for a summary.
    #[serde(default, rename = "children", deserialize_with = "count_entries")]
    pub child_count: usize,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Node {
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder: true,
            file_type: None,
            size: None,
            formatted_size: None,
            child_count: 0,
            created_at: None,
        }
    }

    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_folder: false,
            file_type: Some(file_type.into()),
            size: Some(size),
            formatted_size: Some(format_size(size)),
            child_count: 0,
            created_at: None,
        }
    }

    /// Server-formatted size, or one computed from the raw byte count.
    pub fn display_size(&self) -> String {
        match (&self.formatted_size, self.size) {
            (Some(formatted), _) => formatted.clone(),
            (None, Some(bytes)) => format_size(bytes),
            (None, None) => "-".to_string(),
        }
    }
}

/// A folder together with its children, as returned by `/root` and
/// `/folder/{id}`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<Node>,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: None,
            children,
        }
    }

    pub fn child(&self, id: &str) -> Option<&Node> {
        self.children.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn count_entries<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<IgnoredAny>> = Option::deserialize(deserializer)?;
    Ok(entries.map(|e| e.len()).unwrap_or(0))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
