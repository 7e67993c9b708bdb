use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// External data an embed node points at, resolved by id at render time.
///
/// Asset references carry `mimeType` and `url`; custom entity references
/// carry arbitrary fields (kept in `fields`) for their renderer to consume.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default)]
    pub id: String,

    /// Alternate id, used when content was migrated and re-keyed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Convenience constructor for an asset record.
    pub fn asset(
        id: impl Into<String>,
        mime_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            mime_type: Some(mime_type.into()),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// True when `node_id` names this record by its primary id, or by its
    /// remote id when `match_remote_id` is set.
    pub fn matches(&self, node_id: &str, match_remote_id: bool) -> bool {
        if self.id == node_id {
            return true;
        }
        match_remote_id && self.remote_id.as_deref() == Some(node_id)
    }
}
