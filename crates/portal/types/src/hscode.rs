//! Harmonized System codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HsCode {
    pub id: String,
    pub hs_code: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Query of `GET /api/hscodes`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HsCodeQuery {
    pub starts_with: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl HsCodeQuery {
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self {
            starts_with: Some(prefix.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query pairs in wire order; unset parameters are omitted
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(prefix) = self.starts_with.as_deref().filter(|p| !p.is_empty()) {
            pairs.push(("hsCodeStartsWith", prefix.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}
