use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record as returned by `com.atproto.repo.listRecords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub uri: String,
    pub cid: String,
    pub value: RecordValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordValue {
    pub created_at: String,
    // Only posts carry text; reposts and likes point at a subject instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Record {
    pub fn created_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.value.created_at).map(|t| t.with_timezone(&Utc))
    }
}

/// One page of a listing. `cursor` is `None` once the listing is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<Record>,
    pub cursor: Option<String>,
}

impl Page {
    /// Builds a page, treating an empty cursor the same as a missing one.
    pub fn new(records: Vec<Record>, cursor: Option<String>) -> Self {
        Self {
            records,
            cursor: cursor.filter(|c| !c.is_empty()),
        }
    }

    pub fn is_last(&self) -> bool {
        self.cursor.is_none()
    }
}

/// The record key: the final path segment of an `at://<repo>/<collection>/<rkey>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn parse(uri: &str) -> Result<Self, String> {
        let trimmed = uri.trim();

        if trimmed.is_empty() {
            return Err("Invalid record uri: cannot be empty.".to_string());
        }

        match trimmed.rsplit_once('/') {
            Some((_, rkey)) if !rkey.is_empty() => Ok(Self(rkey.to_string())),
            _ => Err(format!("Invalid record uri: '{trimmed}' has no record key.")),
        }
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
