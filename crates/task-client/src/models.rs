//! Client Models
//!
//! Data structures matching backend entities, plus request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Longest title the backend accepts, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Cached projection of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// `None` when the backend did not tell us who we are (login without a user object)
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<Uuid>,
    pub email: String,
    #[serde(alias = "created_at", with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at", with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Projection for a login whose response carried only a token.
    pub fn from_email(email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(alias = "user_id")]
    pub user_id: Uuid,
    #[serde(default, alias = "created_at", with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at", with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /tasks` response
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub pagination: Option<serde_json::Value>,
}

/// `{ "task": {...} }` envelope used by single-task endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct TaskEnvelope {
    pub task: Task,
}

/// `POST /tasks` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NewTask {
    /// Trims input; a blank description becomes `None`.
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            description: non_blank(description),
            completed: None,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)
    }
}

/// `PUT /tasks/{id}` body; absent fields are left untouched by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `Some(None)` sends an explicit `null` to clear the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Full edit from form drafts.
    pub fn from_drafts(title: &str, description: &str, completed: bool) -> Self {
        Self {
            title: Some(title.trim().to_string()),
            description: Some(non_blank(description)),
            completed: Some(completed),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Unknown or non-UUID ids (e.g. the old `"unknown"` placeholder) read as `None`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| Uuid::parse_str(&s).ok()))
}

/// Timestamps arrive either as RFC 3339 or as naive ISO-8601 (UTC implied).
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{}`", raw)))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(parse))
        }
    }
}
