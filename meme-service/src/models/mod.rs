/// Data models for meme-service
///
/// This module defines the stored post record and the partial shapes used
/// by the create and update pipelines.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored meme post.
///
/// The id is allocated from the [`Post::SEQUENCE_NAME`] counter before
/// insert and is immutable afterwards. The `(name, url, caption)` triple is
/// unique at creation time (enforced by the service-layer duplicate scan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub caption: String,
    pub date_posted: NaiveDate,
}

impl Post {
    /// Counter name post ids are allocated from.
    pub const SEQUENCE_NAME: &'static str = "posts_sequence";
}

/// A candidate post submitted for creation.
///
/// Fields are optional so that a missing value and a blank value produce
/// the same validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub name: Option<String>,
    pub url: Option<String>,
    pub caption: Option<String>,
}

/// A partial update. Only `url` and `caption` may change; absent fields
/// keep their stored values. Unknown keys in the request body are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub url: Option<String>,
    pub caption: Option<String>,
}
