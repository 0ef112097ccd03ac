use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of content characters shown in a list preview
pub const PREVIEW_CHARS: usize = 150;

/// Filter vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Full thread as returned by the API
///
/// The server emits snake_case field names while older endpoints used
/// camelCase, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(alias = "author_id")]
    pub author_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// List-row view of a thread: content cut down to a preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
}

impl ThreadSummary {
    /// First `max_chars` characters of `content`, with `...` appended when cut
    pub fn preview_of(content: &str, max_chars: usize) -> String {
        match content.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
            None => content.to_string(),
        }
    }
}

impl From<Thread> for ThreadSummary {
    fn from(thread: Thread) -> Self {
        Self {
            preview: Self::preview_of(&thread.content, PREVIEW_CHARS),
            id: thread.id,
            title: thread.title,
            tags: thread.tags,
            created_at: thread.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    #[serde(alias = "thread_id")]
    pub thread_id: String,
    pub content: String,
    #[serde(alias = "author_id")]
    pub author_id: String,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /forum/threads`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateThreadRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
}

/// Body of `POST /forum/threads/{id}/replies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    pub content: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
