use thiserror::Error;

use crate::forum::{CreateReplyRequest, CreateThreadRequest};

pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 5000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
}

fn check(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(value.to_string())
}

/// Unvalidated new-thread form input
#[derive(Debug, Clone, Default)]
pub struct ThreadDraft {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<String>,
}

impl ThreadDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag_ids: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tag_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_ids = tag_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Apply the server's length rules, producing the request body
    pub fn validate(&self) -> Result<CreateThreadRequest, ValidationError> {
        let title = check("title", &self.title, TITLE_MAX_CHARS)?;
        let content = check("content", &self.content, CONTENT_MAX_CHARS)?;
        let tag_ids = if self.tag_ids.is_empty() {
            None
        } else {
            Some(self.tag_ids.clone())
        };
        Ok(CreateThreadRequest {
            title,
            content,
            tag_ids,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplyDraft {
    pub content: String,
}

impl ReplyDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<CreateReplyRequest, ValidationError> {
        let content = check("content", &self.content, CONTENT_MAX_CHARS)?;
        Ok(CreateReplyRequest { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_draft_valid() {
        let req = ThreadDraft::new("  Title ", "Body")
            .with_tags(["t1"])
            .validate()
            .unwrap();
        assert_eq!(req.title, "Title");
        assert_eq!(req.tag_ids, Some(vec!["t1".to_string()]));
    }

    #[test]
    fn test_thread_draft_without_tags_omits_field() {
        let req = ThreadDraft::new("Title", "Body").validate().unwrap();
        assert!(req.tag_ids.is_none());
    }

    #[test]
    fn test_thread_draft_empty_title() {
        let err = ThreadDraft::new("   ", "Body").validate().unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "title" });
    }

    #[test]
    fn test_thread_draft_title_too_long() {
        let err = ThreadDraft::new("x".repeat(101), "Body")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "title",
                max: 100,
                len: 101
            }
        );
    }

    #[test]
    fn test_reply_draft_limits() {
        assert!(ReplyDraft::new("x".repeat(5000)).validate().is_ok());
        assert!(ReplyDraft::new("x".repeat(5001)).validate().is_err());
        assert_eq!(
            ReplyDraft::new("").validate().unwrap_err().to_string(),
            "content is required"
        );
    }
}
