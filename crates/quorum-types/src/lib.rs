pub mod auth;
pub mod draft;
pub mod forum;
pub mod search;

pub use auth::{AuthResponse, Credentials};
pub use draft::{ReplyDraft, ThreadDraft, ValidationError};
pub use forum::{
    CreateReplyRequest, CreateThreadRequest, Reply, Tag, Thread, ThreadSummary, PREVIEW_CHARS,
};
pub use search::{SearchParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
