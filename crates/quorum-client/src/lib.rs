pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod traits;

pub use config::ClientConfig;
pub use debounce::{debounce, Debounced};
pub use error::{ForumError, Result};
pub use http::HttpForumClient;
pub use traits::ForumApi;

pub use quorum_types as types;
