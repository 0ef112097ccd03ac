pub mod catalog;
pub mod controller;
pub mod detail;
pub mod state;

pub use catalog::TagCatalog;
pub use controller::{SearchCommand, SearchController, SearchError, SearchHandle};
pub use detail::ThreadDetail;
pub use state::{SearchConfig, SearchSnapshot, SearchStatus};
