pub mod app;
pub mod commands;
pub mod config;
pub mod render;

pub use app::{App, Flow};
pub use commands::{Command, ParseError};
pub use config::Config;
