pub mod action;
pub mod archive;
pub mod binfmt;
pub mod config;
pub mod error;
pub mod link;
pub mod order;
pub mod shortcut;
pub mod store;
pub mod window_data;

pub use error::{Result, ToolbarError};
