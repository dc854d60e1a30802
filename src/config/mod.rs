//! Configuration module for vatbook
//!
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::VatbookPaths;
pub use settings::{BackupRetention, Settings};
