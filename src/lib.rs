//! vatbook - income and expense tracking with German VAT
//!
//! This library provides the bookkeeping core behind the `vatbook` command
//! line tool: categories and transactions with automatic or manual VAT, and
//! dashboard, profit & loss, VAT and expense reports over them.
//!
//! # Architecture
//!
//! - `config`: Settings and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, categories, transactions, periods)
//! - `services`: VAT calculation, category and transaction logic, [`FinanceBook`]
//! - `storage`: Persistence backends (JSON files, in-memory)
//! - `reports`: Aggregations and report generation
//! - `display`: Terminal formatting
//! - `export`: CSV export
//! - `backup`: Rolling backups
//!
//! # Example
//!
//! ```rust,ignore
//! use vatbook::config::{paths::VatbookPaths, settings::Settings};
//! use vatbook::services::FinanceBook;
//! use vatbook::storage::JsonBackend;
//!
//! let paths = VatbookPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let book = FinanceBook::open(JsonBackend::open(paths)?, settings)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{VatbookError, VatbookResult};
pub use services::FinanceBook;
