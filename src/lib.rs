//! A personal finance ledger: income and expense transactions kept in SQLite or a JSON file,
//! filtered by month, type, account and category, and summarized into totals and chart series.
//!
//! `Credit Given` and `Crypto Investment` expenses are tracked in their own totals and never count
//! against net earnings.

pub mod args;
pub mod chart;
pub mod commands;
mod config;
mod db;
mod error;
pub mod filter;
pub mod form;
mod ledger;
pub mod model;
pub mod storage;
mod store;
pub mod totals;
mod utils;


pub use config::{Config, DEFAULT_CURRENCY};
pub use error::{Error, ErrorType, Result};
pub use ledger::{Ledger, View};
pub use store::Store;
