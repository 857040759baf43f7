//! openfm: a personal finance ledger over a flat file of dated records.
//!
//! Each line of the data file is one record:
//!
//! ```text
//! SIGN|DD.MM.YYYY|CATEGORY|AMOUNT|COMMENT
//! ```
//!
//! [`validator::validate`] checks a line and extracts a [`models::Record`];
//! [`processor::Engine`] folds a whole file into profit, cost and balance.

pub mod config;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod processor;
pub mod traits;
pub mod validator;
pub mod writer;

pub use errors::{Reason, ValidationError};
pub use models::{FormatVersion, Record, Sign, Summary};
pub use validator::{RecordValidator, ValidatorConfig, validate};
