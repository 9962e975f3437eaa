//! Core library for the `weather-station` journal.
//!
//! This crate defines:
//! - ISO date validation and display formatting
//! - The observation model and the JSON-backed record store
//! - The interactive entry session and its prompt abstraction
//! - The sorted report and the optional configuration file
//!
//! It is used by `station-cli`, but the session can be driven by any `Prompt`.

pub mod config;
pub mod date;
pub mod model;
pub mod prompt;
pub mod report;
pub mod session;
pub mod store;

pub use config::Config;
pub use date::{DateError, format_date, is_leap_year, validate_date};
pub use model::{Field, Observation};
pub use prompt::{LinePrompt, Prompt};
pub use session::{EntryError, Session, SessionSummary};
pub use store::{RecordStore, StorageError};
