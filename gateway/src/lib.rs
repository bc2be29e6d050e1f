//! agrotrust-gateway: HTTP gateway for the AgroTrust GI provenance ledger
//!
//! Exposes the record store's operations as a JSON API, bulk-creates batches
//! from CSV uploads and replays the data-entry wizard from a TOML manifest.

pub mod config;
pub mod csv_import;
pub mod dates;
pub mod deployment;
pub mod error;
pub mod forms;
pub mod ledger;
pub mod records;
pub mod routes;
pub mod wizard;

pub use error::{ApiError, LedgerError};
pub use ledger::{RecordStore, SandboxLedger};
pub use routes::{create_router, AppState};
