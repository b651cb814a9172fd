//! Core library surface for the music catalog: a two-table SQLite store of
//! artists and songs, the service operations built on it, and the terminal
//! shell that drives them.
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence layer entry point.
pub use db::Store;

/// Domain operations and their outcome types.
pub use catalog::{ArtistRemoval, Catalog, Upsert};
pub use error::{CatalogError, CatalogResult};

/// The two primary domain types plus the key used to address them.
pub use models::{parse_bpm, Artist, RecordKey, Song};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
