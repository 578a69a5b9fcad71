//! Headline storage crate - durable delivered-item state.
//!
//! The delivered state is a single record: the canonical URLs already shown
//! to the consumer plus the time of the last write. Three interchangeable
//! backends implement the `DeliveredStore` contract: a WAL-mode SQLite
//! database with migrations, a flat JSON file written atomically, and an
//! in-memory slot for tests and dry runs.

pub mod db;
pub mod migrations;
pub mod store;

pub use db::Database;
pub use store::{
    open_store, DeliveredStore, JsonFileDeliveredStore, MemoryDeliveredStore,
    SqliteDeliveredStore,
};
