pub mod app_config;
pub mod document;
pub mod memory;
pub mod store;

pub use document::{Direction, Document, Fields, Filter, OrderBy, Query, WriteValue};
pub use memory::MemoryStore;
pub use store::{DocumentStore, SnapshotFeed, StoreError};
