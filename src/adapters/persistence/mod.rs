//! Booking store adapters.

pub mod memory_store;
pub mod snapshot_json;

pub use memory_store::{BookingData, MemoryStore};
pub use snapshot_json::JsonSnapshotStore;
