//! Application use cases. Orchestrate domain logic via ports.

pub mod booking_service;
pub mod transfer_service;

pub use booking_service::{Admission, BookingService, NewEntities};
pub use transfer_service::{ImportReport, RowOutcome, TransferService};
