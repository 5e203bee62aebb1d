//! Infrastructure adapters. Implement outbound ports and the inbound UI.
//!
//! Memory/JSON stores, CSV sheets, inquire TUI. Map errors to DomainError.

pub mod persistence;
pub mod sheet;
pub mod ui;
