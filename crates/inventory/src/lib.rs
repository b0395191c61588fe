//! Inventory domain module.
//!
//! This crate contains business rules for stocked medicines, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod medicine;

pub use medicine::{LOW_STOCK_THRESHOLD, MAX_STOCK_QTY, MAX_UNIT_PRICE, Medicine, MedicinePatch, NewMedicine};
