//! Infrastructure layer: the in-memory store and the read views derived from it.

pub mod projections;
pub mod seed;
pub mod store;

pub use store::PharmacyStore;
