//! Read views derived from the store.
//!
//! Every view is a pure function of the current medicines and sales and is
//! recomputed on each query; nothing here is cached or incrementally updated.

pub mod customers;
pub mod dashboard;
pub mod history;

pub use customers::{CustomerSummary, UNKNOWN_PHONE, aggregate_customers};
pub use dashboard::{Dashboard, low_stock, period_revenue, total_revenue, total_stock};
pub use history::newest_first;
