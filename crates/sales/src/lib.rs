//! Sales domain module.
//!
//! This crate contains the sale record, the order request the store commits,
//! and the client-side basket that builds such requests. Pure domain logic (no
//! IO, no HTTP, no storage).

pub mod cart;
pub mod order;
pub mod sale;

pub use cart::{Cart, CartLine};
pub use order::{OrderLine, OrderLineRequest, OrderRequest, ValidatedOrder};
pub use sale::{PaymentMode, Sale, SaleItem, order_total};
