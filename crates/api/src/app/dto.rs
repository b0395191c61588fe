use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_sales::Sale;

// -------------------------
// Query DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineQuery {
    /// Case-insensitive name fragment.
    pub q: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}

impl MedicineQuery {
    /// Name fragment, if a non-blank one was given.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn is_filtered(&self) -> bool {
        self.search_term().is_some() || self.in_stock
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesOrder {
    #[default]
    Oldest,
    Newest,
}

#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    pub order: SalesOrder,
}

#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub days: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

pub const ORDER_PROCESSED: &str = "Order processed successfully";

#[derive(Debug, Serialize)]
pub struct ProcessOrderResponse {
    pub message: &'static str,
    pub order: Sale,
}

impl ProcessOrderResponse {
    pub fn new(order: Sale) -> Self {
        Self {
            message: ORDER_PROCESSED,
            order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub days: i64,
    pub revenue: Decimal,
}
