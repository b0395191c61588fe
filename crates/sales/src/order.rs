use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{DomainError, DomainResult, MedicineId};

use crate::sale::PaymentMode;

/// Request body of `POST /sales/process-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub prescription_file: Option<String>,
    #[serde(default)]
    pub cart: Vec<OrderLineRequest>,
}

/// One requested line.
///
/// `name` and `price` are what the client displayed; the store prices the line
/// from its own record and only uses `name` to describe a missing medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub medicine_id: MedicineId,
    #[serde(default)]
    pub name: Option<String>,
    pub qty: i64,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Order that passed input validation; stock is checked by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub payment_mode: PaymentMode,
    pub prescription_file: Option<String>,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub medicine_id: MedicineId,
    pub qty: u64,
    /// Client-side label, used only in error messages.
    pub label: Option<String>,
}

impl OrderRequest {
    pub fn new(customer_name: impl Into<String>, payment_mode: PaymentMode) -> Self {
        Self {
            customer_name: customer_name.into(),
            phone_number: None,
            payment_mode,
            prescription_file: None,
            cart: Vec::new(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    pub fn with_prescription(mut self, reference: impl Into<String>) -> Self {
        self.prescription_file = Some(reference.into());
        self
    }

    pub fn with_line(mut self, line: OrderLineRequest) -> Self {
        self.cart.push(line);
        self
    }

    /// Input checks that need no stock information.
    pub fn validate(self) -> DomainResult<ValidatedOrder> {
        if self.cart.is_empty() {
            return Err(DomainError::validation("cart is empty"));
        }

        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }

        let lines = self
            .cart
            .into_iter()
            .map(OrderLineRequest::validate)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(ValidatedOrder {
            customer_name: customer_name.to_string(),
            phone_number: non_blank(self.phone_number),
            payment_mode: self.payment_mode,
            prescription_file: non_blank(self.prescription_file),
            lines,
        })
    }
}

impl OrderLineRequest {
    pub fn new(medicine_id: MedicineId, qty: i64) -> Self {
        Self {
            medicine_id,
            name: None,
            qty,
            price: None,
        }
    }

    fn validate(self) -> DomainResult<OrderLine> {
        let line = OrderLine {
            medicine_id: self.medicine_id,
            qty: u64::try_from(self.qty).unwrap_or(0),
            label: non_blank(self.name),
        };
        if line.qty == 0 {
            return Err(DomainError::validation(format!(
                "quantity for {} must be positive",
                line.describe()
            )));
        }
        Ok(line)
    }
}

impl ValidatedOrder {
    /// Total requested units per medicine, summing repeated lines.
    pub fn requested_quantities(&self) -> BTreeMap<MedicineId, u64> {
        let mut totals = BTreeMap::new();
        for line in &self.lines {
            let total = totals.entry(line.medicine_id).or_insert(0u64);
            *total = total.saturating_add(line.qty);
        }
        totals
    }
}

impl OrderLine {
    /// How to name this line when its medicine no longer exists.
    pub fn describe(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("medicine {}", self.medicine_id))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
