use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{DomainError, DomainResult, Entity, MedicineId, SaleId};

use crate::order::ValidatedOrder;

/// How the customer paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    #[serde(rename = "UPI", alias = "upi", alias = "Upi")]
    Upi,
    #[serde(alias = "cash", alias = "CASH")]
    Cash,
}

impl core::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PaymentMode::Upi => f.write_str("UPI"),
            PaymentMode::Cash => f.write_str("Cash"),
        }
    }
}

/// One sold line, frozen at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub medicine_id: MedicineId,
    pub name: String,
    pub qty: u64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl SaleItem {
    /// Line priced at `unit_price`; `line_total` is always `qty * unit_price`.
    pub fn priced(
        medicine_id: MedicineId,
        name: impl Into<String>,
        qty: u64,
        unit_price: Decimal,
    ) -> DomainResult<Self> {
        let name = name.into();
        let line_total = unit_price
            .checked_mul(Decimal::from(qty))
            .ok_or_else(|| DomainError::validation(format!("line total for {name} is too large")))?;
        Ok(Self {
            medicine_id,
            name,
            qty,
            unit_price,
            line_total,
        })
    }
}

/// Sum of the line totals.
pub fn order_total(items: &[SaleItem]) -> DomainResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total
            .checked_add(item.line_total)
            .ok_or_else(|| DomainError::validation("order total is too large"))
    })
}

/// A completed sale. Immutable once recorded; only deletion is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    id: SaleId,
    customer_name: String,
    #[serde(default)]
    phone_number: Option<String>,
    payment_mode: PaymentMode,
    #[serde(default)]
    prescription_file: Option<String>,
    items: Vec<SaleItem>,
    order_total: Decimal,
    created_at: DateTime<Utc>,
}

impl Sale {
    /// Freeze a validated order and its priced lines into a sale record.
    pub fn record(
        id: SaleId,
        order: ValidatedOrder,
        items: Vec<SaleItem>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let order_total = order_total(&items)?;
        Ok(Self {
            id,
            customer_name: order.customer_name,
            phone_number: order.phone_number,
            payment_mode: order.payment_mode,
            prescription_file: order.prescription_file,
            items,
            order_total,
            created_at,
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    pub fn prescription_file(&self) -> Option<&str> {
        self.prescription_file.as_deref()
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn order_total(&self) -> Decimal {
        self.order_total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }
}
