use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{DomainError, DomainResult};
use pharmacy_inventory::{LOW_STOCK_THRESHOLD, Medicine};
use pharmacy_sales::Sale;

/// Window of the "today" revenue figure, in days.
pub const DAILY_WINDOW_DAYS: i64 = 1;

/// Window of the "this week" revenue figure, in days.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_revenue: Decimal,
    pub total_stock: u64,
    pub sale_count: usize,
    pub daily_revenue: Decimal,
    pub weekly_revenue: Decimal,
    pub low_stock: Vec<Medicine>,
}

impl Dashboard {
    pub fn compute<'a, M, S>(medicines: M, sales: S, now: DateTime<Utc>) -> DomainResult<Self>
    where
        M: IntoIterator<Item = &'a Medicine> + Clone,
        S: IntoIterator<Item = &'a Sale> + Clone,
    {
        Ok(Self {
            total_revenue: total_revenue(sales.clone())?,
            total_stock: total_stock(medicines.clone())?,
            sale_count: sales.clone().into_iter().count(),
            daily_revenue: period_revenue(sales.clone(), DAILY_WINDOW_DAYS, now)?,
            weekly_revenue: period_revenue(sales, WEEKLY_WINDOW_DAYS, now)?,
            low_stock: low_stock(medicines, LOW_STOCK_THRESHOLD),
        })
    }
}

pub fn total_revenue<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> DomainResult<Decimal> {
    sum_revenue(sales, "total revenue")
}

pub fn total_stock<'a>(medicines: impl IntoIterator<Item = &'a Medicine>) -> DomainResult<u64> {
    medicines.into_iter().try_fold(0u64, |total, m| {
        total
            .checked_add(m.qty())
            .ok_or_else(|| DomainError::overflow("total stock"))
    })
}

fn sum_revenue<'a>(sales: impl IntoIterator<Item = &'a Sale>, what: &str) -> DomainResult<Decimal> {
    sales.into_iter().try_fold(Decimal::ZERO, |total, s| {
        total
            .checked_add(s.order_total())
            .ok_or_else(|| DomainError::overflow(what))
    })
}

/// Medicines at or below `threshold`, in input order.
pub fn low_stock<'a>(medicines: impl IntoIterator<Item = &'a Medicine>, threshold: u64) -> Vec<Medicine> {
    medicines
        .into_iter()
        .filter(|m| m.is_low_stock(threshold))
        .cloned()
        .collect()
}

/// Revenue of sales created within the trailing `days` before `now`
/// (inclusive of the boundary). A window too large to represent covers
/// every sale.
pub fn period_revenue<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
    days: i64,
    now: DateTime<Utc>,
) -> DomainResult<Decimal> {
    let cutoff = TimeDelta::try_days(days).and_then(|window| now.checked_sub_signed(window));
    sum_revenue(
        sales
            .into_iter()
            .filter(|s| cutoff.is_none_or(|c| s.created_at() >= c)),
        "period revenue",
    )
}
