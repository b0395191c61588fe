//! Customer view: sales grouped by who bought them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{DomainError, DomainResult, Entity};
use pharmacy_sales::Sale;

/// Phone placeholder for customers who did not leave a number.
pub const UNKNOWN_PHONE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub name: String,
    pub phone_number: String,
    pub visits: u32,
    pub last_purchase_date: DateTime<Utc>,
    pub last_purchase_total: Decimal,
    pub total_spent: Decimal,
    /// Newest first.
    pub sales: Vec<Sale>,
}

impl CustomerSummary {
    fn first(name: String, phone_number: String, sale: &Sale) -> Self {
        Self {
            name,
            phone_number,
            visits: 1,
            last_purchase_date: sale.created_at(),
            last_purchase_total: sale.order_total(),
            total_spent: sale.order_total(),
            sales: vec![sale.clone()],
        }
    }

    fn record(&mut self, sale: &Sale) -> DomainResult<()> {
        let visits = self
            .visits
            .checked_add(1)
            .ok_or_else(|| DomainError::overflow(format!("visit count of {}", self.name)))?;
        let total_spent = self
            .total_spent
            .checked_add(sale.order_total())
            .ok_or_else(|| DomainError::overflow(format!("total spent by {}", self.name)))?;

        self.visits = visits;
        self.total_spent = total_spent;
        if sale.created_at() > self.last_purchase_date {
            self.last_purchase_date = sale.created_at();
            self.last_purchase_total = sale.order_total();
        }
        self.sales.push(sale.clone());
        Ok(())
    }
}

/// Group sales by (trimmed customer name, phone or [`UNKNOWN_PHONE`]).
///
/// Sales without a customer name are left out. Customers are ordered by most
/// recent purchase first.
pub fn aggregate_customers<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
) -> DomainResult<Vec<CustomerSummary>> {
    let mut by_key: HashMap<(String, String), CustomerSummary> = HashMap::new();

    for sale in sales {
        let name = sale.customer_name().trim();
        if name.is_empty() {
            continue;
        }
        let phone = sale.phone_number().unwrap_or(UNKNOWN_PHONE);
        let key = (name.to_string(), phone.to_string());

        match by_key.get_mut(&key) {
            Some(summary) => summary.record(sale)?,
            None => {
                let summary = CustomerSummary::first(key.0.clone(), key.1.clone(), sale);
                by_key.insert(key, summary);
            }
        }
    }

    let mut customers: Vec<CustomerSummary> = by_key.into_values().collect();
    for customer in &mut customers {
        customer.sales.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id().cmp(&a.id()))
        });
    }
    customers.sort_by(|a, b| {
        b.last_purchase_date
            .cmp(&a.last_purchase_date)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.phone_number.cmp(&b.phone_number))
    });
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use pharmacy_core::{MedicineId, SaleId};
    use pharmacy_inventory::NewMedicine;
    use pharmacy_sales::{OrderLineRequest, OrderRequest, PaymentMode, SaleItem};

    use crate::store::PharmacyStore;

    fn day(d: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() + TimeDelta::days(d)
    }

    fn store() -> PharmacyStore {
        let mut store = PharmacyStore::new();
        store
            .add_medicine(NewMedicine::new("Paracetamol", 500, Decimal::new(15, 1)))
            .unwrap();
        store
    }

    fn sell(store: &mut PharmacyStore, name: &str, phone: Option<&str>, qty: i64, when: DateTime<Utc>) -> Sale {
        let mut req = OrderRequest::new(name, PaymentMode::Upi)
            .with_line(OrderLineRequest::new(MedicineId::new(1), qty));
        if let Some(phone) = phone {
            req = req.with_phone(phone);
        }
        store.process_order(req, when).unwrap()
    }

    #[test]
    fn same_name_and_phone_is_one_customer() {
        let mut store = store();
        sell(&mut store, "Aisha Sharma", Some("9876543210"), 2, day(1));
        let later = sell(&mut store, "Aisha Sharma", Some("9876543210"), 4, day(3));

        let customers = aggregate_customers(store.sales()).unwrap();
        assert_eq!(customers.len(), 1);
        let aisha = &customers[0];
        assert_eq!(aisha.visits, 2);
        assert_eq!(aisha.last_purchase_date, later.created_at());
        assert_eq!(aisha.last_purchase_total, Decimal::from(6));
        assert_eq!(aisha.total_spent, Decimal::from(9));
        assert_eq!(aisha.sales[0].id(), later.id());
    }

    #[test]
    fn older_sale_recorded_later_does_not_move_last_purchase() {
        let mut store = store();
        let newer = sell(&mut store, "Priya", None, 1, day(5));
        sell(&mut store, "Priya", None, 2, day(2));

        let customers = aggregate_customers(store.sales()).unwrap();
        assert_eq!(customers[0].last_purchase_date, newer.created_at());
        assert_eq!(customers[0].last_purchase_total, Decimal::new(15, 1));
        assert_eq!(customers[0].phone_number, UNKNOWN_PHONE);
    }

    #[test]
    fn different_phone_means_different_customer() {
        let mut store = store();
        sell(&mut store, "Priya Singh", Some("9988776655"), 1, day(1));
        sell(&mut store, "Priya Singh", None, 1, day(2));

        let customers = aggregate_customers(store.sales()).unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].phone_number, UNKNOWN_PHONE);
        assert_eq!(customers[1].phone_number, "9988776655");
    }

    #[test]
    fn customers_are_ordered_by_latest_purchase() {
        let mut store = store();
        sell(&mut store, "Aisha", None, 1, day(1));
        sell(&mut store, "Bilal", None, 1, day(4));
        sell(&mut store, "Chen", None, 1, day(2));

        let names: Vec<String> = aggregate_customers(store.sales())
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Bilal", "Chen", "Aisha"]);
    }

    #[test]
    fn spend_past_decimal_range_is_an_error() {
        let order = OrderRequest::new("Big Spender", PaymentMode::Upi)
            .with_line(OrderLineRequest::new(MedicineId::new(1), 1))
            .validate()
            .unwrap();
        let item = SaleItem::priced(MedicineId::new(1), "Gold", 1, Decimal::MAX).unwrap();
        let sales: Vec<Sale> = (1..=2)
            .map(|id| Sale::record(SaleId::new(id), order.clone(), vec![item.clone()], day(id as i64)).unwrap())
            .collect();

        assert_eq!(aggregate_customers(&sales[..1]).unwrap()[0].total_spent, Decimal::MAX);
        assert_eq!(
            aggregate_customers(&sales),
            Err(DomainError::overflow("total spent by Big Spender"))
        );
    }
}
