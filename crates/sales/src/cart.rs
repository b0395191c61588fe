//! Client-side basket.
//!
//! The basket never touches stock. It only enforces the checks a cashier sees
//! while adding items and then shapes an [`OrderRequest`]; the store re-validates
//! and re-prices everything at commit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{DomainError, DomainResult, Entity, MedicineId};
use pharmacy_inventory::Medicine;

use crate::order::{OrderLineRequest, OrderRequest};
use crate::sale::PaymentMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub medicine_id: MedicineId,
    pub name: String,
    pub qty: u64,
    pub price: Decimal,
}

impl CartLine {
    pub fn total(&self) -> DomainResult<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.qty))
            .ok_or_else(|| DomainError::validation(format!("line total for {} is too large", self.name)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `qty` units of `medicine`, merging with an existing line.
    ///
    /// The combined basket quantity may not exceed the stock shown for the
    /// medicine when it was picked.
    pub fn add(&mut self, medicine: &Medicine, qty: u64) -> DomainResult<()> {
        if qty == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let position = self
            .lines
            .iter()
            .position(|l| l.medicine_id == medicine.id());
        let already = position.map_or(0, |i| self.lines[i].qty);
        let wanted = already.saturating_add(qty);
        medicine.ensure_available(wanted)?;

        match position {
            Some(i) => self.lines[i].qty = wanted,
            None => self.lines.push(CartLine {
                medicine_id: medicine.id(),
                name: medicine.name().to_string(),
                qty,
                price: medicine.price(),
            }),
        }
        Ok(())
    }

    pub fn remove(&mut self, medicine_id: MedicineId) -> Option<CartLine> {
        let i = self.lines.iter().position(|l| l.medicine_id == medicine_id)?;
        Some(self.lines.remove(i))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Displayed basket total.
    pub fn total(&self) -> DomainResult<Decimal> {
        self.lines.iter().try_fold(Decimal::ZERO, |total, line| {
            total
                .checked_add(line.total()?)
                .ok_or_else(|| DomainError::validation("basket total is too large"))
        })
    }

    /// Build the order request for this basket. The basket itself is kept so a
    /// rejected order can be corrected and resubmitted.
    pub fn to_order(&self, customer_name: &str, payment_mode: PaymentMode) -> OrderRequest {
        OrderRequest {
            customer_name: customer_name.trim().to_string(),
            phone_number: None,
            payment_mode,
            prescription_file: None,
            cart: self
                .lines
                .iter()
                .map(|l| OrderLineRequest {
                    medicine_id: l.medicine_id,
                    name: Some(l.name.clone()),
                    qty: i64::try_from(l.qty).unwrap_or(i64::MAX),
                    price: Some(l.price),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmacy_inventory::NewMedicine;

    fn medicine(id: u64, name: &str, qty: u64, price: Decimal) -> Medicine {
        Medicine::register(MedicineId::new(id), NewMedicine::new(name, qty, price)).unwrap()
    }

    #[test]
    fn adding_same_medicine_merges_lines() {
        let amox = medicine(2, "Amoxicillin 250mg", 15, Decimal::from(12));
        let mut cart = Cart::new();
        cart.add(&amox, 2).unwrap();
        cart.add(&amox, 3).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].qty, 5);
        assert_eq!(cart.total(), Ok(Decimal::from(60)));
    }

    #[test]
    fn combined_quantity_cannot_exceed_stock() {
        let amox = medicine(2, "Amoxicillin 250mg", 15, Decimal::from(12));
        let mut cart = Cart::new();
        cart.add(&amox, 10).unwrap();

        let err = cart.add(&amox, 6).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("Amoxicillin 250mg", 16, 15));
        assert_eq!(cart.lines()[0].qty, 10);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let para = medicine(1, "Paracetamol", 10, Decimal::new(15, 1));
        let mut cart = Cart::new();
        assert!(matches!(cart.add(&para, 0), Err(DomainError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let para = medicine(1, "Paracetamol", 10, Decimal::new(15, 1));
        let ibu = medicine(3, "Ibuprofen", 10, Decimal::new(12, 1));
        let mut cart = Cart::new();
        cart.add(&para, 1).unwrap();
        cart.add(&ibu, 1).unwrap();

        let removed = cart.remove(MedicineId::new(1)).unwrap();
        assert_eq!(removed.name, "Paracetamol");
        assert_eq!(cart.remove(MedicineId::new(1)), None);
        assert_eq!(cart.lines().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Ok(Decimal::ZERO));
    }

    #[test]
    fn to_order_keeps_line_order_and_basket() {
        let para = medicine(1, "Paracetamol", 10, Decimal::new(15, 1));
        let ibu = medicine(3, "Ibuprofen", 10, Decimal::new(12, 1));
        let mut cart = Cart::new();
        cart.add(&ibu, 2).unwrap();
        cart.add(&para, 4).unwrap();

        let order = cart
            .to_order("  Aisha ", PaymentMode::Cash)
            .with_phone("9876543210");
        assert_eq!(order.customer_name, "Aisha");
        assert_eq!(order.cart.len(), 2);
        assert_eq!(order.cart[0].medicine_id, MedicineId::new(3));
        assert_eq!(order.cart[1].qty, 4);
        assert!(!cart.is_empty());
    }
}
