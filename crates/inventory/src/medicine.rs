use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{DomainError, DomainResult, Entity, MedicineId};

/// Medicines at or below this quantity are flagged for restocking.
pub const LOW_STOCK_THRESHOLD: u64 = 20;

/// Largest quantity accepted when registering or editing a medicine.
pub const MAX_STOCK_QTY: u64 = 1_000_000_000;

/// Largest unit price accepted, in whole currency units.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;

/// A stocked medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    id: MedicineId,
    name: String,
    qty: u64,
    price: Decimal,
}

/// Input for registering a medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedicine {
    pub name: String,
    #[serde(default)]
    pub qty: u64,
    pub price: Decimal,
}

impl NewMedicine {
    pub fn new(name: impl Into<String>, qty: u64, price: Decimal) -> Self {
        Self {
            name: name.into(),
            qty,
            price,
        }
    }

    /// Trimmed copy, or the first validation failure.
    pub fn validate(self) -> DomainResult<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            qty: validate_qty(self.qty)?,
            price: validate_price(self.price)?,
        })
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicinePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qty: Option<u64>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl Medicine {
    /// Validate `new` and build the record under the given id.
    pub fn register(id: MedicineId, new: NewMedicine) -> DomainResult<Self> {
        let new = new.validate()?;
        Ok(Self {
            id,
            name: new.name,
            qty: new.qty,
            price: new.price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qty(&self) -> u64 {
        self.qty
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn is_in_stock(&self) -> bool {
        self.qty > 0
    }

    pub fn is_low_stock(&self, threshold: u64) -> bool {
        self.qty <= threshold
    }

    /// Case-insensitive substring match on the name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }

    /// Apply a partial update. Either every provided field is valid and the
    /// whole patch lands, or nothing changes.
    pub fn apply_patch(&mut self, patch: MedicinePatch) -> DomainResult<()> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let qty = patch.qty.map(validate_qty).transpose()?;
        let price = patch.price.map(validate_price).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(qty) = qty {
            self.qty = qty;
        }
        if let Some(price) = price {
            self.price = price;
        }
        Ok(())
    }

    /// Fails with `InsufficientStock` if `requested` exceeds what is on hand.
    pub fn ensure_available(&self, requested: u64) -> DomainResult<()> {
        if requested > self.qty {
            return Err(DomainError::insufficient_stock(
                self.name.clone(),
                requested,
                self.qty,
            ));
        }
        Ok(())
    }

    /// Take `qty` units off the shelf. Stock never goes below zero.
    pub fn withdraw(&mut self, qty: u64) -> DomainResult<()> {
        self.ensure_available(qty)?;
        self.qty -= qty;
        Ok(())
    }

    /// Put `qty` units back on the shelf. Fails without changing anything if
    /// the new quantity does not fit.
    pub fn restock(&mut self, qty: u64) -> DomainResult<()> {
        self.qty = self
            .qty
            .checked_add(qty)
            .ok_or_else(|| DomainError::overflow(format!("stock of {}", self.name)))?;
        Ok(())
    }
}

impl Entity for Medicine {
    type Id = MedicineId;

    fn id(&self) -> MedicineId {
        self.id
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("medicine name cannot be empty"));
    }
    Ok(name.to_string())
}

fn validate_qty(qty: u64) -> DomainResult<u64> {
    if qty > MAX_STOCK_QTY {
        return Err(DomainError::validation(format!(
            "quantity cannot exceed {MAX_STOCK_QTY}"
        )));
    }
    Ok(qty)
}

fn validate_price(price: Decimal) -> DomainResult<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::validation("price cannot be negative"));
    }
    if price > Decimal::from(MAX_UNIT_PRICE) {
        return Err(DomainError::validation(format!(
            "price cannot exceed {MAX_UNIT_PRICE}"
        )));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paracetamol() -> Medicine {
        Medicine::register(
            MedicineId::new(1),
            NewMedicine::new("Paracetamol", 100, Decimal::new(15, 1)),
        )
        .unwrap()
    }

    #[test]
    fn register_trims_the_name() {
        let med = Medicine::register(
            MedicineId::new(1),
            NewMedicine::new("  Ibuprofen  ", 75, Decimal::new(12, 1)),
        )
        .unwrap();
        assert_eq!(med.name(), "Ibuprofen");
        assert_eq!(med.qty(), 75);
        assert_eq!(med.price(), Decimal::new(12, 1));
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Medicine::register(MedicineId::new(1), NewMedicine::new("   ", 1, Decimal::ONE))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn register_rejects_negative_price() {
        let err = Medicine::register(MedicineId::new(1), NewMedicine::new("Aspirin", 1, Decimal::new(-5, 1)))
            .unwrap_err();
        assert_eq!(err, DomainError::validation("price cannot be negative"));
    }

    #[test]
    fn free_medicine_is_allowed() {
        let med = Medicine::register(MedicineId::new(1), NewMedicine::new("Sample", 5, Decimal::ZERO))
            .unwrap();
        assert!(med.price().is_zero());
    }

    #[test]
    fn withdraw_decrements_stock() {
        let mut med = paracetamol();
        med.withdraw(10).unwrap();
        assert_eq!(med.qty(), 90);
    }

    #[test]
    fn withdraw_more_than_available_leaves_stock_untouched() {
        let mut med = paracetamol();
        let err = med.withdraw(101).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("Paracetamol", 101, 100));
        assert_eq!(med.qty(), 100);
    }

    #[test]
    fn withdraw_entire_stock_reaches_zero() {
        let mut med = paracetamol();
        med.withdraw(100).unwrap();
        assert_eq!(med.qty(), 0);
        assert!(!med.is_in_stock());
    }

    #[test]
    fn patch_updates_only_provided_fields() {
        let mut med = paracetamol();
        med.apply_patch(MedicinePatch {
            qty: Some(40),
            ..MedicinePatch::default()
        })
        .unwrap();
        assert_eq!(med.qty(), 40);
        assert_eq!(med.name(), "Paracetamol");
        assert_eq!(med.price(), Decimal::new(15, 1));
    }

    #[test]
    fn invalid_patch_is_not_partially_applied() {
        let mut med = paracetamol();
        let err = med
            .apply_patch(MedicinePatch {
                name: Some("Paracetamol 650".into()),
                qty: Some(3),
                price: Some(Decimal::NEGATIVE_ONE),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(med, paracetamol());
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        let mut med = paracetamol();
        med.apply_patch(MedicinePatch {
            qty: Some(LOW_STOCK_THRESHOLD),
            ..MedicinePatch::default()
        })
        .unwrap();
        assert!(med.is_low_stock(LOW_STOCK_THRESHOLD));

        med.restock(1).unwrap();
        assert!(!med.is_low_stock(LOW_STOCK_THRESHOLD));
    }

    #[test]
    fn limits_are_inclusive() {
        let med = Medicine::register(
            MedicineId::new(1),
            NewMedicine::new("Bulk Saline", MAX_STOCK_QTY, Decimal::from(MAX_UNIT_PRICE)),
        )
        .unwrap();
        assert_eq!(med.qty(), MAX_STOCK_QTY);
        assert_eq!(med.price(), Decimal::from(MAX_UNIT_PRICE));
    }

    #[test]
    fn quantity_and_price_above_limits_are_rejected() {
        let too_many = NewMedicine::new("Saline", MAX_STOCK_QTY + 1, Decimal::ONE);
        assert!(matches!(too_many.validate(), Err(DomainError::Validation(_))));

        let too_dear = NewMedicine::new("Saline", 1, Decimal::MAX);
        assert!(matches!(too_dear.validate(), Err(DomainError::Validation(_))));

        let mut med = paracetamol();
        let err = med
            .apply_patch(MedicinePatch {
                qty: Some(u64::MAX),
                ..MedicinePatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(med, paracetamol());
    }

    #[test]
    fn restock_past_u64_fails_and_keeps_quantity() {
        let mut med = paracetamol();
        let err = med.restock(u64::MAX).unwrap_err();
        assert!(matches!(err, DomainError::Overflow(_)));
        assert_eq!(med.qty(), 100);
    }

    #[test]
    fn name_match_ignores_case() {
        let med = paracetamol();
        assert!(med.name_matches("PARA"));
        assert!(med.name_matches(""));
        assert!(!med.name_matches("ibu"));
    }

    #[test]
    fn serializes_with_decimal_price() {
        let json = serde_json::to_value(paracetamol()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Paracetamol");
        assert_eq!(json["qty"], 100);
        assert_eq!(json["price"], 1.5);
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: MedicinePatch = serde_json::from_str(r#"{"price": 2.25}"#).unwrap();
        assert_eq!(patch.price, Some(Decimal::new(225, 2)));
        assert_eq!(patch.name, None);
        assert_eq!(patch.qty, None);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any interleaving of withdrawals and restocks keeps the
            /// quantity equal to the net accepted movement, never below zero.
            #[test]
            fn stock_tracks_accepted_movements(
                start in 0u64..500,
                moves in prop::collection::vec((any::<bool>(), 0u64..200), 0..40)
            ) {
                let mut med = Medicine::register(
                    MedicineId::new(1),
                    NewMedicine::new("Cetirizine", start, Decimal::from(3)),
                ).unwrap();
                let mut expected = start;

                for (is_withdraw, qty) in moves {
                    if is_withdraw {
                        if med.withdraw(qty).is_ok() {
                            expected -= qty;
                        } else {
                            prop_assert!(qty > expected);
                        }
                    } else {
                        med.restock(qty).unwrap();
                        expected += qty;
                    }
                    prop_assert_eq!(med.qty(), expected);
                }
            }
        }
    }
}
