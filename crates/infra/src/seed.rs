//! Demo catalogue loaded at start-up when seeding is enabled.

use rust_decimal::Decimal;

use pharmacy_core::{DomainResult, IdAllocator};
use pharmacy_inventory::NewMedicine;

use crate::store::PharmacyStore;

pub fn demo_medicines() -> Vec<NewMedicine> {
    vec![
        NewMedicine::new("Paracetamol", 100, Decimal::new(15, 1)),
        NewMedicine::new("Amoxicillin", 50, Decimal::new(25, 1)),
        NewMedicine::new("Ibuprofen", 75, Decimal::new(12, 1)),
    ]
}

/// Add the demo catalogue to `store`, returning how many records were added.
pub fn seed_demo<A: IdAllocator>(store: &mut PharmacyStore<A>) -> DomainResult<usize> {
    let medicines = demo_medicines();
    let count = medicines.len();
    for medicine in medicines {
        store.add_medicine(medicine)?;
    }
    tracing::info!(count, "seeded demo medicines");
    Ok(count)
}
