//! Authoritative in-memory store for medicines and sales.
//!
//! The store is a plain single-owner object: every mutation takes `&mut self`
//! and runs to completion, so order validation and commit can never interleave
//! with another write. Callers that share it across tasks wrap it in one lock.
//!
//! Orders and reversals first build every record they will write from clones,
//! with all arithmetic checked, and only then swap the results in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use pharmacy_core::{DomainError, DomainResult, Entity, IdAllocator, MedicineId, SaleId, SequentialIds};
use pharmacy_inventory::{Medicine, MedicinePatch, NewMedicine};
use pharmacy_sales::{OrderRequest, Sale, SaleItem, ValidatedOrder, order_total};

#[derive(Debug)]
pub struct PharmacyStore<A = SequentialIds> {
    medicines: BTreeMap<MedicineId, Medicine>,
    sales: BTreeMap<SaleId, Sale>,
    medicine_ids: A,
    sale_ids: A,
}

impl PharmacyStore<SequentialIds> {
    /// Empty store with counters starting at 1.
    pub fn new() -> Self {
        Self::with_allocators(SequentialIds::new(), SequentialIds::new())
    }
}

impl Default for PharmacyStore<SequentialIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: IdAllocator> PharmacyStore<A> {
    pub fn with_allocators(medicine_ids: A, sale_ids: A) -> Self {
        Self {
            medicines: BTreeMap::new(),
            sales: BTreeMap::new(),
            medicine_ids,
            sale_ids,
        }
    }

    // -------------------------
    // Medicines
    // -------------------------

    pub fn medicine(&self, id: MedicineId) -> Option<&Medicine> {
        self.medicines.get(&id)
    }

    /// All medicines in id order.
    pub fn medicines(&self) -> impl Iterator<Item = &Medicine> + Clone {
        self.medicines.values()
    }

    /// Medicines whose name contains `query` (case-insensitive), sorted by name.
    pub fn search_medicines(&self, query: &str, in_stock_only: bool) -> Vec<&Medicine> {
        let mut found: Vec<&Medicine> = self
            .medicines
            .values()
            .filter(|m| m.name_matches(query))
            .filter(|m| !in_stock_only || m.is_in_stock())
            .collect();
        found.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then(a.id().cmp(&b.id()))
        });
        found
    }

    pub fn add_medicine(&mut self, new: NewMedicine) -> DomainResult<Medicine> {
        // Validate before allocating so rejected input does not burn an id.
        let new = new.validate()?;
        let id = MedicineId::new(self.medicine_ids.next_id());
        let medicine = Medicine::register(id, new)?;

        tracing::info!(medicine_id = %id, name = medicine.name(), qty = medicine.qty(), "medicine added");
        self.medicines.insert(id, medicine.clone());
        Ok(medicine)
    }

    pub fn update_medicine(&mut self, id: MedicineId, patch: MedicinePatch) -> DomainResult<Medicine> {
        let medicine = self
            .medicines
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("medicine {id}")))?;
        medicine.apply_patch(patch)?;

        tracing::info!(medicine_id = %id, qty = medicine.qty(), "medicine updated");
        Ok(medicine.clone())
    }

    /// Remove a medicine. Historical sales keep their snapshot of it.
    pub fn delete_medicine(&mut self, id: MedicineId) -> Option<Medicine> {
        let removed = self.medicines.remove(&id);
        if removed.is_some() {
            tracing::info!(medicine_id = %id, "medicine deleted");
        }
        removed
    }

    // -------------------------
    // Sales
    // -------------------------

    pub fn sale(&self, id: SaleId) -> Option<&Sale> {
        self.sales.get(&id)
    }

    /// All sales in commit order.
    pub fn sales(&self) -> impl Iterator<Item = &Sale> + Clone {
        self.sales.values()
    }

    /// Validate `request` against current stock and commit it as one sale.
    ///
    /// Nothing is mutated unless every line can be fulfilled and priced. Lines
    /// are priced from the stored medicine at commit time; client prices are
    /// ignored.
    pub fn process_order(&mut self, request: OrderRequest, now: DateTime<Utc>) -> DomainResult<Sale> {
        let order = request.validate()?;
        let plan = self
            .plan_order(&order)
            .inspect_err(|e| tracing::warn!(customer = %order.customer_name, error = %e, "order rejected"))?;

        let id = SaleId::new(self.sale_ids.next_id());
        let sale = Sale::record(id, order, plan.items, now)?;
        for medicine in plan.withdrawn {
            self.medicines.insert(medicine.id(), medicine);
        }
        tracing::info!(
            sale_id = %id,
            customer = sale.customer_name(),
            lines = sale.items().len(),
            total = %sale.order_total(),
            "order processed"
        );
        self.sales.insert(id, sale.clone());
        Ok(sale)
    }

    /// Delete a sale and put its items back on the shelf.
    ///
    /// Items whose medicine was deleted after the sale are not restored. If any
    /// restock would overflow, the sale stays and no stock changes.
    pub fn reverse_sale(&mut self, id: SaleId) -> DomainResult<Sale> {
        let missing = || DomainError::not_found(format!("sale {id}"));
        let restocked = {
            let sale = self.sales.get(&id).ok_or_else(missing)?;
            self.plan_restock(id, sale)
                .inspect_err(|e| tracing::warn!(sale_id = %id, error = %e, "reversal rejected"))?
        };

        let sale = self.sales.remove(&id).ok_or_else(missing)?;
        for medicine in restocked {
            self.medicines.insert(medicine.id(), medicine);
        }

        tracing::info!(sale_id = %id, "sale reversed");
        Ok(sale)
    }

    /// Stock checks, pricing and the post-sale medicine records, all computed
    /// without touching the store.
    fn plan_order(&self, order: &ValidatedOrder) -> DomainResult<OrderPlan> {
        let requested = order.requested_quantities();

        for line in &order.lines {
            let total = requested.get(&line.medicine_id).copied().unwrap_or(line.qty);
            match self.medicines.get(&line.medicine_id) {
                Some(medicine) => medicine.ensure_available(total)?,
                None => return Err(DomainError::insufficient_stock(line.describe(), total, 0)),
            }
        }

        let mut items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let medicine = self
                .medicines
                .get(&line.medicine_id)
                .ok_or_else(|| DomainError::not_found(format!("medicine {}", line.medicine_id)))?;
            items.push(SaleItem::priced(
                medicine.id(),
                medicine.name(),
                line.qty,
                medicine.price(),
            )?);
        }
        order_total(&items)?;

        let mut withdrawn = Vec::with_capacity(requested.len());
        for (medicine_id, qty) in requested {
            if let Some(medicine) = self.medicines.get(&medicine_id) {
                let mut medicine = medicine.clone();
                medicine.withdraw(qty)?;
                withdrawn.push(medicine);
            }
        }

        Ok(OrderPlan { items, withdrawn })
    }

    fn plan_restock(&self, id: SaleId, sale: &Sale) -> DomainResult<Vec<Medicine>> {
        let mut restocked: BTreeMap<MedicineId, Medicine> = BTreeMap::new();
        for item in sale.items() {
            let Some(current) = self.medicines.get(&item.medicine_id) else {
                tracing::debug!(
                    sale_id = %id,
                    medicine_id = %item.medicine_id,
                    "medicine no longer stocked; restore skipped"
                );
                continue;
            };
            restocked
                .entry(item.medicine_id)
                .or_insert_with(|| current.clone())
                .restock(item.qty)?;
        }
        Ok(restocked.into_values().collect())
    }
}

/// Everything an accepted order writes.
struct OrderPlan {
    items: Vec<SaleItem>,
    /// Medicines with the order's quantities already taken off.
    withdrawn: Vec<Medicine>,
}
