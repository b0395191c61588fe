use pharmacy_core::Entity;
use pharmacy_sales::Sale;

/// Sales history for display, newest first.
pub fn newest_first<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<Sale> {
    let mut sales: Vec<Sale> = sales.into_iter().cloned().collect();
    sales.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then(b.id().cmp(&a.id()))
    });
    sales
}
