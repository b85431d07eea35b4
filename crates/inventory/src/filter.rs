use crate::category::Category;
use crate::ids::{AisleId, ShelfId};
use crate::record::StockRecord;

/// Exact-match predicates for listing the stock table.
///
/// Unset predicates match everything. `most_recent` switches the listing to
/// the latest N entries by `entry_timestamp`, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockFilter {
    pub category: Option<Category>,
    pub aisle: Option<AisleId>,
    pub shelf: Option<ShelfId>,
    pub most_recent: Option<usize>,
}

impl StockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn aisle(mut self, aisle: AisleId) -> Self {
        self.aisle = Some(aisle);
        self
    }

    pub fn shelf(mut self, shelf: ShelfId) -> Self {
        self.shelf = Some(shelf);
        self
    }

    pub fn most_recent(mut self, n: usize) -> Self {
        self.most_recent = Some(n);
        self
    }

    pub fn matches(&self, record: &StockRecord) -> bool {
        self.category.is_none_or(|c| record.category == c)
            && self.aisle.as_ref().is_none_or(|a| &record.aisle == a)
            && self.shelf.as_ref().is_none_or(|s| &record.shelf == s)
    }
}
