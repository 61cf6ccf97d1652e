use core_types::{CoreError, Ebook, SortOption};

use crate::engine;
use crate::filter::FilterState;

/// The in-memory marketplace catalog for one page visit.
///
/// Nothing here persists across sessions; the items are loaded once from the
/// backend response and live only as long as the visit.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Ebook>,
}

impl Catalog {
    /// Builds a catalog, checking each item's load-time invariants.
    pub fn new(items: Vec<Ebook>) -> Result<Self, CoreError> {
        for item in &items {
            item.validate()?;
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Ebook] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The visible, ordered subset for the current query state.
    pub fn visible(&self, filters: &FilterState, search: &str, sort: SortOption) -> Vec<&Ebook> {
        engine::visible_items(&self.items, filters, search, sort)
    }

    /// Marks the item with `id` as purchased. An unknown id is a silent no-op,
    /// not an error. This is the only code path that writes the `purchased`
    /// flag, and the flag never reverts.
    pub fn purchase(&mut self, id: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            if !item.purchased {
                tracing::info!(id = %item.id, title = %item.title, "ebook purchased");
            }
            item.purchased = true;
        }
    }

    /// The items the visitor already owns.
    pub fn purchased_items(&self) -> Vec<&Ebook> {
        self.items.iter().filter(|item| item.purchased).collect()
    }
}
