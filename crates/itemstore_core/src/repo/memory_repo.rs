//! In-process item repository.
//!
//! # Responsibility
//! - Provide the `ItemRepository` contract without SQLite.
//!
//! # Invariants
//! - Identifiers start at 1 and are never reused.
//! - Search evaluates the same `ItemFilter` clauses the SQL backend renders.

use crate::model::item::{Item, ItemId, ItemUpdate, NewItem};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use crate::search::item_filter::{matches_all, ItemSearchCond};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: ItemId,
    items: BTreeMap<ItemId, Item>,
}

/// Item repository backed by an ordered in-memory map. Not `Sync`.
#[derive(Debug, Default)]
pub struct MemoryItemRepository {
    state: RefCell<MemoryState>,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemRepository for MemoryItemRepository {
    fn save(&self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;

        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        let id = state.last_id;
        state.items.insert(id, Item::from_new(id, item.clone()));
        Ok(id)
    }

    fn update(&self, id: ItemId, update: &ItemUpdate) -> RepoResult<()> {
        update.validate()?;

        let mut state = self.state.borrow_mut();
        let item = state.items.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        item.apply(update);
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.state.borrow().items.get(&id).cloned())
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let filters = cond.filters();
        Ok(self
            .state
            .borrow()
            .items
            .values()
            .filter(|item| matches_all(&filters, item))
            .cloned()
            .collect())
    }
}
