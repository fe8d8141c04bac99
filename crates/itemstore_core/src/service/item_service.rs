//! Item use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for registering, reading, editing and
//!   searching items.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Repository errors are returned unchanged.

use crate::model::item::{Item, ItemId, ItemUpdate, NewItem};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use crate::search::item_filter::ItemSearchCond;
use log::info;

/// Use-case service wrapper for item operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new item and returns the stored record.
    pub fn register_item(&self, item: NewItem) -> RepoResult<Item> {
        let id = self.repo.save(&item)?;
        info!("event=item_register module=service status=ok item_id={id}");
        Ok(Item::from_new(id, item))
    }

    /// Gets one item by id; `Ok(None)` when absent.
    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.find_by_id(id)
    }

    /// Overwrites an item and returns the stored record.
    ///
    /// Returns `RepoError::NotFound` unchanged when `id` is unknown.
    pub fn update_item(&self, id: ItemId, update: &ItemUpdate) -> RepoResult<Item> {
        self.repo.update(id, update)?;
        info!("event=item_update module=service status=ok item_id={id}");
        Ok(Item {
            id,
            name: update.name.clone(),
            price: update.price,
            quantity: update.quantity,
        })
    }

    /// Lists items matching the condition.
    pub fn search_items(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        self.repo.find_all(cond)
    }
}
