//! Item persistence core.
//! Create, read, update and conditional search over a single `items` table.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{
    validate_item_name, Item, ItemId, ItemUpdate, ItemValidationError, NewItem,
    ITEM_NAME_MAX_CHARS,
};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use repo::memory_repo::MemoryItemRepository;
pub use search::item_filter::{ItemFilter, ItemSearchCond, WhereClause};
pub use service::item_service::ItemService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
