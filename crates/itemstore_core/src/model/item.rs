//! Item records and write models.
//!
//! # Responsibility
//! - Define the canonical `Item` record returned by stores.
//! - Define `NewItem` (create input) and `ItemUpdate` (overwrite input).
//!
//! # Invariants
//! - `Item::id` is assigned by the store and never reassigned.
//! - `NewItem` and `ItemUpdate` carry no identifier, so callers cannot
//!   choose or change one.
//! - Names longer than `ITEM_NAME_MAX_CHARS` characters never reach a store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated identifier of an item.
pub type ItemId = i64;

/// Maximum item name length in characters.
pub const ITEM_NAME_MAX_CHARS: usize = 10;

/// Write-side rule violation for item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    NameTooLong { chars: usize, max_chars: usize },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameTooLong { chars, max_chars } => write!(
                f,
                "item_name has {chars} characters; at most {max_chars} allowed"
            ),
        }
    }
}

impl Error for ItemValidationError {}

/// Checks `name` against the same character count the read path uses.
///
/// Counts Unicode scalar values, including NUL, so anything accepted here
/// is also accepted when decoded back from storage.
pub fn validate_item_name(name: &str) -> Result<(), ItemValidationError> {
    let chars = name.chars().count();
    if chars > ITEM_NAME_MAX_CHARS {
        return Err(ItemValidationError::NameTooLong {
            chars,
            max_chars: ITEM_NAME_MAX_CHARS,
        });
    }
    Ok(())
}

/// Persisted item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "item_name")]
    pub name: String,
    /// Unit price. `None` never matches a max-price filter.
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl Item {
    /// Builds the record a store holds after persisting `item` under `id`.
    pub fn from_new(id: ItemId, item: NewItem) -> Self {
        Self {
            id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        }
    }

    /// Overwrites every mutable field with the values in `update`.
    ///
    /// The identifier is left untouched.
    pub fn apply(&mut self, update: &ItemUpdate) {
        self.name.clone_from(&update.name);
        self.price = update.price;
        self.quantity = update.quantity;
    }
}

/// Item that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "item_name")]
    pub name: String,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: Option<i32>, quantity: Option<i32>) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_item_name(&self.name)
    }
}

/// Replacement values for an existing item.
///
/// All three fields are always written; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(rename = "item_name")]
    pub name: String,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl ItemUpdate {
    pub fn new(name: impl Into<String>, price: Option<i32>, quantity: Option<i32>) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_item_name(&self.name)
    }
}
