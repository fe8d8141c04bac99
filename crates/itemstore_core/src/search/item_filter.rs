//! Typed item filters and their SQL rendering.
//!
//! # Responsibility
//! - Normalize `ItemSearchCond` into a list of `ItemFilter` clauses.
//! - Render clauses as a conjunctive `WHERE` fragment with bind values.
//! - Evaluate the same clauses against in-memory items.
//!
//! # Invariants
//! - A blank name filter (empty or whitespace only) yields no clause.
//! - Name matching is a case-sensitive literal substring test.
//! - A `None` price never satisfies a max-price clause.

use crate::model::item::Item;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Optional search criteria for listing items.
///
/// Both fields absent means "every item".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSearchCond {
    /// Substring that must appear in the item name.
    pub item_name: Option<String>,
    /// Inclusive upper bound on price.
    pub max_price: Option<i32>,
}

impl ItemSearchCond {
    pub fn new(item_name: Option<String>, max_price: Option<i32>) -> Self {
        Self {
            item_name,
            max_price,
        }
    }

    /// Condition filtering on name substring only.
    pub fn by_name(item_name: impl Into<String>) -> Self {
        Self::new(Some(item_name.into()), None)
    }

    /// Condition filtering on maximum price only.
    pub fn by_max_price(max_price: i32) -> Self {
        Self::new(None, Some(max_price))
    }

    /// Returns the filter clauses this condition contributes, in a fixed
    /// order: name first, then price.
    pub fn filters(&self) -> Vec<ItemFilter> {
        let mut filters = Vec::with_capacity(2);

        if let Some(name) = self.item_name.as_deref().filter(|name| has_text(name)) {
            filters.push(ItemFilter::NameContains(name.to_string()));
        }

        if let Some(max_price) = self.max_price {
            filters.push(ItemFilter::MaxPrice(max_price));
        }

        filters
    }
}

/// One predicate over item rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    /// Name contains the given text anywhere, case-sensitive.
    NameContains(String),
    /// Price is set and not greater than the bound.
    MaxPrice(i32),
}

impl ItemFilter {
    /// Short label used in log lines. Never includes the filter value.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameContains(_) => "name_contains",
            Self::MaxPrice(_) => "max_price",
        }
    }

    /// Evaluates this filter against an item held in memory.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::NameContains(needle) => item.name.contains(needle.as_str()),
            Self::MaxPrice(max_price) => item.price.is_some_and(|price| price <= *max_price),
        }
    }

    // `instr` instead of LIKE: SQLite LIKE folds ASCII case and treats `%`/`_`
    // in the bound value as wildcards.
    fn render(&self, placeholder: usize) -> String {
        match self {
            Self::NameContains(_) => format!("instr(item_name, ?{placeholder}) > 0"),
            Self::MaxPrice(_) => format!("price <= ?{placeholder}"),
        }
    }

    fn bind_value(&self) -> Value {
        match self {
            Self::NameContains(needle) => Value::Text(needle.clone()),
            Self::MaxPrice(max_price) => Value::Integer(i64::from(*max_price)),
        }
    }
}

/// Returns whether `item` satisfies every filter (vacuously true when empty).
pub fn matches_all(filters: &[ItemFilter], item: &Item) -> bool {
    filters.iter().all(|filter| filter.matches(item))
}

/// Parameterized `WHERE` fragment produced from a filter list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Either empty or ` WHERE <clause> AND <clause> ...` with numbered
    /// placeholders starting at `?1`.
    pub sql: String,
    /// Bind values in placeholder order.
    pub bind_values: Vec<Value>,
}

impl WhereClause {
    /// Folds filters into a single conjunctive clause.
    pub fn from_filters(filters: &[ItemFilter]) -> Self {
        if filters.is_empty() {
            return Self::default();
        }

        let predicates = filters
            .iter()
            .enumerate()
            .map(|(index, filter)| filter.render(index + 1))
            .collect::<Vec<_>>();

        Self {
            sql: format!(" WHERE {}", predicates.join(" AND ")),
            bind_values: filters.iter().map(ItemFilter::bind_value).collect(),
        }
    }
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}
