//! Item search condition and predicate composition.
//!
//! # Responsibility
//! - Turn an optional search condition into typed filter clauses.
//! - Fold clauses into one parameterized SQL `WHERE` fragment.
//!
//! # Invariants
//! - Filter values are only ever bound as parameters, never spliced into SQL.
//! - SQL and in-process evaluation share one predicate definition.

pub mod item_filter;
