//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the item data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Every implementation applies search filters through `ItemFilter`, so
//!   backends agree on which items match.

pub mod item_repo;
pub mod memory_repo;
