//! Item domain model.
//!
//! # Responsibility
//! - Define the persisted `Item` record and the transient write shapes.
//!
//! # Invariants
//! - Only the store assigns an `ItemId`, exactly once, at creation.

pub mod item;
