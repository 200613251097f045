//! Title search inputs.
//!
//! # Responsibility
//! - Describe one title search (term, order, optional genre filter).
//! - Resolve caller order keys through a fixed allow-list.
//! - Turn free text into a literal `LIKE` pattern.

pub mod order;
pub mod query;
