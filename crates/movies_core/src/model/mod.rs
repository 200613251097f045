//! Read-only domain model for the movie catalog.
//!
//! # Responsibility
//! - Define the records handed from the query layer to request handlers.
//!
//! # Invariants
//! - Every movie is identified by a store-assigned `MovieId` that is never
//!   reused.
//! - Records are snapshots of store state at query time; this crate never
//!   mutates them back into storage.

pub mod movie;
