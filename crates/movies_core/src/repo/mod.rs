//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the read-only catalog query contract.
//! - Isolate SQLite query details from service and request layers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) separately from
//!   store failures.

pub mod movie_repo;
