//! Repository layer over the key-value gateway.
//!
//! # Responsibility
//! - Map day records, recents and the intro flag onto fixed storage keys.
//! - Degrade malformed or unreadable state to absent values.
//!
//! # Invariants
//! - Repository calls never fail across the boundary; failures are logged.

pub mod day_repo;
