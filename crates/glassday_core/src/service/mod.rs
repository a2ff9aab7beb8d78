//! Core use-case services.
//!
//! # Responsibility
//! - Hold the item store, capacity policy and recency derivation.
//! - Orchestrate them in the day state machine.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod capacity;
pub mod day_machine;
pub mod item_store;
pub mod layout;
pub mod recency;
pub mod session;
