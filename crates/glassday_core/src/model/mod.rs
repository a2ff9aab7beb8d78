//! Day planning domain model.
//!
//! # Responsibility
//! - Define the item shape shared by every stage of the day flow.
//! - Define the persisted day record and its calendar-day key.
//!
//! # Invariants
//! - Item ids are unique within one day record.
//! - Glass priority is array order; rubber order carries no meaning.

pub mod day;
pub mod item;
