//! Flutter bridge for the Glassday day flow.

pub mod api;
