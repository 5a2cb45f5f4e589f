//! Utility functions

pub mod common;
pub mod id_gen;

pub use common::{now, format_datetime, parse_datetime, format_amount, parse_amount};
pub use id_gen::{generate_entity_id, generate_database_id};
