//! CLI command implementations

pub mod eval;
pub mod generate;
pub mod json_output;
pub mod table;
pub mod validate;
