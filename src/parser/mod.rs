//! # Parser Module
//!
//! Turns prose documentation sections into structured records:
//!
//! - **attributes**: entity attribute sections → [`models::AttributeRecord`]s.
//! - **parameters**: flat bracket-notation parameter lists →
//!   [`models::ParameterNode`] trees.
//! - **methods**: method pages → operations with their parameter trees.
//! - **models**: the Intermediate Representation the extractors produce.

pub mod attributes;
pub mod methods;
pub mod models;
pub mod parameters;

pub use attributes::extract_attributes;
pub use methods::extract_operations;
pub use models::{AttributeRecord, ParamLocation, ParameterNode, RawParameter};
pub use parameters::{build_parameter_nodes, parse_parameter_list};
