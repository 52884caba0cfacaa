//! Shared utilities: IP helpers and graph validation.

pub mod ip_utils;
pub mod validation;

pub use ip_utils::{is_valid_ip, offset_address};
pub use validation::validate_graph;
