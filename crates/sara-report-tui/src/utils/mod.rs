//! Utility functions for date handling and text formatting.

pub mod format;

pub use format::{format_long_date, parse_date_input, truncate};
