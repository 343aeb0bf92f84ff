//! Helpers for decoding loosely-typed server fields and formatting them.

pub mod de;
pub mod format;

pub use format::{format_date, format_datetime, or_placeholder};
