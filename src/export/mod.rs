//! File input and output.
//!
//! - [`write_records`] / [`read_records`]: the intermediate JSON record file
//! - [`write_document`]: the final single-line delimited document
//!
//! Every write replaces the target file in one call; nothing is appended.

mod csv;
mod json;

pub use csv::write_document;
pub use json::{read_records, write_records};
