//! Rule-based field extraction helpers shared by both extractors.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{checked_sum, coerce_cell, parse_amount, round_money, try_parse_amount};
pub use dates::{date_from_filename, REPORT_DATE_FORMAT};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
