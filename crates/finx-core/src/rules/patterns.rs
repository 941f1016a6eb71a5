//! Common regex patterns for document field extraction.
//!
//! Patterns that depend on configuration (total label currency, charge row
//! vocabulary) are compiled per extractor in `invoice::fields`/`invoice::charges`.

use lazy_static::lazy_static;
use regex::Regex;

/// Percentage annotation on a charge row, e.g. `5%=5.00`.
pub const RATE_ANNOTATION: &str = r"\d+(?:\.\d+)?%=[\d.,]+";

/// Monetary amount as printed on invoices, thousands separators included.
pub const AMOUNT: &str = r"[\d.,]+";

lazy_static! {
    // DD.MM.YY token embedded in a file name
    pub static ref FILENAME_DATE: Regex = Regex::new(
        r"(\d{2}\.\d{2}\.\d{2})"
    ).unwrap();

    // Document numbers
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)INVOICE NUMBER\s*:?\s*([\w-]+)"
    ).unwrap();

    pub static ref CREDIT_NOTE_NUMBER: Regex = Regex::new(
        r"(?i)CREDIT NOTE NUMBER\s*:?\s*([\w-]+)"
    ).unwrap();

    // Document dates
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?i)INVOICE DATE\s*:?\s*([\dA-Za-z-]+)"
    ).unwrap();

    pub static ref GENERIC_DATE: Regex = Regex::new(
        r"(?i)DATE\s*:?\s*([\dA-Za-z-]+)"
    ).unwrap();

    // Amounts
    pub static ref SUBTOTAL: Regex = Regex::new(
        r"SUBTOTAL\s*([\d.,]+)"
    ).unwrap();

    pub static ref VAT_AMOUNT: Regex = Regex::new(
        r"VAT\s*([\d.,]+)"
    ).unwrap();
}
