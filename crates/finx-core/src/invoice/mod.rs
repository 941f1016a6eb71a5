//! Invoice and credit note field extraction from document text.

mod charges;
mod fields;
mod parser;
mod parties;

pub use charges::{ChargeScanner, ChargeTable};
pub use fields::{field_rules, Field, FieldRule, VatTotal};
pub use parser::DocumentExtractor;
pub use parties::{resolve_parties, Parties, Resolution};

use crate::error::ExtractionError;
use crate::models::records::{DocumentRecord, SkipReason};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// What became of one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Record(DocumentRecord),
    Skipped(SkipReason),
}
