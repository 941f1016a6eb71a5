//! Table-driven labeled field rules.

use regex::Regex;
use rust_decimal::Decimal;

use super::Result;
use crate::decode::TextLine;
use crate::error::ExtractionError;
use crate::rules::patterns::{
    AMOUNT, CREDIT_NOTE_NUMBER, GENERIC_DATE, INVOICE_DATE, INVOICE_NUMBER, SUBTOTAL, VAT_AMOUNT,
};
use crate::rules::{checked_sum, parse_amount, FieldExtractor};

/// Fields resolved through a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DocumentNo,
    DocumentDate,
    Subtotal,
    Total,
}

/// A field with its patterns in priority order and a default value.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: Field,
    patterns: Vec<Regex>,
    default: &'static str,
}

impl FieldRule {
    pub fn new(field: Field, patterns: Vec<Regex>, default: &'static str) -> Self {
        Self {
            field,
            patterns,
            default,
        }
    }

    /// Resolve the field over a document.
    ///
    /// Patterns are tried in order; for each pattern the first matching line
    /// wins. Falls back to the default when nothing matches.
    pub fn resolve(&self, lines: &[TextLine]) -> String {
        self.patterns
            .iter()
            .find_map(|pattern| {
                lines
                    .iter()
                    .find_map(|line| first_capture(pattern, &line.text))
            })
            .unwrap_or_else(|| self.default.to_string())
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Build the rule table for documents totalled in `currency`.
pub fn field_rules(currency: &str) -> Result<Vec<FieldRule>> {
    let total = format!(r"TOTAL {}\s*({})", regex::escape(currency.trim()), AMOUNT);
    let total = Regex::new(&total).map_err(|e| ExtractionError::Pattern {
        field: "total".to_string(),
        reason: e.to_string(),
    })?;

    Ok(vec![
        FieldRule::new(
            Field::DocumentNo,
            vec![INVOICE_NUMBER.clone(), CREDIT_NOTE_NUMBER.clone()],
            "N/A",
        ),
        FieldRule::new(
            Field::DocumentDate,
            vec![INVOICE_DATE.clone(), GENERIC_DATE.clone()],
            "N/A",
        ),
        FieldRule::new(Field::Subtotal, vec![SUBTOTAL.clone()], "0"),
        FieldRule::new(Field::Total, vec![total], "0"),
    ])
}

/// Sum of every VAT amount printed on a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct VatTotal;

impl VatTotal {
    pub fn resolve(&self, lines: &[TextLine]) -> Result<Decimal> {
        checked_sum(lines.iter().flat_map(|line| self.extract_all(&line.text)))
            .ok_or_else(|| ExtractionError::Overflow("VAT".to_string()))
    }
}

impl FieldExtractor for VatTotal {
    type Output = Decimal;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        VAT_AMOUNT
            .captures_iter(text)
            .map(|caps| parse_amount(&caps[1]))
            .collect()
    }
}
