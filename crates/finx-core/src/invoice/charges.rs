//! Charge-table scanning and VAT classification.

use std::collections::BTreeSet;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::trace;

use super::Result;
use crate::decode::TextLine;
use crate::error::ExtractionError;
use crate::models::config::InvoiceProfile;
use crate::models::records::{ChargeLine, TaxClass};
use crate::rules::parse_amount;
use crate::rules::patterns::{AMOUNT, RATE_ANNOTATION};

/// Rows of a charge table with their taxable split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeTable {
    pub lines: Vec<ChargeLine>,
    pub taxable: Decimal,
    pub non_taxable: Decimal,
}

impl ChargeTable {
    /// Distinct classification labels seen in the table.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.lines.iter().map(|l| l.class.label()).collect()
    }

    /// True when at least one row exists and every row is non-taxable.
    pub fn is_wholly_non_taxable(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(|l| l.class.is_non_taxable())
    }
}

/// Scans the section between the open and close markers for charge rows.
#[derive(Debug, Clone)]
pub struct ChargeScanner {
    open_marker: String,
    close_marker: Option<String>,
    non_taxable_labels: Vec<String>,
    row: Regex,
}

impl ChargeScanner {
    pub fn new(profile: &InvoiceProfile, non_taxable_labels: &[String]) -> Result<Self> {
        let mut tokens: Vec<String> = non_taxable_labels
            .iter()
            .map(|label| regex::escape(label.trim()))
            .filter(|label| !label.is_empty())
            .collect();
        tokens.push(RATE_ANNOTATION.to_string());

        let pattern = format!(
            r"^(.+?)\s+(?:({})\s+)?({})\s+({})(?:\s|$)",
            tokens.join("|"),
            AMOUNT,
            AMOUNT
        );
        let row = Regex::new(&pattern).map_err(|e| ExtractionError::Pattern {
            field: "charge row".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            open_marker: profile.open_marker.clone(),
            close_marker: profile.close_marker.clone(),
            non_taxable_labels: non_taxable_labels.to_vec(),
            row,
        })
    }

    /// Scan a document for charge rows.
    ///
    /// The section opens at a line containing the open marker (that line is
    /// not a row) and closes at a line containing the close marker. A later
    /// open marker reopens it. Fails when a running total overflows.
    pub fn scan(&self, lines: &[TextLine]) -> Result<ChargeTable> {
        let mut table = ChargeTable::default();
        let mut in_section = false;

        for line in lines {
            if line.text.contains(&self.open_marker) {
                in_section = true;
                continue;
            }
            if let Some(close) = &self.close_marker {
                if line.text.contains(close.as_str()) {
                    in_section = false;
                }
            }
            if !in_section {
                continue;
            }

            if let Some(charge) = self.parse_row(line) {
                trace!("Line {}: {} {}", charge.line, charge.class, charge.total);
                let (bucket, name) = if charge.class.is_non_taxable() {
                    (&mut table.non_taxable, "non-taxable")
                } else {
                    (&mut table.taxable, "taxable")
                };
                *bucket = bucket
                    .checked_add(charge.total)
                    .ok_or_else(|| ExtractionError::Overflow(name.to_string()))?;
                table.lines.push(charge);
            }
        }

        Ok(table)
    }

    fn parse_row(&self, line: &TextLine) -> Option<ChargeLine> {
        let caps = self.row.captures(&line.text)?;

        let class = match caps.get(2).map(|m| m.as_str()) {
            None => TaxClass::Taxable,
            Some(token) if self.non_taxable_labels.iter().any(|l| l.trim() == token) => {
                TaxClass::NonTaxable(token.to_string())
            }
            Some(token) => TaxClass::Rated(token.to_string()),
        };

        Some(ChargeLine {
            line: line.number,
            description: caps[1].trim().to_string(),
            class,
            unit: parse_amount(&caps[3]),
            total: parse_amount(&caps[4]),
        })
    }
}
