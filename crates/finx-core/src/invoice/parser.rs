//! Document extractor combining field rules, party resolution and the
//! charge-table scan.

use tracing::debug;

use super::charges::ChargeScanner;
use super::fields::{field_rules, Field, FieldRule, VatTotal};
use super::parties::resolve_parties;
use super::{Outcome, Result};
use crate::decode::TextLine;
use crate::models::config::{ExtractionConfig, InvoiceProfile, RecipientRule};
use crate::models::records::{DocumentRecord, SkipReason};
use crate::rules::{parse_amount, round_money};

/// Extracts one record per document for a single profile.
///
/// Holds only compiled patterns and configuration, so one instance can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    fields: Vec<FieldRule>,
    vat: VatTotal,
    charges: ChargeScanner,
    recipient: RecipientRule,
    party_marker: String,
    tax_invoice_marker: String,
}

impl DocumentExtractor {
    pub fn new(config: &ExtractionConfig, profile: &InvoiceProfile) -> Result<Self> {
        Ok(Self {
            fields: field_rules(&profile.currency)?,
            vat: VatTotal,
            charges: ChargeScanner::new(profile, &config.non_taxable_labels)?,
            recipient: profile.recipient.clone(),
            party_marker: profile.party_marker.clone(),
            tax_invoice_marker: config.tax_invoice_marker.to_uppercase(),
        })
    }

    /// Build the extractor for a named profile, or the default one.
    pub fn for_profile(config: &ExtractionConfig, name: Option<&str>) -> Result<Self> {
        Self::new(config, config.profile(name)?)
    }

    /// Extract a record from a document's lines, or decide to skip it.
    ///
    /// A document whose amounts overflow is skipped as failed.
    pub fn extract(&self, lines: &[TextLine], file_name: &str) -> Outcome {
        if lines.is_empty() {
            return Outcome::Skipped(SkipReason::NoText);
        }

        self.try_extract(lines, file_name)
            .unwrap_or_else(|e| Outcome::Skipped(SkipReason::Failed(e.to_string())))
    }

    fn try_extract(&self, lines: &[TextLine], file_name: &str) -> Result<Outcome> {
        let table = self.charges.scan(lines)?;
        debug!(
            "{}: {} charge rows, labels {:?}",
            file_name,
            table.lines.len(),
            table.labels()
        );

        if !self.is_tax_invoice(file_name) && table.is_wholly_non_taxable() {
            return Ok(Outcome::Skipped(SkipReason::NonTaxable));
        }

        let resolution = resolve_parties(&self.recipient, &self.party_marker, lines);
        if !resolution.accepted {
            return Ok(Outcome::Skipped(SkipReason::WrongRecipient));
        }

        Ok(Outcome::Record(DocumentRecord {
            file_name: file_name.to_string(),
            document_no: self.field(Field::DocumentNo, lines),
            document_date: self.field(Field::DocumentDate, lines),
            shipper: resolution.parties.shipper,
            consignee: resolution.parties.consignee,
            subtotal: round_money(parse_amount(&self.field(Field::Subtotal, lines))),
            vat_value: round_money(self.vat.resolve(lines)?),
            non_taxable_amount: round_money(table.non_taxable),
            taxable_amount: round_money(table.taxable),
            total_amount: round_money(parse_amount(&self.field(Field::Total, lines))),
        }))
    }

    fn field(&self, field: Field, lines: &[TextLine]) -> String {
        self.fields
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| rule.resolve(lines))
            .unwrap_or_default()
    }

    fn is_tax_invoice(&self, file_name: &str) -> bool {
        !self.tax_invoice_marker.is_empty()
            && file_name.to_uppercase().contains(&self.tax_invoice_marker)
    }
}
