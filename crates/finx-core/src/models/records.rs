//! Extraction output records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One aggregated settlement row per matched merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Brand name as found in the header row (upper-case).
    pub brand_name: String,

    /// Outlet label from the header row.
    pub company_outlet_name: String,

    /// Merchant identifier resolved from the entity mapping.
    pub merchant_id: String,

    /// Sum of commission amounts, rounded to 2 dp.
    #[serde(rename = "COMM_AMOUNT", with = "rust_decimal::serde::float")]
    pub comm_amount: Decimal,

    /// Sum of VAT amounts, rounded to 2 dp.
    #[serde(rename = "VAT_AMOUNT", with = "rust_decimal::serde::float")]
    pub vat_amount: Decimal,

    /// Sum of settlement amounts, rounded to 2 dp.
    #[serde(rename = "SETT_AMOUNT", with = "rust_decimal::serde::float")]
    pub sett_amount: Decimal,

    /// Per detail row amounts, in row order.
    pub transaction_details: Vec<TransactionDetail>,

    /// Report date parsed from the file name (`DD-MM-YYYY`).
    pub date: Option<String>,
}

/// Amounts of a single `DT` row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    #[serde(rename = "COMM_AMOUNT", with = "rust_decimal::serde::float")]
    pub comm_amount: Decimal,

    #[serde(rename = "VAT_AMOUNT", with = "rust_decimal::serde::float")]
    pub vat_amount: Decimal,

    #[serde(rename = "SETT_AMOUNT", with = "rust_decimal::serde::float")]
    pub sett_amount: Decimal,
}

/// Fields extracted from one invoice or credit note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Uploaded file name.
    #[serde(rename = "File Name")]
    pub file_name: String,

    /// Invoice or credit note number (`N/A` when absent).
    #[serde(rename = "Document No")]
    pub document_no: String,

    /// Document date as printed (`N/A` when absent).
    #[serde(rename = "Document Date")]
    pub document_date: String,

    #[serde(rename = "Shipper", skip_serializing_if = "Option::is_none", default)]
    pub shipper: Option<String>,

    #[serde(rename = "Consignee", skip_serializing_if = "Option::is_none", default)]
    pub consignee: Option<String>,

    #[serde(rename = "Subtotal", with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    #[serde(rename = "VAT Value", with = "rust_decimal::serde::float")]
    pub vat_value: Decimal,

    #[serde(rename = "Non Taxable Amount", with = "rust_decimal::serde::float")]
    pub non_taxable_amount: Decimal,

    #[serde(rename = "Taxable Amount", with = "rust_decimal::serde::float")]
    pub taxable_amount: Decimal,

    #[serde(rename = "Total Amount", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Tax classification of a charge-table row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaxClass {
    /// One of the configured non-taxable labels.
    NonTaxable(String),
    /// A percentage annotation such as `5%=5.00`.
    Rated(String),
    /// No classification token on the row.
    Taxable,
}

impl TaxClass {
    /// The label as it appeared on the document (`Taxable` when absent).
    pub fn label(&self) -> &str {
        match self {
            TaxClass::NonTaxable(label) | TaxClass::Rated(label) => label,
            TaxClass::Taxable => "Taxable",
        }
    }

    pub fn is_non_taxable(&self) -> bool {
        matches!(self, TaxClass::NonTaxable(_))
    }
}

impl fmt::Display for TaxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TaxClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A row parsed from the charge table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeLine {
    /// Line number in the flattened document.
    pub line: usize,
    pub description: String,
    pub class: TaxClass,
    pub unit: Decimal,
    pub total: Decimal,
}

/// Why a parsed document was left out of the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Every charge row was non-taxable and the file is not a tax invoice.
    NonTaxable,
    /// The recipient did not match the configured rule.
    WrongRecipient,
    /// No text could be extracted.
    NoText,
    /// Decoding or extraction failed for this document only.
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonTaxable => write!(f, "wholly non-taxable, not a tax invoice"),
            SkipReason::WrongRecipient => write!(f, "wrong recipient"),
            SkipReason::NoText => write!(f, "no extractable text"),
            SkipReason::Failed(detail) => write!(f, "processing failed: {}", detail),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A document left out of the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub file: String,
    pub reason: SkipReason,
}

/// Skipped documents collected during one batch.
///
/// Owned by the caller of a batch and returned with its results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipLog(Vec<Skipped>);

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, file: impl Into<String>, reason: SkipReason) {
        self.0.push(Skipped {
            file: file.into(),
            reason,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skipped> {
        self.0.iter()
    }

    pub fn files(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.file.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Skipped> {
        self.0
    }
}

impl Extend<Skipped> for SkipLog {
    fn extend<T: IntoIterator<Item = Skipped>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
