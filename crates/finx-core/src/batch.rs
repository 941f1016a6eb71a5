//! Batch drivers tying decoding and extraction together.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::decode::{decode_workbook, TextSource};
use crate::error::Result;
use crate::invoice::{DocumentExtractor, Outcome};
use crate::models::config::ExtractionConfig;
use crate::models::records::{DocumentRecord, SettlementRecord, SkipLog, SkipReason};
use crate::rules::date_from_filename;
use crate::settlement::SettlementExtractor;

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// Records aggregated from one settlement report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementReport {
    /// Report date parsed from the file name.
    pub date: Option<String>,
    pub records: Vec<SettlementRecord>,
}

/// Records and skipped files from one invoice batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceBatch {
    pub records: Vec<DocumentRecord>,
    pub skipped: SkipLog,
}

impl InvoiceBatch {
    /// Append another batch's records and skips.
    pub fn merge(&mut self, other: InvoiceBatch) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped.into_vec());
    }
}

/// Decode a settlement report and aggregate its records.
pub fn extract_settlement(
    data: &[u8],
    file_name: &str,
    config: &ExtractionConfig,
) -> Result<SettlementReport> {
    let workbook = decode_workbook(data, file_name)?;
    let date = date_from_filename(file_name);
    debug!(
        "{}: {} sheets, report date {:?}",
        file_name,
        workbook.sheets.len(),
        date
    );

    let records = SettlementExtractor::new(config).extract(&workbook, date.clone())?;
    info!("{}: {} settlement records", file_name, records.len());

    Ok(SettlementReport { date, records })
}

/// Extract every uploaded document, collecting skips instead of failing.
pub fn extract_invoices(
    uploads: &[Upload],
    source: &dyn TextSource,
    extractor: &DocumentExtractor,
) -> InvoiceBatch {
    let mut batch = InvoiceBatch::default();

    for upload in uploads {
        match extract_one(upload, source, extractor) {
            Outcome::Record(record) => {
                debug!("{}: extracted {}", upload.file_name, record.document_no);
                batch.records.push(record);
            }
            Outcome::Skipped(reason) => {
                warn!("Skipping {}: {}", upload.file_name, reason);
                batch.skipped.record(upload.file_name.clone(), reason);
            }
        }
    }

    info!(
        "Processed {} documents via {}: {} extracted, {} skipped",
        uploads.len(),
        source.backend_name(),
        batch.records.len(),
        batch.skipped.len()
    );
    batch
}

fn extract_one(upload: &Upload, source: &dyn TextSource, extractor: &DocumentExtractor) -> Outcome {
    let lines = match source.extract_lines(&upload.data) {
        Ok(lines) => lines,
        Err(e) => return Outcome::Skipped(SkipReason::Failed(e.to_string())),
    };

    if lines.is_empty() {
        return Outcome::Skipped(SkipReason::NoText);
    }

    panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(&lines, &upload.file_name)))
        .unwrap_or_else(|_| {
            Outcome::Skipped(SkipReason::Failed("extraction aborted".to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinxError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settlement_from_csv() {
        let mut header = vec![""; 15];
        header[0] = "HD";
        header[13] = "zara home";
        header[14] = "ZARA HOME MOE";
        let mut detail = vec![""; 36];
        detail[0] = "DT";
        detail[1] = "1000175313";
        detail[19] = "\"1,200.50\"";
        detail[21] = "60.03";
        detail[35] = "1260.53";
        let csv = format!("{}\n{}\n", header.join(","), detail.join(","));

        let report = extract_settlement(
            csv.as_bytes(),
            "settlement 01.02.24.csv",
            &ExtractionConfig::default(),
        )
        .unwrap();

        assert_eq!(report.date.as_deref(), Some("01-02-2024"));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].brand_name, "ZARA HOME");
        assert_eq!(report.records[0].merchant_id, "1000175313");
        assert_eq!(report.records[0].comm_amount, rust_decimal::Decimal::new(120050, 2));
    }

    #[test]
    fn test_settlement_decode_error_propagates() {
        let result = extract_settlement(b"not a workbook", "report.xlsx", &ExtractionConfig::default());
        assert!(matches!(result, Err(FinxError::Decode(_))));
    }
}
