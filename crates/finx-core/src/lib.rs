//! Core library for financial document extraction.
//!
//! This crate provides:
//! - Document decoding (spreadsheets via calamine/csv, PDF text via lopdf and pdf-extract)
//! - Settlement report aggregation over `HD`/`DT` marker rows
//! - Invoice field extraction with VAT classification of charge tables
//! - A batch driver that keeps skipped documents in a request-owned log

pub mod batch;
pub mod decode;
pub mod error;
pub mod invoice;
pub mod models;
pub mod rules;
pub mod settlement;

pub use batch::{extract_invoices, extract_settlement, InvoiceBatch, SettlementReport, Upload};
pub use decode::{decode_workbook, Cell, PdfTextExtractor, Sheet, TextLine, TextSource, Workbook};
pub use error::{DecodeError, ExtractionError, FinxError, Result};
pub use invoice::{DocumentExtractor, Outcome};
pub use models::config::{ExtractionConfig, FinxConfig, InvoiceProfile, RecipientRule, ServerConfig};
pub use models::records::{
    ChargeLine, DocumentRecord, SettlementRecord, SkipLog, SkipReason, Skipped, TaxClass,
    TransactionDetail,
};
pub use settlement::SettlementExtractor;
