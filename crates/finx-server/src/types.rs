//! API response types

use serde::Serialize;

use finx_core::{DocumentRecord, SettlementRecord, SkipLog};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Settlement report extraction result
#[derive(Debug, Serialize)]
pub struct RetrieveResponse {
    pub status: &'static str,
    pub date: Option<String>,
    pub data: Vec<SettlementRecord>,
}

/// Invoice batch extraction result
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub data: Vec<DocumentRecord>,
    pub skipped: SkipLog,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
