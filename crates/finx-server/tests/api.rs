//! Router tests driving the endpoints with hand-built multipart bodies.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use finx_core::decode::{self, TextLine, TextSource};
use finx_core::{DecodeError, FinxConfig};
use finx_server::{build_router, AppState};

const BOUNDARY: &str = "finx-test-boundary";

/// Treats upload bytes as plain text lines.
struct MockTextSource;

impl TextSource for MockTextSource {
    fn extract_lines(&self, data: &[u8]) -> decode::Result<Vec<TextLine>> {
        if data.starts_with(b"%BROKEN") {
            return Err(DecodeError::Pdf("unexpected end of stream".to_string()));
        }
        Ok(TextLine::numbered(String::from_utf8_lossy(data).lines()))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn app() -> Router {
    let state = AppState::with_source(FinxConfig::default(), Arc::new(MockTextSource)).unwrap();
    build_router(state)
}

fn multipart_body(parts: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (field, file_name, content) in parts {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn multipart_request(uri: &str, parts: &[(&str, &str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn settlement_csv(brand: &str) -> String {
    settlement_rows(brand, &[("10", "2", "12"), ("5", "1", "6"), ("0", "0", "0")])
}

fn settlement_rows(brand: &str, amounts: &[(&str, &str, &str)]) -> String {
    let mut header = vec![""; 15];
    header[0] = "HD";
    header[13] = brand;
    header[14] = "SFERA MALL";

    let mut rows = vec![header.join(",")];
    for &(comm, vat, sett) in amounts {
        let mut detail = vec![""; 36];
        detail[0] = "DT";
        detail[1] = "1000020410";
        detail[19] = comm;
        detail[21] = vat;
        detail[35] = sett;
        rows.push(detail.join(","));
    }
    rows.join("\n")
}

#[tokio::test]
async fn health_reports_up() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "UP" }));
}

#[tokio::test]
async fn retrieve_aggregates_settlement_csv() {
    let csv = settlement_csv("SFERA");
    let request = multipart_request(
        "/retrieve",
        &[("excelFile", "settlement.15.03.24.csv", csv.as_str())],
    );

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["date"], "15-03-2024");
    let record = &body["data"][0];
    assert_eq!(record["brand_name"], "SFERA");
    assert_eq!(record["merchant_id"], "1000020410");
    assert_eq!(record["COMM_AMOUNT"], json!(15.0));
    assert_eq!(record["VAT_AMOUNT"], json!(3.0));
    assert_eq!(record["SETT_AMOUNT"], json!(18.0));
    assert_eq!(record["transaction_details"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn retrieve_without_match_is_not_found() {
    let csv = settlement_csv("UNKNOWN");
    let request = multipart_request("/retrieve", &[("excelFile", "report.csv", csv.as_str())]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No matching data found in the file" }));
}

#[tokio::test]
async fn retrieve_without_file_field() {
    let request = multipart_request("/retrieve", &[("other", "report.csv", "HD")]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No file uploaded" }));
}

#[tokio::test]
async fn retrieve_with_empty_file_name() {
    let request = multipart_request("/retrieve", &[("excelFile", "", "HD")]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No selected file" }));
}

#[tokio::test]
async fn retrieve_unreadable_workbook() {
    let request = multipart_request("/retrieve", &[("excelFile", "report.xlsx", "not a workbook")]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("Error reading file: "), "got {error}");
}

#[tokio::test]
async fn retrieve_overflowing_totals_is_bad_request() {
    let huge = "50000000000000000000000000000";
    let csv = settlement_rows("SFERA", &[(huge, "0", "0"), (huge, "0", "0")]);
    let request = multipart_request("/retrieve", &[("excelFile", "report.csv", csv.as_str())]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Error reading file: commission total is too large" })
    );
}

#[tokio::test]
async fn upload_reports_records_and_skips() {
    let invoice = [
        "INVOICE NUMBER INV-001",
        "SHIPPER CONSIGNEE",
        "Acme Corp D H TRADING GROUP SPC CO",
        "CHARGE DESCRIPTION",
        "Handling 5%=5.00 100.00 105.00",
        "TOTAL CHARGES",
        "TOTAL AED 105.00",
    ]
    .join("\n");
    let credit_note = [
        "CREDIT NOTE NUMBER CN-1",
        "CHARGE DESCRIPTION",
        "Freight Zero Rated 100.00 100.00",
        "TOTAL CHARGES",
    ]
    .join("\n");

    let request = multipart_request(
        "/upload",
        &[
            ("file", "inv-001.pdf", invoice.as_str()),
            ("file", "cn-1.pdf", credit_note.as_str()),
            ("file", "broken.pdf", "%BROKEN"),
        ],
    );

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["Document No"], "INV-001");
    assert_eq!(body["data"][0]["Shipper"], "Acme Corp");
    assert_eq!(body["data"][0]["Taxable Amount"], json!(105.0));
    assert_eq!(body["skipped"][0]["file"], "cn-1.pdf");
    assert_eq!(
        body["skipped"][0]["reason"],
        "wholly non-taxable, not a tax invoice"
    );
    assert_eq!(body["skipped"][1]["file"], "broken.pdf");
}

#[tokio::test]
async fn upload_overflowing_document_is_skipped() {
    let invoice = "INVOICE NUMBER INV-002\nTOTAL AED 10.00";
    let oversized = [
        "INVOICE NUMBER BIG-1",
        "CHARGE DESCRIPTION",
        "A 1 50000000000000000000000000000",
        "B 1 50000000000000000000000000000",
        "TOTAL CHARGES",
    ]
    .join("\n");

    let request = multipart_request(
        "/upload/open",
        &[
            ("file", "inv-002.pdf", invoice),
            ("file", "big.pdf", oversized.as_str()),
        ],
    );

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["Document No"], "INV-002");
    assert_eq!(
        body["skipped"],
        json!([{ "file": "big.pdf", "reason": "processing failed: taxable total is too large" }])
    );
}

#[tokio::test]
async fn upload_with_named_profile() {
    let invoice = "INVOICE NUMBER INV-9\nBill to: someone else\nTOTAL AED 1.00";
    let request = multipart_request(
        "/upload/dh-trading",
        &[("file", "inv-9.pdf", invoice)],
    );

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(
        body["skipped"],
        json!([{ "file": "inv-9.pdf", "reason": "wrong recipient" }])
    );
}

#[tokio::test]
async fn upload_with_unknown_profile() {
    let request = multipart_request("/upload/nope", &[("file", "a.pdf", "x")]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown profile");
    assert_eq!(body["message"], "no profile named 'nope'");
}

#[tokio::test]
async fn upload_without_files() {
    let request = multipart_request("/upload", &[("note", "readme.txt", "hello")]);

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No file uploaded" }));
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/upload")
        .header(header::ORIGIN, "http://localhost:5500")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5500")
    );
}
