//! Settlement command - aggregate one settlement report.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::json;
use tracing::info;

use finx_core::{extract_settlement, SettlementReport};

use super::{load_config, write_output, OutputFormat};

/// Arguments for the settlement command.
#[derive(Args)]
pub struct SettlementArgs {
    /// Settlement report (xlsx, xls, ods or csv)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: SettlementArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let data = fs::read(&args.input)?;

    info!("Processing settlement report: {}", args.input.display());
    let report = extract_settlement(&data, file_name, &config.extraction)?;

    if report.records.is_empty() {
        anyhow::bail!("No matching data found in {}", args.input.display());
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "date": report.date,
            "data": report.records,
        }))?,
        OutputFormat::Csv => format_settlement_csv(&report)?,
    };

    write_output(args.output.as_deref(), &output)
}

fn format_settlement_csv(report: &SettlementReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "brand_name",
        "company_outlet_name",
        "merchant_id",
        "COMM_AMOUNT",
        "VAT_AMOUNT",
        "SETT_AMOUNT",
        "transactions",
        "date",
    ])?;

    for record in &report.records {
        wtr.write_record([
            record.brand_name.clone(),
            record.company_outlet_name.clone(),
            record.merchant_id.clone(),
            record.comm_amount.to_string(),
            record.vat_amount.to_string(),
            record.sett_amount.to_string(),
            record.transaction_details.len().to_string(),
            record.date.clone().unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
