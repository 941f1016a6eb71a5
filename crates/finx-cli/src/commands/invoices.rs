//! Invoices command - extract fields from a set of invoice PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use finx_core::{
    extract_invoices, DocumentExtractor, DocumentRecord, InvoiceBatch, PdfTextExtractor,
    SkipReason, Upload,
};

use super::{load_config, write_output, OutputFormat};

/// Arguments for the invoices command.
#[derive(Args)]
pub struct InvoicesArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Extraction profile (default from configuration)
    #[arg(short, long)]
    profile: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: InvoicesArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let extractor = DocumentExtractor::for_profile(&config.extraction, args.profile.as_deref())?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let source = PdfTextExtractor::new();
    let mut batch = InvoiceBatch::default();

    for path in &files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        match fs::read(path) {
            Ok(data) => {
                let upload = Upload::new(file_name, data);
                batch.merge(extract_invoices(std::slice::from_ref(&upload), &source, &extractor));
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                batch.skipped.record(file_name, SkipReason::Failed(e.to_string()));
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");
    debug!("Processed {} files in {:?}", files.len(), start.elapsed());

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&batch)?,
        OutputFormat::Csv => format_records_csv(&batch.records)?,
    };
    write_output(args.output.as_deref(), &output)?;

    print_summary(&batch, files.len());
    Ok(())
}

fn print_summary(batch: &InvoiceBatch, total: usize) {
    eprintln!();
    eprintln!(
        "{} Processed {} files: {} extracted, {} skipped",
        style("✓").green(),
        total,
        style(batch.records.len()).green(),
        style(batch.skipped.len()).yellow()
    );

    if !batch.skipped.is_empty() {
        eprintln!();
        eprintln!("{}", style("Skipped files:").yellow());
        for skipped in batch.skipped.iter() {
            eprintln!("  - {}: {}", skipped.file, skipped.reason);
        }
    }
}

fn format_records_csv(records: &[DocumentRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "File Name",
        "Document No",
        "Document Date",
        "Shipper",
        "Consignee",
        "Subtotal",
        "VAT Value",
        "Non Taxable Amount",
        "Taxable Amount",
        "Total Amount",
    ])?;

    for record in records {
        wtr.write_record([
            record.file_name.clone(),
            record.document_no.clone(),
            record.document_date.clone(),
            record.shipper.clone().unwrap_or_default(),
            record.consignee.clone().unwrap_or_default(),
            record.subtotal.to_string(),
            record.vat_value.to_string(),
            record.non_taxable_amount.to_string(),
            record.taxable_amount.to_string(),
            record.total_amount.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
