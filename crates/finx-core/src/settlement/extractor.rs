//! Header/detail block aggregation over decoded sheets.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::{columns, DETAIL_MARKER, HEADER_MARKER};
use crate::decode::{Sheet, Workbook};
use crate::error::{ExtractionError, Result};
use crate::models::config::ExtractionConfig;
use crate::models::records::{SettlementRecord, TransactionDetail};
use crate::rules::{checked_sum, coerce_cell, round_money};

/// Aggregates `DT` rows under the `HD` rows of mapped brands.
pub struct SettlementExtractor<'a> {
    entities: &'a BTreeMap<String, String>,
}

impl<'a> SettlementExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            entities: &config.entities,
        }
    }

    /// Produce one record per merchant identifier, ordered by identifier.
    ///
    /// Sheets are processed in order into the same identifier map; a later
    /// header resolving to an identifier already seen replaces the earlier
    /// record. Fails when a merchant's totals overflow.
    pub fn extract(
        &self,
        workbook: &Workbook,
        date: Option<String>,
    ) -> Result<Vec<SettlementRecord>> {
        let mut by_id: BTreeMap<String, SettlementRecord> = BTreeMap::new();

        for sheet in &workbook.sheets {
            self.extract_sheet(sheet, &date, &mut by_id)?;
        }

        debug!("Aggregated {} settlement records", by_id.len());
        Ok(by_id.into_values().collect())
    }

    fn extract_sheet(
        &self,
        sheet: &Sheet,
        date: &Option<String>,
        by_id: &mut BTreeMap<String, SettlementRecord>,
    ) -> Result<()> {
        for header_row in 0..sheet.row_count() {
            if !sheet.cell(header_row, columns::MARKER).is_marker(HEADER_MARKER) {
                continue;
            }

            let brand = sheet
                .cell(header_row, columns::ENTITY)
                .as_text()
                .trim()
                .to_uppercase();
            let Some(merchant_id) = self.entities.get(&brand) else {
                trace!("Sheet '{}' row {}: unmapped brand '{}'", sheet.name, header_row, brand);
                continue;
            };
            let outlet = sheet
                .cell(header_row, columns::OUTLET)
                .as_text()
                .trim()
                .to_string();

            let details = detail_rows(sheet, header_row, merchant_id);
            if details.is_empty() {
                debug!(
                    "Sheet '{}' row {}: no detail rows for {}",
                    sheet.name, header_row, merchant_id
                );
                continue;
            }

            let record = SettlementRecord {
                brand_name: brand,
                company_outlet_name: outlet,
                merchant_id: merchant_id.clone(),
                comm_amount: total(&details, "commission", |d| d.comm_amount)?,
                vat_amount: total(&details, "VAT", |d| d.vat_amount)?,
                sett_amount: total(&details, "settlement", |d| d.sett_amount)?,
                transaction_details: details,
                date: date.clone(),
            };

            if by_id.insert(merchant_id.clone(), record).is_some() {
                debug!("Replaced earlier record for {}", merchant_id);
            }
        }
        Ok(())
    }
}

/// Rounded sum of one amount column over a merchant's detail rows.
fn total(
    details: &[TransactionDetail],
    column: &str,
    amount: impl Fn(&TransactionDetail) -> Decimal,
) -> Result<Decimal> {
    checked_sum(details.iter().map(amount))
        .map(round_money)
        .ok_or_else(|| ExtractionError::Overflow(column.to_string()).into())
}

/// Every `DT` row below `header_row` carrying `merchant_id`.
///
/// The scan runs to the end of the sheet and does not stop at the next
/// header.
fn detail_rows(sheet: &Sheet, header_row: usize, merchant_id: &str) -> Vec<TransactionDetail> {
    (header_row + 1..sheet.row_count())
        .filter(|&row| {
            sheet.cell(row, columns::MARKER).is_marker(DETAIL_MARKER)
                && sheet.cell(row, columns::MERCHANT_ID).as_text().trim() == merchant_id
        })
        .map(|row| TransactionDetail {
            comm_amount: coerce_cell(sheet.cell(row, columns::COMMISSION)),
            vat_amount: coerce_cell(sheet.cell(row, columns::VAT)),
            sett_amount: coerce_cell(sheet.cell(row, columns::SETTLEMENT)),
        })
        .collect()
}
