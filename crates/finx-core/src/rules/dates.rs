//! Report dates carried in uploaded file names.

use chrono::NaiveDate;

use super::patterns::FILENAME_DATE;

/// Format used for report dates in responses.
pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Extract the report date from a file name such as `Report 15.03.24.xlsx`.
///
/// Only the first `DD.MM.YY` token is considered; an impossible calendar
/// date yields `None`. Two-digit years 00-68 fall in the 2000s and 69-99 in
/// the 1900s.
pub fn date_from_filename(file_name: &str) -> Option<String> {
    let token = FILENAME_DATE.captures(file_name)?.get(1)?.as_str();
    let date = NaiveDate::parse_from_str(token, "%d.%m.%y").ok()?;
    Some(date.format(REPORT_DATE_FORMAT).to_string())
}
