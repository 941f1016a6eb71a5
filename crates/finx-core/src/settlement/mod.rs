//! Settlement report aggregation.
//!
//! A settlement report is a grid without a header row. Rows whose first
//! column is `HD` name a brand and outlet; rows marked `DT` carry the amounts
//! for a merchant identifier.

mod extractor;

pub use extractor::SettlementExtractor;

/// Column positions within `HD`/`DT` rows.
pub mod columns {
    /// Row kind marker (`HD` or `DT`).
    pub const MARKER: usize = 0;
    /// Merchant identifier on `DT` rows.
    pub const MERCHANT_ID: usize = 1;
    /// Brand name on `HD` rows.
    pub const ENTITY: usize = 13;
    /// Outlet label on `HD` rows.
    pub const OUTLET: usize = 14;
    /// Commission amount on `DT` rows.
    pub const COMMISSION: usize = 19;
    /// VAT amount on `DT` rows.
    pub const VAT: usize = 21;
    /// Settlement amount on `DT` rows.
    pub const SETTLEMENT: usize = 35;
}

/// Marker of a header row.
pub const HEADER_MARKER: &str = "HD";

/// Marker of a detail row.
pub const DETAIL_MARKER: &str = "DT";
