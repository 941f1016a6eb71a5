//! Decoding of uploaded documents into grids of cells or numbered text lines.

mod pdf;
mod spreadsheet;

pub use pdf::PdfTextExtractor;
pub use spreadsheet::decode_workbook;

use crate::error::DecodeError;

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Render the cell the way a spreadsheet shows it.
    ///
    /// Whole numbers drop the fractional part, so an identifier stored as
    /// `1000020410.0` renders as `1000020410`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// True when the cell holds exactly the given text.
    pub fn is_marker(&self, marker: &str) -> bool {
        matches!(self, Cell::Text(s) if s == marker)
    }
}

/// One worksheet as a row-major grid. Row and column indices are absolute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Cell at `(row, col)`, or an empty cell when outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// All sheets of a decoded spreadsheet, in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// A line of extracted document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// 1-based position across all pages.
    pub number: usize,
    pub text: String,
}

impl TextLine {
    /// Trim lines, drop blank ones and number the rest from 1.
    pub fn numbered<I, S>(lines: I) -> Vec<TextLine>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|l| {
                let trimmed = l.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .enumerate()
            .map(|(i, text)| TextLine { number: i + 1, text })
            .collect()
    }
}

/// Trait for document text extraction backends.
pub trait TextSource: Send + Sync {
    /// Extract the document's lines with page boundaries flattened.
    fn extract_lines(&self, data: &[u8]) -> Result<Vec<TextLine>>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
