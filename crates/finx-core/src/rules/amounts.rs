//! Amount parsing shared by both extractors.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

use crate::decode::Cell;

/// Parse a printed amount (e.g. "1,234.56"), defaulting to zero.
///
/// Thousands separators and whitespace are stripped before parsing.
pub fn parse_amount(s: &str) -> Decimal {
    try_parse_amount(s).unwrap_or(Decimal::ZERO)
}

/// Parse a printed amount, returning `None` when it is not a number.
pub fn try_parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// Round to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum amounts, returning `None` if the total leaves `Decimal`'s range.
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

/// Numeric value of a spreadsheet cell; anything non-numeric is zero.
///
/// Text cells go through [`parse_amount`], so a cell holding `"1,200.50"`
/// counts as 1200.50. It is not zeroed the way a strict numeric coercion
/// would treat it.
pub fn coerce_cell(cell: &Cell) -> Decimal {
    match cell {
        Cell::Number(f) => f64_to_decimal(*f),
        Cell::Text(s) => parse_amount(s),
        Cell::Empty | Cell::Bool(_) => Decimal::ZERO,
    }
}

/// Convert f64 to Decimal via its shortest string form.
///
/// Avoids binary artifacts such as 0.1 becoming 0.1000000000000000055.
fn f64_to_decimal(f: f64) -> Decimal {
    if !f.is_finite() {
        return Decimal::ZERO;
    }
    format!("{f}")
        .parse::<Decimal>()
        .or_else(|_| Decimal::try_from(f))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), dec("1234.56"));
        assert_eq!(parse_amount("100.00"), dec("100"));
        assert_eq!(parse_amount(" 12 345.10 "), dec("12345.10"));
        assert_eq!(parse_amount("100."), dec("100"));
    }

    #[test]
    fn test_unparsable_amount_is_zero() {
        assert_eq!(parse_amount("."), Decimal::ZERO);
        assert_eq!(parse_amount(",,"), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(try_parse_amount("n/a"), None);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("3.14159")), dec("3.14"));
        assert_eq!(round_money(dec("18")), dec("18"));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec("1.50"), dec("2.25")]), Some(dec("3.75")));
        assert_eq!(checked_sum(Vec::new()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }

    #[test]
    fn test_coerce_cell_formatted_text() {
        assert_eq!(coerce_cell(&Cell::Text("1,200.50".into())), dec("1200.50"));
    }

    #[test]
    fn test_coerce_cell() {
        assert_eq!(coerce_cell(&Cell::Number(0.1)), dec("0.1"));
        assert_eq!(coerce_cell(&Cell::Number(12.0)), dec("12"));
        assert_eq!(coerce_cell(&Cell::Text("5.5".into())), dec("5.5"));
        assert_eq!(coerce_cell(&Cell::Text("pending".into())), Decimal::ZERO);
        assert_eq!(coerce_cell(&Cell::Number(f64::NAN)), Decimal::ZERO);
        assert_eq!(coerce_cell(&Cell::Empty), Decimal::ZERO);
        assert_eq!(coerce_cell(&Cell::Bool(true)), Decimal::ZERO);
    }
}
