//! Defensive coercion of raw cells into numbers and dates.

use super::domain::CellValue;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%Y%m%d", "%Y. %m. %d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y.%m.%d %H:%M:%S"];

/// Largest serial date a spreadsheet can hold (9999-12-31).
const MAX_SPREADSHEET_SERIAL: f64 = 2_958_465.0;

fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub(crate) fn parse_amount(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
        CellValue::Text(text) => parse_number(text.trim().trim_end_matches('원')),
    }
}

/// Whole years; fractional input is truncated, negative input rejected.
pub(crate) fn parse_term_years(cell: &CellValue) -> Option<u32> {
    let value = match cell {
        CellValue::Number(value) => Some(*value).filter(|value| value.is_finite()),
        CellValue::Text(text) => parse_number(text.trim().trim_end_matches('년')),
    }?;

    if value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value.trunc() as u32)
}

/// A share-ratio cell as written, before the column's form is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ShareReading {
    /// Carried a trailing `%`.
    Percent(f64),
    /// A bare number, either a percent or a fraction of one.
    Bare(f64),
}

impl ShareReading {
    pub(crate) fn bare(self) -> Option<f64> {
        match self {
            ShareReading::Bare(value) => Some(value),
            ShareReading::Percent(_) => None,
        }
    }

    /// Bare values are fractions only when the whole column is fractional.
    pub(crate) fn to_percent(self, fractional_column: bool) -> f64 {
        match self {
            ShareReading::Percent(value) => value,
            ShareReading::Bare(value) if fractional_column => value * 100.0,
            ShareReading::Bare(value) => value,
        }
    }
}

pub(crate) fn read_share_ratio(cell: &CellValue) -> Option<ShareReading> {
    match cell {
        CellValue::Number(value) => Some(*value)
            .filter(|value| value.is_finite())
            .map(ShareReading::Bare),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            match trimmed.strip_suffix('%') {
                Some(percent) => parse_number(percent).map(ShareReading::Percent),
                None => parse_number(trimmed).map(ShareReading::Bare),
            }
        }
    }
}

/// True when every bare share in the column lies in 0..=1 and at least one
/// bare share exists.
pub(crate) fn is_fractional_column<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> bool {
    let mut bare = cells
        .into_iter()
        .filter_map(read_share_ratio)
        .filter_map(ShareReading::bare)
        .peekable();
    bare.peek().is_some() && bare.all(|value| (0.0..=1.0).contains(&value))
}

pub(crate) fn parse_contract_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Number(value) => date_from_number(*value),
        CellValue::Text(text) => parse_date_text(text),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    parse_number(trimmed).and_then(date_from_number)
}

/// Numbers are either `YYYYMMDD` or a spreadsheet serial day count.
fn date_from_number(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 {
        return None;
    }

    if (19_000_101.0..=99_991_231.0).contains(&value) {
        return NaiveDate::parse_from_str(&format!("{}", value as u64), "%Y%m%d").ok();
    }

    if value <= MAX_SPREADSHEET_SERIAL {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        return epoch.checked_add_signed(Duration::days(value as i64));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn amounts_accept_separators_and_currency_suffix() {
        assert_eq!(parse_amount(&text("1,000,000")), Some(1_000_000.0));
        assert_eq!(parse_amount(&text(" 52000원 ")), Some(52_000.0));
        assert_eq!(parse_amount(&CellValue::Number(1234.5)), Some(1234.5));
        assert_eq!(parse_amount(&text("미정")), None);
        assert_eq!(parse_amount(&CellValue::Number(f64::NAN)), None);
    }

    #[test]
    fn term_years_accept_numeric_like_values() {
        assert_eq!(parse_term_years(&text("12")), Some(12));
        assert_eq!(parse_term_years(&text("20년")), Some(20));
        assert_eq!(parse_term_years(&CellValue::Number(10.0)), Some(10));
        assert_eq!(parse_term_years(&text("10.0")), Some(10));
        assert_eq!(parse_term_years(&text("종신")), None);
        assert_eq!(parse_term_years(&CellValue::Number(-1.0)), None);
    }

    #[test]
    fn share_readings_keep_the_written_form() {
        assert_eq!(read_share_ratio(&text("50%")), Some(ShareReading::Percent(50.0)));
        assert_eq!(read_share_ratio(&text(" 100 % ")), Some(ShareReading::Percent(100.0)));
        assert_eq!(read_share_ratio(&text("0.5")), Some(ShareReading::Bare(0.5)));
        assert_eq!(read_share_ratio(&CellValue::Number(1.0)), Some(ShareReading::Bare(1.0)));
        assert_eq!(read_share_ratio(&text("절반")), None);

        assert_eq!(ShareReading::Percent(0.5).to_percent(true), 0.5);
        assert_eq!(ShareReading::Bare(0.25).to_percent(true), 25.0);
        assert_eq!(ShareReading::Bare(1.0).to_percent(false), 1.0);
    }

    #[test]
    fn column_is_fractional_only_when_every_bare_share_is_at_most_one() {
        let fractions = [CellValue::Number(0.5), text("1"), text("30%")];
        assert!(is_fractional_column(&fractions));

        let mixed = [CellValue::Number(50.0), CellValue::Number(1.0)];
        assert!(!is_fractional_column(&mixed));

        let percents_only = [text("50%"), text("1%")];
        assert!(!is_fractional_column(&percents_only));
    }

    #[test]
    fn dates_accept_common_sheet_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 1);
        assert_eq!(parse_contract_date(&text("2024-07-01")), expected);
        assert_eq!(parse_contract_date(&text("2024.07.01")), expected);
        assert_eq!(parse_contract_date(&text("2024/07/01")), expected);
        assert_eq!(parse_contract_date(&text("20240701")), expected);
        assert_eq!(parse_contract_date(&text("2024-07-01 00:00:00")), expected);
        assert_eq!(parse_contract_date(&CellValue::Number(20240701.0)), expected);
        assert_eq!(parse_contract_date(&CellValue::Number(45474.0)), expected);
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(parse_contract_date(&text("7월 초")), None);
        assert_eq!(parse_contract_date(&text("2024-13-45")), None);
        assert_eq!(parse_contract_date(&CellValue::Number(0.5)), None);
    }
}
