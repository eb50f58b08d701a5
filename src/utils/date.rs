//! Date normalization for roster uploads.
//!
//! Upload cells arrive in wildly inconsistent shapes: ISO strings,
//! day-first `DD/MM/YYYY`, bare `MM/YYYY`, Indonesian or English month
//! names, or a spreadsheet serial day count. `normalize` turns any of
//! them into a `NaiveDate` or reports a `ParseError`; it never panics,
//! because ingestion must continue past bad rows.

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Spreadsheet serial day 0 (the "Excel epoch").
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Plausibility window for serial day counts: roughly 1927..2118.
/// Anything outside is more likely a stray numeric cell than a date.
const SERIAL_MIN: i64 = 10_000;
const SERIAL_MAX: i64 = 80_000;

static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static RE_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").unwrap());
static RE_MY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2})[/-](\d{4})$").unwrap());
static RE_MONTH_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\s*(\d{4})?$").unwrap());

/// An upload cell that could not be read as a date. Carries the raw
/// value and the 1-based row it came from, for batch error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub raw: String,
    pub row: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: unrecognized date value '{}'", self.row, self.raw)
    }
}

impl std::error::Error for ParseError {}

/// Normalize a raw upload cell into a calendar date.
///
/// `today` supplies the year for month-name-only cells and must come
/// from the caller's clock so tests stay deterministic.
pub fn normalize(raw: &str, today: NaiveDate, row: usize) -> Result<NaiveDate, ParseError> {
    let cell = raw.trim();

    let err = || ParseError {
        raw: raw.to_string(),
        row,
    };

    if cell.is_empty() {
        return Err(err());
    }

    // Numeric cell: treat as a spreadsheet serial when plausible.
    // Fractional time-of-day components are not honored.
    if let Ok(n) = cell.parse::<f64>() {
        let days = n.trunc() as i64;
        if (SERIAL_MIN..=SERIAL_MAX).contains(&days) {
            return from_serial(days).ok_or_else(err);
        }
        return Err(err());
    }

    if let Some(c) = RE_ISO.captures(cell) {
        return ymd(&c[1], &c[2], &c[3]).ok_or_else(err);
    }

    // Day-first, never month-first. Invalid day/month combinations
    // (day > 31, month > 12) fall out of from_ymd_opt.
    if let Some(c) = RE_DMY.captures(cell) {
        return ymd(&c[3], &c[2], &c[1]).ok_or_else(err);
    }

    if let Some(c) = RE_MY.captures(cell) {
        let month: u32 = c[1].parse().ok().ok_or_else(err)?;
        let year: i32 = c[2].parse().ok().ok_or_else(err)?;
        return NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(err);
    }

    // Month name, Indonesian or English, with an optional embedded year.
    if let Some(c) = RE_MONTH_NAME.captures(cell) {
        if let Some(month) = month_from_name(&c[1]) {
            let year = match c.get(2) {
                Some(y) => y.as_str().parse::<i32>().ok().ok_or_else(err)?,
                None => today.year(),
            };
            return NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(err);
        }
    }

    Err(err())
}

/// Convert a spreadsheet serial day count (whole days since the epoch).
pub fn from_serial(days: i64) -> Option<NaiveDate> {
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(days))
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let y: i32 = year.parse().ok()?;
    let m: u32 = month.parse().ok()?;
    let d: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Resolve an Indonesian or English month name (full or 3-letter).
fn month_from_name(name: &str) -> Option<u32> {
    let n = name.to_lowercase();
    let month = match n.as_str() {
        "januari" | "january" | "jan" => 1,
        "februari" | "february" | "feb" => 2,
        "maret" | "march" | "mar" => 3,
        "april" | "apr" => 4,
        "mei" | "may" => 5,
        "juni" | "june" | "jun" => 6,
        "juli" | "july" | "jul" => 7,
        "agustus" | "august" | "agu" | "aug" => 8,
        "september" | "sep" => 9,
        "oktober" | "october" | "okt" | "oct" => 10,
        "november" | "nov" => 11,
        "desember" | "december" | "des" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse a reporting period ("YYYY-MM"); used by the CLI and ingest.
pub fn parse_period(p: &str) -> Option<String> {
    let re = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").ok()?;
    if re.is_match(p) { Some(p.to_string()) } else { None }
}

/// Current reporting period from a reference date.
pub fn period_of(d: NaiveDate) -> String {
    d.format("%Y-%m").to_string()
}
