//! Gregorian / Hijri calendar conversion.
//!
//! Hijri dates use the arithmetic (tabular) Islamic calendar with the civil
//! epoch, converted through Julian Day Numbers. The mapping is a bijection,
//! so every Gregorian day in the supported range converts back to itself.

use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::record::{FieldKey, Record};

/// Returned by [`gregorian_to_hijri`] when the input cannot be converted.
pub const FALLBACK_HIJRI_DATE: &str = "01-01-1446";

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Julian Day Number of 1 Muharram 1 AH (civil epoch).
const HIJRI_EPOCH_JDN: i64 = 1_948_440;
/// Offset between chrono's day count from 0001-01-01 and the Julian Day Number.
const CE_TO_JDN: i64 = 1_721_425;

pub const HIJRI_MONTHS_AR: [&str; 12] = [
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الثاني",
    "جمادى الأولى",
    "جمادى الثانية",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

pub const GREGORIAN_MONTHS_AR: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

lazy_static! {
    // (pattern, year_first); tried in order, first in-range match wins.
    static ref GREGORIAN_PATTERNS: Vec<(Regex, bool)> = vec![
        (Regex::new(r"(\d{1,2})-(\d{1,2})-(\d{4})").unwrap(), false),
        (Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap(), false),
        (Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").unwrap(), false),
        (Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap(), true),
        (Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").unwrap(), true),
        (Regex::new(r"(\d{4})\.(\d{1,2})\.(\d{1,2})").unwrap(), true),
    ];
    static ref HIJRI_PATTERN: Regex = Regex::new(r"^\s*(\d{1,2})-(\d{1,2})-(\d{1,4})\s*$").unwrap();
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("'{0}' is not a recognised date")]
    Unparsable(String),
    #[error("{day:02}-{month:02}-{year} does not exist in the Gregorian calendar")]
    InvalidGregorian { day: u32, month: u32, year: i32 },
    #[error("{day:02}-{month:02}-{year} does not exist in the Hijri calendar")]
    InvalidHijri { day: u32, month: u32, year: i32 },
}

/// A day in the Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct HijriDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl HijriDate {
    pub fn new(day: u32, month: u32, year: i32) -> Result<Self, CalendarError> {
        let invalid = CalendarError::InvalidHijri { day, month, year };
        if year < 1 || !(1..=12).contains(&month) || day < 1 {
            return Err(invalid);
        }
        if day > Self::month_length(year, month) {
            return Err(invalid);
        }
        Ok(Self { year, month, day })
    }

    /// Leap years carry a 30-day Dhu al-Hijjah; 11 of every 30 years.
    pub fn is_leap_year(year: i32) -> bool {
        (14 + 11 * i64::from(year)).rem_euclid(30) < 11
    }

    pub fn month_length(year: i32, month: u32) -> u32 {
        if month % 2 == 1 || (month == 12 && Self::is_leap_year(year)) {
            30
        } else {
            29
        }
    }

    /// Parse `DD-MM-YYYY`.
    pub fn parse(text: &str) -> Result<Self, CalendarError> {
        let caps = HIJRI_PATTERN
            .captures(text)
            .ok_or_else(|| CalendarError::Unparsable(text.to_string()))?;
        let number = |i: usize| caps[i].parse::<u32>().ok();
        match (number(1), number(2), number(3)) {
            (Some(day), Some(month), Some(year)) => Self::new(day, month, year as i32),
            _ => Err(CalendarError::Unparsable(text.to_string())),
        }
    }

    pub fn to_jdn(&self) -> i64 {
        let y = i64::from(self.year);
        let m = i64::from(self.month);
        let d = i64::from(self.day);
        (11 * y + 3).div_euclid(30) + 354 * y + 30 * m - (m - 1).div_euclid(2) + d
            + HIJRI_EPOCH_JDN
            - 385
    }

    pub fn from_jdn(jdn: i64) -> Self {
        let mut l = jdn - HIJRI_EPOCH_JDN + 10_632;
        let n = (l - 1).div_euclid(10_631);
        l = l - 10_631 * n + 354;
        let j = ((10_985 - l) / 5_316) * ((50 * l) / 17_719) + (l / 5_670) * ((43 * l) / 15_238);
        l = l - ((30 - j) / 15) * ((17_719 * j) / 50) - (j / 16) * ((15_238 * j) / 43) + 29;
        let month = (24 * l) / 709;
        let day = l - (709 * month) / 24;
        let year = 30 * n + j - 30;

        Self {
            year: year as i32,
            month: month as u32,
            day: day as u32,
        }
    }

    pub fn from_gregorian(date: NaiveDate) -> Self {
        Self::from_jdn(i64::from(date.num_days_from_ce()) + CE_TO_JDN)
    }

    pub fn to_gregorian(&self) -> Option<NaiveDate> {
        let days = i32::try_from(self.to_jdn() - CE_TO_JDN).ok()?;
        NaiveDate::from_num_days_from_ce_opt(days)
    }

    pub fn month_name_ar(&self) -> &'static str {
        HIJRI_MONTHS_AR[(self.month as usize - 1).min(11)]
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{}", self.day, self.month, self.year)
    }
}

/// Locate a Gregorian date in `text` and return `(day, month, year)`.
///
/// Accepts `-`, `/` and `.` separators in day-first or year-first order; the
/// four-digit group decides which. Only range checks are applied here.
pub fn parse_gregorian(text: &str) -> Option<(u32, u32, i32)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for (pattern, year_first) in GREGORIAN_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let groups: Vec<u32> = (1..=3).filter_map(|i| caps[i].parse().ok()).collect();
        if groups.len() != 3 {
            continue;
        }
        let (day, month, year) = if *year_first {
            (groups[2], groups[1], groups[0] as i32)
        } else {
            (groups[0], groups[1], groups[2] as i32)
        };

        if (1..=31).contains(&day) && (1..=12).contains(&month) && (MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Some((day, month, year));
        }
    }

    None
}

/// Parse into a calendar-checked date.
pub fn parse_gregorian_date(text: &str) -> Result<NaiveDate, CalendarError> {
    let (day, month, year) =
        parse_gregorian(text).ok_or_else(|| CalendarError::Unparsable(text.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(CalendarError::InvalidGregorian { day, month, year })
}

pub fn format_gregorian(date: NaiveDate) -> String {
    format!("{:02}-{:02}-{}", date.day(), date.month(), date.year())
}

/// Convert without defaulting.
pub fn gregorian_to_hijri_checked(text: &str) -> Result<HijriDate, CalendarError> {
    parse_gregorian_date(text).map(HijriDate::from_gregorian)
}

/// Convert a Gregorian date string to a Hijri `DD-MM-YYYY` string.
///
/// Falls back to [`FALLBACK_HIJRI_DATE`] when the input cannot be converted.
pub fn gregorian_to_hijri(text: &str) -> String {
    match gregorian_to_hijri_checked(text) {
        Ok(hijri) => hijri.to_string(),
        Err(err) => {
            log::warn!("Hijri conversion fell back to {}: {}", FALLBACK_HIJRI_DATE, err);
            FALLBACK_HIJRI_DATE.to_string()
        }
    }
}

/// Convert a Hijri `DD-MM-YYYY` string back to Gregorian `DD-MM-YYYY`.
pub fn hijri_to_gregorian(text: &str) -> Option<String> {
    let hijri = HijriDate::parse(text).ok()?;
    hijri.to_gregorian().map(format_gregorian)
}

/// Render a Hijri date as `"{day} {month name} {year}هـ"`.
///
/// Malformed input, or a month outside 1..=12, is returned unchanged.
pub fn format_hijri_arabic(hijri: &str) -> String {
    let parts: Vec<&str> = hijri.split('-').collect();
    if parts.len() != 3 {
        return hijri.to_string();
    }
    let parsed: Vec<i64> = parts.iter().filter_map(|p| p.trim().parse().ok()).collect();
    if parsed.len() != 3 {
        return hijri.to_string();
    }
    let (day, month, year) = (parsed[0], parsed[1], parsed[2]);
    if !(1..=12).contains(&month) {
        return hijri.to_string();
    }
    format!("{} {} {}هـ", day, HIJRI_MONTHS_AR[month as usize - 1], year)
}

pub fn gregorian_month_name_ar(month: u32) -> Option<&'static str> {
    GREGORIAN_MONTHS_AR.get((month as usize).checked_sub(1)?).copied()
}

/// Today's local date as `DD-MM-YYYY`.
pub fn current_gregorian_date() -> String {
    format_gregorian(Local::now().date_naive())
}

/// Inclusive number of leave days; never less than one.
pub fn compute_duration(admission: &str, discharge: &str) -> u32 {
    match (parse_gregorian_date(admission), parse_gregorian_date(discharge)) {
        (Ok(start), Ok(end)) => {
            let days = (end - start).num_days() + 1;
            days.max(1) as u32
        }
        _ => 1,
    }
}

/// Dates derived from the admission and discharge inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedDates {
    pub admission_date_gregorian: String,
    pub admission_date_hijri: String,
    pub discharge_date_gregorian: String,
    pub discharge_date_hijri: String,
    pub issue_date_gregorian: String,
}

impl ProcessedDates {
    /// New record with the derived date fields overriding `record`.
    pub fn merge_into(&self, record: &Record) -> Record {
        let derived = Record::new()
            .with(FieldKey::AdmissionDateGregorian, self.admission_date_gregorian.clone())
            .with(FieldKey::AdmissionDateHijri, self.admission_date_hijri.clone())
            .with(FieldKey::DischargeDateGregorian, self.discharge_date_gregorian.clone())
            .with(FieldKey::DischargeDateHijri, self.discharge_date_hijri.clone())
            .with(FieldKey::IssueDateGregorian, self.issue_date_gregorian.clone());
        record.merged(&derived)
    }
}

/// Derive Hijri dates and the issue date. The issue date is the discharge date.
pub fn process_dates(admission: &str, discharge: &str) -> ProcessedDates {
    ProcessedDates {
        admission_date_gregorian: admission.to_string(),
        admission_date_hijri: gregorian_to_hijri(admission),
        discharge_date_gregorian: discharge.to_string(),
        discharge_date_hijri: gregorian_to_hijri(discharge),
        issue_date_gregorian: discharge.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_first_separators() {
        assert_eq!(parse_gregorian("20-09-2025"), Some((20, 9, 2025)));
        assert_eq!(parse_gregorian("20/09/2025"), Some((20, 9, 2025)));
        assert_eq!(parse_gregorian("20.09.2025"), Some((20, 9, 2025)));
    }

    #[test]
    fn test_parse_year_first() {
        assert_eq!(parse_gregorian("2025-09-20"), Some((20, 9, 2025)));
        assert_eq!(parse_gregorian("2025/9/1"), Some((1, 9, 2025)));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(parse_gregorian("32-01-2025"), None);
        assert_eq!(parse_gregorian("01-13-2025"), None);
        assert_eq!(parse_gregorian("01-01-1899"), None);
        assert_eq!(parse_gregorian("01-01-2101"), None);
        assert_eq!(parse_gregorian("tomorrow"), None);
        assert_eq!(parse_gregorian(""), None);
    }

    #[test]
    fn test_known_conversions() {
        assert_eq!(gregorian_to_hijri("20-09-2025"), "27-03-1447");
        assert_eq!(gregorian_to_hijri("12-05-2025"), "14-11-1446");
    }

    #[test]
    fn test_fallback_on_garbage() {
        assert_eq!(gregorian_to_hijri("not a date"), FALLBACK_HIJRI_DATE);
        // passes the range check but is not a real day
        assert_eq!(gregorian_to_hijri("31-02-2025"), FALLBACK_HIJRI_DATE);
    }

    #[test]
    fn test_hijri_leap_years() {
        // 2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29 in each cycle
        let leaps: Vec<i32> = (1..=30).filter(|y| HijriDate::is_leap_year(*y)).collect();
        assert_eq!(leaps, vec![2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29]);
    }

    #[test]
    fn test_hijri_rejects_day_30_in_short_month() {
        assert!(HijriDate::new(30, 2, 1447).is_err());
        assert!(HijriDate::new(30, 1, 1447).is_ok());
    }

    #[test]
    fn test_format_hijri_arabic() {
        assert_eq!(format_hijri_arabic("27-03-1447"), "27 ربيع الأول 1447هـ");
        assert_eq!(format_hijri_arabic("01-13-1447"), "01-13-1447");
        assert_eq!(format_hijri_arabic("garbage"), "garbage");
    }

    #[test]
    fn test_duration_floor() {
        assert_eq!(compute_duration("20-09-2025", "21-09-2025"), 2);
        assert_eq!(compute_duration("20-09-2025", "20-09-2025"), 1);
        assert_eq!(compute_duration("21-09-2025", "20-09-2025"), 1);
        assert_eq!(compute_duration("", "?"), 1);
    }

    #[test]
    fn test_gregorian_month_names() {
        assert_eq!(gregorian_month_name_ar(9), Some("سبتمبر"));
        assert_eq!(gregorian_month_name_ar(0), None);
        assert_eq!(gregorian_month_name_ar(13), None);
    }
}
