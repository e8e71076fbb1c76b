use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Integers wider than this are not exact in an f64.
const MAX_EXACT_DIGITS: usize = 15;

/// One cell of a record. Values are classified once at ingest and never
/// re-parsed inside the list pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Classifies raw text coming from a CSV or spreadsheet cell.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return FieldValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return FieldValue::Bool(false);
        }
        if let Some(number) = parse_number(trimmed) {
            return FieldValue::Number(number);
        }
        if let Some(date) = parse_date(trimmed) {
            return FieldValue::Date(date);
        }
        FieldValue::Text(trimmed.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "bool",
            FieldValue::Date(_) => "date",
            FieldValue::Null => "null",
        }
    }

    /// Text matched by free-text search. `Null` searches as an empty string.
    pub fn search_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Exact key compared by categorical filters.
    pub fn filter_key(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Natural ordering between two non-null values. Values of different
    /// types order by type rank.
    pub fn natural_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Date(_) => 2,
            FieldValue::Text(_) => 3,
            FieldValue::Null => 4,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => write!(f, "{value}"),
            FieldValue::Number(value) => write!(f, "{}", format_number(*value)),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Date(value) => write!(f, "{}", format_date(value)),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn format_date(value: &NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut chars = digits.chars();
    // "0050" style codes are identifiers, not numbers.
    if let (Some('0'), Some(next)) = (chars.next(), chars.next()) {
        if next.is_ascii_digit() {
            return None;
        }
    }
    if !digits.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let integral = digits.split(['.', 'e', 'E']).next().unwrap_or(digits);
    if integral.len() > MAX_EXACT_DIGITS {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date_time);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date_time| date_time.naive_utc())
}

/// One row of domain data addressed by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Present and non-null.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).filter(|value| !value.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_classifies_raw_cells() {
        assert_eq!(FieldValue::infer("  "), FieldValue::Null);
        assert_eq!(FieldValue::infer("TRUE"), FieldValue::Bool(true));
        assert_eq!(FieldValue::infer("42"), FieldValue::Number(42.0));
        assert_eq!(FieldValue::infer("-3.5"), FieldValue::Number(-3.5));
        assert_eq!(FieldValue::infer("0.25"), FieldValue::Number(0.25));
        assert_eq!(FieldValue::infer("0050"), FieldValue::text("0050"));
        assert_eq!(FieldValue::infer("inf"), FieldValue::text("inf"));
        assert_eq!(FieldValue::infer("Central Park"), FieldValue::text("Central Park"));
    }

    #[test]
    fn infer_trims_text_cells() {
        assert_eq!(FieldValue::infer(" active "), FieldValue::text("active"));
        assert_eq!(
            FieldValue::infer("\tCentral Park "),
            FieldValue::text("Central Park")
        );
    }

    #[test]
    fn infer_keeps_wide_integers_as_text() {
        assert_eq!(
            FieldValue::infer("9007199254740993"),
            FieldValue::text("9007199254740993")
        );
        assert_eq!(
            FieldValue::infer("9007199254740993").filter_key(),
            Some("9007199254740993".to_string())
        );
        assert_eq!(
            FieldValue::infer("999999999999999"),
            FieldValue::Number(999_999_999_999_999.0)
        );
        assert_eq!(FieldValue::infer("1.5e20"), FieldValue::Number(1.5e20));
    }

    #[test]
    fn infer_reads_iso_and_rfc3339_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        assert_eq!(FieldValue::infer("2024-03-01"), FieldValue::Date(date));

        let with_time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .expect("valid date time");
        assert_eq!(
            FieldValue::infer("2024-03-01T10:30:00"),
            FieldValue::Date(with_time)
        );
        assert_eq!(
            FieldValue::infer("2024-03-01T12:30:00+02:00"),
            FieldValue::Date(with_time)
        );
    }

    #[test]
    fn dates_keep_milliseconds() {
        let late = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_milli_opt(10, 30, 0, 750))
            .expect("valid date time");
        assert_eq!(
            FieldValue::infer("2024-03-01T10:30:00.750Z"),
            FieldValue::Date(late)
        );
        assert_eq!(
            FieldValue::infer("2024-03-01T10:30:00.750"),
            FieldValue::Date(late)
        );
        assert_eq!(format_date(&late), "2024-03-01T10:30:00.750");
        assert!(
            FieldValue::infer("2024-03-01T10:30:00.250Z").natural_cmp(&FieldValue::Date(late))
                == Ordering::Less
        );
    }

    #[test]
    fn filter_key_renders_integral_numbers_without_fraction() {
        assert_eq!(FieldValue::Number(3.0).filter_key(), Some("3".to_string()));
        assert_eq!(FieldValue::Number(2.5).filter_key(), Some("2.5".to_string()));
        assert_eq!(FieldValue::Null.filter_key(), None);
    }

    #[test]
    fn natural_cmp_orders_by_type_then_value() {
        assert_eq!(
            FieldValue::Number(2.0).natural_cmp(&FieldValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::text("b").natural_cmp(&FieldValue::text("a")),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Number(99.0).natural_cmp(&FieldValue::text("1")),
            Ordering::Less
        );
    }
}
