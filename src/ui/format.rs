use chrono::{NaiveDateTime, NaiveTime};

use crate::domain::entities::record::{format_number, FieldValue, Record};

const MONEY_MARKERS: [&str; 6] = ["amount", "fee", "price", "cost", "budget", "value"];

pub fn format_number_with_commas(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = formatted.chars().all(|ch| ch == '0' || ch == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    match frac_part {
        Some(frac_part) => format!("{sign}{grouped}.{frac_part}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn is_identifier_column(column: &str) -> bool {
    column == "id" || column.ends_with("_id")
}

pub fn is_money_column(column: &str) -> bool {
    let column = column.to_ascii_lowercase();
    !is_identifier_column(&column) && MONEY_MARKERS.iter().any(|marker| column.contains(marker))
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Display text of one table cell.
pub fn format_field_value(column: &str, value: Option<&FieldValue>) -> String {
    match value {
        None | Some(FieldValue::Null) => String::new(),
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Bool(flag)) => (if *flag { "yes" } else { "no" }).to_string(),
        Some(FieldValue::Date(date)) => format_timestamp(date),
        Some(FieldValue::Number(number)) if is_money_column(column) => {
            format_number_with_commas(*number, 2)
        }
        Some(FieldValue::Number(number)) => format_number(*number),
    }
}

/// Numeric columns align right unless they hold identifiers.
pub fn column_alignment(column: &str, records: &[&Record]) -> &'static str {
    if is_identifier_column(column) {
        return "left";
    }
    let mut values = records
        .iter()
        .filter_map(|record| record.value(column))
        .peekable();
    if values.peek().is_none() {
        return "left";
    }
    if values.all(|value| matches!(value, FieldValue::Number(_))) {
        "right"
    } else {
        "left"
    }
}

pub fn table_container_style() -> &'static str {
    "overflow: auto; max-height: 70vh; border: 1px solid #ddd; border-radius: 6px;"
}

pub fn table_header_cell_style() -> &'static str {
    "position: sticky; top: 0; background: #f5f5f5; border-bottom: 1px solid #ccc; padding: 6px 10px; text-align: left; cursor: pointer; white-space: nowrap;"
}

pub fn table_cell_style(align: &str) -> String {
    format!("border-bottom: 1px solid #eee; padding: 6px 10px; text-align: {align}; white-space: nowrap;")
}
