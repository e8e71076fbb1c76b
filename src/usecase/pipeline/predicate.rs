use std::collections::BTreeSet;

use crate::domain::entities::list_query::{FilterCriteria, FilterValue};
use crate::domain::entities::profile::{FilterTarget, ListProfile};
use crate::domain::entities::record::Record;

/// Whether `record` satisfies every active criterion.
pub fn matches(record: &Record, criteria: &FilterCriteria, profile: &ListProfile) -> bool {
    matches_search(record, criteria.search_query(), profile.search_fields)
        && criteria
            .filters
            .iter()
            .all(|(key, value)| matches_criterion(record, key, value, profile))
}

/// Indices of the matching records, in input order.
pub fn filter_indices(
    records: &[Record],
    criteria: &FilterCriteria,
    profile: &ListProfile,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, criteria, profile))
        .map(|(idx, _)| idx)
        .collect()
}

fn matches_search(record: &Record, query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields.iter().any(|field| {
        record
            .get(field)
            .map(|value| value.search_text().to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

fn matches_criterion(
    record: &Record,
    key: &str,
    value: &FilterValue,
    profile: &ListProfile,
) -> bool {
    let FilterValue::Exact(expected) = value else {
        return true;
    };
    // Keys the profile does not define constrain nothing.
    let Some(target) = profile.resolve_filter(key) else {
        return true;
    };

    match target {
        FilterTarget::Field(field) => record
            .get(field)
            .and_then(|value| value.filter_key())
            .is_some_and(|actual| actual == *expected),
        FilterTarget::Bucket(rule) => record
            .get(rule.source_field)
            .and_then(|value| value.filter_key())
            .and_then(|raw| rule.bucket_of(&raw))
            .is_some_and(|bucket| bucket == expected.as_str()),
    }
}

/// Choices offered for a filter key, sorted and de-duplicated. Bucket keys
/// list their bucket names; unknown keys have none.
pub fn distinct_filter_values(
    records: &[Record],
    key: &str,
    profile: &ListProfile,
) -> Vec<String> {
    match profile.resolve_filter(key) {
        Some(FilterTarget::Field(field)) => records
            .iter()
            .filter_map(|record| record.get(field).and_then(|value| value.filter_key()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        Some(FilterTarget::Bucket(rule)) => rule
            .bucket_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
