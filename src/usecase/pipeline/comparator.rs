use std::cmp::Ordering;

use crate::domain::entities::list_query::{SortDirection, SortSpec};
use crate::domain::entities::record::{FieldValue, Record};

/// Orders two records on the active sort field. Missing and null values sort
/// last in both directions.
pub fn compare(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    compare_values(a.get(&sort.field), b.get(&sort.field), sort.direction)
}

pub fn compare_values(
    a: Option<&FieldValue>,
    b: Option<&FieldValue>,
    direction: SortDirection,
) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let natural = a.natural_cmp(b);
            match direction {
                SortDirection::Asc => natural,
                SortDirection::Desc => natural.reverse(),
            }
        }
    }
}

/// Stable in-place sort of record indices.
pub fn sort_indices(records: &[Record], indices: &mut [usize], sort: &SortSpec) {
    indices.sort_by(|&left, &right| compare(&records[left], &records[right], sort));
}
