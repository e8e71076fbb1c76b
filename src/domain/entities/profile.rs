use std::fmt;

use crate::domain::entities::list_query::{SortDirection, SortSpec};
use crate::domain::entities::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    User,
    Asset,
    Advertisement,
    Contract,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::User,
        RecordKind::Asset,
        RecordKind::Advertisement,
        RecordKind::Contract,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::User => "users",
            RecordKind::Asset => "assets",
            RecordKind::Advertisement => "advertisements",
            RecordKind::Contract => "contracts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::User => "Users",
            RecordKind::Asset => "Assets",
            RecordKind::Advertisement => "Advertisements",
            RecordKind::Contract => "Contracts",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn profile(self) -> ListProfile {
        match self {
            RecordKind::User => USERS_PROFILE,
            RecordKind::Asset => ASSETS_PROFILE,
            RecordKind::Advertisement => ADVERTISEMENTS_PROFILE,
            RecordKind::Contract => CONTRACTS_PROFILE,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter key compared exactly against one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalFilter {
    pub key: &'static str,
    pub field: &'static str,
    pub label: &'static str,
}

/// Filter key that groups several raw values of `source_field` into one
/// logical bucket before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRule {
    pub key: &'static str,
    pub source_field: &'static str,
    pub label: &'static str,
    pub buckets: &'static [(&'static str, &'static str)],
}

impl BucketRule {
    pub fn bucket_of(&self, raw: &str) -> Option<&'static str> {
        let raw = raw.trim();
        self.buckets
            .iter()
            .find(|(value, _)| value.eq_ignore_ascii_case(raw))
            .map(|(_, bucket)| *bucket)
    }

    /// Bucket names in first-seen order, without duplicates.
    pub fn bucket_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for (_, bucket) in self.buckets {
            if !names.contains(bucket) {
                names.push(*bucket);
            }
        }
        names
    }
}

/// What a filter key resolves to in a given profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Field(&'static str),
    Bucket(BucketRule),
}

/// Per-page list configuration: which fields search covers, which filter
/// keys exist, and what ingest must guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProfile {
    pub kind: RecordKind,
    pub search_fields: &'static [&'static str],
    pub categorical: &'static [CategoricalFilter],
    pub buckets: &'static [BucketRule],
    pub required_fields: &'static [&'static str],
    pub columns: &'static [&'static str],
    pub default_sort: (&'static str, SortDirection),
}

impl ListProfile {
    pub fn resolve_filter(&self, key: &str) -> Option<FilterTarget> {
        if let Some(filter) = self.categorical.iter().find(|filter| filter.key == key) {
            return Some(FilterTarget::Field(filter.field));
        }
        self.buckets
            .iter()
            .find(|rule| rule.key == key)
            .copied()
            .map(FilterTarget::Bucket)
    }

    pub fn filter_keys(&self) -> Vec<(&'static str, &'static str)> {
        self.categorical
            .iter()
            .map(|filter| (filter.key, filter.label))
            .chain(self.buckets.iter().map(|rule| (rule.key, rule.label)))
            .collect()
    }

    pub fn default_sort(&self) -> SortSpec {
        let (field, direction) = self.default_sort;
        SortSpec::new(field, direction)
    }

    /// First required field that is absent or null on `record`.
    pub fn missing_required_field(&self, record: &Record) -> Option<&'static str> {
        self.required_fields
            .iter()
            .copied()
            .find(|field| record.value(field).is_none())
    }
}

const STATUS_FILTER: CategoricalFilter = CategoricalFilter {
    key: "status",
    field: "status",
    label: "Status",
};

const PARK_FILTER: CategoricalFilter = CategoricalFilter {
    key: "park",
    field: "park_id",
    label: "Park",
};

const TYPE_FILTER: CategoricalFilter = CategoricalFilter {
    key: "type",
    field: "type",
    label: "Type",
};

pub const USERS_PROFILE: ListProfile = ListProfile {
    kind: RecordKind::User,
    search_fields: &["name", "email"],
    categorical: &[
        CategoricalFilter {
            key: "role",
            field: "role",
            label: "Role",
        },
        STATUS_FILTER,
    ],
    buckets: &[BucketRule {
        key: "access",
        source_field: "role",
        label: "Access",
        buckets: &[
            ("admin", "administrators"),
            ("park_manager", "administrators"),
            ("staff", "staff"),
            ("inspector", "staff"),
            ("maintenance", "staff"),
            ("citizen", "citizens"),
            ("vendor", "citizens"),
        ],
    }],
    required_fields: &["id", "name", "email", "role"],
    columns: &["id", "name", "email", "role", "status", "created_at"],
    default_sort: ("id", SortDirection::Asc),
};

pub const ASSETS_PROFILE: ListProfile = ListProfile {
    kind: RecordKind::Asset,
    search_fields: &["name", "description", "serial_number"],
    categorical: &[
        PARK_FILTER,
        CategoricalFilter {
            key: "category",
            field: "category",
            label: "Category",
        },
        STATUS_FILTER,
    ],
    buckets: &[],
    required_fields: &["id", "name", "park_id"],
    columns: &[
        "id",
        "name",
        "category",
        "park_id",
        "status",
        "serial_number",
        "acquired_at",
        "value",
    ],
    default_sort: ("id", SortDirection::Asc),
};

pub const ADVERTISEMENTS_PROFILE: ListProfile = ListProfile {
    kind: RecordKind::Advertisement,
    search_fields: &["title", "description"],
    categorical: &[
        CategoricalFilter {
            key: "campaign",
            field: "campaign_id",
            label: "Campaign",
        },
        TYPE_FILTER,
        STATUS_FILTER,
    ],
    buckets: &[],
    required_fields: &["id", "title", "campaign_id"],
    columns: &[
        "id",
        "title",
        "campaign_id",
        "type",
        "status",
        "start_date",
        "end_date",
    ],
    default_sort: ("id", SortDirection::Asc),
};

pub const CONTRACTS_PROFILE: ListProfile = ListProfile {
    kind: RecordKind::Contract,
    search_fields: &["concessionaire", "description"],
    categorical: &[PARK_FILTER, TYPE_FILTER, STATUS_FILTER],
    buckets: &[BucketRule {
        key: "lifecycle",
        source_field: "status",
        label: "Lifecycle",
        buckets: &[
            ("draft", "pending"),
            ("pending_review", "pending"),
            ("active", "current"),
            ("renewed", "current"),
            ("expired", "closed"),
            ("terminated", "closed"),
        ],
    }],
    required_fields: &["id", "concessionaire", "park_id"],
    columns: &[
        "id",
        "concessionaire",
        "park_id",
        "type",
        "status",
        "start_date",
        "end_date",
        "monthly_fee",
    ],
    default_sort: ("id", SortDirection::Asc),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::FieldValue;

    #[test]
    fn record_kind_parses_its_own_names() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(RecordKind::parse(" Contracts "), Some(RecordKind::Contract));
        assert_eq!(RecordKind::parse("permits"), None);
    }

    #[test]
    fn resolve_filter_distinguishes_fields_buckets_and_unknown_keys() {
        let profile = RecordKind::User.profile();
        assert_eq!(profile.resolve_filter("role"), Some(FilterTarget::Field("role")));
        assert!(matches!(
            profile.resolve_filter("access"),
            Some(FilterTarget::Bucket(rule)) if rule.source_field == "role"
        ));
        assert_eq!(profile.resolve_filter("park"), None);

        let assets = RecordKind::Asset.profile();
        assert_eq!(assets.resolve_filter("park"), Some(FilterTarget::Field("park_id")));
    }

    #[test]
    fn bucket_rule_maps_raw_values_case_insensitively() {
        let rule = USERS_PROFILE.buckets[0];
        assert_eq!(rule.bucket_of("Park_Manager"), Some("administrators"));
        assert_eq!(rule.bucket_of("inspector"), Some("staff"));
        assert_eq!(rule.bucket_of("robot"), None);
        assert_eq!(
            rule.bucket_names(),
            vec!["administrators", "staff", "citizens"]
        );
    }

    #[test]
    fn missing_required_field_treats_null_as_missing() {
        let record = Record::new()
            .with("id", 1_i64)
            .with("name", "Ana")
            .with("email", FieldValue::Null)
            .with("role", "admin");
        assert_eq!(USERS_PROFILE.missing_required_field(&record), Some("email"));
    }
}
