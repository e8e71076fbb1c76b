use std::collections::BTreeMap;

/// Filter value meaning "no constraint".
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    All,
    Exact(String),
}

impl FilterValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            FilterValue::All
        } else {
            FilterValue::Exact(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterValue::All => ALL_SENTINEL,
            FilterValue::Exact(value) => value,
        }
    }
}

/// Active constraints of a list view. Criteria combine with AND; a key that
/// is absent or set to `All` imposes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub search: String,
    pub filters: BTreeMap<String, FilterValue>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        if value.is_all() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> &FilterValue {
        static ALL: FilterValue = FilterValue::All;
        self.filters.get(key).unwrap_or(&ALL)
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.filters.clear();
    }

    pub fn search_query(&self) -> &str {
        self.search.trim()
    }

    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, value)| !value.is_all())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// The single active ordering of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Header-click semantics: the same field flips direction, another field
    /// starts ascending.
    pub fn toggled_on(&self, field: &str) -> Self {
        if self.field == field {
            Self::new(field, self.direction.toggled())
        } else {
            Self::asc(field)
        }
    }
}

/// Page position within a result set of `total` items.
///
/// An empty result set has zero pages and sits on page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl PageWindow {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        Self {
            page,
            page_size,
            total,
        }
    }

    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    pub fn contains_page(&self, page: usize) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    pub fn clamped(self) -> Self {
        let last_page = self.total_pages().max(1);
        Self {
            page: self.page.clamp(1, last_page),
            ..self
        }
    }

    pub fn start_index(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(self.total)
    }

    pub fn end_index(&self) -> usize {
        self.start_index()
            .saturating_add(self.page_size)
            .min(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_value_parse_treats_blank_and_all_as_unconstrained() {
        assert_eq!(FilterValue::parse(""), FilterValue::All);
        assert_eq!(FilterValue::parse(" ALL "), FilterValue::All);
        assert_eq!(
            FilterValue::parse(" active "),
            FilterValue::Exact("active".to_string())
        );
    }

    #[test]
    fn setting_all_removes_the_key() {
        let mut criteria =
            FilterCriteria::new().with_filter("status", FilterValue::parse("active"));
        assert_eq!(criteria.active_filters().count(), 1);

        criteria.set("status", FilterValue::All);

        assert!(criteria.filters.is_empty());
        assert_eq!(criteria.active_filters().count(), 0);
    }

    #[test]
    fn page_window_uses_zero_pages_for_empty_results() {
        let window = PageWindow::new(4, 10, 0);
        assert_eq!(window.total_pages(), 0);
        assert!(!window.contains_page(1));
        assert_eq!(window.clamped().page, 1);
    }

    #[test]
    fn page_window_rounds_pages_up_and_clamps_to_last() {
        let window = PageWindow::new(9, 10, 25);
        assert_eq!(window.total_pages(), 3);
        assert_eq!(window.clamped().page, 3);
        assert_eq!(PageWindow::new(3, 10, 25).start_index(), 20);
        assert_eq!(PageWindow::new(3, 10, 25).end_index(), 25);
    }

    #[test]
    fn sort_toggle_flips_same_field_and_resets_new_field() {
        let sort = SortSpec::asc("name");
        assert_eq!(sort.toggled_on("name"), SortSpec::desc("name"));
        assert_eq!(SortSpec::desc("name").toggled_on("id"), SortSpec::asc("id"));
    }
}
