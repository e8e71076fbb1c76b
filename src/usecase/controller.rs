use std::fmt;

use tracing::{debug, warn};

use crate::domain::entities::list_query::{
    FilterCriteria, FilterValue, PageWindow, SortSpec,
};
use crate::domain::entities::profile::ListProfile;
use crate::domain::entities::record::Record;
use crate::usecase::pipeline::comparator::sort_indices;
use crate::usecase::pipeline::paginator::paginate;
use crate::usecase::pipeline::predicate::{distinct_filter_values, filter_indices};

/// User interactions and data arrivals that drive a list view.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    SearchChanged(String),
    FilterChanged { key: String, value: FilterValue },
    FiltersCleared,
    SortChanged(SortSpec),
    SortToggled(String),
    PageChanged(usize),
    PageSizeChanged(usize),
    RecordsReplaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListControllerState {
    pub criteria: FilterCriteria,
    pub sort: SortSpec,
    pub window: PageWindow,
    /// Filtered and ordered indices into the record snapshot.
    pub visible: Vec<usize>,
}

impl ListControllerState {
    pub fn initial(records: &[Record], profile: &ListProfile, page_size: usize) -> Self {
        let state = Self {
            criteria: FilterCriteria::default(),
            sort: profile.default_sort(),
            window: PageWindow::new(1, page_size.max(1), 0),
            visible: Vec::new(),
        };
        recompute(state, records, profile)
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages()
    }
}

/// Applies one event. Every change to what is shown goes back to page 1;
/// page requests outside `1..=total_pages` leave the state untouched.
pub fn reduce(
    state: ListControllerState,
    event: &ListEvent,
    records: &[Record],
    profile: &ListProfile,
) -> ListControllerState {
    let mut next = state;
    match event {
        ListEvent::PageChanged(page) => {
            if next.window.contains_page(*page) {
                next.window.page = *page;
            } else {
                debug!(page, total_pages = next.total_pages(), "ignored page request");
            }
            return next;
        }
        ListEvent::PageSizeChanged(0) => return next,
        ListEvent::PageSizeChanged(page_size) => next.window.page_size = *page_size,
        ListEvent::SearchChanged(search) => next.criteria.search = search.clone(),
        ListEvent::FilterChanged { key, value } => next.criteria.set(key.clone(), value.clone()),
        ListEvent::FiltersCleared => next.criteria.clear(),
        ListEvent::SortChanged(sort) => next.sort = sort.clone(),
        ListEvent::SortToggled(field) => next.sort = next.sort.toggled_on(field),
        ListEvent::RecordsReplaced => {}
    }
    next.window.page = 1;
    recompute(next, records, profile)
}

fn recompute(
    mut state: ListControllerState,
    records: &[Record],
    profile: &ListProfile,
) -> ListControllerState {
    let mut visible = filter_indices(records, &state.criteria, profile);
    sort_indices(records, &mut visible, &state.sort);
    state.window = PageWindow::new(state.window.page, state.window.page_size, visible.len())
        .clamped();
    state.visible = visible;
    debug!(
        kind = %profile.kind,
        total = records.len(),
        matched = state.visible.len(),
        page = state.window.page,
        "recomputed list"
    );
    state
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub key: String,
    pub value: String,
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// Everything the view needs to render one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<'a> {
    pub items: Vec<&'a Record>,
    pub start_index: usize,
    pub end_index: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub unfiltered_count: usize,
    pub active_filters: Vec<ActiveFilter>,
    pub sort: &'a SortSpec,
}

impl ListSnapshot<'_> {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn filter_summary(&self) -> String {
        self.active_filters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Owns one list view: its profile, the current record snapshot and the
/// filter/sort/page state.
#[derive(Debug, Clone)]
pub struct ListController {
    profile: ListProfile,
    records: Vec<Record>,
    state: ListControllerState,
}

impl ListController {
    pub fn new(profile: ListProfile, page_size: usize) -> Self {
        Self::with_records(profile, page_size, Vec::new())
    }

    pub fn with_records(profile: ListProfile, page_size: usize, records: Vec<Record>) -> Self {
        let state = ListControllerState::initial(&records, &profile, page_size);
        Self {
            profile,
            records,
            state,
        }
    }

    pub fn profile(&self) -> &ListProfile {
        &self.profile
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn state(&self) -> &ListControllerState {
        &self.state
    }

    pub fn dispatch(&mut self, event: ListEvent) {
        self.state = reduce(self.state.clone(), &event, &self.records, &self.profile);
    }

    /// Swaps in a fresh snapshot from the data source.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.dispatch(ListEvent::RecordsReplaced);
    }

    /// Replaces the profile too, keeping the page size. Criteria and sort
    /// start over because filter keys differ between profiles.
    pub fn reset(&mut self, profile: ListProfile, records: Vec<Record>) {
        let page_size = self.state.window.page_size;
        *self = Self::with_records(profile, page_size, records);
    }

    /// The whole filtered and ordered set, across all pages.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.state.visible.iter().map(|&idx| &self.records[idx])
    }

    pub fn filter_options(&self, key: &str) -> Vec<String> {
        distinct_filter_values(&self.records, key, &self.profile)
    }

    pub fn snapshot(&self) -> ListSnapshot<'_> {
        let window = self.state.window;
        let (items, start_index, end_index) =
            match paginate(&self.state.visible, window.page, window.page_size) {
                Ok(slice) => (
                    slice
                        .items
                        .iter()
                        .map(|&idx| &self.records[idx])
                        .collect(),
                    slice.start_index,
                    slice.end_index,
                ),
                Err(err) => {
                    warn!(error = %err, "page window out of sync, showing empty page");
                    (Vec::new(), 0, 0)
                }
            };

        let criteria = &self.state.criteria;
        let mut active_filters = Vec::new();
        if !criteria.search_query().is_empty() {
            active_filters.push(ActiveFilter {
                key: "search".to_string(),
                value: criteria.search_query().to_string(),
            });
        }
        active_filters.extend(criteria.active_filters().map(|(key, value)| ActiveFilter {
            key: key.to_string(),
            value: value.to_string(),
        }));

        ListSnapshot {
            items,
            start_index,
            end_index,
            page: window.page,
            page_size: window.page_size,
            total_pages: window.total_pages(),
            total_count: self.state.visible.len(),
            unfiltered_count: self.records.len(),
            active_filters,
            sort: &self.state.sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::list_query::SortDirection;
    use crate::domain::entities::profile::{CategoricalFilter, RecordKind};
    use crate::domain::entities::record::FieldValue;
    use chrono::NaiveDate;

    const TEST_PROFILE: ListProfile = ListProfile {
        kind: RecordKind::Asset,
        search_fields: &["name"],
        categorical: &[CategoricalFilter {
            key: "status",
            field: "status",
            label: "Status",
        }],
        buckets: &[],
        required_fields: &["id"],
        columns: &["id", "name", "status"],
        default_sort: ("id", SortDirection::Asc),
    };

    fn numbered(count: i64) -> Vec<Record> {
        // Stored out of id order so sorting is observable.
        (1..=count)
            .rev()
            .map(|id| Record::new().with("id", id).with("name", format!("Item {id}")))
            .collect()
    }

    fn ids(snapshot: &ListSnapshot<'_>) -> Vec<i64> {
        snapshot
            .items
            .iter()
            .map(|record| match record.get("id") {
                Some(FieldValue::Number(id)) => *id as i64,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn pages_of_sorted_ids() {
        let mut controller = ListController::with_records(TEST_PROFILE, 10, numbered(25));
        controller.dispatch(ListEvent::SortChanged(SortSpec::asc("id")));

        let first = controller.snapshot();
        assert_eq!(ids(&first), (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_count, 25);

        controller.dispatch(ListEvent::PageChanged(3));
        let last = controller.snapshot();
        assert_eq!(ids(&last), vec![21, 22, 23, 24, 25]);
        assert_eq!((last.start_index, last.end_index), (20, 25));
    }

    #[test]
    fn filter_change_that_shrinks_results_returns_to_page_one() {
        let mut records = numbered(50);
        for record in records.iter_mut().take(3) {
            record.insert("status", "retired");
        }
        let mut controller = ListController::with_records(TEST_PROFILE, 10, records);
        controller.dispatch(ListEvent::PageChanged(4));
        assert_eq!(controller.state().window.page, 4);

        controller.dispatch(ListEvent::FilterChanged {
            key: "status".to_string(),
            value: FilterValue::parse("retired"),
        });

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.total_count, 3);
        assert_eq!(snapshot.total_pages, 1);
        assert_eq!(snapshot.items.len(), 3);
    }

    #[test]
    fn out_of_range_page_requests_are_ignored() {
        let mut controller = ListController::with_records(TEST_PROFILE, 10, numbered(25));
        controller.dispatch(ListEvent::PageChanged(2));
        let before = controller.state().clone();

        controller.dispatch(ListEvent::PageChanged(4));
        assert_eq!(controller.state(), &before);

        controller.dispatch(ListEvent::PageChanged(0));
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn empty_result_is_a_distinct_state() {
        let mut controller = ListController::with_records(TEST_PROFILE, 10, numbered(5));
        controller.dispatch(ListEvent::SearchChanged("no such asset".to_string()));

        let snapshot = controller.snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total_pages, 0);
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.unfiltered_count, 5);

        let before = controller.state().clone();
        controller.dispatch(ListEvent::PageChanged(1));
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn page_size_equal_to_total_yields_one_page() {
        let controller = ListController::with_records(TEST_PROFILE, 7, numbered(7));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.total_pages, 1);
        assert_eq!(snapshot.items.len(), 7);
        assert!(!snapshot.has_next());
    }

    #[test]
    fn concatenated_pages_equal_the_visible_set() {
        let mut controller = ListController::with_records(TEST_PROFILE, 4, numbered(18));
        controller.dispatch(ListEvent::SortChanged(SortSpec::desc("name")));
        let expected: Vec<Record> = controller.visible_records().cloned().collect();

        let mut rebuilt = Vec::new();
        for page in 1..=controller.state().total_pages() {
            controller.dispatch(ListEvent::PageChanged(page));
            rebuilt.extend(controller.snapshot().items.into_iter().cloned());
        }

        assert_eq!(rebuilt, expected);
        assert_eq!(rebuilt.len(), 18);
    }

    #[test]
    fn records_replaced_recomputes_and_resets_page() {
        let mut controller = ListController::with_records(TEST_PROFILE, 10, numbered(30));
        controller.dispatch(ListEvent::SearchChanged("1".to_string()));
        controller.dispatch(ListEvent::PageChanged(2));

        controller.replace_records(numbered(12));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.page, 1);
        // Items 1, 10, 11, 12 contain "1".
        assert_eq!(ids(&snapshot), vec![1, 10, 11, 12]);
    }

    #[test]
    fn sort_toggle_flips_direction_and_keeps_ties_stable() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("valid date");
        let later = NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("valid date");
        let records = vec![
            Record::new().with("id", 1_i64).with("created_at", day),
            Record::new().with("id", 2_i64).with("created_at", later),
            Record::new().with("id", 3_i64).with("created_at", day),
        ];
        let mut controller = ListController::with_records(TEST_PROFILE, 10, records);

        controller.dispatch(ListEvent::SortToggled("created_at".to_string()));
        assert_eq!(controller.state().sort, SortSpec::asc("created_at"));
        assert_eq!(ids(&controller.snapshot()), vec![1, 3, 2]);

        controller.dispatch(ListEvent::SortToggled("created_at".to_string()));
        assert_eq!(controller.state().sort, SortSpec::desc("created_at"));
        assert_eq!(ids(&controller.snapshot()), vec![2, 1, 3]);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_stored_order() {
        let mut controller = ListController::with_records(TEST_PROFILE, 10, numbered(3));
        let before: Vec<Record> = controller.visible_records().cloned().collect();

        controller.dispatch(ListEvent::SortChanged(SortSpec::asc("nonexistent")));
        controller.dispatch(ListEvent::FilterChanged {
            key: "nonexistent".to_string(),
            value: FilterValue::parse("x"),
        });

        let after: Vec<Record> = controller.visible_records().cloned().collect();
        assert_eq!(after.len(), 3);
        // Every record compares equal, so the stable sort yields stored order.
        assert_eq!(after, controller.records());
        let mut stored = before;
        stored.reverse();
        assert_eq!(after, stored, "stored order differs from the id asc default");
    }

    #[test]
    fn reducer_is_idempotent_for_repeated_criteria() {
        let records = numbered(15);
        let event = ListEvent::SearchChanged("item 1".to_string());
        let state = ListControllerState::initial(&records, &TEST_PROFILE, 5);

        let once = reduce(state, &event, &records, &TEST_PROFILE);
        let twice = reduce(once.clone(), &event, &records, &TEST_PROFILE);

        assert_eq!(once, twice);
    }

    #[test]
    fn page_size_change_resets_page_and_zero_is_ignored() {
        let mut controller = ListController::with_records(TEST_PROFILE, 5, numbered(20));
        controller.dispatch(ListEvent::PageChanged(3));

        controller.dispatch(ListEvent::PageSizeChanged(0));
        assert_eq!(controller.state().window.page, 3);
        assert_eq!(controller.state().window.page_size, 5);

        controller.dispatch(ListEvent::PageSizeChanged(8));
        assert_eq!(controller.state().window.page, 1);
        assert_eq!(controller.state().total_pages(), 3);
    }

    #[test]
    fn snapshot_summarises_active_filters() {
        let mut controller = ListController::with_records(TEST_PROFILE, 10, numbered(3));
        controller.dispatch(ListEvent::SearchChanged("  item ".to_string()));
        controller.dispatch(ListEvent::FilterChanged {
            key: "status".to_string(),
            value: FilterValue::parse("active"),
        });

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.filter_summary(), "search: item, status: active");

        controller.dispatch(ListEvent::FiltersCleared);
        assert!(controller.snapshot().active_filters.is_empty());
        assert_eq!(controller.snapshot().total_count, 3);
    }
}
