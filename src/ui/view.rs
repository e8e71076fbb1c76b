use crate::domain::entities::list_query::SortDirection;
use crate::ui::format::{column_alignment, format_field_value};
use crate::usecase::controller::ListSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub align: &'static str,
    /// `▲`/`▼` on the sorted column, empty otherwise.
    pub sort_marker: &'static str,
}

/// Owned rendering input for one page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub total_pages: usize,
    pub page_label: String,
    pub range_label: String,
    pub filter_summary: String,
    pub empty_message: Option<String>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl TableView {
    pub fn from_snapshot(snapshot: &ListSnapshot<'_>, columns: &[String]) -> Self {
        let table_columns = columns
            .iter()
            .map(|name| TableColumn {
                name: name.clone(),
                align: column_alignment(name, &snapshot.items),
                sort_marker: if snapshot.sort.field == *name {
                    match snapshot.sort.direction {
                        SortDirection::Asc => "▲",
                        SortDirection::Desc => "▼",
                    }
                } else {
                    ""
                },
            })
            .collect();

        let rows = snapshot
            .items
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| format_field_value(column, record.get(column)))
                    .collect()
            })
            .collect();

        let empty_message = if !snapshot.is_empty() {
            None
        } else if snapshot.unfiltered_count == 0 {
            Some("No records loaded.".to_string())
        } else {
            Some("No records match the current search and filters.".to_string())
        };

        Self {
            columns: table_columns,
            rows,
            page: snapshot.page,
            total_pages: snapshot.total_pages,
            page_label: format!("Page {} of {}", snapshot.page, snapshot.total_pages.max(1)),
            range_label: range_label(snapshot),
            filter_summary: snapshot.filter_summary(),
            empty_message,
            has_previous: snapshot.has_previous(),
            has_next: snapshot.has_next(),
        }
    }
}

fn range_label(snapshot: &ListSnapshot<'_>) -> String {
    let shown = if snapshot.total_count == 0 {
        "0 records".to_string()
    } else {
        format!(
            "{}-{} of {}",
            snapshot.start_index + 1,
            snapshot.end_index,
            snapshot.total_count
        )
    };
    if snapshot.total_count == snapshot.unfiltered_count {
        shown
    } else {
        format!("{shown} (filtered from {})", snapshot.unfiltered_count)
    }
}
