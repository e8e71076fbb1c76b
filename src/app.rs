use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::config::{AppConfig, PAGE_SIZE_CHOICES};
use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::list_query::{FilterValue, SortSpec, ALL_SENTINEL};
use crate::domain::entities::profile::RecordKind;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::format::{table_cell_style, table_container_style, table_header_cell_style};
use crate::ui::state::app_state::AppState;
use crate::ui::view::TableView;
use crate::usecase::controller::{ListController, ListEvent};
use crate::usecase::ports::repo::{CollectionMeta, RecordRepository};
use crate::usecase::services::collection_service::CollectionService;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::import_service::{read_record_file, ImportService};
use crate::usecase::services::query_service::QueryService;

const NONE_OPTION_VALUE: &str = "__none__";
const BUTTON_STYLE: &str =
    "padding: 4px 10px; border: 1px solid #bbb; background: #fff; border-radius: 6px; cursor: pointer;";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DropdownId {
    Collection,
    ImportKind,
    Filter(&'static str),
    Sort,
    PageSize,
}

#[derive(Clone, Debug, PartialEq)]
struct DropdownOption {
    value: String,
    label: String,
}

fn dropdown_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected
        .and_then(|value| options.iter().find(|opt| opt.value == value))
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| "(none)".to_string())
}

#[component]
fn DropdownSelect(
    id: DropdownId,
    label: &'static str,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    mut open_dropdown: Signal<Option<DropdownId>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let selected_label = dropdown_label(&options, selected.as_deref());
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "{BUTTON_STYLE}",
                onclick: move |event| {
                    event.stop_propagation();
                    if open_dropdown() == Some(id) {
                        open_dropdown.set(None);
                        return;
                    }
                    let point = event.client_coordinates();
                    dropdown_pos.set(Some((point.x, point.y + 24.0)));
                    open_dropdown.set(Some(id));
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "position: fixed; left: {left}px; top: {top}px; min-width: 200px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                onclick: move |event| event.stop_propagation(),
                {options.iter().map(|opt| {
                    let value = opt.value.clone();
                    let label = opt.label.clone();
                    let is_selected = selected.as_deref() == Some(value.as_str());
                    let background = if is_selected { "#eef4ff" } else { "transparent" };
                    rsx!(
                        div {
                            style: "padding: 8px 10px; cursor: pointer; background: {background};",
                            onclick: move |_| {
                                on_select.call(value.clone());
                                open_dropdown.set(None);
                            },
                            "{label}"
                        }
                    )
                })}
            }
        }
    }
}

struct Services {
    repo: Arc<dyn RecordRepository>,
    query: QueryService,
    import: ImportService,
    collections: CollectionService,
}

impl Services {
    fn new(config: &AppConfig) -> Self {
        let repo: Arc<dyn RecordRepository> = Arc::new(SqliteRepo::new(config.db_path.clone()));
        Self {
            query: QueryService::new(repo.clone()),
            import: ImportService::new(repo.clone()),
            collections: CollectionService::new(repo.clone()),
            repo,
        }
    }
}

fn collection_label(meta: &CollectionMeta) -> String {
    let deleted = if meta.deleted_at.is_some() {
        " [deleted]"
    } else {
        ""
    };
    format!(
        "#{} {} ({}, {} records){deleted}",
        meta.id.0,
        meta.name,
        meta.kind.label(),
        meta.record_count
    )
}

fn refresh_collections(services: &Services, mut state: AppState) {
    let include_deleted = *state.show_deleted.peek();
    match run_blocking("list collections", || {
        services.query.list_collections(include_deleted)
    }) {
        Ok(list) => state.collections.set(list),
        Err(err) => state.status.set(format!("Failed to list collections: {err}")),
    }
}

/// Shows `id` (or nothing) in the list view. Search text and criteria start
/// over for the new collection.
fn open_collection(services: &Services, mut state: AppState, id: Option<CollectionId>) {
    state.search_debouncer.write().cancel();
    state.search_input.set(String::new());
    state.selected_collection.set(id);

    let Some(id) = id else {
        let page_size = state.controller.peek().state().window.page_size;
        state
            .controller
            .set(ListController::new(RecordKind::User.profile(), page_size));
        state.columns.set(Vec::new());
        state.rename_input.set(String::new());
        return;
    };

    let result = run_blocking("open collection", || {
        let mut controller = state.controller.write();
        services.query.open_into(id, &mut controller)
    });
    match result {
        Ok(columns) => {
            let name = state
                .collections
                .peek()
                .iter()
                .find(|meta| meta.id == id)
                .map(|meta| meta.name.clone())
                .unwrap_or_default();
            let count = state.controller.peek().records().len();
            state.columns.set(columns);
            state.status.set(format!("Opened {name} ({count} records)"));
            state.rename_input.set(name);
        }
        Err(err) => {
            state.columns.set(Vec::new());
            state.status.set(format!("Failed to open collection: {err}"));
        }
    }
}

fn first_collection(state: AppState) -> Option<CollectionId> {
    state.collections.peek().first().map(|meta| meta.id)
}

fn confirm(title: &str, description: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let mut state = AppState::new(&config);
    let services = use_hook(|| Arc::new(Services::new(&config)));
    let mut open_dropdown = use_signal(|| None::<DropdownId>);
    let dropdown_pos = use_signal(|| None::<(f64, f64)>);

    let services_for_init = services.clone();
    use_effect(move || {
        state.busy.set(true);
        match run_blocking("init store", || services_for_init.repo.init()) {
            Ok(()) => {
                refresh_collections(&services_for_init, state);
                let first = first_collection(state);
                open_collection(&services_for_init, state, first);
            }
            Err(err) => {
                state
                    .status
                    .set(format!("Failed to initialize the record store: {err}"));
            }
        }
        state.busy.set(false);
    });

    let columns = state.columns.read().clone();
    let (view, filter_controls, sort) = {
        let controller = state.controller.read();
        let snapshot = controller.snapshot();
        let view = TableView::from_snapshot(&snapshot, &columns);
        let filter_controls = controller
            .profile()
            .filter_keys()
            .into_iter()
            .map(|(key, label)| {
                let options = std::iter::once(DropdownOption {
                    value: ALL_SENTINEL.to_string(),
                    label: "All".to_string(),
                })
                .chain(
                    controller
                        .filter_options(key)
                        .into_iter()
                        .map(|value| DropdownOption {
                            value: value.clone(),
                            label: value,
                        }),
                )
                .collect::<Vec<_>>();
                let selected = controller.state().criteria.get(key).as_str().to_string();
                (key, label, options, selected)
            })
            .collect::<Vec<_>>();
        (view, filter_controls, controller.state().sort.clone())
    };

    let collections = state.collections.read().clone();
    let selected_meta = (state.selected_collection)()
        .and_then(|id| collections.iter().find(|meta| meta.id == id).cloned());
    let collection_options = std::iter::once(DropdownOption {
        value: NONE_OPTION_VALUE.to_string(),
        label: "(none)".to_string(),
    })
    .chain(collections.iter().map(|meta| DropdownOption {
        value: meta.id.0.to_string(),
        label: collection_label(meta),
    }))
    .collect::<Vec<_>>();
    let kind_options = RecordKind::ALL
        .iter()
        .map(|kind| DropdownOption {
            value: kind.as_str().to_string(),
            label: kind.label().to_string(),
        })
        .collect::<Vec<_>>();
    let sort_options = columns
        .iter()
        .map(|column| DropdownOption {
            value: column.clone(),
            label: column.clone(),
        })
        .collect::<Vec<_>>();
    let page_size_options = PAGE_SIZE_CHOICES
        .iter()
        .map(|size| DropdownOption {
            value: size.to_string(),
            label: format!("{size} / page"),
        })
        .collect::<Vec<_>>();
    let page_size = state.controller.read().state().window.page_size;
    let table_rows: Vec<Vec<(String, String)>> = view
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(view.columns.iter())
                .map(|(cell, column)| (table_cell_style(column.align), cell.clone()))
                .collect()
        })
        .collect();
    let status_text = state.status.read().clone();

    let services_for_collection = services.clone();
    let services_for_import = services.clone();
    let services_for_show_deleted = services.clone();
    let services_for_reload = services.clone();
    let services_for_replace = services.clone();
    let services_for_rename = services.clone();
    let services_for_delete = services.clone();
    let services_for_purge = services.clone();

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 16px;",
            onclick: move |_| open_dropdown.set(None),

            div {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; margin-bottom: 12px;",
                DropdownSelect {
                    id: DropdownId::Collection,
                    label: "Collection",
                    options: collection_options.clone(),
                    selected: Some(
                        (state.selected_collection)()
                            .map(|id| id.0.to_string())
                            .unwrap_or_else(|| NONE_OPTION_VALUE.to_string()),
                    ),
                    open_dropdown: open_dropdown,
                    dropdown_pos: dropdown_pos,
                    on_select: move |value: String| {
                        let next = value.parse::<i64>().ok().map(CollectionId);
                        open_collection(&services_for_collection, state, next);
                    }
                }
                label {
                    input {
                        r#type: "checkbox",
                        checked: (state.show_deleted)(),
                        onchange: move |event| {
                            let checked = event.value().parse::<bool>().unwrap_or(false);
                            state.show_deleted.set(checked);
                            refresh_collections(&services_for_show_deleted, state);
                        }
                    }
                    "Show deleted"
                }
                DropdownSelect {
                    id: DropdownId::ImportKind,
                    label: "Import as",
                    options: kind_options.clone(),
                    selected: Some((state.import_kind)().as_str().to_string()),
                    open_dropdown: open_dropdown,
                    dropdown_pos: dropdown_pos,
                    on_select: move |value: String| {
                        if let Some(kind) = RecordKind::parse(&value) {
                            state.import_kind.set(kind);
                        }
                    }
                }
                button {
                    style: "{BUTTON_STYLE}",
                    disabled: (state.busy)(),
                    onclick: move |_| {
                        let Some(file_path) = FileDialog::new()
                            .add_filter("Records", &["csv", "xlsx", "json"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        else {
                            return;
                        };
                        let kind = *state.import_kind.peek();
                        state.busy.set(true);
                        state.status.set(format!("Importing {}", file_path.display()));
                        match run_blocking("import records", || {
                            services_for_import.import.import_file(&file_path, kind)
                        }) {
                            Ok(result) => {
                                refresh_collections(&services_for_import, state);
                                open_collection(&services_for_import, state, Some(result.collection_id));
                                state.status.set(format!(
                                    "Imported {} {} records",
                                    result.record_count,
                                    kind.label().to_lowercase()
                                ));
                            }
                            Err(err) => {
                                state.status.set(format!("Import failed: {err:#}"));
                            }
                        }
                        state.busy.set(false);
                    },
                    "Import…"
                }
                button {
                    style: "{BUTTON_STYLE}",
                    disabled: (state.busy)() || (state.selected_collection)().is_none(),
                    onclick: move |_| {
                        let Some(file_path) = FileDialog::new()
                            .add_filter("CSV", &["csv"])
                            .set_file_name("records.csv")
                            .save_file()
                        else {
                            return;
                        };
                        let result = run_blocking("export csv", || {
                            ExportService::export_csv(
                                &file_path,
                                &state.columns.peek(),
                                &state.controller.peek(),
                            )
                        });
                        match result {
                            Ok(written) => state.status.set(format!(
                                "Exported {written} records to {}",
                                file_path.display()
                            )),
                            Err(err) => state.status.set(format!("Export failed: {err:#}")),
                        }
                    },
                    "Export CSV"
                }
            }

            if let Some(meta) = selected_meta.clone() {
                div {
                    style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px;",
                    input {
                        value: (state.rename_input)(),
                        oninput: move |event| state.rename_input.set(event.value()),
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| {
                            let name = state.rename_input.peek().clone();
                            match run_blocking("rename collection", || {
                                services_for_rename.collections.rename(meta.id, &name)
                            }) {
                                Ok(()) => {
                                    refresh_collections(&services_for_rename, state);
                                    state.status.set(format!("Renamed to {}", name.trim()));
                                }
                                Err(err) => state.status.set(format!("Rename failed: {err}")),
                            }
                        },
                        "Rename"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: (state.busy)(),
                        onclick: move |_| {
                            let result = run_blocking("reload collection", || {
                                services_for_reload
                                    .query
                                    .refresh(meta.id, &mut state.controller.write())
                            });
                            match result {
                                Ok(()) => {
                                    refresh_collections(&services_for_reload, state);
                                    let count = state.controller.peek().records().len();
                                    state.status.set(format!("Reloaded {count} records"));
                                }
                                Err(err) => state.status.set(format!("Reload failed: {err}")),
                            }
                        },
                        "Reload"
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        disabled: (state.busy)(),
                        onclick: move |_| {
                            let Some(file_path) = FileDialog::new()
                                .add_filter("Records", &["csv", "xlsx", "json"])
                                .add_filter("All files", &["*"])
                                .pick_file()
                            else {
                                return;
                            };
                            if !confirm("Replace records", "Replace every record in this collection with the file contents?") {
                                return;
                            }
                            state.busy.set(true);
                            let result = run_blocking("replace records", || -> anyhow::Result<Vec<String>> {
                                let batch = read_record_file(&file_path)?;
                                let columns = batch.columns.clone();
                                services_for_replace
                                    .collections
                                    .replace_records(meta.id, meta.kind, batch)?;
                                services_for_replace
                                    .query
                                    .refresh(meta.id, &mut state.controller.write())?;
                                Ok(columns)
                            });
                            match result {
                                Ok(columns) => {
                                    state.columns.set(columns);
                                    refresh_collections(&services_for_replace, state);
                                    let count = state.controller.peek().records().len();
                                    state.status.set(format!(
                                        "Replaced records from {} ({count} records)",
                                        file_path.display()
                                    ));
                                }
                                Err(err) => state.status.set(format!("Replace failed: {err:#}")),
                            }
                            state.busy.set(false);
                        },
                        "Replace from file…"
                    }
                    if meta.deleted_at.is_none() {
                        button {
                            style: "{BUTTON_STYLE}",
                            onclick: move |_| {
                                if !confirm("Delete collection", "Move this collection to the deleted list?") {
                                    return;
                                }
                                match run_blocking("delete collection", || {
                                    services_for_delete.collections.soft_delete(meta.id)
                                }) {
                                    Ok(()) => {
                                        refresh_collections(&services_for_delete, state);
                                        let next = first_collection(state);
                                        open_collection(&services_for_delete, state, next);
                                        state.status.set("Collection deleted".to_string());
                                    }
                                    Err(err) => state.status.set(format!("Delete failed: {err}")),
                                }
                            },
                            "Delete"
                        }
                    } else {
                        button {
                            style: "{BUTTON_STYLE}",
                            onclick: move |_| {
                                if !confirm("Purge collection", "Permanently remove this collection and its records?") {
                                    return;
                                }
                                match run_blocking("purge collection", || {
                                    services_for_purge.collections.purge(meta.id)
                                }) {
                                    Ok(()) => {
                                        refresh_collections(&services_for_purge, state);
                                        let next = first_collection(state);
                                        open_collection(&services_for_purge, state, next);
                                        state.status.set("Collection purged".to_string());
                                    }
                                    Err(err) => state.status.set(format!("Purge failed: {err}")),
                                }
                            },
                            "Purge"
                        }
                    }
                }
            }

            div {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; margin-bottom: 12px;",
                input {
                    placeholder: "Search",
                    value: (state.search_input)(),
                    oninput: move |event| {
                        let query = event.value();
                        state.search_input.set(query.clone());
                        let ticket = state.search_debouncer.write().schedule(query);
                        let delay = state.search_debouncer.peek().delay();
                        let mut pending = state;
                        spawn(async move {
                            tokio::time::sleep(delay).await;
                            let fired = pending.search_debouncer.write().fire(ticket);
                            if let Some(query) = fired {
                                pending.controller.write().dispatch(ListEvent::SearchChanged(query));
                            }
                        });
                    },
                }
                for (key, label, options, selected) in filter_controls.into_iter() {
                    DropdownSelect {
                        key: "{key}",
                        id: DropdownId::Filter(key),
                        label: label,
                        options: options,
                        selected: Some(selected),
                        open_dropdown: open_dropdown,
                        dropdown_pos: dropdown_pos,
                        on_select: move |value: String| {
                            state.controller.write().dispatch(ListEvent::FilterChanged {
                                key: key.to_string(),
                                value: FilterValue::parse(&value),
                            });
                        }
                    }
                }
                button {
                    style: "{BUTTON_STYLE}",
                    onclick: move |_| {
                        state.search_debouncer.write().cancel();
                        state.search_input.set(String::new());
                        state.controller.write().dispatch(ListEvent::FiltersCleared);
                    },
                    "Clear filters"
                }
            }

            if !columns.is_empty() {
                div {
                    style: "display: flex; gap: 12px; align-items: center; margin-bottom: 12px;",
                    DropdownSelect {
                        id: DropdownId::Sort,
                        label: "Sort by",
                        options: sort_options.clone(),
                        selected: Some(sort.field.clone()),
                        open_dropdown: open_dropdown,
                        dropdown_pos: dropdown_pos,
                        on_select: move |value: String| {
                            let direction = state.controller.peek().state().sort.direction;
                            state
                                .controller
                                .write()
                                .dispatch(ListEvent::SortChanged(SortSpec::new(value, direction)));
                        }
                    }
                    button {
                        style: "{BUTTON_STYLE}",
                        onclick: move |_| {
                            let current = state.controller.peek().state().sort.clone();
                            let next = SortSpec::new(current.field, current.direction.toggled());
                            state.controller.write().dispatch(ListEvent::SortChanged(next));
                        },
                        "{sort.direction.as_str()}"
                    }
                }
            }

            div {
                style: "{table_container_style()}",
                table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                    thead {
                        tr {
                            for column in view.columns.iter().cloned() {
                                th {
                                    style: "{table_header_cell_style()}",
                                    onclick: {
                                        let field = column.name.clone();
                                        move |_| {
                                            state
                                                .controller
                                                .write()
                                                .dispatch(ListEvent::SortToggled(field.clone()));
                                        }
                                    },
                                    "{column.name} {column.sort_marker}"
                                }
                            }
                        }
                    }
                    tbody {
                        for row in table_rows.into_iter() {
                            tr {
                                for (cell_style, cell) in row.into_iter() {
                                    td { style: "{cell_style}", "{cell}" }
                                }
                            }
                        }
                    }
                }
                if let Some(message) = view.empty_message.clone() {
                    div { style: "padding: 24px; text-align: center; color: #666;", "{message}" }
                }
            }

            div {
                style: "display: flex; gap: 12px; align-items: center; margin-top: 12px;",
                button {
                    style: "{BUTTON_STYLE}",
                    disabled: !view.has_previous,
                    onclick: move |_| {
                        let page = state.controller.peek().state().window.page;
                        state
                            .controller
                            .write()
                            .dispatch(ListEvent::PageChanged(page.saturating_sub(1)));
                    },
                    "Previous"
                }
                span { "{view.page_label}" }
                button {
                    style: "{BUTTON_STYLE}",
                    disabled: !view.has_next,
                    onclick: move |_| {
                        let page = state.controller.peek().state().window.page;
                        state.controller.write().dispatch(ListEvent::PageChanged(page + 1));
                    },
                    "Next"
                }
                DropdownSelect {
                    id: DropdownId::PageSize,
                    label: "Rows",
                    options: page_size_options.clone(),
                    selected: Some(page_size.to_string()),
                    open_dropdown: open_dropdown,
                    dropdown_pos: dropdown_pos,
                    on_select: move |value: String| {
                        if let Ok(size) = value.parse::<usize>() {
                            state.controller.write().dispatch(ListEvent::PageSizeChanged(size));
                        }
                    }
                }
                span { "{view.range_label}" }
            }

            div {
                style: "margin-top: 12px; color: #444;",
                span { "{status_text}" }
                if !view.filter_summary.is_empty() {
                    span { style: "margin-left: 12px;", "Filters: {view.filter_summary}" }
                }
            }
        }
    }
}
