use dioxus::prelude::{use_signal, Signal};

use crate::config::AppConfig;
use crate::domain::entities::collection::CollectionId;
use crate::domain::entities::profile::RecordKind;
use crate::usecase::controller::ListController;
use crate::usecase::debounce::Debouncer;
use crate::usecase::ports::repo::CollectionMeta;

#[derive(Clone, Copy)]
pub struct AppState {
    pub collections: Signal<Vec<CollectionMeta>>,
    pub selected_collection: Signal<Option<CollectionId>>,
    pub columns: Signal<Vec<String>>,
    pub controller: Signal<ListController>,
    pub search_input: Signal<String>,
    pub search_debouncer: Signal<Debouncer<String>>,
    pub import_kind: Signal<RecordKind>,
    pub show_deleted: Signal<bool>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub rename_input: Signal<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let page_size = config.page_size;
        let debounce = config.search_debounce;
        Self {
            collections: use_signal(Vec::<CollectionMeta>::new),
            selected_collection: use_signal(|| None::<CollectionId>),
            columns: use_signal(Vec::<String>::new),
            controller: use_signal(|| ListController::new(RecordKind::User.profile(), page_size)),
            search_input: use_signal(String::new),
            search_debouncer: use_signal(|| Debouncer::new(debounce)),
            import_kind: use_signal(|| RecordKind::User),
            show_deleted: use_signal(|| false),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            rename_input: use_signal(String::new),
        }
    }
}
