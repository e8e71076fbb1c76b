use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const DB_PATH_ENV: &str = "PARKS_ADMIN_DB_PATH";
pub const PAGE_SIZE_ENV: &str = "PARKS_ADMIN_PAGE_SIZE";
pub const SEARCH_DEBOUNCE_ENV: &str = "PARKS_ADMIN_SEARCH_DEBOUNCE_MS";

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 25, 50, 100];

const DB_FILE_NAME: &str = "records.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub webview_data_dir: PathBuf,
    pub page_size: usize,
    pub search_debounce: Duration,
}

impl AppConfig {
    /// Platform data directory plus `PARKS_ADMIN_*` environment overrides.
    pub fn load() -> Result<Self> {
        let project_dirs = project_dirs()?;
        Self::resolve(project_dirs.data_local_dir(), |key| std::env::var(key).ok())
    }

    pub fn resolve(base_data_dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup(DB_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => base_data_dir.join(DB_FILE_NAME),
        };

        let page_size = match lookup(PAGE_SIZE_ENV) {
            Some(raw) => parse_page_size(&raw).with_context(|| format!("invalid {PAGE_SIZE_ENV}"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let search_debounce = match lookup(SEARCH_DEBOUNCE_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("invalid {SEARCH_DEBOUNCE_ENV}: {raw}"))?,
            None => DEFAULT_SEARCH_DEBOUNCE,
        };

        Ok(Self {
            db_path,
            webview_data_dir: ensure_webview_data_dir(base_data_dir)?,
            page_size,
            search_debounce,
        })
    }
}

fn parse_page_size(raw: &str) -> Result<usize> {
    let page_size = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("not a page size: {raw}"))?;
    if page_size == 0 {
        anyhow::bail!("page size must be at least 1");
    }
    Ok(page_size)
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "parks", "parks-admin")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}
