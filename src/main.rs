use parks_admin::app::App;
use parks_admin::config::AppConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,parks_admin=info";

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::load().expect("should load configuration and create data directories");
    tracing::info!(
        db_path = %config.db_path.display(),
        page_size = config.page_size,
        "starting parks admin"
    );

    // The root component reads this same config through the context.
    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Parks Admin"))
                .with_data_directory(config.webview_data_dir.clone()),
        )
        .with_context(config)
        .launch(App);
}
