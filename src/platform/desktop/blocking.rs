use tracing::debug;

/// Runs a store or file operation on the UI thread. Desktop targets have no
/// separate worker for SQLite access, so the call happens inline.
pub fn run_blocking<F, T>(label: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    debug!(operation = label, "running blocking operation");
    f()
}
