use std::path::Path;

use anyhow::Result;

use crate::infra::export::csv::write_csv;
use crate::usecase::controller::ListController;

pub struct ExportService;

impl ExportService {
    /// Writes every record that passes the current criteria, in the current
    /// order, ignoring pagination. Returns the number of records written.
    pub fn export_csv(path: &Path, columns: &[String], controller: &ListController) -> Result<usize> {
        let columns = if columns.is_empty() {
            controller
                .profile()
                .columns
                .iter()
                .map(|column| column.to_string())
                .collect()
        } else {
            columns.to_vec()
        };
        write_csv(path, &columns, controller.visible_records())
    }
}
