use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::{
    analytics::ReportRow,
    error::{AnalyzerError, AnalyzerResult},
    invariants::LogDate,
};

pub const TABLE_PLACEHOLDER: &str = "$table_json";
const DEFAULT_TEMPLATE: &str = include_str!("../templates/report.html");

/// `report-YYYY.MM.DD.html`, dated after the analysed log.
pub fn report_path(report_dir: &Path, date: LogDate) -> PathBuf {
    report_dir.join(format!(
        "report-{}.html",
        date.into_naive().format("%Y.%m.%d")
    ))
}

pub async fn already_generated(path: &Path) -> AnalyzerResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| AnalyzerError::io(path, e))
}

pub async fn load_template(custom: Option<&Path>) -> AnalyzerResult<String> {
    match custom {
        Some(path) => {
            let template = fs::read_to_string(path)
                .await
                .map_err(|e| AnalyzerError::io(path, e))?;
            if !template.contains(TABLE_PLACEHOLDER) {
                return Err(AnalyzerError::Config(format!(
                    "template {} has no {TABLE_PLACEHOLDER} placeholder",
                    path.display()
                )));
            }
            Ok(template)
        }
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// JSON array of rows for an inline `<script>`. `<`, `>` and `&` can only
/// appear inside JSON strings and are written as `\u` escapes there.
pub fn table_json(rows: &[ReportRow]) -> AnalyzerResult<String> {
    let json = serde_json::to_string(rows)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

pub fn render(template: &str, rows: &[ReportRow]) -> AnalyzerResult<String> {
    Ok(template.replace(TABLE_PLACEHOLDER, &table_json(rows)?))
}

/// Writes next to the destination first and renames, so a report file is
/// either complete or absent.
pub async fn write_report(path: &Path, contents: &str) -> AnalyzerResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| AnalyzerError::io(dir, e))?;
    }
    let tmp = path.with_extension("html.tmp");
    fs::write(&tmp, contents)
        .await
        .map_err(|e| AnalyzerError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(AnalyzerError::io(path, e));
    }
    debug!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
