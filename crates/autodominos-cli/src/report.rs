use std::path::{Path, PathBuf};

use anyhow::Context;

use autodominos_core::StoreReport;

/// Writes `report` as pretty JSON to `<dir>/<store alias>.json`, creating
/// `dir` if needed, and returns the written path.
pub(crate) fn write_report(dir: &Path, report: &StoreReport) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating reports directory {}", dir.display()))?;

    let path = dir.join(report.file_name());
    let json = serde_json::to_string_pretty(report).context("serializing store report")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
