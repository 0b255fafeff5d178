use anyhow::Context;
use chrono::{NaiveDate, Utc};
use cinetime_client::{CatalogApi, ReportPeriod};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn report_file_name(period: ReportPeriod, date: NaiveDate) -> String {
    format!("cinetime-report-{}-{}.pdf", period, date.format("%Y-%m-%d"))
}

/// Download the watch report and write it under `reports_dir`
pub async fn download_report<A: CatalogApi + ?Sized>(
    api: &A,
    period: ReportPeriod,
    reports_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let bytes = api
        .report(period)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to download report")))?;

    tokio::fs::create_dir_all(reports_dir)
        .await
        .with_context(|| format!("creating {}", reports_dir.display()))?;
    let path = reports_dir.join(report_file_name(period, Utc::now().date_naive()));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    info!(operation = "report_download", period = %period, bytes = bytes.len(), path = %path.display(), "Report saved");
    Ok(path)
}
