use super::spinner::Spinner;
use super::App;
use crate::output::Output;
use cinetime_client::ReportPeriod;
use cinetime_core::report::download_report;
use cinetime_core::Route;
use color_eyre::Result;
use serde_json::json;

pub async fn download(app: &App, period: ReportPeriod, output: &Output) -> Result<()> {
    if app.require(Route::Watchlist, output).is_none() {
        return Ok(());
    }
    let spinner = Spinner::start(format!("Downloading {} report...", period));
    let result = download_report(app.client.as_ref(), period, &app.paths.reports_dir()).await;
    spinner.finish();

    match result {
        Ok(path) => {
            output.success(format!("Report saved to {}", path.display()));
            output.data(&json!({ "period": period, "path": path.display().to_string() }));
        }
        Err(e) => output.error(format!("{:#}", e)),
    }
    Ok(())
}
