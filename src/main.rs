use crate::config::AppConfig;
use crate::driver::Pipeline;
use crate::submitter::SubmissionState;
use std::process::ExitCode;
use tracing::{error, info, warn};

mod config;
mod domain;
mod driver;
mod errors;
mod logging;
mod scraper;
mod spreadsheets;
mod submitter;

#[cfg(test)]
mod tests;

fn main() -> ExitCode {
    // 1️⃣ Fixed settings; edit `AppConfig::default` to point elsewhere
    let config = AppConfig::default();

    // 2️⃣ Logs go to stdout and the log file
    logging::init(&config.log_file);
    info!("Starting listing relay v{}", env!("CARGO_PKG_VERSION"));

    // 3️⃣ Build the HTTP client and browser launcher
    let pipeline = match Pipeline::from_config(config) {
        Ok(p) => p,
        Err(e) => {
            error!("❌ Setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    // 4️⃣ Scrape, save, submit, export
    match pipeline.run() {
        Ok(summary) => {
            info!(
                "Completed: {}/{} submissions successful ({} scraped, {} saved)",
                summary.submissions.successful(),
                summary.submissions.total(),
                summary.scraped,
                summary.saved,
            );
            if summary.submissions.failed() > 0 || summary.submissions.pending() > 0 {
                warn!(
                    "⚠️ {} records failed, {} never attempted",
                    summary.submissions.failed(),
                    summary.submissions.pending()
                );
            }
            for outcome in &summary.submissions.outcomes {
                if let SubmissionState::Failed { attempts, error } = &outcome.state {
                    warn!("⚠️ Not submitted after {attempts} attempts: {} ({error})", outcome.address);
                }
            }
            if let Some(rows) = summary.responses_saved {
                info!("Exported {rows} response rows");
            }
            info!("Script execution completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
