// driver.rs
use crate::config::AppConfig;
use crate::errors::PipelineError;
use crate::scraper::{HttpFetcher, ListingScraper, PageSource, ResponsesScraper, ScraperError};
use crate::spreadsheets::{write_properties_csv, write_rows_csv};
use crate::submitter::{ChromeLauncher, FormSubmitter, SessionLauncher, SubmissionReport};
use tracing::{error, info, warn};

/// What a full run produced.
#[derive(Debug)]
pub struct PipelineSummary {
    pub scraped: usize,
    pub saved: usize,
    pub submissions: SubmissionReport,
    /// Rows written to the responses file, if the export ran and worked.
    pub responses_saved: Option<usize>,
}

/// fetch -> parse -> save -> submit every record -> optional response export.
pub struct Pipeline<S: PageSource, L: SessionLauncher> {
    config: AppConfig,
    source: S,
    launcher: L,
}

impl Pipeline<HttpFetcher, ChromeLauncher> {
    pub fn from_config(config: AppConfig) -> Result<Self, PipelineError> {
        let source = HttpFetcher::new(config.listing.timeout)?;
        let launcher = ChromeLauncher::from_config(&config.form);
        Ok(Self::new(config, source, launcher))
    }
}

impl<S: PageSource, L: SessionLauncher> Pipeline<S, L> {
    pub fn new(config: AppConfig, source: S, launcher: L) -> Self {
        Self {
            config,
            source,
            launcher,
        }
    }

    pub fn run(&self) -> Result<PipelineSummary, PipelineError> {
        let cfg = &self.config;

        let records = ListingScraper::new(&self.source, &cfg.listing)?.scrape()?;
        if records.is_empty() {
            error!("❌ Every listing card was incomplete, nothing to submit");
            return Err(ScraperError::NoListings(cfg.listing.url.clone()).into());
        }

        let saved = write_properties_csv(&cfg.listing.output, &records)?;
        info!("Scraped {} properties", records.len());

        let submitter = FormSubmitter::new(cfg.form.clone());
        let report = submitter.submit_all(&self.launcher, &records)?;

        if let Some(fatal) = &report.aborted {
            return Err(PipelineError::Submit(fatal.clone()));
        }

        let responses_saved = if !cfg.export.enabled {
            None
        } else if report.successful() == 0 {
            warn!("⚠️ Nothing was submitted, skipping response export");
            None
        } else {
            self.export_responses()?
        };

        Ok(PipelineSummary {
            scraped: records.len(),
            saved,
            submissions: report,
            responses_saved,
        })
    }

    /// A failed download only costs the export; a failed write is fatal.
    fn export_responses(&self) -> Result<Option<usize>, PipelineError> {
        let export = &self.config.export;

        let rows = match ResponsesScraper::new(&self.source, export)?.scrape() {
            Ok(rows) => rows,
            Err(e) => {
                error!("❌ Failed to download responses: {e}");
                return Ok(None);
            }
        };

        let written = write_rows_csv(&export.output, &rows)?;
        Ok(Some(written))
    }
}
