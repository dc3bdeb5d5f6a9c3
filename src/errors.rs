// errors.rs
use crate::scraper::ScraperError;
use crate::submitter::SubmitError;
use std::fmt;

/// Writing or reading one of the flat output files failed.
#[derive(Debug)]
pub enum ExportError {
    Io(String),
    Csv(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(msg) => write!(f, "File error: {msg}"),
            ExportError::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// Errors that stop the pipeline. Anything that reaches `main` is fatal.
#[derive(Debug)]
pub enum PipelineError {
    Scrape(ScraperError),
    Export(ExportError),
    Submit(SubmitError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Scrape(e) => write!(f, "Scraping failed: {e}"),
            PipelineError::Export(e) => write!(f, "Export failed: {e}"),
            PipelineError::Submit(e) => write!(f, "Form submission aborted: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ScraperError> for PipelineError {
    fn from(e: ScraperError) -> Self {
        PipelineError::Scrape(e)
    }
}

impl From<ExportError> for PipelineError {
    fn from(e: ExportError) -> Self {
        PipelineError::Export(e)
    }
}

impl From<SubmitError> for PipelineError {
    fn from(e: SubmitError) -> Self {
        PipelineError::Submit(e)
    }
}
