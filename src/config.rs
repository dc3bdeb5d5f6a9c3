// config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{MissingFieldPolicy, RecordField};
use crate::submitter::RetryPolicy;

const LISTING_URL: &str = "https://appbrewery.github.io/Zillow-Clone/";
const FORM_URL: &str = "https://forms.gle/z4JvQZx8jTBDzMpw8";
const RESPONSES_URL: &str =
    "https://docs.google.com/forms/d/1tSK6EafVovJYyUxPo4tGAGosrzZtcElg7V6d5-Z0Z0g/edit#responses";
/// Keep incomplete listing cards with "N/A" placeholders instead of dropping them.
const FILL_MISSING_FIELDS: bool = false;

/// Everything the pipeline needs, built once in `main` and handed down.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listing: ListingConfig,
    pub form: FormConfig,
    pub export: ExportConfig,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listing: ListingConfig::default(),
            form: FormConfig::default(),
            export: ExportConfig::default(),
            log_file: PathBuf::from("listing_relay.log"),
        }
    }
}

/// CSS selectors locating one listing card and its fields.
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub container: String,
    pub price: String,
    pub address: String,
    pub link: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: "li.ListItem-c11n-8-84-3-StyledListCardWrapper".into(),
            price: "span.PropertyCardWrapper__StyledPriceLine".into(),
            address: "address".into(),
            link: "a[href]".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub url: String,
    pub timeout: Duration,
    pub selectors: ListingSelectors,
    pub missing_field: MissingFieldPolicy,
    pub output: PathBuf,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url: LISTING_URL.into(),
            timeout: Duration::from_secs(10),
            selectors: ListingSelectors::default(),
            missing_field: if FILL_MISSING_FIELDS {
                MissingFieldPolicy::fill_na()
            } else {
                MissingFieldPolicy::Skip
            },
            output: PathBuf::from("properties.csv"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormConfig {
    pub url: String,
    /// Selector for the text inputs, matched in document order.
    pub input_selector: String,
    /// Which record field goes into the n-th text input.
    pub field_order: Vec<RecordField>,
    pub submit_selector: String,
    /// Substring of the page URL that proves the response was recorded.
    pub confirmation_marker: String,
    pub element_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
    pub input_pause: Duration,
    pub record_pause: Duration,
    pub retry: RetryPolicy,
    pub headless: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            url: FORM_URL.into(),
            input_selector: "input[type='text']".into(),
            field_order: vec![RecordField::Link, RecordField::Price, RecordField::Address],
            submit_selector: "div[role='button'][jsname='M2UYVd']".into(),
            confirmation_marker: "formResponse".into(),
            element_timeout: Duration::from_secs(5),
            confirmation_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(250),
            input_pause: Duration::from_millis(500),
            record_pause: Duration::from_secs(2),
            retry: RetryPolicy::form_default(),
            headless: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub enabled: bool,
    pub url: String,
    pub row_selector: String,
    pub cell_selector: String,
    pub output: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: RESPONSES_URL.into(),
            row_selector: "table tr".into(),
            cell_selector: "th, td".into(),
            output: PathBuf::from("responses.csv"),
        }
    }
}
