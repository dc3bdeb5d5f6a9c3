use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScraperError {
    Network(String),
    Status { url: String, status: u16 },
    HtmlParse(String),
    NoListings(String),
    NoRows(String),
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScraperError::Network(msg) => write!(f, "Network error: {msg}"),
            ScraperError::Status { url, status } => write!(f, "HTTP {status} from {url}"),
            ScraperError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            ScraperError::NoListings(url) => write!(f, "No listing cards found on {url}"),
            ScraperError::NoRows(url) => write!(f, "No table rows found on {url}"),
        }
    }
}

impl Error for ScraperError {}
