mod models;
mod responses;
mod scraper;
mod scraper_error;

pub use models::{RawListing, TableRow};
pub use responses::ResponsesScraper;
pub use scraper::{HttpFetcher, ListingScraper, PageSource};
pub use scraper_error::ScraperError;
