// scraper/responses.rs
use crate::config::ExportConfig;
use crate::scraper::scraper::parse_selector;
use crate::scraper::{PageSource, ScraperError, TableRow};
use scraper::{Html, Selector};
use tracing::{error, info};

/// Reads an HTML table into rows of cell text.
pub struct TableParser {
    row: Selector,
    cell: Selector,
}

impl TableParser {
    pub fn new(row_css: &str, cell_css: &str) -> Result<Self, ScraperError> {
        Ok(Self {
            row: parse_selector(row_css)?,
            cell: parse_selector(cell_css)?,
        })
    }

    /// Rows without any matching cell are dropped.
    pub fn parse(&self, html: &str) -> Vec<TableRow> {
        let document = Html::parse_document(html);

        document
            .select(&self.row)
            .map(|row| {
                row.select(&self.cell)
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
                    .collect::<TableRow>()
            })
            .filter(|cells| !cells.is_empty())
            .collect()
    }
}

/// Scrapes the form's response table, the same way the listing page is scraped.
pub struct ResponsesScraper<S: PageSource> {
    source: S,
    parser: TableParser,
    url: String,
}

impl<S: PageSource> ResponsesScraper<S> {
    pub fn new(source: S, config: &ExportConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            source,
            parser: TableParser::new(&config.row_selector, &config.cell_selector)?,
            url: config.url.clone(),
        })
    }

    pub fn scrape(&self) -> Result<Vec<TableRow>, ScraperError> {
        info!("Downloading responses from {}", self.url);

        let html = self.source.fetch(&self.url).map_err(|e| {
            error!("❌ Failed to fetch responses: {e}");
            e
        })?;

        let rows = self.parser.parse(&html);
        if rows.is_empty() {
            return Err(ScraperError::NoRows(self.url.clone()));
        }

        info!("Found {} response rows", rows.len());
        Ok(rows)
    }
}
