// scraper.rs
use crate::config::{ListingConfig, ListingSelectors};
use crate::domain::{MissingFieldPolicy, PropertyRecord};
use crate::scraper::{RawListing, ScraperError};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Anything that can hand back the body of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, ScraperError>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP client. One GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        info!("Fetching page content from {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text()
            .map_err(|e| ScraperError::Network(e.to_string()))
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

/// Turns listing markup into records.
pub struct ListingParser {
    container: Selector,
    price: Selector,
    address: Selector,
    link: Selector,
    policy: MissingFieldPolicy,
}

impl ListingParser {
    pub fn new(
        selectors: &ListingSelectors,
        policy: MissingFieldPolicy,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            container: parse_selector(&selectors.container)?,
            price: parse_selector(&selectors.price)?,
            address: parse_selector(&selectors.address)?,
            link: parse_selector(&selectors.link)?,
            policy,
        })
    }

    /// Reads every listing card in document order.
    pub fn raw_listings(&self, html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);

        document
            .select(&self.container)
            .map(|card| RawListing {
                price: first_text(card, &self.price),
                address: first_text(card, &self.address),
                link: card
                    .select(&self.link)
                    .find_map(|a| a.value().attr("href"))
                    .map(str::to_string),
            })
            .collect()
    }

    /// Parses `html` into records. Relative links are resolved against
    /// `base_url` when one is given.
    ///
    /// Cards with missing fields are handled by the parser's
    /// `MissingFieldPolicy`; they are logged, never fatal. A page with no
    /// cards at all is `NoListings`.
    pub fn parse(
        &self,
        html: &str,
        base_url: Option<&Url>,
    ) -> Result<Vec<PropertyRecord>, ScraperError> {
        let cards = self.raw_listings(html);

        if cards.is_empty() {
            let url = base_url.map(Url::to_string).unwrap_or_default();
            warn!("⚠️ No property cards found on the page");
            return Err(ScraperError::NoListings(url));
        }

        info!("Found {} property cards", cards.len());

        let mut records = Vec::with_capacity(cards.len());

        for (i, mut card) in cards.into_iter().enumerate() {
            if let (Some(base), Some(href)) = (base_url, card.link.as_deref()) {
                card.link = Some(resolve_link(base, href));
            }

            match PropertyRecord::from_raw_listing(&card, &self.policy) {
                Ok((record, filled)) => {
                    for field in filled {
                        warn!("⚠️ Listing #{}: {field} missing, filled with placeholder", i + 1);
                    }
                    records.push(record);
                }
                Err(missing) => {
                    warn!("⚠️ Skipping listing #{}: {missing}", i + 1);
                }
            }
        }

        info!("Successfully parsed {} properties", records.len());
        Ok(records)
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

fn resolve_link(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Fetch + parse for the listing page.
pub struct ListingScraper<S: PageSource> {
    source: S,
    parser: ListingParser,
    url: String,
}

impl<S: PageSource> ListingScraper<S> {
    pub fn new(source: S, config: &ListingConfig) -> Result<Self, ScraperError> {
        info!("Initializing scraper for {}", config.url);

        Ok(Self {
            source,
            parser: ListingParser::new(&config.selectors, config.missing_field.clone())?,
            url: config.url.clone(),
        })
    }

    pub fn scrape(&self) -> Result<Vec<PropertyRecord>, ScraperError> {
        let html = self.source.fetch(&self.url).map_err(|e| {
            error!("❌ Failed to fetch page: {e}");
            e
        })?;

        let base = Url::parse(&self.url).ok();
        self.parser.parse(&html, base.as_ref())
    }
}
