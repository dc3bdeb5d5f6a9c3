// src/domain/property.rs

use crate::scraper::RawListing;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One listing as scraped and normalized, ready to export and submit.
/// Field order here is the column order of the CSV export.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub price: String,
    pub address: String,
    pub link: String,
}

/// The record attributes a form input can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Price,
    Address,
    Link,
}

impl RecordField {
    pub fn name(&self) -> &'static str {
        match self {
            RecordField::Price => "price",
            RecordField::Address => "address",
            RecordField::Link => "link",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do with a listing card that lacks one of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Drop the whole card.
    Skip,
    /// Keep the card, putting the placeholder where the field should be.
    Fill(String),
}

impl MissingFieldPolicy {
    /// The placeholder the old script wrote for absent fields.
    pub fn fill_na() -> Self {
        MissingFieldPolicy::Fill("N/A".to_string())
    }
}

/// Why a raw listing could not become a record under the `Skip` policy.
#[derive(Debug, PartialEq, Eq)]
pub struct MissingField(pub RecordField);

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing or empty {}", self.0)
    }
}

impl PropertyRecord {
    #[cfg(test)]
    pub fn new(
        price: impl Into<String>,
        address: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            price: price.into(),
            address: address.into(),
            link: link.into(),
        }
    }

    /// Normalizes a raw card into a record.
    ///
    /// Returns the record together with the fields that had to be filled in.
    /// With `Skip`, the first missing field is an error instead.
    pub fn from_raw_listing(
        raw: &RawListing,
        policy: &MissingFieldPolicy,
    ) -> Result<(Self, Vec<RecordField>), MissingField> {
        let mut filled = Vec::new();

        let mut take = |value: Option<String>, field: RecordField| match value
            .filter(|s| !s.is_empty())
        {
            Some(v) => Ok(v),
            None => match policy {
                MissingFieldPolicy::Skip => Err(MissingField(field)),
                MissingFieldPolicy::Fill(placeholder) => {
                    filled.push(field);
                    Ok(placeholder.clone())
                }
            },
        };

        let price = take(raw.price.as_deref().map(clean_price), RecordField::Price)?;
        let address = take(raw.address.as_deref().map(clean_address), RecordField::Address)?;
        let link = take(raw.link.as_deref().map(|l| l.trim().to_string()), RecordField::Link)?;

        Ok((Self { price, address, link }, filled))
    }

    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Price => &self.price,
            RecordField::Address => &self.address,
            RecordField::Link => &self.link,
        }
    }
}

/// `"$2,895+ 1 bd"` -> `"$2,895"`, `"$2,100/mo"` -> `"$2,100"`.
pub fn clean_price(raw: &str) -> String {
    let before_plus = raw.split('+').next().unwrap_or_default();
    let before_slash = before_plus.split('/').next().unwrap_or_default();
    before_slash.trim().to_string()
}

/// Drops the `|` separators and collapses whitespace runs left by the markup.
pub fn clean_address(raw: &str) -> String {
    raw.replace('|', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
