// scraper/models.rs

// li.<card>
//  ├── a[href]            -> link
//  ├── span.<price line>  -> price
//  └── address            -> address

/// A listing card exactly as found in the markup, before normalization.
/// `None` means the sub-element was not there at all.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawListing {
    pub price: Option<String>,
    pub address: Option<String>,
    pub link: Option<String>,
}

/// One row of an HTML table, cell text in column order.
pub type TableRow = Vec<String>;
