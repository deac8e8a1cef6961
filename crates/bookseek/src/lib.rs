#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bookseek
//!
//! bookseek searches the Rakuten Books catalog for the volumes of a series, filters the results
//! by title words, volume notation and price range, and appends a chosen book to a tracking
//! spreadsheet.
//!
//! ```no_run
//! use bookseek::{Catalog, Config, SearchOptions, SearchQuery};
//!
//! # fn main() -> Result<(), bookseek::Error> {
//! let config = Config::from_env()?;
//! let query = SearchQuery::new("ワンピース")?
//!     .with_volume(Some("108"))
//!     .with_price_range(None, Some(1000))?;
//!
//! let report = Catalog::new(config.catalog)?.search(&query, &SearchOptions::default());
//! for book in report.records {
//!     println!("{} {}", book.title, book.price);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
pub mod config;
mod error;
pub mod filter;
mod query;
pub mod record;
mod retry;
pub mod search;
pub mod session;

use std::time::Duration;

pub use api::rakuten::PageFetchOutcome;
pub use config::{CatalogConfig, Config, SheetConfig};
pub use error::{Error, ErrorKind};
pub use query::SearchQuery;
pub use retry::RetryPolicy;
pub use search::{SearchOptions, SearchReport};
pub use session::{RowSink, Session};

use log::trace;

type Client = reqwest::blocking::Client;

/// Per request timeout of every HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client() -> Result<Client, Error> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::wrap(ErrorKind::IO, e))
}

/// The remote book catalog.
pub struct Catalog {
    client: Client,
    config: CatalogConfig,
}

impl Catalog {
    /// Creates a catalog using `config`.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the endpoint is not a valid URL or the HTTP client cannot be
    /// initialised.
    pub fn new(config: CatalogConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    /// Fetches a single result page, retrying failed requests according to `retry`.
    #[inline]
    pub fn fetch_page(
        &self,
        query: &SearchQuery,
        page: u32,
        retry: &RetryPolicy,
    ) -> PageFetchOutcome {
        api::rakuten::fetch_page(&self.client, &self.config, query, page, retry)
    }

    /// Searches the catalog page by page and returns every book matching `query`.
    ///
    /// A page that cannot be fetched contributes nothing and is listed in
    /// [`SearchReport::failures`], the search carries on with the next page. The search stops at
    /// the first empty page or at [`SearchOptions::page_cap`].
    #[inline]
    pub fn search(&self, query: &SearchQuery, options: &SearchOptions) -> SearchReport {
        trace!("Search catalog for '{}'", query.title());
        search::run(&self.client, &self.config, query, options)
    }
}

/// The tracking spreadsheet.
pub struct Spreadsheet {
    client: Client,
    config: SheetConfig,
}

impl Spreadsheet {
    /// Creates a spreadsheet handle using `config`.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the HTTP client cannot be initialised.
    pub fn new(config: SheetConfig) -> Result<Self, Error> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }
}

impl RowSink for Spreadsheet {
    #[inline]
    fn append_row(&self, row: [&str; 3]) -> Result<(), Error> {
        api::sheets::append_row(&self.client, &self.config, row)
    }
}
