//! Walks the catalog page by page and collects the accepted books.

use std::time::Duration;

use log::{info, warn};

use crate::{
    api::{
        rakuten::{fetch_page, PageFetchOutcome},
        Client,
    },
    config::CatalogConfig,
    filter::{Filter, ResultSet},
    query::SearchQuery,
    record::ResultRecord,
    retry::{pause, RetryPolicy},
    Error,
};

/// Default number of pages requested per query.
pub const DEFAULT_PAGE_CAP: u32 = 5;

/// How a search walks the catalog pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of pages requested.
    pub page_cap: u32,
    /// Pause after each successful page, when another page may follow.
    pub page_delay: Duration,
    /// Retry behaviour of each page request.
    pub retry: RetryPolicy,
    /// Record filtering pipeline.
    pub filter: Filter,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page_cap: DEFAULT_PAGE_CAP,
            page_delay: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            filter: Filter::default(),
        }
    }
}

/// A page that contributed nothing because it could not be fetched or read.
#[derive(Debug)]
pub struct PageFailure {
    /// 1-based page number.
    pub page: u32,
    /// The error of the last attempt.
    pub error: Error,
}

/// Everything a finished search produced.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Accepted records, in fetch order.
    pub records: Vec<ResultRecord>,
    /// Pages that failed, in page order.
    pub failures: Vec<PageFailure>,
    /// How many pages were requested before the search stopped.
    pub pages_requested: u32,
}

pub(crate) fn run<C: Client>(
    client: &C,
    config: &CatalogConfig,
    query: &SearchQuery,
    options: &SearchOptions,
) -> SearchReport {
    let mut results = ResultSet::default();
    let mut report = SearchReport::default();

    for page in 1..=options.page_cap {
        report.pages_requested = page;

        match fetch_page(client, config, query, page, &options.retry) {
            PageFetchOutcome::EmptyPage => {
                info!("Page {page}: no more results");
                break;
            }
            PageFetchOutcome::Failure(error) => {
                warn!("Page {page} did not respond: {error}");
                report.failures.push(PageFailure { page, error });
            }
            PageFetchOutcome::Success(records) => {
                let accepted = results.absorb(&options.filter, query, records);
                if accepted > 0 {
                    info!("Page {page}: {accepted} books found");
                }

                if page < options.page_cap {
                    pause(options.page_delay);
                }
            }
        }
    }

    if results.is_empty() {
        warn!("No books matched '{}'", query.title());
    }

    report.records = results.into_records();
    report
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        time::{Duration, Instant},
    };

    use super::{run, SearchOptions, DEFAULT_PAGE_CAP};
    use crate::{
        api::{impl_text_producer, requests, MockClient, NetworkErrorProducer, Producer},
        config::CatalogConfig,
        query::SearchQuery,
        retry::RetryPolicy,
        Error, ErrorKind,
    };

    fn options() -> SearchOptions {
        SearchOptions {
            page_delay: Duration::ZERO,
            retry: RetryPolicy {
                attempts: 3,
                delay: Duration::ZERO,
            },
            ..SearchOptions::default()
        }
    }

    fn item(title: &str, isbn: &str, price: u32) -> String {
        format!(
            r#"{{"Item": {{"title": "{title}", "isbn": "{isbn}", "salesDate": "2024年", "itemPrice": {price}, "publisherName": "集英社"}}}}"#
        )
    }

    fn page(items: &[String]) -> String {
        format!(r#"{{"Items": [{}]}}"#, items.join(","))
    }

    fn page_number(url: &str) -> u32 {
        url.split('&')
            .find_map(|pair| pair.strip_prefix("page="))
            .and_then(|n| n.parse().ok())
            .unwrap_or_default()
    }

    impl_text_producer! {
        TwoPagesProducer(url) => match page_number(url) {
            1 => Ok(page(&[
                item("ワンピース 108", "a", 500),
                item("ワンピース 108 特装版", "b", 1200),
                item("ワンピース 第108巻", "c", 800),
            ])),
            _ => Ok(page(&[])),
        },
        EndlessProducer(url) => {
            let n = page_number(url);
            Ok(page(&[item("One Piece", &n.to_string(), 500)]))
        },
        RepeatingProducer(url) => {
            let n = page_number(url);
            Ok(page(&[item("One Piece", "same", 500), item("One Piece", &n.to_string(), 500)]))
        },
        FlakyPageProducer(url) => match page_number(url) {
            2 => Err(Error::new(ErrorKind::Status, "500 Internal Server Error")),
            4 => Ok(page(&[])),
            n => Ok(page(&[item("One Piece", &n.to_string(), 500)])),
        },
    }

    fn requested_pages() -> Vec<u32> {
        requests().iter().map(|r| page_number(&r.url)).collect()
    }

    #[test]
    fn matching_books_across_pages_in_fetch_order() {
        let query = SearchQuery::new("ワンピース")
            .unwrap()
            .with_volume(Some("108"))
            .with_price_range(None, Some(1000))
            .unwrap();

        let report = run(
            &MockClient::<TwoPagesProducer>::default(),
            &CatalogConfig::new("app"),
            &query,
            &options(),
        );

        let prices = report
            .records
            .iter()
            .map(|r| r.price.as_str())
            .collect::<Vec<_>>();
        assert_eq!(vec!["500円", "800円"], prices);
        assert_eq!(2, report.pages_requested);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn stops_at_the_first_empty_page() {
        let query = SearchQuery::new("ワンピース").unwrap();
        run(
            &MockClient::<TwoPagesProducer>::default(),
            &CatalogConfig::new("app"),
            &query,
            &options(),
        );

        assert_eq!(vec![1, 2], requested_pages());
    }

    #[test]
    fn never_requests_more_than_the_page_cap() {
        let query = SearchQuery::new("one piece").unwrap();
        let report = run(
            &MockClient::<EndlessProducer>::default(),
            &CatalogConfig::new("app"),
            &query,
            &options(),
        );

        assert_eq!(vec![1, 2, 3, 4, 5], requested_pages());
        assert_eq!(5, report.records.len());
        assert_eq!(5, report.pages_requested);
    }

    #[test]
    fn isbns_are_unique_across_pages() {
        let query = SearchQuery::new("one piece").unwrap();
        let report = run(
            &MockClient::<RepeatingProducer>::default(),
            &CatalogConfig::new("app"),
            &query,
            &SearchOptions {
                page_cap: 3,
                ..options()
            },
        );

        let isbns = report
            .records
            .iter()
            .map(|r| r.isbn.as_str())
            .collect::<Vec<_>>();
        let unique = isbns.iter().collect::<HashSet<_>>();
        assert_eq!(vec!["same", "1", "2", "3"], isbns);
        assert_eq!(isbns.len(), unique.len());
    }

    #[test]
    fn failed_page_does_not_stop_later_pages() {
        let query = SearchQuery::new("one piece").unwrap();
        let report = run(
            &MockClient::<FlakyPageProducer>::default(),
            &CatalogConfig::new("app"),
            &query,
            &options(),
        );

        // page 2 is tried three times, page 4 is empty and ends the search
        assert_eq!(vec![1, 2, 2, 2, 3, 4], requested_pages());

        let isbns = report
            .records
            .iter()
            .map(|r| r.isbn.as_str())
            .collect::<Vec<_>>();
        assert_eq!(vec!["1", "3"], isbns);

        assert_eq!(1, report.failures.len());
        assert_eq!(2, report.failures[0].page);
        assert_eq!(ErrorKind::Status, report.failures[0].error.kind());
    }

    const PAGE_DELAY: Duration = Duration::from_millis(80);

    fn timed<P: Producer<String>>(options: &SearchOptions) -> Duration {
        let query = SearchQuery::new("one piece").unwrap();
        let start = Instant::now();
        run(
            &MockClient::<P>::default(),
            &CatalogConfig::new("app"),
            &query,
            options,
        );
        start.elapsed()
    }

    #[test]
    fn default_options() {
        let options = SearchOptions::default();

        assert_eq!(5, DEFAULT_PAGE_CAP);
        assert_eq!(DEFAULT_PAGE_CAP, options.page_cap);
        assert_eq!(Duration::from_millis(500), options.page_delay);
        assert_eq!(RetryPolicy::default(), options.retry);
        assert_eq!(3, options.retry.attempts);
        assert_eq!(Duration::from_secs(1), options.retry.delay);
    }

    #[test]
    fn no_pause_after_the_last_permitted_page() {
        let elapsed = timed::<EndlessProducer>(&SearchOptions {
            page_cap: 2,
            page_delay: PAGE_DELAY,
            ..options()
        });

        assert_eq!(vec![1, 2], requested_pages());
        assert!(elapsed >= PAGE_DELAY, "{elapsed:?}");
        assert!(elapsed < PAGE_DELAY * 2, "{elapsed:?}");
    }

    #[test]
    fn no_pause_after_an_empty_page() {
        let elapsed = timed::<TwoPagesProducer>(&SearchOptions {
            page_delay: PAGE_DELAY,
            ..options()
        });

        assert_eq!(vec![1, 2], requested_pages());
        assert!(elapsed >= PAGE_DELAY, "{elapsed:?}");
        assert!(elapsed < PAGE_DELAY * 2, "{elapsed:?}");
    }

    #[test]
    fn no_page_pause_after_a_failed_page() {
        let elapsed = timed::<NetworkErrorProducer>(&SearchOptions {
            page_cap: 3,
            page_delay: PAGE_DELAY,
            retry: RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
            ..options()
        });

        assert_eq!(3, requests().len());
        assert!(elapsed < PAGE_DELAY, "{elapsed:?}");
    }
}
