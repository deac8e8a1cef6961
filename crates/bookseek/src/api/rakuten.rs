use log::{info, trace};
use serde::Deserialize;

use crate::{
    config::CatalogConfig, query::SearchQuery, record::CatalogRecord, retry::RetryPolicy, Error,
    ErrorKind,
};

use super::Client;

/// Number of items requested per page, the catalog's maximum.
pub(crate) const HITS_PER_PAGE: u32 = 30;

/// Most recent releases first.
const SORT_ORDER: &str = "-releaseDate";

/// What a single page request came back with.
#[derive(Debug)]
pub enum PageFetchOutcome {
    /// The page held at least one item.
    Success(Vec<CatalogRecord>),
    /// The catalog has no more items for the query.
    EmptyPage,
    /// The page could not be fetched or read, it contributes nothing.
    Failure(Error),
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct SearchResponse {
    #[serde(rename = "Items", default)]
    items: Vec<ItemWrapper>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct ItemWrapper {
    #[serde(rename = "Item")]
    item: CatalogRecord,
}

pub(crate) fn page_url(
    config: &CatalogConfig,
    query: &SearchQuery,
    page: u32,
) -> Result<String, Error> {
    let mut params = vec![("applicationId", config.application_id.clone())];

    if let Some(affiliate_id) = &config.affiliate_id {
        params.push(("affiliateId", affiliate_id.clone()));
    }

    params.push(("title", query.api_title()));
    params.push(("sort", SORT_ORDER.to_owned()));
    params.push(("hits", HITS_PER_PAGE.to_string()));
    params.push(("page", page.to_string()));

    if let Some(min) = query.min_price() {
        params.push(("minPrice", min.to_string()));
    }
    if let Some(max) = query.max_price() {
        params.push(("maxPrice", max.to_string()));
    }

    reqwest::Url::parse_with_params(&config.endpoint, &params)
        .map(String::from)
        .map_err(|e| {
            Error::wrap_with(
                ErrorKind::Config,
                format!("Invalid catalog endpoint '{}'", config.endpoint),
                e,
            )
        })
}

pub(crate) fn fetch_page<C: Client>(
    client: &C,
    config: &CatalogConfig,
    query: &SearchQuery,
    page: u32,
    retry: &RetryPolicy,
) -> PageFetchOutcome {
    let url = match page_url(config, query, page) {
        Ok(url) => url,
        Err(err) => return PageFetchOutcome::Failure(err),
    };

    info!("Requesting page {page} for '{}' from the catalog", query.title());

    let response = retry.run(|attempt| {
        trace!("Page {page} attempt {attempt}/{}", retry.attempts.max(1));
        client.get_json::<SearchResponse>(&url)
    });

    match response {
        Ok(SearchResponse { items }) if items.is_empty() => PageFetchOutcome::EmptyPage,
        Ok(SearchResponse { items }) => {
            trace!("Page {page} returned {} items", items.len());
            PageFetchOutcome::Success(items.into_iter().map(|w| w.item).collect())
        }
        Err(err) => PageFetchOutcome::Failure(err),
    }
}
