//! Book records before and after filtering.

use serde::{Deserialize, Deserializer};

/// Shown in place of a price or publisher the catalog did not provide.
pub const UNKNOWN: &str = "不明";

/// Currency suffix of a displayed price.
pub const YEN: &str = "円";

/// A book as the catalog returned it, before any filtering.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    /// Full title, usually including the volume notation.
    pub title: String,
    /// ISBN, used as the identity of a book.
    pub isbn: String,
    /// Release date in the catalog's own display format.
    #[serde(rename = "salesDate")]
    pub sales_date: String,
    /// Price in yen, `None` when missing or not a number.
    #[serde(rename = "itemPrice", default, deserialize_with = "lenient_price")]
    pub price: Option<u32>,
    /// Publisher name, when provided.
    #[serde(rename = "publisherName", default)]
    pub publisher: Option<String>,
}

/// A book that passed every filter, ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRecord {
    /// Full title.
    pub title: String,
    /// ISBN, unique within one result set.
    pub isbn: String,
    /// Release date as the catalog formats it.
    pub sales_date: String,
    /// Price with its currency suffix, or [`UNKNOWN`].
    pub price: String,
    /// Publisher name, or [`UNKNOWN`].
    pub publisher: String,
}

impl From<CatalogRecord> for ResultRecord {
    fn from(record: CatalogRecord) -> Self {
        let CatalogRecord {
            title,
            isbn,
            sales_date,
            price,
            publisher,
        } = record;

        Self {
            title,
            isbn,
            sales_date,
            price: price.map_or_else(|| UNKNOWN.to_owned(), |p| format!("{p}{YEN}")),
            publisher: publisher
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN.to_owned()),
        }
    }
}

// The catalog sends a number, but an empty string or a numeric string are seen in the wild too.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(u64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        Some(RawPrice::Number(n)) => u32::try_from(n).ok(),
        Some(RawPrice::Text(s)) => s.trim().parse().ok(),
        Some(RawPrice::Other(_)) | None => None,
    })
}
