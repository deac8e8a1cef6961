use crate::{Error, ErrorKind};

/// What the user is looking for.
///
/// A query is only ever built through [`SearchQuery::new`] so the title is never blank and a
/// price range is never inverted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    title: String,
    volume: Option<String>,
    min_price: Option<u32>,
    max_price: Option<u32>,
}

impl SearchQuery {
    /// Creates a query for the series `title`.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Validation`] is returned when the title is blank.
    pub fn new<S: AsRef<str>>(title: S) -> Result<Self, Error> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(Error::new(ErrorKind::Validation, "A title is required"));
        }

        Ok(Self {
            title: title.to_owned(),
            volume: None,
            min_price: None,
            max_price: None,
        })
    }

    /// Restricts the query to a single volume, a blank token means every volume.
    #[must_use]
    pub fn with_volume<S: AsRef<str>>(mut self, volume: Option<S>) -> Self {
        self.volume = volume
            .map(|v| v.as_ref().trim().to_owned())
            .filter(|v| !v.is_empty());
        self
    }

    /// Restricts the query to an inclusive price range, either side may be left open.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Validation`] is returned when `min` is greater than `max`.
    pub fn with_price_range(mut self, min: Option<u32>, max: Option<u32>) -> Result<Self, Error> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(Error::new(
                    ErrorKind::Validation,
                    format!("The minimum price ({min}) is greater than the maximum price ({max})"),
                ));
            }
        }

        self.min_price = min;
        self.max_price = max;
        Ok(self)
    }

    /// The series title as entered (trimmed).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The volume token, if any.
    #[must_use]
    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }

    /// Lower price bound, if any.
    #[must_use]
    pub const fn min_price(&self) -> Option<u32> {
        self.min_price
    }

    /// Upper price bound, if any.
    #[must_use]
    pub const fn max_price(&self) -> Option<u32> {
        self.max_price
    }

    /// Whether either price bound is set.
    #[must_use]
    pub const fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// The title in the form the catalog API expects: words joined with `+`.
    pub(crate) fn api_title(&self) -> String {
        self.title.split_whitespace().collect::<Vec<_>>().join("+")
    }

    /// Lowercased title words, every one of them must appear in an accepted book title.
    pub(crate) fn title_tokens(&self) -> Vec<String> {
        self.title
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }
}
