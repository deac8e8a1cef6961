//! Credentials and endpoints, read once from the environment at startup.

use log::trace;

use crate::{Error, ErrorKind};

/// Default Rakuten Books search endpoint.
pub const RAKUTEN_BOOKS_URL: &str =
    "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404";

const APPLICATION_ID: &str = "RAKUTEN_APPLICATION_ID";
const AFFILIATE_ID: &str = "RAKUTEN_AFFILIATE_ID";
const ENDPOINT: &str = "RAKUTEN_API_ENDPOINT";
const SPREADSHEET_ID: &str = "SHEETS_SPREADSHEET_ID";
const ACCESS_TOKEN: &str = "SHEETS_ACCESS_TOKEN";

/// Everything the catalog search needs to identify itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Rakuten application id, always sent.
    pub application_id: String,
    /// Rakuten affiliate id, sent only when configured.
    pub affiliate_id: Option<String>,
    /// Search endpoint, [`RAKUTEN_BOOKS_URL`] unless overridden.
    pub endpoint: String,
}

impl CatalogConfig {
    /// Catalog configuration for the default endpoint.
    pub fn new<S: Into<String>>(application_id: S) -> Self {
        Self {
            application_id: application_id.into(),
            affiliate_id: None,
            endpoint: RAKUTEN_BOOKS_URL.to_owned(),
        }
    }

    /// Checks that the endpoint is an absolute URL.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Config`] is returned when the endpoint cannot be parsed.
    pub fn validate(&self) -> Result<(), Error> {
        reqwest::Url::parse(&self.endpoint)
            .map(|_| ())
            .map_err(|e| {
                Error::wrap_with(
                    ErrorKind::Config,
                    format!("Invalid catalog endpoint '{}'", self.endpoint),
                    e,
                )
            })
    }
}

/// Target spreadsheet and the pre-obtained token used to write to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetConfig {
    /// Identifier of the spreadsheet to append to.
    pub spreadsheet_id: String,
    /// OAuth bearer token with write access to the spreadsheet.
    pub access_token: String,
}

/// The full startup configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Catalog search settings.
    pub catalog: CatalogConfig,
    /// Spreadsheet append settings.
    pub sheet: SheetConfig,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Config`] is returned naming every required variable that is
    /// missing or blank, or when the catalog endpoint is not a valid URL.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let application_id = value(APPLICATION_ID);
        let spreadsheet_id = value(SPREADSHEET_ID);
        let access_token = value(ACCESS_TOKEN);

        match (application_id, spreadsheet_id, access_token) {
            (Some(application_id), Some(spreadsheet_id), Some(access_token)) => {
                trace!("All required configuration values found");
                let catalog = CatalogConfig {
                    application_id,
                    affiliate_id: value(AFFILIATE_ID),
                    endpoint: value(ENDPOINT).unwrap_or_else(|| RAKUTEN_BOOKS_URL.to_owned()),
                };
                catalog.validate()?;

                Ok(Self {
                    catalog,
                    sheet: SheetConfig {
                        spreadsheet_id,
                        access_token,
                    },
                })
            }
            (application_id, spreadsheet_id, access_token) => {
                let missing = [
                    (APPLICATION_ID, application_id.is_none()),
                    (SPREADSHEET_ID, spreadsheet_id.is_none()),
                    (ACCESS_TOKEN, access_token.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, missing)| missing.then_some(key))
                .collect::<Vec<_>>();

                Err(Error::new(
                    ErrorKind::Config,
                    format!("missing required settings: {}", missing.join(", ")),
                ))
            }
        }
    }
}

/// Whether each known setting is present, in a stable order, without exposing the values.
///
/// The endpoint in use is returned alongside as it is not a secret.
pub fn presence<F>(lookup: F) -> (Vec<(&'static str, bool)>, String)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| lookup(key).map_or(false, |v| !v.trim().is_empty());
    let endpoint = lookup(ENDPOINT)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| RAKUTEN_BOOKS_URL.to_owned());

    let keys = [
        APPLICATION_ID,
        AFFILIATE_ID,
        SPREADSHEET_ID,
        ACCESS_TOKEN,
        ENDPOINT,
    ];
    (keys.into_iter().map(|k| (k, set(k))).collect(), endpoint)
}
