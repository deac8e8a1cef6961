use crate::app;

use bookseek::{
    config, search::DEFAULT_PAGE_CAP, Catalog, Config, SearchOptions, SearchQuery, Session,
    Spreadsheet,
};

use clap::Subcommand;
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Search the catalog for the books of a series
    ///
    /// Every word of the title must appear in a book title for it to be listed. Results are
    /// ordered by release date, most recent first.
    #[clap(arg_required_else_help = true)]
    Search {
        /// Title of the series, e.g. "one piece"
        #[clap(required = true)]
        title: Vec<String>,

        /// Only list books of this volume, e.g. 108
        #[clap(short = 'n', long)]
        volume: Option<String>,

        /// Lowest accepted price in yen
        #[clap(long)]
        min_price: Option<u32>,

        /// Highest accepted price in yen
        #[clap(long)]
        max_price: Option<u32>,

        /// Maximum number of result pages to request
        #[clap(short, long, default_value_t = DEFAULT_PAGE_CAP)]
        pages: u32,
    },

    /// Show which settings are configured, without revealing their values
    ///
    /// Settings are read from the environment: RAKUTEN_APPLICATION_ID, RAKUTEN_AFFILIATE_ID,
    /// SHEETS_SPREADSHEET_ID, SHEETS_ACCESS_TOKEN and RAKUTEN_API_ENDPOINT.
    Check,
}

impl Commands {
    pub fn execute(self, interact: bool) -> Result<String, Box<dyn std::error::Error>> {
        match self {
            Commands::Search {
                title,
                volume,
                min_price,
                max_price,
                pages,
            } => {
                // missing credentials stop everything before the first request
                let config = Config::from_env()?;

                let query = SearchQuery::new(title.join(" "))?
                    .with_volume(volume)
                    .with_price_range(min_price, max_price)?;

                let options = SearchOptions {
                    page_cap: pages,
                    ..SearchOptions::default()
                };

                let mut output = app::describe_query(&query, pages);
                trace!("Searching up to {pages} pages..");
                let report = Catalog::new(config.catalog)?.search(&query, &options);

                output.push_str(&app::render_results(&report.records));
                output.push_str(&app::summary(&query, &report));

                let mut session = Session::new();
                session.submit(query, report.records);

                if !interact || session.results().is_empty() {
                    return Ok(output);
                }

                println!("{output}");
                let sheet = Spreadsheet::new(config.sheet)?;
                let appended = app::append_interactively(&mut session, &sheet)?;
                Ok(format!("{appended} row(s) appended to the spreadsheet"))
            }
            Commands::Check => {
                let (settings, endpoint) = config::presence(|key| std::env::var(key).ok());
                Ok(app::render_settings(&settings, &endpoint))
            }
        }
    }
}
