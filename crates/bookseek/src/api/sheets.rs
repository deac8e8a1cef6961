use log::{info, trace};
use serde::Serialize;

use crate::{config::SheetConfig, Error, ErrorKind};

use super::Client;

const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// `A1` without a sheet name targets the first worksheet.
const APPEND_RANGE: &str = "A1";

#[derive(Serialize)]
struct ValueRange<'a> {
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: [[&'a str; 3]; 1],
}

fn append_url(sheet: &SheetConfig) -> Result<String, Error> {
    let mut url = reqwest::Url::parse(SHEETS_URL)
        .map_err(|e| Error::wrap_with(ErrorKind::Config, "Invalid spreadsheet URL", e))?;

    // each segment is percent-encoded, an id cannot reach into the path or the query
    url.path_segments_mut()
        .map_err(|()| Error::new(ErrorKind::Config, "Invalid spreadsheet URL"))?
        .push(&sheet.spreadsheet_id)
        .push("values")
        .push(&format!("{APPEND_RANGE}:append"));

    url.query_pairs_mut()
        .append_pair("valueInputOption", "RAW")
        .append_pair("insertDataOption", "INSERT_ROWS");

    Ok(url.into())
}

pub(crate) fn append_row<C: Client>(
    client: &C,
    sheet: &SheetConfig,
    row: [&str; 3],
) -> Result<(), Error> {
    let url = append_url(sheet)?;
    info!("Appending a row to spreadsheet '{}'", sheet.spreadsheet_id);
    trace!("Row values: {row:?}");

    let body = ValueRange {
        major_dimension: "ROWS",
        values: [row],
    };

    client
        .post_json(&url, &sheet.access_token, &body)
        .map_err(|e| Error::wrap_with(ErrorKind::Append, "The row was not added", e))
}
