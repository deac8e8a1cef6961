//! Selection of a search result and its append to the tracking spreadsheet.

use std::fmt;

use log::{info, trace, warn};

use crate::{query::SearchQuery, record::ResultRecord, Error, ErrorKind};

/// Somewhere a three column row (title, search title, volume) can be appended to.
pub trait RowSink {
    /// Appends `row` as a new row.
    ///
    /// # Errors
    ///
    /// An `Err` is returned when the row was not appended.
    fn append_row(&self, row: [&str; 3]) -> Result<(), Error>;
}

/// Where the session is in the search, select, append flow.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// No search was submitted yet.
    Idle,
    /// A search was submitted, it may have found nothing.
    HasResults,
    /// A result was chosen and its row is being edited.
    AwaitingAppend,
}

/// One of the three values of an appended row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// Title of the chosen book.
    Title,
    /// Title the user searched with.
    SearchTitle,
    /// Volume token.
    Volume,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::SearchTitle => "search title",
            Self::Volume => "volume",
        })
    }
}

/// The editable row, prefilled from the selection and the query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppendDraft {
    /// Title of the chosen book.
    pub title: String,
    /// Title the user searched with.
    pub search_title: String,
    /// Volume token.
    pub volume: String,
}

impl AppendDraft {
    /// Mutable access to one of the fields.
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::SearchTitle => &mut self.search_title,
            Field::Volume => &mut self.volume,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        [
            (Field::Title, &self.title),
            (Field::SearchTitle, &self.search_title),
            (Field::Volume, &self.volume),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| {
            Err(Error::new(
                ErrorKind::Validation,
                format!("The {field} field is required"),
            ))
        })
    }
}

/// A message for the user that is shown once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The last append went through.
    Success(String),
    /// The last append failed, the draft is kept so it can be tried again.
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(message) | Self::Error(message) => f.write_str(message),
        }
    }
}

/// The state of one user session.
///
/// The selected index survives a new search, it is reset to the first result when the new
/// result list is too short for it.
#[derive(Debug)]
pub struct Session {
    stage: Stage,
    query: Option<SearchQuery>,
    results: Vec<ResultRecord>,
    selected: usize,
    draft: Option<AppendDraft>,
    notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session where nothing was searched yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: Stage::Idle,
            query: None,
            results: Vec::new(),
            selected: 0,
            draft: None,
            notice: None,
        }
    }

    /// Replaces the current results with those of a newly submitted query.
    pub fn submit(&mut self, query: SearchQuery, results: Vec<ResultRecord>) {
        trace!("Session received {} results", results.len());
        if self.selected >= results.len() {
            self.selected = 0;
        }

        self.query = Some(query);
        self.results = results;
        self.draft = None;
        self.stage = Stage::HasResults;
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// The query of the current results.
    #[must_use]
    pub const fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    /// The current results.
    #[must_use]
    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    /// Index of the selected result.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected result, `None` when there are no results.
    #[must_use]
    pub fn selected(&self) -> Option<&ResultRecord> {
        self.results.get(self.selected)
    }

    /// Selects the result at `index`.
    ///
    /// Picking a different result drops the draft of the previous one.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Validation`] is returned when `index` is out of range, the
    /// previous selection is kept.
    pub fn select(&mut self, index: usize) -> Result<(), Error> {
        if index < self.results.len() {
            if index != self.selected {
                self.cancel_append();
                self.selected = index;
            }
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::Validation,
                format!(
                    "Selection {index} is out of range for {} results",
                    self.results.len()
                ),
            ))
        }
    }

    /// Starts editing the row of the selected result and returns it.
    ///
    /// A draft that is already being edited is returned as is.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Validation`] is returned when there is nothing to select.
    pub fn begin_append(&mut self) -> Result<&mut AppendDraft, Error> {
        if self.draft.is_none() {
            let record = self
                .results
                .get(self.selected)
                .ok_or_else(|| Error::new(ErrorKind::Validation, "No result is selected"))?;

            let (search_title, volume) = self.query.as_ref().map_or_else(Default::default, |q| {
                (q.title().to_owned(), q.volume().unwrap_or_default().to_owned())
            });

            self.draft = Some(AppendDraft {
                title: record.title.clone(),
                search_title,
                volume,
            });
        }

        self.stage = Stage::AwaitingAppend;
        Ok(self.draft.get_or_insert_with(AppendDraft::default))
    }

    /// The row being edited, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&AppendDraft> {
        self.draft.as_ref()
    }

    /// Mutable access to the row being edited, if any.
    pub fn draft_mut(&mut self) -> Option<&mut AppendDraft> {
        self.draft.as_mut()
    }

    /// Validates the draft and appends it to `sink`.
    ///
    /// Appending is not idempotent, submitting the same values twice appends two rows.
    ///
    /// # Errors
    ///
    /// An `Err` with [`ErrorKind::Validation`] is returned, without calling `sink`, when there is
    /// no draft or one of its fields is blank. An `Err` with [`ErrorKind::Append`] is returned
    /// when `sink` fails, the draft is kept in both cases.
    pub fn append<S: RowSink>(&mut self, sink: &S) -> Result<(), Error> {
        let draft = self
            .draft
            .as_ref()
            .filter(|_| self.stage == Stage::AwaitingAppend)
            .ok_or_else(|| Error::new(ErrorKind::Validation, "No result is being appended"))?;

        draft.validate()?;

        match sink.append_row([&draft.title, &draft.search_title, &draft.volume]) {
            Ok(()) => {
                info!("Appended '{}' to the spreadsheet", draft.title);
                self.notice = Some(Notice::Success(format!(
                    "Added '{}' to the spreadsheet",
                    draft.title
                )));
                self.draft = None;
                self.stage = Stage::HasResults;
                Ok(())
            }
            Err(err) => {
                warn!("Append failed: {err}");
                self.notice = Some(Notice::Error(err.to_string()));
                Err(if err.kind() == ErrorKind::Append {
                    err
                } else {
                    Error::wrap(ErrorKind::Append, err)
                })
            }
        }
    }

    /// Drops the row being edited and goes back to the results.
    pub fn cancel_append(&mut self) {
        if self.draft.take().is_some() {
            trace!("Append cancelled");
        }
        if self.stage == Stage::AwaitingAppend {
            self.stage = Stage::HasResults;
        }
    }

    /// Returns the pending notice and clears it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
