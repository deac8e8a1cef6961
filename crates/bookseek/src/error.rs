pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the bookseek functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required configuration value is missing, nothing can run without it.
    Config,
    /// The request could not be sent or the response could not be read.
    IO,
    /// The remote service answered with an unexpected HTTP status.
    Status,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// User provided input was rejected before doing any work.
    Validation,
    /// The spreadsheet refused or failed to append a row.
    Append,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Wraps an existing error as the source of [`Error`] with an extra message for context.
    pub fn wrap_with<E, S>(kind: ErrorKind, message: S, source: E) -> Self
    where
        E: Into<DynError>,
        S: Into<String>,
    {
        Self {
            kind,
            message: Some(message.into()),
            source: Some(source.into()),
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether the failed operation may succeed when tried again.
    ///
    /// Only transport failures and unexpected statuses are worth repeating, a body that cannot be
    /// parsed will not parse any better the second time.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::IO | ErrorKind::Status)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::Config => f.write_str("Configuration error")?,
            ErrorKind::IO => f.write_str("IO error")?,
            ErrorKind::Status => f.write_str("Status error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
            ErrorKind::Validation => f.write_str("Validation error")?,
            ErrorKind::Append => f.write_str("Append error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
