//! Domain error types.

/// Top-level error type for stonkline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("fetch failed for {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    #[error("unknown data provider: {name}")]
    UnknownProvider { name: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid identifier {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    #[error("store error: {reason}")]
    Store { reason: String },

    #[error("store query error: {reason}")]
    StoreQuery { reason: String },

    #[error("http client error: {reason}")]
    Transport { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub fn fetch(ticker: &str, reason: impl Into<String>) -> Self {
        IngestError::Fetch {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        IngestError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for IngestError {
    fn from(e: rusqlite::Error) -> Self {
        IngestError::StoreQuery {
            reason: e.to_string(),
        }
    }
}

impl From<&IngestError> for std::process::ExitCode {
    fn from(err: &IngestError) -> Self {
        let code: u8 = match err {
            IngestError::Io(_) | IngestError::Transport { .. } => 1,
            IngestError::UnknownProvider { .. }
            | IngestError::ConfigParse { .. }
            | IngestError::ConfigMissing { .. }
            | IngestError::ConfigInvalid { .. }
            | IngestError::InvalidIdentifier { .. } => 2,
            IngestError::Store { .. } | IngestError::StoreQuery { .. } => 3,
            IngestError::Fetch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
