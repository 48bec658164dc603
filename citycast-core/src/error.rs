//! Error taxonomy for a search.
//!
//! - [`ValidationError`]: rejected input, handled before any network call
//! - [`FetchError`]: what went wrong talking to the weather provider
//! - [`SearchError`]: what the user is told, collapsed from the two above

use thiserror::Error;

/// Input rejected by the search controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty")]
    Empty,
    #[error("too_short")]
    TooShort,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::Empty => "Please enter a city name.",
            ValidationError::TooShort => "City name is too short.",
        }
    }
}

/// Failure of a single provider request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request could not be completed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

/// Outcome of a failed search, as surfaced to the user.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("city not found")]
    NotFound,

    #[error("transient failure: {0}")]
    Transient(FetchError),
}

impl From<FetchError> for SearchError {
    fn from(err: FetchError) -> Self {
        if err.is_not_found() {
            SearchError::NotFound
        } else {
            SearchError::Transient(err)
        }
    }
}

impl SearchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::Validation(e) => e.user_message(),
            SearchError::NotFound => "City not found. Please check spelling.",
            SearchError::Transient(_) => "Something went wrong. Please try again later.",
        }
    }
}
