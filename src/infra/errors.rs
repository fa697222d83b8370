// src/infra/errors.rs — Error types for wavectl

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WavectlError {
    // Authentication errors — never retried beyond the single refresh attempt
    #[error("no authenticated session")]
    NotAuthenticated,

    // Validation errors — not retried
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("no track matched the search query")]
    NoMatch,

    #[error("request must carry either a query or a uri")]
    MissingQueryOrUri,

    // Upstream errors — surfaced as-is, no retry beyond the transport layer
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("control command failed: {0}")]
    ControlFailed(String),

    // Recognizer errors — caught at the polling boundary, never user-visible
    #[error("classifier unavailable: {0}")]
    Classifier(String),

    // Infra
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WavectlError {
    /// Stable wire code for JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WavectlError::NotAuthenticated => "NOT_AUTHENTICATED",
            WavectlError::UnknownAction(_) => "UNKNOWN_ACTION",
            WavectlError::NoMatch => "NO_MATCH",
            WavectlError::MissingQueryOrUri => "MISSING_QUERY_OR_URI",
            // An unauthorized upstream response after the one-shot refresh is
            // still an auth failure from the caller's point of view.
            WavectlError::Upstream { status: 401, .. } => "NOT_AUTHENTICATED",
            _ => "CONTROL_FAILED",
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            WavectlError::NotAuthenticated | WavectlError::Upstream { status: 401, .. }
        )
    }
}
