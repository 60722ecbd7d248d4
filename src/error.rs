//! The crate-wide error type and `Result` alias.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Parameters attached to some API errors, describing how the caller should
/// react.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResponseParameters {
    /// The group has been migrated to a supergroup with this id.
    pub migrate_to_chat_id: Option<i64>,

    /// The request can be retried after this many seconds.
    pub retry_after: Option<u64>,
}

/// An error returned by the Bot API itself (the envelope had `ok: false`, or
/// lacked `ok: true`).
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    /// `error_code` from the envelope. `0` when the remote omitted it (see
    /// the "ok=false without error_code" open question in the design notes).
    pub code: i32,

    /// `description` from the envelope.
    pub message: String,

    pub parameters: Option<ResponseParameters>,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), parameters: None }
    }

    pub fn with_parameters(mut self, parameters: ResponseParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// True iff the error description contains `needle` (case-sensitive
    /// substring match, matching how the Bot API's free-form descriptions
    /// are conventionally inspected).
    pub fn is(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }

    /// True iff this is a "too many requests" error.
    pub fn is_flood(&self) -> bool {
        self.code == 429
    }

    /// True iff this is a transient server error worth retrying.
    pub fn is_server_error(&self) -> bool {
        self.code == 500
    }

    /// True iff the bot's token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.code == 401
    }

    /// The hinted retry delay, when the remote supplied one.
    pub fn retry_after(&self) -> Option<Duration> {
        self.parameters.as_ref().and_then(|p| p.retry_after).map(Duration::from_secs)
    }

    /// The chat id the group migrated to, when present.
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        self.parameters.as_ref().and_then(|p| p.migrate_to_chat_id)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(params) = &self.parameters {
            if let Some(retry_after) = params.retry_after {
                write!(f, " (retry after {retry_after}s)")?;
            }
            if let Some(chat_id) = params.migrate_to_chat_id {
                write!(f, " (migrated to {chat_id})")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// The crate-wide error type, unifying API errors, transport failures,
/// decode failures and cancellation.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote rejected the call or reported a failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A network-level failure (DNS, TLS, connection reset, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A local I/O failure while streaming a file upload or download.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The envelope or a nested value was not valid JSON, or didn't match
    /// the expected shape.
    #[error("invalid response body: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        /// The raw body, kept around for diagnostics.
        raw: String,
    },

    /// The driving context was cancelled (deadline elapsed or explicit
    /// cancellation) while this operation was in flight.
    #[error("cancelled")]
    Cancelled,

    /// A client or dispatcher was misconfigured (a missing environment
    /// variable, an invalid webhook URL, ...).
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_json(source: serde_json::Error, raw: impl Into<String>) -> Self {
        Self::InvalidJson { source, raw: raw.into() }
    }

    /// The API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Convenience alias used throughout the crate and re-exported at the root.
pub type Result<T, E = Error> = std::result::Result<T, E>;
