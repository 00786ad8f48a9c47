use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Input validation errors, raised strictly before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must be at least {min} characters")]
    TitleTooShort { min: usize },

    #[error("content must be at least {min} characters")]
    ContentTooShort { min: usize },

    #[error("comment content cannot be empty")]
    EmptyComment,

    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("an authenticated user is required for this action")]
    MissingActor,

    #[error("this action requires an instructor or admin role")]
    EditorRequired,

    #[error("a video URL can only be set on a lesson")]
    VideoOutsideLesson,

    #[error("attachment is not an image (got '{mime}')")]
    NotAnImage { mime: String },

    #[error("file is {size} bytes, exceeding the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("unsupported document type '{mime}'")]
    UnsupportedDocument { mime: String },
}

/// Errors surfaced by the backing store.
///
/// Two Postgres error codes are special-cased so callers can show a
/// specific message: `23505` (unique violation) and `42501` (insufficient
/// privilege under a row-level policy). Everything else degrades to
/// [`StoreError::Rejected`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate record: {message}")]
    DuplicateKey { message: String },

    #[error("permission denied by row-level policy: {message}")]
    PermissionDenied { message: String },

    #[error("store rejected the request with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("failed to decode store response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors from the external workflow webhook.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("webhook returned HTTP {status}")]
    Status { status: u16 },

    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("webhook unavailable after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<WebhookError>,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
