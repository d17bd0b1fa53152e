use thiserror::Error;

/// Coarse failure class of a fetch, as reported in crawl logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Timeout,
    Status,
    Network,
    Content,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request timed out")]
    Timeout,

    #[error("http error {status}")]
    Status { status: reqwest::StatusCode },

    #[error("network error: {0}")]
    Network(String),

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("charset error: {0}")]
    Charset(String),

    #[error("client setup failed: {0}")]
    Client(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Timeout => FetchErrorKind::Timeout,
            Self::Status { .. } => FetchErrorKind::Status,
            Self::InvalidUrl(_) | Self::Network(_) | Self::Client(_) => FetchErrorKind::Network,
            Self::BodyTooLarge(_) | Self::UnsupportedContentType(_) | Self::Charset(_) => {
                FetchErrorKind::Content
            }
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status { status }
        } else {
            // DNS, connect, TLS, redirect loops and truncated bodies
            Self::Network(err.to_string())
        }
    }
}
