use thiserror::Error;

#[cfg(feature = "clients")]
use http::StatusCode;

/// Errors returned by the lookup client.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller supplied a malformed lookup key or configuration value.
    /// Detected before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying connection failed.
    #[cfg(feature = "clients")]
    #[error(transparent)]
    Transport(#[from] hyper::Error),

    #[cfg(feature = "clients")]
    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[cfg(feature = "clients")]
    #[error("invalid uri: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[cfg(feature = "clients")]
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a non-2xx status. `body` is the server's
    /// error text, as sent.
    #[cfg(feature = "clients")]
    #[error("received unexpected HTTP status code {status}: {body}")]
    Remote { status: StatusCode, body: String },

    /// A response line was not a valid record.
    #[error("failed to decode line {line:?}: {source}")]
    Decode {
        line: String,
        source: serde_json::Error,
    },
}

/// Returns early with an [`Error::InvalidArgument`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::InvalidArgument(format!($($arg)*)))
    };
}
