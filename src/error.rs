use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

/// Failure of a single upstream request.
///
/// Every variant is a transport-level failure: the request did not yield a
/// usable envelope. An envelope that explicitly reports "no data" is not an
/// error and never surfaces through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP status error: {0}")]
    Status(u16),

    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_wraps_into_crate_error() {
        let err: Error = ApiError::Status(503).into();
        assert_eq!(err.to_string(), "API error: HTTP status error: 503");
    }

    #[test]
    fn test_string_converts_to_other() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(ref m) if m == "boom"));
    }
}
