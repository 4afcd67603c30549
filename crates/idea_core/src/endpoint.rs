use thiserror::Error;
use url::Url;

/// Path of the idea stream, relative to the configured base URL.
pub const STREAM_PATH: &str = "stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("base URL is empty")]
    Empty,
    #[error("invalid base URL {url:?}: {reason}")]
    Invalid { url: String, reason: String },
    #[error("unsupported scheme {0:?}; expected http or https")]
    UnsupportedScheme(String),
    #[error("base URL must not carry a query or fragment: {0:?}")]
    QueryOrFragment(String),
}

/// Derives `<base>/stream` from the configured base URL.
///
/// A trailing slash on the base is tolerated; any path prefix is kept.
pub fn stream_endpoint(base: &str) -> Result<String, EndpointError> {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::Empty);
    }

    let mut url = Url::parse(trimmed).map_err(|err| EndpointError::Invalid {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(EndpointError::QueryOrFragment(trimmed.to_string()));
    }

    let prefix = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{prefix}/{STREAM_PATH}"));
    Ok(url.to_string())
}
