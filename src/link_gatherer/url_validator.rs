use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UrlError {
    #[error("{0}")]
    Parse(#[from] url::ParseError),
    #[error("URL must start with http:// or https://")]
    Scheme(String),
}

fn has_http_prefix(candidate: &str) -> bool {
    candidate
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

/// Parses `candidate` and accepts it only as an absolute http(s) URL with a host.
pub fn validate(candidate: &str) -> Result<Url, UrlError> {
    if !has_http_prefix(candidate) {
        return Err(UrlError::Scheme(candidate.to_string()));
    }
    let url = Url::parse(candidate)?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(UrlError::Scheme(candidate.to_string())),
    }
}
