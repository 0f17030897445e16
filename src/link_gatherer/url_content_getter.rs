use std::future::Future;

use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::Instrument;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum URLContentGetterError {
    #[error("{0}")]
    Request(String),
    #[error("{0}")]
    Body(String),
}

pub type Body = BoxStream<'static, Result<Vec<u8>, URLContentGetterError>>;

/// Fetches a URL and hands back its response body as a stream of chunks.
pub trait URLContentGetter {
    fn get_http_response_body(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Body, URLContentGetterError>> + Send;
}

pub fn client() -> Result<reqwest::Client, URLContentGetterError> {
    reqwest::Client::builder()
        .user_agent(concat!("link_harvest/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| URLContentGetterError::Request(err.to_string()))
}

impl URLContentGetter for reqwest::Client {
    fn get_http_response_body(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Body, URLContentGetterError>> + Send {
        async move {
            tracing::debug!("connecting");
            match self.get(url.clone()).send().await {
                Ok(resp) => {
                    tracing::debug!(status = resp.status().as_u16(), "response");
                    Ok(resp
                        .bytes_stream()
                        .map_ok(|chunk| chunk.to_vec())
                        .map_err(|err| URLContentGetterError::Body(err.to_string()))
                        .boxed())
                }
                Err(err) => {
                    tracing::debug!(error = %err, "request failed");
                    Err(URLContentGetterError::Request(err.to_string()))
                }
            }
        }
        .instrument(tracing::debug_span!("fetch", url = %url))
    }
}
