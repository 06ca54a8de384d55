// src/fetch/http.rs
use crate::error::RetrievalError;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// GET `url` and return the body as text.
///
/// A non-success status is an error; the body of an error response is never
/// handed to the parser.
#[instrument(level = "debug", skip(client, url), fields(url = %url))]
pub async fn get_text(client: &Client, url: &Url) -> Result<String, RetrievalError> {
    let http_err = |source: reqwest::Error| RetrievalError::Http {
        url: url.to_string(),
        source,
    };

    let resp = client.get(url.clone()).send().await.map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RetrievalError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = resp.text().await.map_err(http_err)?;
    debug!(bytes = text.len(), "fetched body");
    Ok(text)
}
