// src/fetch/mod.rs
//! Retrieval of raw text for a source locator.
//!
//! The loader only sees the [`Fetcher`] trait. [`SourceFetcher`] is the
//! default: http(s) URLs go through `reqwest`, `file://` URLs and bare paths
//! through `tokio::fs`.

use crate::error::RetrievalError;
use futures::future::BoxFuture;
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

pub mod file;
pub mod http;

/// Asynchronous "locator → text" capability supplied by the host.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<String, RetrievalError>>;
}

/// Where a locator points once resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locator {
    Http(Url),
    File(PathBuf),
}

/// Default fetcher for URLs and filesystem paths.
#[derive(Clone, Debug, Default)]
pub struct SourceFetcher {
    client: Client,
    base_url: Option<Url>,
    base_dir: Option<PathBuf>,
}

impl SourceFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            base_dir: None,
        }
    }

    /// Relative locators are joined onto this URL.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    /// Relative locators are read from this directory (unless a base URL is set).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Resolve `source` without touching the network or disk.
    pub fn resolve(&self, source: &str) -> Result<Locator, RetrievalError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(RetrievalError::InvalidLocator(source.to_string()));
        }

        match Url::parse(source) {
            // single-letter "schemes" are Windows drive letters
            Ok(url) if url.scheme().len() == 1 => Ok(Locator::File(PathBuf::from(source))),
            Ok(url) => classify(url, source),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.resolve_relative(source),
            Err(_) => Err(RetrievalError::InvalidLocator(source.to_string())),
        }
    }

    fn resolve_relative(&self, source: &str) -> Result<Locator, RetrievalError> {
        if let Some(base) = &self.base_url {
            let url = base
                .join(source)
                .map_err(|_| RetrievalError::InvalidLocator(source.to_string()))?;
            return classify(url, source);
        }

        let path = Path::new(source);
        match &self.base_dir {
            Some(dir) if path.is_relative() => Ok(Locator::File(dir.join(path))),
            _ => Ok(Locator::File(path.to_path_buf())),
        }
    }
}

fn classify(url: Url, source: &str) -> Result<Locator, RetrievalError> {
    match url.scheme() {
        "http" | "https" => Ok(Locator::Http(url)),
        "file" => url
            .to_file_path()
            .map(Locator::File)
            .map_err(|_| RetrievalError::InvalidLocator(source.to_string())),
        other => Err(RetrievalError::UnsupportedScheme {
            scheme: other.to_string(),
            locator: source.to_string(),
        }),
    }
}

impl Fetcher for SourceFetcher {
    fn fetch<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<String, RetrievalError>> {
        Box::pin(async move {
            match self.resolve(source)? {
                Locator::Http(url) => http::get_text(&self.client, &url).await,
                Locator::File(path) => file::read_text(&path).await,
            }
        })
    }
}
