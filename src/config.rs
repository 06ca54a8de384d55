// src/config.rs
use crate::fetch::SourceFetcher;
use crate::parse::DelimitedParser;
use crate::publish::VALUE_KEY;
use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf, time::Duration};
use url::Url;

/// Loader settings, usually read from YAML. Every field has a default.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Property key results are published under.
    pub value_key: String,
    /// Base URL for relative locators (takes precedence over `base_dir`).
    pub base_url: Option<String>,
    /// Directory relative paths are read from.
    pub base_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub parser: ParserConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            value_key: VALUE_KEY.to_string(),
            base_url: None,
            base_dir: None,
            request_timeout_secs: None,
            user_agent: None,
            parser: ParserConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Single-byte field delimiter; `"\t"` for TSV.
    pub delimiter: char,
    pub auto_type: bool,
    pub trim: bool,
    pub strict: bool,
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            auto_type: false,
            trim: false,
            strict: false,
            max_rows: None,
        }
    }
}

impl LoaderConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing loader config YAML")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading loader config {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {:?}", path))
    }

    pub fn build_parser(&self) -> Result<DelimitedParser> {
        let p = &self.parser;
        if !p.delimiter.is_ascii() {
            bail!("delimiter {:?} is not a single ASCII byte", p.delimiter);
        }
        Ok(DelimitedParser::default()
            .delimiter(p.delimiter as u8)
            .auto_type(p.auto_type)
            .trim(p.trim)
            .strict(p.strict)
            .max_rows(p.max_rows))
    }

    pub fn build_fetcher(&self) -> Result<SourceFetcher> {
        let mut builder = Client::builder();
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        let client = builder.build().context("building HTTP client")?;

        let mut fetcher = SourceFetcher::new(client);
        if let Some(base) = &self.base_url {
            let url = Url::parse(base).with_context(|| format!("parsing base_url {}", base))?;
            fetcher = fetcher.with_base_url(url);
        }
        if let Some(dir) = &self.base_dir {
            fetcher = fetcher.with_base_dir(dir);
        }
        Ok(fetcher)
    }
}
