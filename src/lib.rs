//! Reactive loader for delimited data sources.
//!
//! A [`Loader`] reacts to host lifecycle calls (see [`Component`]), fetches
//! the text behind a [`SourceDescriptor`], parses it into [`Records`] and
//! publishes the result into a [`PropertySink`]. Only the most recently
//! started attempt may publish.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod parse;
pub mod publish;
pub mod telemetry;

pub use config::{LoaderConfig, ParserConfig};
pub use descriptor::SourceDescriptor;
pub use error::{LoadError, ParseError, RetrievalError};
pub use fetch::{Fetcher, SourceFetcher};
pub use loader::{Component, LoadOutcome, Loader};
pub use parse::{Cell, DelimitedParser, Record, Records, TabularParser};
pub use publish::{PropertyBag, PropertySink, VALUE_KEY};
