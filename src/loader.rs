// src/loader.rs
//! Lifecycle-driven fetch → parse → publish.
//!
//! Every trigger bumps a per-loader generation counter and spawns an attempt
//! tagged with the new value. An attempt publishes only if its tag is still
//! the latest when it finishes; anything older is dropped. Attempts are never
//! cancelled, they just lose the race.

use crate::descriptor::SourceDescriptor;
use crate::error::LoadError;
use crate::fetch::Fetcher;
use crate::parse::{Records, TabularParser};
use crate::publish::{PropertySink, VALUE_KEY};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender};
use tracing::{debug, error, info};

/// Host lifecycle hooks a component implements.
pub trait Component {
    type Props;

    /// Called once when the host creates the component.
    fn initialize(&mut self, props: &Self::Props);

    /// Called on every property update with the replacement and previous props.
    fn update(&mut self, props: &Self::Props, old_props: &Self::Props);
}

/// How one load attempt ended.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Records were handed to the property sink.
    Published { generation: u64, rows: usize },
    /// A newer attempt was started before this one finished.
    Superseded { generation: u64, latest: u64 },
    /// Retrieval or parsing failed. `stale` is set when a newer attempt had
    /// already been started by the time the failure was known.
    Failed {
        generation: u64,
        stale: bool,
        error: LoadError,
    },
}

impl LoadOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            LoadOutcome::Published { generation, .. }
            | LoadOutcome::Superseded { generation, .. }
            | LoadOutcome::Failed { generation, .. } => *generation,
        }
    }
}

fn lock(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    generation.lock().unwrap_or_else(|e| e.into_inner())
}

/// Loads delimited data for a [`SourceDescriptor`] and publishes it.
///
/// The sink is called while the generation lock is held, so a sink must not
/// call back into the loader synchronously from `publish`, and `publish`
/// should return quickly: triggers on other threads wait for it.
pub struct Loader {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn TabularParser>,
    sink: Arc<dyn PropertySink>,
    key: Arc<str>,
    generation: Arc<Mutex<u64>>,
    reports: Option<UnboundedSender<LoadOutcome>>,
    descriptor: Option<SourceDescriptor>,
    handle: Handle,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("key", &self.key)
            .field("generation", &*lock(&self.generation))
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl Loader {
    /// Build a loader that spawns onto the current tokio runtime.
    ///
    /// # Panics
    /// When called outside a tokio runtime; use [`Loader::with_handle`] there.
    pub fn new(
        fetcher: impl Fetcher,
        parser: impl TabularParser,
        sink: impl PropertySink,
    ) -> Self {
        Self::with_handle(fetcher, parser, sink, Handle::current())
    }

    pub fn with_handle(
        fetcher: impl Fetcher,
        parser: impl TabularParser,
        sink: impl PropertySink,
        handle: Handle,
    ) -> Self {
        Self::from_parts(Arc::new(fetcher), Arc::new(parser), Arc::new(sink), handle)
    }

    pub fn from_parts(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn TabularParser>,
        sink: Arc<dyn PropertySink>,
        handle: Handle,
    ) -> Self {
        Self {
            fetcher,
            parser,
            sink,
            key: Arc::from(VALUE_KEY),
            generation: Arc::new(Mutex::new(0)),
            reports: None,
            descriptor: None,
            handle,
        }
    }

    /// Publish under `key` instead of `"value"`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Arc::from(key.into());
        self
    }

    /// Send a [`LoadOutcome`] for every finished attempt.
    pub fn with_reports(mut self, reports: UnboundedSender<LoadOutcome>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Latest issued generation; 0 before the first attempt.
    pub fn generation(&self) -> u64 {
        *lock(&self.generation)
    }

    /// Descriptor from the most recent lifecycle call.
    pub fn descriptor(&self) -> Option<&SourceDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Re-apply the current descriptor. Loads only if it has `load` set.
    pub fn reload(&mut self) {
        if let Some(descriptor) = self.descriptor.clone() {
            self.trigger(&descriptor);
        }
    }

    fn trigger(&mut self, descriptor: &SourceDescriptor) {
        self.descriptor = Some(descriptor.clone());
        if !descriptor.load {
            debug!(source = %descriptor.source, "load disabled, not triggering");
            return;
        }
        self.start(&descriptor.source);
    }

    fn start(&self, source: &str) {
        let generation = {
            let mut current = lock(&self.generation);
            *current += 1;
            *current
        };
        info!(generation, source, "load started");

        let attempt = Attempt {
            generation,
            source: source.to_string(),
            fetcher: Arc::clone(&self.fetcher),
            parser: Arc::clone(&self.parser),
            sink: Arc::clone(&self.sink),
            key: Arc::clone(&self.key),
            latest: Arc::clone(&self.generation),
            reports: self.reports.clone(),
        };
        self.handle.spawn(attempt.run());
    }
}

impl Component for Loader {
    type Props = SourceDescriptor;

    fn initialize(&mut self, props: &SourceDescriptor) {
        self.trigger(props);
    }

    fn update(&mut self, props: &SourceDescriptor, old_props: &SourceDescriptor) {
        // no dedup: an enabled update always reloads
        debug!(old = %old_props.source, new = %props.source, "properties changed");
        self.trigger(props);
    }
}

/// Everything one spawned attempt owns.
struct Attempt {
    generation: u64,
    source: String,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn TabularParser>,
    sink: Arc<dyn PropertySink>,
    key: Arc<str>,
    latest: Arc<Mutex<u64>>,
    reports: Option<UnboundedSender<LoadOutcome>>,
}

impl Attempt {
    async fn run(self) {
        let outcome = match self.fetch_and_parse().await {
            Ok(records) => self.publish_if_current(records),
            Err(error) => self.failed(error),
        };
        if let Some(reports) = &self.reports {
            // receiver gone means nobody is listening
            let _ = reports.send(outcome);
        }
    }

    async fn fetch_and_parse(&self) -> Result<Records, LoadError> {
        let text = self.fetcher.fetch(&self.source).await?;
        let records = self.parser.parse(&text)?;
        Ok(records)
    }

    fn publish_if_current(&self, records: Records) -> LoadOutcome {
        let latest = lock(&self.latest);
        if *latest != self.generation {
            debug!(
                generation = self.generation,
                latest = *latest,
                source = %self.source,
                "load superseded, dropping result"
            );
            return LoadOutcome::Superseded {
                generation: self.generation,
                latest: *latest,
            };
        }

        let rows = records.len();
        self.sink.publish(&self.key, records);
        drop(latest);

        info!(generation = self.generation, rows, source = %self.source, "published");
        LoadOutcome::Published {
            generation: self.generation,
            rows,
        }
    }

    fn failed(&self, error: LoadError) -> LoadOutcome {
        let stale = *lock(&self.latest) != self.generation;
        error!(
            generation = self.generation,
            stale,
            source = %self.source,
            error = %error,
            "load failed"
        );
        LoadOutcome::Failed {
            generation: self.generation,
            stale,
            error,
        }
    }
}
