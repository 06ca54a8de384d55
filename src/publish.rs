// src/publish.rs
//! Outbound side: writing parsed records into the host's reactive properties.

use crate::parse::Records;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::watch;
use tracing::trace;

/// Default property key results are published under.
pub const VALUE_KEY: &str = "value";

/// One-way publish into the host's property channel. No acknowledgement.
pub trait PropertySink: Send + Sync + 'static {
    fn publish(&self, key: &str, value: Records);
}

impl<F> PropertySink for F
where
    F: Fn(&str, Records) + Send + Sync + 'static,
{
    fn publish(&self, key: &str, value: Records) {
        self(key, value)
    }
}

type Slot = watch::Sender<Option<Arc<Records>>>;

/// In-process property bag: one `watch` channel per key.
///
/// Subscribers see the latest value only; intermediate values may be skipped
/// if several publishes land before a subscriber wakes.
#[derive(Clone, Debug, Default)]
pub struct PropertyBag {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slot<R>(&self, key: &str, f: impl FnOnce(&Slot) -> R) -> R {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| watch::channel(None).0);
        f(slot)
    }

    /// Watch `key`. The receiver starts at the current value (`None` if
    /// nothing was published yet).
    pub fn subscribe(&self, key: &str) -> watch::Receiver<Option<Arc<Records>>> {
        self.with_slot(key, |slot| slot.subscribe())
    }

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<Arc<Records>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).and_then(|slot| slot.borrow().clone())
    }
}

impl PropertySink for PropertyBag {
    fn publish(&self, key: &str, value: Records) {
        trace!(key, rows = value.len(), "publish");
        self.with_slot(key, |slot| {
            slot.send_replace(Some(Arc::new(value)));
        });
    }
}
