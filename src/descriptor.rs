// src/descriptor.rs
use serde::{Deserialize, Serialize};

/// What to load and whether loading is enabled.
///
/// Hosts replace the descriptor wholesale on every property update; it is
/// never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// URL or path of the delimited text.
    #[serde(alias = "src")]
    pub source: String,
    /// Whether a lifecycle event should start a load.
    #[serde(default)]
    pub load: bool,
}

impl SourceDescriptor {
    pub fn new(source: impl Into<String>, load: bool) -> Self {
        Self {
            source: source.into(),
            load,
        }
    }

    /// Descriptor with loading enabled.
    pub fn enabled(source: impl Into<String>) -> Self {
        Self::new(source, true)
    }

    /// Descriptor with loading disabled.
    pub fn disabled(source: impl Into<String>) -> Self {
        Self::new(source, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_host_props() {
        let d: SourceDescriptor = serde_json::from_str(r#"{"src":"data/a.csv","load":true}"#)
            .expect("props should deserialize");
        assert_eq!(d, SourceDescriptor::enabled("data/a.csv"));

        // `load` absent means disabled
        let d: SourceDescriptor =
            serde_json::from_str(r#"{"source":"b.csv"}"#).expect("props should deserialize");
        assert!(!d.load);
    }
}
