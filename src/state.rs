//! Stage state passed between chained pipeline stages.
//!
//! A [`StagePayload`] is the value a stage hands to the host pipeline on
//! completion and the value the host feeds into the next stage before its
//! run. On the wire it is a map keyed by the original source identifier,
//! each entry holding content and a destination path.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// One compilation unit carried in a [`StagePayload`].
///
/// Inbound, `content` is raw stylesheet source produced by an upstream
/// stage; outbound, it is the compiled stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUnit {
    /// Stylesheet content (raw inbound, compiled outbound)
    pub content: String,
    /// Destination path for the content
    pub destination: PathBuf,
}

impl StageUnit {
    /// Create a new unit.
    pub fn new(content: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self { content: content.into(), destination: destination.into() }
    }
}

/// State object exchanged between chained stages.
///
/// Keys are original source identifiers. Insertion order is preserved and
/// determines processing order; inserting under an existing key replaces the
/// unit in place without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagePayload {
    entries: Vec<(String, StageUnit)>,
}

impl StagePayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the payload holds no units.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of units in the payload.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert a unit under a source key.
    ///
    /// An existing entry with the same key is replaced in place.
    pub fn insert(&mut self, key: impl Into<String>, unit: StageUnit) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = unit,
            None => self.entries.push((key, unit)),
        }
    }

    /// Look up a unit by source key.
    pub fn get(&self, key: &str) -> Option<&StageUnit> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, u)| u)
    }

    /// Iterate units in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StageUnit)> {
        self.entries.iter().map(|(k, u)| (k.as_str(), u))
    }

    /// Merge another payload into this one.
    ///
    /// Entries from `other` overwrite same-keyed entries here, keeping the
    /// original position; new keys append in `other`'s order.
    pub fn merge(&mut self, other: StagePayload) {
        for (key, unit) in other.entries {
            self.insert(key, unit);
        }
    }
}

impl FromIterator<(String, StageUnit)> for StagePayload {
    fn from_iter<I: IntoIterator<Item = (String, StageUnit)>>(iter: I) -> Self {
        let mut payload = StagePayload::new();
        for (key, unit) in iter {
            payload.insert(key, unit);
        }
        payload
    }
}

impl IntoIterator for StagePayload {
    type Item = (String, StageUnit);
    type IntoIter = std::vec::IntoIter<(String, StageUnit)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// Hand-written map (de)serialization: deriving on Vec<(K, V)> would emit a
// sequence of pairs, but the wire shape is a map keyed by source.
impl Serialize for StagePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, unit) in &self.entries {
            map.serialize_entry(key, unit)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StagePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = StagePayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of source keys to stage units")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut payload = StagePayload::new();
                while let Some((key, unit)) = access.next_entry::<String, StageUnit>()? {
                    payload.insert(key, unit);
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}
