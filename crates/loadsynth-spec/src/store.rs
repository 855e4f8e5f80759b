//! Ordered, index-addressed collection of load definitions.
//!
//! The store is owned by the caller and handed to whatever needs it; the
//! engine itself keeps no state between calls.

use serde::{Deserialize, Serialize};

use crate::definition::LoadDefinition;
use crate::error::StoreError;

/// Ordered list of load definitions.
///
/// `add` appends, `update` replaces in place, `remove_at` shifts every later
/// index down by one. Indices held across a removal must be re-resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadStore {
    loads: Vec<LoadDefinition>,
}

impl LoadStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a load set from JSON: either one definition or an array of them.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.is_array() {
            serde_json::from_value(value)
        } else {
            let def: LoadDefinition = serde_json::from_value(value)?;
            Ok(Self { loads: vec![def] })
        }
    }

    /// Serializes the store as a pretty-printed JSON array.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Appends a definition and returns its index.
    pub fn add(&mut self, def: LoadDefinition) -> usize {
        self.loads.push(def);
        self.loads.len() - 1
    }

    /// Replaces the definition at `index`.
    pub fn update(&mut self, index: usize, def: LoadDefinition) -> Result<(), StoreError> {
        let len = self.loads.len();
        let slot = self
            .loads
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        *slot = def;
        Ok(())
    }

    /// Removes and returns the definition at `index`, preserving the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> Result<LoadDefinition, StoreError> {
        if index >= self.loads.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.loads.len(),
            });
        }
        Ok(self.loads.remove(index))
    }

    /// Returns the definition at `index`.
    pub fn get(&self, index: usize) -> Option<&LoadDefinition> {
        self.loads.get(index)
    }

    /// Returns the definition at `index` for in-place mutation.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut LoadDefinition> {
        self.loads.get_mut(index)
    }

    /// Returns all definitions in order.
    pub fn get_all(&self) -> &[LoadDefinition] {
        &self.loads
    }

    /// Number of stored definitions.
    pub fn count(&self) -> usize {
        self.loads.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Iterates over the definitions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LoadDefinition> {
        self.loads.iter()
    }

    /// Iterates mutably over the definitions in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LoadDefinition> {
        self.loads.iter_mut()
    }
}

impl<'a> IntoIterator for &'a LoadStore {
    type Item = &'a LoadDefinition;
    type IntoIter = std::slice::Iter<'a, LoadDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.loads.iter()
    }
}

impl FromIterator<LoadDefinition> for LoadStore {
    fn from_iter<I: IntoIterator<Item = LoadDefinition>>(iter: I) -> Self {
        Self {
            loads: iter.into_iter().collect(),
        }
    }
}
