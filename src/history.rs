use serde::{Deserialize, Serialize};

use crate::models::{Measurements, TreatmentResult};

/// Past treatment results for one pool, newest first.
///
/// Storage is the caller's concern; this only keeps the ordering and the
/// edit-in-place rule the engine's results rely on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<TreatmentResult>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TreatmentResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&TreatmentResult> {
        self.entries.first()
    }

    pub fn get(&self, id: &str) -> Option<&TreatmentResult> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Replaces the entry with the same id in place, or inserts `result` as
    /// the newest entry.
    pub fn record(&mut self, result: TreatmentResult) {
        match self.entries.iter_mut().find(|e| e.id == result.id) {
            Some(slot) => *slot = result,
            None => self.entries.insert(0, result),
        }
    }

    /// Removes every entry whose id is in `ids`; returns how many were removed.
    pub fn remove(&mut self, ids: &[&str]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !ids.contains(&e.id.as_str()));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Readings to compare against for stuck-value detection: the newest
    /// entry's measurements for a new analysis, nothing when editing.
    pub fn previous_measurements(&self, editing: bool) -> Option<&Measurements> {
        if editing {
            return None;
        }
        self.latest().map(|e| &e.measurements)
    }
}

impl FromIterator<TreatmentResult> for History {
    fn from_iter<I: IntoIterator<Item = TreatmentResult>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
