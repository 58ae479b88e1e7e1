use crate::settings::{leaf_paths, SettingsTree};
use std::collections::BTreeSet;

/// Fast lookup from dotted field path to "locked". Only leaves are
/// addressable: a locked object subtree is represented by indexing every
/// leaf beneath it, and an empty object locks nothing. Arrays are one
/// atomic locked unit at their own path, never element-wise.
///
/// The index carries the fingerprint of the profile snapshot it was built
/// from so the owner can verify that "what is locked" and "what value
/// locking enforces" never drift apart.
#[derive(Debug, Clone, Default)]
pub struct LockedPathIndex {
    paths: BTreeSet<String>,
    fingerprint: String,
}

impl LockedPathIndex {
    pub fn build(locked: &SettingsTree, fingerprint: &str) -> Self {
        Self {
            paths: leaf_paths(locked).into_iter().collect(),
            fingerprint: fingerprint.to_string(),
        }
    }

    pub fn is_locked(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
