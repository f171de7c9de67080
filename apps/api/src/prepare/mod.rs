//! Normalization & pruning: turns raw résumé records into the grouped,
//! sorted, pruned structure the template renders.
//!
//! Pure: no I/O, no hidden state. Per-kind behavior comes from the policy on
//! `EntryKind` (`sort_rule` / `retention`), never from comparing type strings.

pub mod handlers;
mod ordering;
mod pruning;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::entry::{Entry, EntryKind};

/// Entries partitioned by kind. Serializes as a JSON object keyed by `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedEntries {
    groups: BTreeMap<EntryKind, Vec<Entry>>,
}

impl GroupedEntries {
    #[cfg(test)]
    pub fn get(&self, kind: &EntryKind) -> &[Entry] {
        self.groups.get(kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryKind, &[Entry])> {
        self.groups.iter().map(|(kind, entries)| (kind, entries.as_slice()))
    }

    /// Total number of entries across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partitions entries by kind, keeping input order within each group.
pub fn group(entries: Vec<Entry>) -> GroupedEntries {
    let mut groups: BTreeMap<EntryKind, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.kind.clone()).or_default().push(entry);
    }
    GroupedEntries { groups }
}

/// Parses, groups, sorts and prunes raw records.
///
/// Fails with `DataShape` on the first record that does not match the shape
/// its `type` requires; nothing is defaulted.
pub fn normalize(raw: Vec<Value>) -> Result<GroupedEntries, AppError> {
    let entries = raw
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Entry::try_from(value).map_err(|e| AppError::DataShape(format!("record {index}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut grouped = group(entries);
    for (kind, entries) in grouped.groups.iter_mut() {
        ordering::sort_group(kind.sort_rule(), entries);
        pruning::prune_group(kind.retention(), entries);
        debug!("Prepared {} {kind} entries", entries.len());
    }
    Ok(grouped)
}
