use dashmap::DashMap;
use std::path::{Path, PathBuf};

use crate::symbols::types::SymbolEntry;

/// Cross-file map from simple type name to every known declaration.
///
/// Rows survive across requests. A path carries a generation counter:
/// purging bumps the counter and physically removes every row either
/// origin at that path contributed, so a resubmitted file can never leave
/// a stale or duplicate row behind.
pub struct SymbolIndex {
    map: DashMap<String, Vec<SymbolEntry>>,
    generations: DashMap<PathBuf, u64>,
}

impl Default for SymbolIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    pub fn generation(
        &self,
        path: &Path,
    ) -> u64 {
        self.generations.get(path).map(|g| *g).unwrap_or(0)
    }

    /// Drop every row owned by `path` and open a new generation for it.
    pub fn purge_path(
        &self,
        path: &Path,
    ) -> u64 {
        let mut next = 0;
        self.generations
            .entry(path.to_path_buf())
            .and_modify(|g| {
                *g += 1;
                next = *g;
            })
            .or_insert_with(|| {
                next = 1;
                1
            });
        self.map.retain(|_, rows| {
            rows.retain(|row| row.owner.path() != path);
            !rows.is_empty()
        });
        next
    }

    pub fn insert(
        &self,
        entry: SymbolEntry,
    ) {
        self.map.entry(entry.name.clone()).or_default().push(entry);
    }

    /// Rows whose generation is still current for their owning path.
    pub fn lookup(
        &self,
        name: &str,
    ) -> Vec<SymbolEntry> {
        self.map
            .get(name)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.generation == self.generation(row.owner.path()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn lookup_qualified(
        &self,
        qualified: &str,
    ) -> Vec<SymbolEntry> {
        let simple = qualified.rsplit('.').next().unwrap_or(qualified);
        self.lookup(simple)
            .into_iter()
            .filter(|row| row.qualified_name == qualified)
            .collect()
    }

    pub fn rows_for_path(
        &self,
        path: &Path,
    ) -> Vec<SymbolEntry> {
        let mut rows: Vec<SymbolEntry> = self
            .map
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|row| row.owner.path() == path)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        rows.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        rows
    }

    /// Case-sensitive prefix search over live rows, alphabetical order.
    pub fn names_with_prefix(
        &self,
        prefix: &str,
    ) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .filter(|entry| {
                entry
                    .value()
                    .iter()
                    .any(|row| row.generation == self.generation(row.owner.path()))
            })
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
#[path = "../../tests/src/symbols/index_tests.rs"]
mod tests;
