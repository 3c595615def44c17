/*!
 * Path lookup over flattened file maps
 */

use std::collections::HashMap;

use crate::path::{join_path_parts, path_to_path_parts};
use crate::types::FlattenedFileMapItem;

/// Index from path to flattened record
pub struct FileMapPathIndex<'a, T> {
    records: &'a [FlattenedFileMapItem<T>],
    by_path: HashMap<&'a str, usize>,
}

impl<'a, T> FileMapPathIndex<'a, T> {
    /// Index every record of `records` by its path
    pub fn new(records: &'a [FlattenedFileMapItem<T>]) -> Self {
        let by_path = records
            .iter()
            .map(|record| (record.path.as_str(), record.index))
            .collect();
        Self { records, by_path }
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Position of the record at `path`
    pub fn index_of(&self, path: &str) -> Option<usize> {
        let normalized = join_path_parts(&path_to_path_parts(path));
        self.by_path.get(normalized.as_str()).copied()
    }

    /// Record at `path`
    pub fn get(&self, path: &str) -> Option<&'a FlattenedFileMapItem<T>> {
        self.index_of(path).and_then(|index| self.records.get(index))
    }

    /// Parent record of the record at `path`
    pub fn parent(&self, path: &str) -> Option<&'a FlattenedFileMapItem<T>> {
        self.get(path)?
            .parent_index
            .and_then(|index| self.records.get(index))
    }

    /// Child records of the record at `path`, in flattened order
    pub fn children(&self, path: &str) -> Vec<&'a FlattenedFileMapItem<T>> {
        self.get(path)
            .and_then(|record| record.children_indices.as_ref())
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|index| self.records.get(*index))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        path: &str,
        index: usize,
        parent_index: Option<usize>,
        children_indices: Option<Vec<usize>>,
    ) -> FlattenedFileMapItem<()> {
        FlattenedFileMapItem {
            path_parts: path_to_path_parts(path),
            path: path.to_string(),
            data: (),
            index,
            parent_index,
            children_indices,
        }
    }

    #[test]
    fn test_lookup_and_navigation() {
        let records = vec![
            record("docs", 0, None, Some(vec![1, 2])),
            record("docs/a", 1, Some(0), None),
            record("docs/b", 2, Some(0), None),
            record("readme", 3, None, None),
        ];
        let index = FileMapPathIndex::new(&records);

        assert_eq!(index.len(), 4);
        assert_eq!(index.index_of("/docs/b/"), Some(2));
        assert_eq!(index.parent("docs/a").map(|r| r.index), Some(0));
        assert!(index.parent("readme").is_none());
        let children: Vec<_> = index.children("docs").iter().map(|r| r.path.as_str()).collect();
        assert_eq!(children, vec!["docs/a", "docs/b"]);
        assert!(index.children("readme").is_empty());
        assert!(index.get("nope").is_none());
    }
}
