/*!
 * Conversion between file maps and flattened, index-addressed records
 */

use std::cmp::Ordering;

use crate::error::{FileMapError, Result};
use crate::file_map::FileMap;
use crate::types::{FileMapItem, FlattenedFileMap, FlattenedFileMapItem, NodeId};

/// Default sibling order: ascending by path
pub fn compare_by_path<T>(a: &FileMapItem<T>, b: &FileMapItem<T>) -> Ordering {
    a.path.cmp(&b.path)
}

/// Flatten with siblings sorted by path
pub fn flatten<T: Clone>(map: &FileMap<T>) -> FlattenedFileMap<T> {
    flatten_by(map, compare_by_path)
}

/// Flatten in pre-order with siblings sorted by `compare`
///
/// Each record is followed by the contiguous block of its whole subtree.
/// Indices are dense and assigned in output order. Directories always carry
/// `children_indices`, empty when they have no children.
pub fn flatten_by<T, C>(map: &FileMap<T>, compare: C) -> FlattenedFileMap<T>
where
    T: Clone,
    C: Fn(&FileMapItem<T>, &FileMapItem<T>) -> Ordering,
{
    let mut records = Vec::with_capacity(map.len());
    let roots: Vec<NodeId> = map.roots().values().copied().collect();
    flatten_level(map, roots, None, &compare, &mut records);
    records
}

fn flatten_level<T, C>(
    map: &FileMap<T>,
    mut ids: Vec<NodeId>,
    parent_index: Option<usize>,
    compare: &C,
    records: &mut FlattenedFileMap<T>,
) -> Vec<usize>
where
    T: Clone,
    C: Fn(&FileMapItem<T>, &FileMapItem<T>) -> Ordering,
{
    ids.sort_by(|a, b| compare(&map[*a], &map[*b]));
    let mut indices = Vec::with_capacity(ids.len());

    for id in ids {
        let item = &map[id];
        let index = records.len();
        records.push(FlattenedFileMapItem {
            path_parts: item.path_parts.clone(),
            path: item.path.clone(),
            data: item.data.clone(),
            index,
            parent_index,
            children_indices: None,
        });

        if let Some(children) = &item.children {
            let child_ids = children.values().copied().collect();
            let children_indices = flatten_level(map, child_ids, Some(index), compare, records);
            records[index].children_indices = Some(children_indices);
        }
        indices.push(index);
    }

    indices
}

/// Rebuild a [`FileMap`] from flattened records
///
/// Children are keyed by their last path segment. Fails if a record's index
/// does not match its position, a link points outside the array, a child's
/// `parent_index` disagrees with the parent listing it, or a record is not
/// reachable from a top-level record.
pub fn unflatten<T: Clone>(records: &[FlattenedFileMapItem<T>]) -> Result<FileMap<T>> {
    for (position, record) in records.iter().enumerate() {
        if record.index != position {
            return Err(FileMapError::InvalidIndex(format!(
                "record '{}' at position {} claims index {}",
                record.path, position, record.index
            )));
        }
    }

    let mut map = FileMap::new();
    let roots: Vec<usize> = records
        .iter()
        .filter(|record| record.parent_index.is_none())
        .map(|record| record.index)
        .collect();
    unflatten_level(records, &roots, None, &mut map)?;

    if map.len() != records.len() {
        return Err(FileMapError::InvalidIndex(format!(
            "{} of {} records are not reachable from a top-level record",
            records.len() - map.len(),
            records.len()
        )));
    }
    Ok(map)
}

fn unflatten_level<T: Clone>(
    records: &[FlattenedFileMapItem<T>],
    indices: &[usize],
    parent: Option<(usize, NodeId)>,
    map: &mut FileMap<T>,
) -> Result<()> {
    for &index in indices {
        let record = records.get(index).ok_or_else(|| {
            FileMapError::InvalidIndex(format!(
                "index {} is out of bounds for {} records",
                index,
                records.len()
            ))
        })?;
        let expected_parent = parent.map(|(parent_index, _)| parent_index);
        if record.parent_index != expected_parent {
            return Err(FileMapError::InvalidIndex(format!(
                "record {} has parent {:?} but is listed under {:?}",
                index, record.parent_index, expected_parent
            )));
        }
        let name = record.path_parts.last().cloned().ok_or_else(|| {
            FileMapError::InvalidIndex(format!("record {} has an empty path", index))
        })?;

        let item = FileMapItem {
            path_parts: record.path_parts.clone(),
            path: record.path.clone(),
            data: record.data.clone(),
            parent: parent.map(|(_, id)| id),
            children: record.children_indices.as_ref().map(|_| Default::default()),
        };
        let id = map.insert(parent.map(|(_, id)| id), name, item)?;

        if let Some(children) = &record.children_indices {
            unflatten_level(records, children, Some((index, id)), map)?;
        }
    }
    Ok(())
}

/// Re-sort flattened records with a new sibling order
pub fn sort_flattened<T, C>(
    records: &[FlattenedFileMapItem<T>],
    compare: C,
) -> Result<FlattenedFileMap<T>>
where
    T: Clone,
    C: Fn(&FileMapItem<T>, &FileMapItem<T>) -> Ordering,
{
    let map = unflatten(records)?;
    Ok(flatten_by(&map, compare))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{create_file_map, CreateFileMapOptions};
    use crate::types::{FsFileMap, FsFileMapItem};

    fn file(data: u32) -> FsFileMapItem<u32> {
        FsFileMapItem::File(data)
    }

    fn dir(entries: Vec<(&str, FsFileMapItem<u32>)>) -> FsFileMapItem<u32> {
        FsFileMapItem::Directory(
            entries
                .into_iter()
                .map(|(name, item)| (name.to_string(), item))
                .collect(),
        )
    }

    /// x/ (10) { z (11), y/ (12) { q (13) } }, w (1), empty/ (2)
    fn sample() -> FileMap<u32> {
        let raw: FsFileMap<u32> = vec![
            (
                "x".to_string(),
                dir(vec![
                    ("index", file(10)),
                    ("z", file(11)),
                    ("y", dir(vec![("index", file(12)), ("q", file(13))])),
                ]),
            ),
            ("w".to_string(), file(1)),
            ("empty".to_string(), dir(vec![("index", file(2))])),
        ]
        .into_iter()
        .collect();
        create_file_map(raw, |_, _| Some("index".to_string()), &CreateFileMapOptions::default())
            .unwrap()
    }

    fn paths(records: &[FlattenedFileMapItem<u32>]) -> Vec<&str> {
        records.iter().map(|r| r.path.as_str()).collect()
    }

    #[test]
    fn test_flatten_is_preorder_sorted_by_path() {
        let records = flatten(&sample());
        assert_eq!(paths(&records), vec!["empty", "w", "x", "x/y", "x/y/q", "x/z"]);

        let x = &records[2];
        assert_eq!(x.data, 10);
        assert_eq!(x.parent_index, None);
        assert_eq!(x.children_indices, Some(vec![3, 5]));
        assert_eq!(records[4].parent_index, Some(3));
        assert_eq!(records[0].children_indices, Some(vec![]));
        assert_eq!(records[1].children_indices, None);
    }

    #[test]
    fn test_indices_are_dense_and_consistent() {
        let records = flatten(&sample());
        for (position, record) in records.iter().enumerate() {
            assert_eq!(record.index, position);
            if let Some(parent) = record.parent_index {
                let siblings = records[parent].children_indices.as_ref().unwrap();
                assert!(siblings.contains(&position));
                assert!(parent < position);
            }
            for child in record.children_indices.iter().flatten() {
                assert_eq!(records[*child].parent_index, Some(position));
            }
        }
    }

    #[test]
    fn test_subtrees_are_contiguous() {
        let records = flatten(&sample());
        // x spans x, x/y, x/y/q, x/z
        let x = &records[2];
        let end = 2 + records[2..]
            .iter()
            .take_while(|r| r.path == x.path || r.path.starts_with("x/"))
            .count();
        assert_eq!(end, records.len());
    }

    #[test]
    fn test_unflatten_inverts_flatten() {
        let map = sample();
        let rebuilt = unflatten(&flatten(&map)).unwrap();
        assert_eq!(rebuilt, map);

        let q = rebuilt.get_by_path("x/y/q").unwrap();
        assert_eq!(rebuilt.parent(q).unwrap().path, "x/y");
    }

    #[test]
    fn test_sort_flattened_with_reverse_order() {
        let records = flatten(&sample());
        let sorted = sort_flattened(&records, |a, b| b.path.cmp(&a.path)).unwrap();

        assert_eq!(paths(&sorted), vec!["x", "x/z", "x/y", "x/y/q", "w", "empty"]);
        for record in &sorted {
            if let Some(parent) = record.parent_index {
                assert!(sorted[parent]
                    .children_indices
                    .as_ref()
                    .unwrap()
                    .contains(&record.index));
            }
        }
        assert_eq!(unflatten(&sorted).unwrap(), sample());
    }

    #[test]
    fn test_unflatten_rejects_bad_links() {
        let mut records = flatten(&sample());
        records[4].parent_index = Some(0);
        assert!(matches!(
            unflatten(&records),
            Err(FileMapError::InvalidIndex(_))
        ));

        let mut records = flatten(&sample());
        records[2].children_indices = Some(vec![3, 99]);
        assert!(matches!(
            unflatten(&records),
            Err(FileMapError::InvalidIndex(_))
        ));

        let mut records = flatten(&sample());
        records[1].index = 7;
        assert!(matches!(
            unflatten(&records),
            Err(FileMapError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_unreachable_record_is_rejected() {
        let mut records = flatten(&sample());
        // x/z no longer listed by x
        records[2].children_indices = Some(vec![3]);
        assert!(matches!(
            unflatten(&records),
            Err(FileMapError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_empty_map() {
        let map: FileMap<u32> = FileMap::new();
        let records = flatten(&map);
        assert!(records.is_empty());
        assert!(unflatten(&records).unwrap().is_empty());
    }
}
