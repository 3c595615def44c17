/*!
 * End-to-end tests for the walk, resolve, flatten and rename pipeline
 */

use std::time::Duration;

use crate::cancel::CancelSignal;
use crate::error::FileMapError;
use crate::file_map::FileMap;
use crate::flatten::{flatten, sort_flattened, unflatten};
use crate::fs::MemoryFs;
use crate::index::FileMapPathIndex;
use crate::resolver::{create_file_map, CreateFileMapOptions};
use crate::types::{FlattenedFileMapItem, FsFileMap};
use crate::walker::{walk_directory, WalkOptions};

// Each file holds the path its data ends up at after index resolution
const FIXTURE: &[(&str, &str)] = &[
    ("dir/a/index", "a"),
    ("dir/a/a", "a/a"),
    ("dir/b/index", "b"),
    ("dir/c", "c"),
    ("dir/d/index", "d"),
    ("dir/d/a/index", "d/a"),
    ("dir/d/a/a", "d/a/a"),
    ("dir/d/a/b", "d/a/b"),
    ("dir/d/a/c/index", "d/a/c"),
    ("dir/d/a/d", "d/a/d"),
    ("dir/d/a/e/index", "d/a/e"),
    ("dir/d/a/e/a", "d/a/e/a"),
    ("dir/d/b", "d/b"),
];

const PREORDER: &[&str] = &[
    "a", "a/a", "b", "c", "d", "d/a", "d/a/a", "d/a/b", "d/a/c", "d/a/d", "d/a/e", "d/a/e/a",
    "d/b",
];

fn fixture_fs() -> MemoryFs {
    let mut fs = MemoryFs::new();
    for (path, contents) in FIXTURE {
        fs.add_file(path, *contents).unwrap();
    }
    fs
}

fn index_file(_: &str, _: &FsFileMap<String>) -> Option<String> {
    Some("index".to_string())
}

fn fixture_map() -> FileMap<String> {
    let fs = fixture_fs();
    let raw = walk_directory(&fs, "dir", &WalkOptions::new(Ok))
        .unwrap()
        .unwrap();
    create_file_map(raw, index_file, &CreateFileMapOptions::default()).unwrap()
}

fn assert_consistent(records: &[FlattenedFileMapItem<String>]) {
    for (position, record) in records.iter().enumerate() {
        assert_eq!(record.index, position);
        assert_eq!(record.data, record.path);
        if let Some(parent) = record.parent_index {
            let siblings = records[parent].children_indices.as_ref().unwrap();
            assert!(siblings.contains(&position), "{} missing from parent", record.path);
        }
        for child in record.children_indices.iter().flatten() {
            assert_eq!(records[*child].parent_index, Some(position));
        }
    }
}

#[test]
fn test_pipeline_produces_thirteen_records() {
    let records = flatten(&fixture_map());

    assert_eq!(records.len(), 13);
    let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, PREORDER);
    assert_consistent(&records);

    let a = &records[0];
    assert_eq!(a.data, "a");
    assert_eq!(a.path_parts, vec!["a"]);
    assert_eq!(a.children_indices, Some(vec![1]));
    assert_eq!(records[2].children_indices, Some(vec![]));
    assert_eq!(records[3].children_indices, None);
    assert_eq!(records[5].children_indices, Some(vec![6, 7, 8, 9, 10]));
}

#[test]
fn test_unflatten_then_rename() {
    let map = fixture_map();
    let mut rebuilt = unflatten(&flatten(&map)).unwrap();
    assert_eq!(rebuilt, map);

    rebuilt
        .transform_names(|name, _| format!("{}New", name))
        .unwrap();

    let a = rebuilt.get_by_path("aNew").unwrap();
    assert_eq!(rebuilt[a].data, "a");
    assert_eq!(rebuilt[a].path, "aNew");
    let nested = rebuilt.get_by_path("aNew/aNew").unwrap();
    assert_eq!(rebuilt[nested].data, "a/a");
    assert_eq!(rebuilt[nested].path_parts, vec!["aNew", "aNew"]);

    let deep = rebuilt.get_by_path("dNew/aNew/eNew/aNew").unwrap();
    assert_eq!(rebuilt[deep].data, "d/a/e/a");
    assert!(rebuilt.get_by_path("a").is_none());
    assert_eq!(rebuilt.len(), 13);
}

#[test]
fn test_identity_rename_leaves_map_unchanged() {
    let map = fixture_map();
    let mut renamed = map.clone();
    renamed.transform_names(|name, _| name.to_string()).unwrap();
    assert_eq!(renamed, map);
    assert_eq!(flatten(&renamed), flatten(&map));
}

#[test]
fn test_missing_index_is_fatal() {
    let fs = fixture_fs().with_file("dir/e/x", "x").unwrap();
    let raw = walk_directory(&fs, "dir", &WalkOptions::new(Ok))
        .unwrap()
        .unwrap();

    let err = create_file_map(raw.clone(), index_file, &CreateFileMapOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        FileMapError::IndexFileNotFound { ref directory, .. } if directory == "e"
    ));

    let only_if_present = |_: &str, children: &FsFileMap<String>| {
        children.contains_key("index").then(|| "index".to_string())
    };
    let err = create_file_map(raw, only_if_present, &CreateFileMapOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Directory 'e' doesn't have an index file");
}

#[test]
fn test_directory_filter_prunes_subtree() {
    let fs = fixture_fs();
    let options = WalkOptions::new(Ok).with_directory_filter(|entry| entry.name != "d");
    let raw = walk_directory(&fs, "dir", &options).unwrap().unwrap();
    let map = create_file_map(raw, index_file, &CreateFileMapOptions::default()).unwrap();
    let records = flatten(&map);

    let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["a", "a/a", "b", "c"]);
}

#[test]
fn test_sort_flattened_keeps_links_consistent() {
    let records = flatten(&fixture_map());
    let sorted = sort_flattened(&records, |a, b| b.path.cmp(&a.path)).unwrap();

    assert_eq!(sorted.len(), 13);
    assert_eq!(sorted[0].path, "d");
    assert_eq!(sorted[1].path, "d/b");
    assert_consistent(&sorted);

    let index = FileMapPathIndex::new(&sorted);
    let children: Vec<_> = index
        .children("d/a")
        .iter()
        .map(|r| r.path.as_str())
        .collect();
    assert_eq!(children, vec!["d/a/e", "d/a/d", "d/a/c", "d/a/b", "d/a/a"]);
    assert_eq!(index.parent("d/a/e/a").map(|r| r.path.as_str()), Some("d/a/e"));
}

#[test]
fn test_expired_timeout_cancels_walk() {
    let fs = fixture_fs();
    let signal = CancelSignal::with_timeout(Duration::from_millis(1));
    std::thread::sleep(Duration::from_millis(100));
    let options = WalkOptions::new(Ok).with_cancel_signal(signal);
    let err = walk_directory(&fs, "dir", &options).unwrap_err();
    assert!(matches!(err, FileMapError::Cancelled));
}
