//! Property-based tests for exclude handling and archive contents.
//!
//! These tests use proptest to generate random directory trees and exclude
//! lists and check that the produced container holds exactly the files
//! that are not excluded.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use packit_core::Archive;
use packit_core::ArchiveBuilder;
use packit_core::ArchiveFormat;
use packit_core::ExcludeSet;
use packit_core::ExcludeStore;
use packit_core::excludes::normalize_key;
use packit_core::excludes::novel_entries;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

/// Relative file paths of 1-3 components drawn from a small alphabet so
/// that generated files share directories.
fn file_paths() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        prop::collection::vec("[a-c]", 1..=3).prop_map(|parts| {
            let (last, dirs) = parts.split_last().expect("non-empty");
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(last);
            path.push_str(".txt");
            path
        }),
        0..12,
    )
}

fn exclude_entries() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            prop::collection::vec("[a-c]", 1..=2).prop_map(|parts| parts.join("/")),
            "[a-c]\\.txt",
            "[a-c]/".prop_map(String::from),
        ],
        0..4,
    )
}

/// Every proper ancestor directory of `path`, plus `path` itself.
fn prefixes(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(|(i, _)| &path[..i])
        .chain(std::iter::once(path))
}

/// Builds `root` into `out.<ext>` and reads `data.bin` back from it.
fn pack_and_read_back(root: &Path, format: ArchiveFormat) -> Vec<u8> {
    let archive = Archive::for_directory(root, Some("out"), format).unwrap();
    let builder = ArchiveBuilder::new(root, archive);
    builder.build().unwrap();
    let file = File::open(builder.output_path()).unwrap();

    let mut content = Vec::new();
    match format {
        ArchiveFormat::Zip => {
            let mut archive = zip::ZipArchive::new(file).unwrap();
            archive.by_name("data.bin").unwrap().read_to_end(&mut content).unwrap();
        }
        ArchiveFormat::Tar => read_tar_entry(tar::Archive::new(file), &mut content),
        ArchiveFormat::TarGz => read_tar_entry(
            tar::Archive::new(flate2::read::GzDecoder::new(file)),
            &mut content,
        ),
    }
    content
}

fn read_tar_entry<R: Read>(mut archive: tar::Archive<R>, content: &mut Vec<u8>) {
    let mut entry = archive
        .entries()
        .unwrap()
        .map(Result::unwrap)
        .find(|entry| entry.path().unwrap() == Path::new("data.bin"))
        .unwrap();
    entry.read_to_end(content).unwrap();
}

const FORMATS: [ArchiveFormat; 3] = [ArchiveFormat::Zip, ArchiveFormat::Tar, ArchiveFormat::TarGz];

#[test]
fn test_large_binary_content_survives_every_format() {
    // Larger than the 64 KiB copy buffer, with every byte value present.
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("data.bin"), &data).unwrap();

    for format in FORMATS {
        assert_eq!(pack_and_read_back(temp.path(), format), data, "{format}");
    }
}

fn zip_names(path: &Path) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(String::from).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The container holds exactly the files with no excluded prefix.
    #[test]
    fn prop_archive_contains_exactly_kept_files(
        files in file_paths(),
        excludes in exclude_entries(),
    ) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for file in &files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
        }

        let archive = Archive::for_directory(root, Some("out"), ArchiveFormat::Zip)
            .unwrap()
            .with_excludes(excludes.clone());
        let builder = ArchiveBuilder::new(root, archive);
        let report = builder.build().unwrap();

        let keys: BTreeSet<String> = excludes.iter().map(|e| normalize_key(e)).collect();
        let expected: BTreeSet<String> = files
            .iter()
            .filter(|file| !prefixes(file).any(|prefix| keys.contains(prefix)))
            .cloned()
            .collect();

        prop_assert_eq!(report.files_added, expected.len());
        prop_assert_eq!(zip_names(&builder.output_path()), expected);
    }

    /// Adding the same entries a second time never changes the sidecar.
    #[test]
    fn prop_ignore_is_idempotent(entries in prop::collection::vec("[a-z]{1,6}(/[a-z]{1,6})?", 1..6)) {
        let temp = TempDir::new().unwrap();
        let store = ExcludeStore::new(temp.path());

        store.add(&entries).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();
        let second = store.add(&entries).unwrap();

        prop_assert!(second.is_unchanged());
        prop_assert_eq!(fs::read_to_string(store.path()).unwrap(), first);
    }

    /// The sidecar never lists the same entry twice after any sequence of
    /// adds.
    #[test]
    fn prop_sidecar_has_no_duplicates(
        batches in prop::collection::vec(prop::collection::vec("[a-d]", 1..4), 1..5)
    ) {
        let temp = TempDir::new().unwrap();
        let store = ExcludeStore::new(temp.path());
        for batch in &batches {
            store.add(batch).unwrap();
        }

        let listed = store.list().unwrap();
        let unique: BTreeSet<&String> = listed.iter().collect();
        prop_assert_eq!(unique.len(), listed.len());

        let expected: BTreeSet<&String> = batches.iter().flatten().collect();
        prop_assert_eq!(unique, expected);
    }

    /// Novel entries are disjoint from the current set.
    #[test]
    fn prop_novel_entries_disjoint(
        current in prop::collection::vec("[a-e]", 0..5),
        new in prop::collection::vec("[a-e]", 0..8),
    ) {
        let set = ExcludeSet::from_entries(current.iter().cloned());
        for entry in novel_entries(&set, &new) {
            prop_assert!(!set.contains(&entry));
            prop_assert!(new.contains(&entry));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Arbitrary bytes come back unchanged from every container format.
    #[test]
    fn prop_binary_content_round_trips(data in prop::collection::vec(any::<u8>(), 0..200_000)) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.bin"), &data).unwrap();

        for format in FORMATS {
            prop_assert_eq!(pack_and_read_back(temp.path(), format), data.clone());
        }
    }
}
