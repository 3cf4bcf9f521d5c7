//! Property-based tests for fingerprint encoding and grouping.

use proptest::prelude::*;

use phototriage::duplicates::{filter_actionable, fingerprint, group_by_fingerprint};
use phototriage::scanner::FileDescriptor;
use phototriage::timestamps::parse_timestamp;
use std::path::PathBuf;

fn descriptor(path: &str, filesize: u64, dims: (u32, u32), format: &str) -> FileDescriptor {
    FileDescriptor {
        path: PathBuf::from(path),
        filesize,
        dimensions: Some(dims),
        format: Some(format.to_string()),
        capture_time: None,
        pixels: None,
    }
}

proptest! {
    /// The same descriptor always yields the same coarse fingerprint.
    #[test]
    fn coarse_fingerprint_is_deterministic(
        filesize in any::<u64>(),
        width in 1u32..10_000,
        height in 1u32..10_000,
        format in "[A-Za-z:\\\\]{1,12}",
    ) {
        let desc = descriptor("/p/img", filesize, (width, height), &format);
        prop_assert_eq!(fingerprint::coarse(&desc), fingerprint::coarse(&desc.clone()));
    }

    /// Distinct format tags never encode to the same coarse fingerprint,
    /// even when they contain the delimiter or the escape character.
    #[test]
    fn coarse_fingerprint_is_injective_in_format(
        a in "[A-Za-z:\\\\]{1,12}",
        b in "[A-Za-z:\\\\]{1,12}",
    ) {
        prop_assume!(a != b);
        let da = descriptor("/p/img", 100, (10, 10), &a);
        let db = descriptor("/p/img", 100, (10, 10), &b);
        prop_assert_ne!(fingerprint::coarse(&da), fingerprint::coarse(&db));
    }

    /// Unreadable files at distinct paths never share a fingerprint.
    #[test]
    fn degraded_fingerprints_never_collide_across_paths(
        a in "[a-z:\\\\/]{1,30}",
        b in "[a-z:\\\\/]{1,30}",
        filesize in any::<u64>(),
    ) {
        prop_assume!(a != b);
        let da = FileDescriptor::degraded(PathBuf::from(&a), filesize);
        let db = FileDescriptor::degraded(PathBuf::from(&b), filesize);
        prop_assert_ne!(fingerprint::degraded(&da), fingerprint::degraded(&db));
    }

    /// A degraded fingerprint can never equal an image fingerprint, whatever
    /// the unreadable file's path spells out.
    #[test]
    fn degraded_namespace_is_disjoint_from_coarse(
        path in "[0-9a-zx:\\\\]{1,30}",
        filesize in any::<u64>(),
        width in 1u32..10_000,
        height in 1u32..10_000,
    ) {
        let broken = FileDescriptor::degraded(PathBuf::from(&path), filesize);
        let image = descriptor("/p/img.jpg", filesize, (width, height), "JPEG");
        prop_assert_ne!(fingerprint::degraded(&broken), fingerprint::coarse(&image));
    }

    /// Every group surviving the actionability filter has 2+ members, and
    /// filtering is idempotent.
    #[test]
    fn actionable_filter_is_idempotent(
        sizes in proptest::collection::vec(1u64..20, 1..40),
    ) {
        let pairs: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let d = descriptor(&format!("/p/{i}.jpg"), s, (10, 10), "JPEG");
                (fingerprint::coarse(&d), d)
            })
            .collect();

        let (once, _) = filter_actionable(group_by_fingerprint(pairs));
        prop_assert!(once.values().all(|members| members.len() >= 2));

        let reference = once.clone();
        let (twice, _) = filter_actionable(once);
        prop_assert_eq!(twice, reference);
    }

    /// All three accepted layouts of the same instant parse to the same value.
    #[test]
    fn timestamp_layouts_agree(
        year in 1990i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let exif = format!("{year:04}:{month:02}:{day:02} {hour:02}:{minute:02}:{second:02}");
        let dashed = format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}");
        let iso = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.000Z");

        let parsed = parse_timestamp(&exif).unwrap();
        prop_assert_eq!(parse_timestamp(&dashed).unwrap(), parsed);
        prop_assert_eq!(parse_timestamp(&iso).unwrap(), parsed);
    }
}
