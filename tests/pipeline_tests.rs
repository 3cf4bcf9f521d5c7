//! End-to-end tests for the two-phase duplicate pipeline.
//!
//! BMP is used for the image fixtures because it is uncompressed: every
//! same-dimension fixture has the same byte size, which is what makes them
//! collide on the coarse fingerprint.

use image::{Rgb, RgbImage};
use phototriage::duplicates::DuplicateFinder;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_bmp(dir: &Path, name: &str, center: Rgb<u8>) -> PathBuf {
    let path = dir.join(name);
    let mut img = RgbImage::from_pixel(8, 8, Rgb([40, 80, 120]));
    img.put_pixel(4, 4, center);
    img.save(&path).unwrap();
    path
}

#[test]
fn identical_copies_group_and_different_content_is_excluded() {
    let dir = TempDir::new().unwrap();

    // a and b are pixel-identical; c shares filesize, dimensions and format
    // but differs at the center pixel
    let a = write_bmp(dir.path(), "a.bmp", Rgb([40, 80, 120]));
    let b = write_bmp(dir.path(), "b.bmp", Rgb([40, 80, 120]));
    let c = write_bmp(dir.path(), "c.bmp", Rgb([200, 10, 10]));

    assert_eq!(
        std::fs::metadata(&a).unwrap().len(),
        std::fs::metadata(&c).unwrap().len(),
        "fixtures must coarse-collide"
    );

    let finder = DuplicateFinder::with_defaults();
    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(outcome.groups.len(), 1);
    let group = &outcome.groups[0];
    assert_eq!(group.len(), 2);
    assert!(group.paths.contains(&a));
    assert!(group.paths.contains(&b));
    assert!(!group.paths.contains(&c));

    // No timestamps anywhere, so the group had to be refined
    assert_eq!(outcome.stats.escalated_groups, 1);
    assert_eq!(outcome.stats.short_circuit_groups, 0);
}

#[test]
fn corrupt_file_degrades_without_aborting() {
    let dir = TempDir::new().unwrap();

    // Truncated JPEG header
    std::fs::write(dir.path().join("broken.jpg"), [0xFF, 0xD8, 0xFF, 0x00]).unwrap();
    write_bmp(dir.path(), "fine.bmp", Rgb([1, 2, 3]));

    let finder = DuplicateFinder::with_defaults();
    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(outcome.stats.scanned_files, 2);
    assert_eq!(outcome.stats.unreadable_files, 1);
    assert!(outcome.groups.is_empty());
}

#[test]
fn unreadable_files_never_group_together() {
    let dir = TempDir::new().unwrap();

    // Same byte content, different paths: same filesize, both unreadable
    std::fs::write(dir.path().join("one.dat"), b"identical junk bytes").unwrap();
    std::fs::write(dir.path().join("two.dat"), b"identical junk bytes").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(outcome.stats.unreadable_files, 2);
    assert!(outcome.groups.is_empty());
}

#[test]
fn distinct_dimensions_do_not_coarse_collide() {
    let dir = TempDir::new().unwrap();

    write_bmp(dir.path(), "small.bmp", Rgb([0, 0, 0]));
    let big = dir.path().join("big.bmp");
    RgbImage::from_pixel(16, 16, Rgb([40, 80, 120]))
        .save(&big)
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(outcome.stats.coarse_groups, 0);
    assert!(outcome.groups.is_empty());
}

#[test]
fn nested_directories_are_scanned() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("2019").join("summer");
    std::fs::create_dir_all(&nested).unwrap();

    let a = write_bmp(dir.path(), "a.bmp", Rgb([40, 80, 120]));
    let b = write_bmp(&nested, "copy.bmp", Rgb([40, 80, 120]));

    let finder = DuplicateFinder::with_defaults();
    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(outcome.groups.len(), 1);
    assert!(outcome.groups[0].paths.contains(&a));
    assert!(outcome.groups[0].paths.contains(&b));
}

#[test]
fn empty_directory_finds_nothing() {
    let dir = TempDir::new().unwrap();

    let finder = DuplicateFinder::with_defaults();
    let outcome = finder.find_duplicates(dir.path()).unwrap();

    assert!(outcome.groups.is_empty());
    assert_eq!(outcome.stats.scanned_files, 0);
}
