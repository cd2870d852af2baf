// SPDX-License-Identifier: MIT

use super::*;
use std::fs::File;
use std::io::Write as _;
use tempfile::tempdir;

#[test]
fn list_returns_basenames_only() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.dat")).unwrap();
    File::create(dir.path().join("b.dat")).unwrap();

    let mut t = LocalTransport;
    let mut names = t.list(dir.path()).unwrap();
    names.sort();
    assert_eq!(names, vec!["a.dat".to_string(), "b.dat".to_string()]);
}

#[test]
fn stat_missing_path_reports_not_exists() {
    let dir = tempdir().unwrap();
    let mut t = LocalTransport;
    let stat = t.stat(&dir.path().join("nope")).unwrap();
    assert!(!stat.exists);
}

#[test]
fn put_and_get_are_byte_exact() {
    let src_dir = tempdir().unwrap();
    let dst_dir = tempdir().unwrap();
    let src = src_dir.path().join("file.dat");
    let mut f = File::create(&src).unwrap();
    writeln!(f, "hello world").unwrap();

    let mut t = LocalTransport;
    let dst = dst_dir.path().join("file.dat.temp");
    t.put(&src, &dst).unwrap();

    let src_stat = t.stat(&src).unwrap();
    let dst_stat = t.stat(&dst).unwrap();
    assert_eq!(src_stat.size, dst_stat.size);
}

#[test]
fn rename_is_visible_immediately() {
    let dir = tempdir().unwrap();
    let old = dir.path().join("file.temp");
    let new = dir.path().join("file.dat");
    File::create(&old).unwrap();

    let mut t = LocalTransport;
    t.rename(&old, &new).unwrap();
    assert!(!t.stat(&old).unwrap().exists);
    assert!(t.stat(&new).unwrap().exists);
}

#[test]
fn remove_missing_file_is_not_an_error() {
    let dir = tempdir().unwrap();
    let mut t = LocalTransport;
    assert!(t.remove(&dir.path().join("absent")).is_ok());
}

#[test]
fn symlink_points_at_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real.dat");
    File::create(&target).unwrap();
    let link = dir.path().join("link.dat");

    let mut t = LocalTransport;
    t.symlink(&target, &link).unwrap();
    let stat = t.stat(&link).unwrap();
    assert!(stat.exists);
    assert!(stat.is_symlink);
}

#[test]
fn symlink_replaces_existing_link() {
    let dir = tempdir().unwrap();
    let target_a = dir.path().join("a.dat");
    let target_b = dir.path().join("b.dat");
    File::create(&target_a).unwrap();
    File::create(&target_b).unwrap();
    let link = dir.path().join("link.dat");

    let mut t = LocalTransport;
    t.symlink(&target_a, &link).unwrap();
    t.symlink(&target_b, &link).unwrap();

    let resolved = std::fs::read_link(&link).unwrap();
    assert_eq!(resolved, target_b);
}

#[test]
fn symlink_succeeds_despite_a_stale_tmp_from_a_prior_crash() {
    // A crash between creating the tmp symlink and renaming it over
    // the final name leaves `link.dat.symlink_tmp` behind; a retry
    // must not fail with AlreadyExists on that leftover.
    let dir = tempdir().unwrap();
    let target = dir.path().join("real.dat");
    File::create(&target).unwrap();
    let link = dir.path().join("link.dat");
    let stale_tmp = link.with_extension("symlink_tmp");
    std::os::unix::fs::symlink(dir.path().join("stale.dat"), &stale_tmp).unwrap();

    let mut t = LocalTransport;
    t.symlink(&target, &link).unwrap();

    let resolved = std::fs::read_link(&link).unwrap();
    assert_eq!(resolved, target);
}
