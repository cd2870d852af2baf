//! Scenarios 2-3: source/dest post-actions (archive, delete, symlink,
//! move), grounded in `TestLocalToRemoteCopy` in the original
//! functional test suite.

use std::time::Duration;

use crate::prelude::*;

#[test]
fn delete_post_action_removes_source_files() {
    let fx = FeedFixture::new();
    fx.make_file(&fx.source_dir, "good", 1);
    fx.make_file(&fx.source_dir, "good", 2);
    fx.make_file(&fx.source_dir, "bad", 1);

    let config = fx.write_config(
        "polling_seconds: 1\nsource_fn: \"good*\"\nsource_post_action: delete\n",
    );

    let proc = MoverProcess::spawn(&config);
    let settled = wait_for(Duration::from_secs(5), || count_with_prefix(&fx.dest_dir, "good") == 2);
    proc.stop();

    assert!(settled);
    assert_eq!(count_with_prefix(&fx.source_dir, "good"), 0);
    assert_eq!(count_with_prefix(&fx.source_dir, "bad"), 1, "non-matching files are never touched");
}

#[test]
fn move_post_action_archives_source_files() {
    let fx = FeedFixture::new();
    fx.make_file(&fx.source_dir, "good", 1);
    fx.make_file(&fx.source_dir, "good", 2);
    fx.make_file(&fx.source_dir, "bad", 1);

    let config = fx.write_config(&format!(
        "polling_seconds: 1\nsource_fn: \"good*\"\nsource_post_action: move\nsource_post_dir: {}\n",
        fx.source_arc_dir.display(),
    ));

    let proc = MoverProcess::spawn(&config);
    let settled = wait_for(Duration::from_secs(5), || count_with_prefix(&fx.source_arc_dir, "good") == 2);
    proc.stop();

    assert!(settled);
    assert_eq!(count_with_prefix(&fx.source_dir, "good"), 0);
    assert_eq!(count_with_prefix(&fx.source_dir, "bad"), 1);
}

#[test]
fn symlink_dest_post_action_points_back_at_the_final_file() {
    let fx = FeedFixture::new();
    fx.make_file(&fx.source_dir, "good", 1);

    let config = fx.write_config(&format!(
        "polling_seconds: 1\nsource_fn: \"good*\"\nsource_post_action: delete\n\
         dest_post_action: symlink\ndest_post_dir: {}\n",
        fx.dest_post_dir.display(),
    ));

    let proc = MoverProcess::spawn(&config);
    let settled = wait_for(Duration::from_secs(5), || {
        fx.dest_post_dir.join("good_1.dat").exists()
    });
    proc.stop();

    assert!(settled);
    let link = fx.dest_post_dir.join("good_1.dat");
    let target = std::fs::read_link(&link).expect("expected a symlink");
    assert_eq!(target, fx.dest_dir.join("good_1.dat"));
}

#[test]
fn move_dest_post_action_relocates_the_final_file() {
    let fx = FeedFixture::new();
    fx.make_file(&fx.source_dir, "good", 1);

    let config = fx.write_config(&format!(
        "polling_seconds: 1\nsource_fn: \"good*\"\nsource_post_action: delete\n\
         dest_post_action: move\ndest_post_dir: {}\n",
        fx.dest_post_dir.display(),
    ));

    let proc = MoverProcess::spawn(&config);
    let settled = wait_for(Duration::from_secs(5), || {
        fx.dest_post_dir.join("good_1.dat").is_file()
    });
    proc.stop();

    assert!(settled);
    assert!(!fx.dest_dir.join("good_1.dat").exists(), "moved means gone from dest_dir too");
}
