//! spec.md Section 6: startup errors. Mirrors
//! `test_buffalofq_mover_functional.py::test_missing_config_file`.

use crate::prelude::*;

#[test]
fn missing_config_fqfn_prints_the_documented_message_and_exits_one() {
    let output = run_mover_no_args();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "a config file must be provided");
}

#[test]
fn config_file_missing_source_dir_exits_nonzero() {
    let fx = FeedFixture::new();
    let path = fx.config_dir.join("buffalofq.yml");
    std::fs::write(&path, "name: f\ndest_dir: /dst\n").expect("write config");

    let output = run_mover(&path);

    assert!(!output.status.success(), "a feed missing source_dir must not start");
}
