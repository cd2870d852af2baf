//! Scenario 4/5 from spec.md's testable properties, exercised at the
//! black-box CLI level: a hard kill mid-transfer must not lose or
//! duplicate bytes, and the next process for the same feed resumes
//! exactly the interrupted file.
//!
//! The unit-level fault matrix (`ScriptedFault` injected at every
//! `(step, substep, catch)` combination) lives in
//! `bfq-engine::pipeline_tests` and `bfq-engine::feed_runner_tests`;
//! these specs exercise the same property through the real binary and
//! a real SIGKILL, the way `test_buffalofq_mover_functional.py` did.

use std::time::Duration;

use crate::prelude::*;

#[test]
fn kill_mid_transfer_then_restart_converges_without_duplication() {
    let fx = FeedFixture::new();
    // Large enough that a kill has a real chance of landing while the
    // copy is still in flight, small enough the test stays fast.
    let payload = vec![b'x'; 8 * 1024 * 1024];
    std::fs::write(fx.source_dir.join("good_1.dat"), &payload).expect("write source");

    let config = fx.write_config("polling_seconds: 1\nsource_fn: \"good*\"\n");

    let proc = MoverProcess::spawn(&config);
    // Give the mover a moment to start the transfer, then kill it hard.
    std::thread::sleep(Duration::from_millis(30));
    proc.stop();

    // Whatever landed, no final-named file on dest may ever be short:
    // it's either absent, a `.temp`, or the full size.
    let final_path = fx.dest_dir.join("good_1.dat");
    if final_path.is_file() {
        assert_eq!(std::fs::read(&final_path).unwrap().len(), payload.len());
    }

    // Restart: the recovery pass must finish this exact file, and the
    // source must retain exactly one copy (no duplication).
    let proc = MoverProcess::spawn(&config);
    let settled = wait_for(Duration::from_secs(10), || final_path.is_file());
    proc.stop();

    assert!(settled, "expected the interrupted file to complete after restart");
    assert_eq!(std::fs::read(&final_path).unwrap(), payload, "bytes must be exact, not truncated or duplicated");
    assert!(!fx.dest_dir.join("good_1.dat.temp").exists(), "no dangling .temp after recovery");
}
