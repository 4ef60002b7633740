// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The SIGCHLD disposition is process wide, so this lives in its own test binary with a single test

use nix::sys::signal::{self, SigHandler, Signal};

use launchtimes::procs::{restore_child_reaping, Launcher};
use launchtimes::request::{LaunchRequest, Outcome};

fn exit_three() -> LaunchRequest {
    LaunchRequest::new(1, "/bin/sh", "-c \"exit 3\"")
}

#[test]
fn test_ignored_sigchld_is_restored_before_launching() {
    // as if inherited from a parent that ignores SIGCHLD
    unsafe { signal::signal(Signal::SIGCHLD, SigHandler::SigIgn) }.expect("failed to ignore SIGCHLD");

    let err = Launcher::launch_serial(exit_three()).expect_err("children are auto reaped");
    assert!(matches!(err.records[0].outcome, Outcome::HarvestFailed(_)));

    restore_child_reaping().expect("failed to restore SIGCHLD");

    let record = Launcher::launch_serial(exit_three()).expect("join failed");
    assert_eq!(record.outcome.exit_code(), Some(3));

    let previous = unsafe { signal::signal(Signal::SIGCHLD, SigHandler::SigDfl) }.expect("signal failed");
    assert!(matches!(previous, SigHandler::SigDfl));
}
