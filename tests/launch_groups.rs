// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use launchtimes::config::{parse_launch_file, read_launch_file};
use launchtimes::procs::{join_all, Launcher, Scheduler};
use launchtimes::report::{write_report, Summary};
use launchtimes::request::{LaunchRecord, LaunchRequest, Outcome};

/// Write a shell script into `dir`, launched as `/bin/sh <script> <args>`
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("failed to write script");
    path
}

fn sh_request(group: i32, script: &Path, args: &str) -> LaunchRequest {
    LaunchRequest::new(group, "/bin/sh", format!("{} {}", script.display(), args))
}

fn codes(records: &[LaunchRecord]) -> Vec<Option<i32>> {
    records.iter().map(|r| r.outcome.exit_code()).collect()
}

#[test]
fn test_reverse_exit_order_is_attributed_to_the_right_request() {
    let dir = TempDir::new().expect("no tempdir");
    let sleeper = script(dir.path(), "sleep_exit.sh", "sleep \"$1\"\nexit \"$2\"\n");

    // spawned first, exits last
    let launched = Launcher::launch_concurrent(vec![
        sh_request(1, &sleeper, "0.6 21"),
        sh_request(1, &sleeper, "0.3 22"),
        sh_request(1, &sleeper, "0 23"),
    ]);

    let records = join_all(launched).expect("join failed");
    assert_eq!(codes(&records), vec![Some(21), Some(22), Some(23)]);
}

#[test]
fn test_join_all_waits_for_every_process() {
    let dir = TempDir::new().expect("no tempdir");
    let toucher = script(dir.path(), "touch.sh", "sleep \"$1\"\n: > \"$2\"\n");

    let markers: Vec<PathBuf> = (0..3).map(|i| dir.path().join(format!("done.{}", i))).collect();
    let requests = markers
        .iter()
        .zip(&["0.5", "0.1", "0.3"])
        .map(|(marker, delay)| sh_request(4, &toucher, &format!("{} {}", delay, marker.display())))
        .collect();

    let start = Instant::now();
    let records = join_all(Launcher::launch_concurrent(requests)).expect("join failed");

    assert!(start.elapsed() >= Duration::from_millis(500));
    assert!(markers.iter().all(|marker| marker.exists()));
    assert_eq!(codes(&records), vec![Some(0); 3]);
}

#[test]
fn test_concurrent_group_runs_members_together() {
    let dir = TempDir::new().expect("no tempdir");
    let sleeper = script(dir.path(), "sleep_exit.sh", "sleep \"$1\"\nexit \"$2\"\n");

    let start = Instant::now();
    let records = Scheduler::run_group(
        1,
        (0..4).map(|_| sh_request(1, &sleeper, "0.5 0")).collect(),
    );

    // four half second sleeps side by side, not one after another
    assert!(start.elapsed() < Duration::from_millis(1900));
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.outcome.is_success()));
}

#[test]
fn test_serial_record_has_the_same_shape_as_concurrent() {
    let dir = TempDir::new().expect("no tempdir");
    let busy = script(
        dir.path(),
        "busy.sh",
        "i=0\nwhile [ $i -lt 100000 ]; do i=$((i+1)); done\nexit 6\n",
    );

    let serial = Launcher::launch_serial(sh_request(2, &busy, "")).expect("join failed");
    let concurrent = join_all(Launcher::launch_concurrent(vec![sh_request(2, &busy, "")]))
        .expect("join failed")
        .remove(0);

    for record in &[serial, concurrent] {
        assert_eq!(record.outcome.exit_code(), Some(6));
        let times = record.outcome.times().expect("no cpu times");
        assert!(times.user + times.kernel > Duration::from_millis(0));
    }
}

#[test]
fn test_scenario_two_groups() {
    let dir = TempDir::new().expect("no tempdir");
    let prog = script(dir.path(), "prog.sh", "case \"$1\" in --x) exit 1;; --y) exit 2;; esac\nexit 0\n");
    let input = format!(
        "1,/bin/sh,{0} --x\n1,/bin/sh,{0} --y\n2,/bin/sh,{0}\n",
        prog.display()
    );

    let launch_file = parse_launch_file(input.as_bytes()).expect("parse failed");
    assert!(launch_file.rejected.is_empty());
    let records = Scheduler::run(launch_file.groups);

    let groups: Vec<i32> = records.iter().map(|r| r.request.group()).collect();
    assert_eq!(groups, vec![1, 1, 2]);
    assert_eq!(codes(&records), vec![Some(1), Some(2), Some(0)]);
}

#[test]
fn test_scenario_unlaunchable_path() {
    let dir = TempDir::new().expect("no tempdir");
    let missing = dir.path().join("not-a-program");
    let input = format!(
        "1,{0},--x\n2,/bin/sh,-c \"exit 0\"\n3,/bin/sh,-c \"exit 9\"\n3,{0},\n",
        missing.display()
    );

    let launch_file = parse_launch_file(input.as_bytes()).expect("parse failed");
    let records = Scheduler::run(launch_file.groups);

    assert_eq!(records.len(), 4);
    assert!(matches!(records[0].outcome, Outcome::SpawnFailed(_)));
    assert_eq!(records[1].outcome.exit_code(), Some(0));
    assert_eq!(records[2].outcome.exit_code(), Some(9));
    assert!(matches!(records[3].outcome, Outcome::SpawnFailed(_)));
    assert_eq!(records[3].outcome.times(), None);

    assert_eq!(
        Summary::from_records(&records),
        Summary {
            succeeded: 1,
            failed: 1,
            never_ran: 2,
        }
    );
}

#[test]
fn test_scenario_empty_file() {
    let dir = TempDir::new().expect("no tempdir");
    let empty = script(dir.path(), "empty.txt", "");

    let launch_file = read_launch_file(&empty).expect("read failed");
    assert!(launch_file.groups.is_empty());

    let records = Scheduler::run(launch_file.groups);
    assert!(records.is_empty());

    let mut out = Vec::new();
    write_report(&records, &mut out).expect("write failed");
    assert_eq!(String::from_utf8_lossy(&out), "no launch requests\n");
}

#[test]
fn test_parallel_groups_preserve_order() {
    let dir = TempDir::new().expect("no tempdir");
    let sleeper = script(dir.path(), "sleep_exit.sh", "sleep \"$1\"\nexit \"$2\"\n");
    let input = format!(
        "1,/bin/sh,{0} 0.4 1\n2,/bin/sh,{0} 0.1 2\n2,/bin/sh,{0} 0 3\n3,/bin/sh,{0} 0 4\n",
        sleeper.display()
    );
    let launch_file = parse_launch_file(input.as_bytes()).expect("parse failed");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to initialize Tokio Runtime");
    let records = runtime.block_on(Scheduler::run_parallel(launch_file.groups, 3));

    assert_eq!(codes(&records), vec![Some(1), Some(2), Some(3), Some(4)]);
}
