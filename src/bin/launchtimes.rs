// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use clap::{App, Arg, ArgMatches};
use tokio::runtime;
use tracing::info;

use launchtimes::procs::{self, Scheduler};
use launchtimes::{config, logging, report, Error};

const FILE: &str = "FILE";
const STRICT: &str = "strict";
const PARALLEL_GROUPS: &str = "parallel-groups";
const LOG_LEVEL: &str = "log-level";

/// Exit code for a bad command line or an unusable launch file
const FAILURE: i32 = -1;

fn app() -> App<'static, 'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name(FILE)
                .required(true)
                .index(1)
                .help("launch file, one `group,path,arguments` request per line"),
        )
        .arg(
            Arg::with_name(STRICT)
                .long(STRICT)
                .help("refuse to launch anything if the launch file has malformed lines"),
        )
        .arg(
            Arg::with_name(PARALLEL_GROUPS)
                .short("p")
                .long(PARALLEL_GROUPS)
                .value_name("NUMBER")
                .validator_os(|i| {
                    usize::from_str_radix(&i.to_string_lossy(), 10)
                        .ok()
                        .filter(|n| *n > 0)
                        .map(|_| ())
                        .ok_or_else(|| OsString::from("a positive number was expected"))
                })
                .help("number of launch groups to run at the same time (default: 1)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(LOG_LEVEL)
                .long(LOG_LEVEL)
                .value_name("LEVEL")
                .possible_values(logging::LEVELS)
                .case_insensitive(true)
                .help("log level, overrides the LAUNCHTIMES_LOG environment variable")
                .takes_value(true),
        )
}

fn main() {
    let args = match app().get_matches_safe() {
        Ok(args) => args,
        Err(err) => match err.kind {
            clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                std::process::exit(FAILURE);
            }
        },
    };

    if let Err(err) = run(&args) {
        eprintln!("launchtimes error: {}", err);
        std::process::exit(FAILURE);
    }
}

fn run(args: &ArgMatches<'_>) -> Result<(), Error> {
    logging::init_logging(args.value_of(LOG_LEVEL))?;
    procs::restore_child_reaping()?;

    let path = args
        .value_of_os(FILE)
        .map(PathBuf::from)
        .ok_or("launch file not specified")?;

    let launch_file = config::read_launch_file(&path)?;
    if args.is_present(STRICT) && !launch_file.rejected.is_empty() {
        for rejected in &launch_file.rejected {
            eprintln!("{}: {}", path.display(), rejected);
        }
        return Err(Error::from(format!(
            "{} malformed line(s) in {}",
            launch_file.rejected.len(),
            path.display()
        )));
    }

    let groups = launch_file.groups;
    info!(
        groups = groups.len(),
        requests = groups.request_count(),
        "read launch file"
    );

    let parallel_groups = args
        .value_of(PARALLEL_GROUPS)
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(1);

    let records = if parallel_groups > 1 {
        let runtime = runtime::Builder::new_current_thread().build()?;
        runtime.block_on(Scheduler::run_parallel(groups, parallel_groups))
    } else {
        Scheduler::run(groups)
    };

    let stdout = io::stdout();
    report::write_report(&records, &mut stdout.lock())?;

    Ok(())
}
