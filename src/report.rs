// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Tabular report of launch records
//!
//! A record succeeded only if its process exited with code zero; everything else, including requests
//! that never ran, is listed as failed.

use std::io::{self, Write};
use std::time::Duration;

use crate::request::{LaunchRecord, Outcome};

const RULE_WIDTH: usize = 72;

/// Counts of records per outcome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub never_ran: usize,
}

impl Summary {
    pub fn from_records(records: &[LaunchRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            if record.outcome.is_success() {
                summary.succeeded += 1;
            } else if record.outcome.has_run() {
                summary.failed += 1;
            } else {
                summary.never_ran += 1;
            }
            summary
        })
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.never_ran
    }
}

pub fn write_report<W: Write>(records: &[LaunchRecord], out: &mut W) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "no launch requests")?;
        return Ok(());
    }

    let (succeeded, failed): (Vec<&LaunchRecord>, Vec<&LaunchRecord>) =
        records.iter().partition(|r| r.outcome.is_success());

    writeln!(out)?;
    writeln!(out, "Succeeded:")?;
    write_header(out, "eC")?;
    for record in &succeeded {
        let code = record.outcome.exit_code().unwrap_or_default();
        write_row(out, record, &code.to_string())?;
    }

    if !failed.is_empty() {
        writeln!(out)?;
        writeln!(out, "Failed:")?;
        write_header(out, "Status")?;
        for record in &failed {
            write_row(out, record, &record.outcome.to_string())?;
            match &record.outcome {
                Outcome::SpawnFailed(reason) | Outcome::HarvestFailed(reason) => {
                    writeln!(out, "{:>8}{}", "", reason)?
                }
                Outcome::Exited { .. } | Outcome::Signaled { .. } => (),
            }
        }
    }

    let summary = Summary::from_records(records);
    writeln!(out)?;
    writeln!(
        out,
        "{} launched, {} succeeded, {} failed, {} never ran",
        summary.total(),
        summary.succeeded,
        summary.failed,
        summary.never_ran
    )?;

    Ok(())
}

fn write_header<W: Write>(out: &mut W, status: &str) -> io::Result<()> {
    writeln!(
        out,
        "{:>4} {:>10} {:>10} {:<14} {:<20} {}",
        "#", "kT(ms)", "uT(ms)", status, "Path", "Parameters"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn write_row<W: Write>(out: &mut W, record: &LaunchRecord, status: &str) -> io::Result<()> {
    let (kernel, user) = match record.outcome.times() {
        Some(times) => (millis(times.kernel), millis(times.user)),
        None => ("-".to_string(), "-".to_string()),
    };

    writeln!(
        out,
        "{:>4} {:>10} {:>10} {:<14} {:<20} {}",
        record.request.group(),
        kernel,
        user,
        status,
        record.request.path(),
        record.request.arguments()
    )
}

fn millis(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64() * 1000.0)
}
