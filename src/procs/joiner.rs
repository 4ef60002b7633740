// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Waiting on launched groups and collecting their outcomes

use thiserror::Error;
use tracing::error;

use crate::procs::{Launched, ProcessHandle};
use crate::request::{LaunchRecord, LaunchRequest, Outcome};
use crate::Error;

/// The wait itself failed while joining a group
///
/// Every request of the group is still accounted for in `records`; those that could not be harvested
/// carry [`Outcome::HarvestFailed`].
#[derive(Error, Debug)]
#[error("join aborted: {error}")]
pub struct JoinError {
    pub records: Vec<LaunchRecord>,
    #[source]
    pub error: Error,
}

/// Block until every running process of the group has exited, then harvest each of them
///
/// Processes are waited on by their own pid, so outcomes are attributed to the request that spawned
/// them regardless of the order in which they exit. Spawn failures are passed through untouched.
///
/// If a wait fails the join is abandoned: that request and every not yet harvested request are
/// marked as failed, and the records are returned inside the [`JoinError`].
pub fn join_all(launched: Vec<Launched>) -> Result<Vec<LaunchRecord>, JoinError> {
    let mut records = Vec::with_capacity(launched.len());
    let mut failure: Option<Error> = None;

    for entry in launched {
        let record = match entry {
            Launched::Failed(record) => record,
            Launched::Running { request, handle } => match failure {
                Some(ref err) => {
                    // dropping the handle makes a last non-blocking attempt to reap it
                    drop(handle);
                    request.complete(Outcome::HarvestFailed(format!("join aborted: {}", err)))
                }
                None => match handle.harvest() {
                    Ok(outcome) => request.complete(outcome),
                    Err(err) => {
                        error!(group = request.group(), path = request.path(), error = %err, "wait failed");
                        let record = request.complete(Outcome::HarvestFailed(err.to_string()));
                        failure = Some(err);
                        record
                    }
                },
            },
        };

        records.push(record);
    }

    match failure {
        None => Ok(records),
        Some(error) => Err(JoinError { records, error }),
    }
}

/// Wait for a single process and harvest it
pub(crate) fn harvest(request: LaunchRequest, handle: ProcessHandle) -> Result<LaunchRecord, JoinError> {
    join_all(vec![Launched::Running { request, handle }]).map(|mut records| {
        debug_assert_eq!(records.len(), 1);
        records.remove(0)
    })
}
