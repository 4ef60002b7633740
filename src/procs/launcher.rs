// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use tracing::{debug, warn};

use crate::procs::joiner::{self, JoinError};
use crate::procs::{CommandLine, PathQuoting, ProcessHandle};
use crate::request::{LaunchRecord, LaunchRequest, Outcome};

/// A request after its process creation was attempted
#[derive(Debug)]
pub enum Launched {
    /// The process is running, and owned by `handle`
    Running {
        request: LaunchRequest,
        handle: ProcessHandle,
    },
    /// The process could not be created, the record carries the spawn failure
    Failed(LaunchRecord),
}

impl Launched {
    pub fn request(&self) -> &LaunchRequest {
        match self {
            Launched::Running { request, .. } => request,
            Launched::Failed(record) => &record.request,
        }
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        match self {
            Launched::Running { .. } => true,
            Launched::Failed(_) => false,
        }
    }
}

/// Launch programs
///
/// Rules:
/// - every request is spawned exactly once
/// - a spawn failure is recorded against that request only, siblings are still launched
/// - concurrent groups are returned running, serial groups are returned finished
#[derive(Debug)]
pub struct Launcher;

impl Launcher {
    /// Spawn every request of a group, in order, without waiting for any of them
    ///
    /// The result is in the same order as `requests`; pass it to [`crate::procs::join_all`].
    pub fn launch_concurrent(requests: Vec<LaunchRequest>) -> Vec<Launched> {
        requests
            .into_iter()
            .map(|request| Self::spawn(request, PathQuoting::Bare))
            .collect()
    }

    /// Spawn a single request and wait for it to exit
    ///
    /// A request that fails to spawn returns immediately with its failure, there is nothing to wait for.
    pub fn launch_serial(request: LaunchRequest) -> Result<LaunchRecord, JoinError> {
        match Self::spawn(request, PathQuoting::Quoted) {
            Launched::Failed(record) => Ok(record),
            Launched::Running { request, handle } => joiner::harvest(request, handle),
        }
    }

    fn spawn(request: LaunchRequest, quoting: PathQuoting) -> Launched {
        let spawned = CommandLine::new(&request, quoting).and_then(|command_line| {
            ProcessHandle::spawn(&command_line).map(|handle| (command_line, handle))
        });

        match spawned {
            Ok((command_line, handle)) => {
                debug!(
                    group = request.group(),
                    pid = %handle.pid(),
                    command = %command_line,
                    "spawned process"
                );
                Launched::Running { request, handle }
            }
            Err(err) => {
                warn!(
                    group = request.group(),
                    path = request.path(),
                    arguments = request.arguments(),
                    error = %err,
                    "failed to spawn process"
                );
                Launched::Failed(request.complete(Outcome::SpawnFailed(err.to_string())))
            }
        }
    }
}
