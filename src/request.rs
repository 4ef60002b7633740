// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The launch request data model and the records produced from it

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::time::Duration;

/// Identifier shared by every request that must be launched together
pub type GroupId = i32;

/// A single program to launch, as read from the launch file
///
/// The fields are fixed once parsed; launching consumes the request and the outcome is carried on the
/// resulting [`LaunchRecord`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
    group: GroupId,
    path: String,
    arguments: String,
}

impl LaunchRequest {
    pub fn new<P: Into<String>, A: Into<String>>(group: GroupId, path: P, arguments: A) -> Self {
        Self {
            group,
            path: path.into(),
            arguments: arguments.into(),
        }
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw argument text, passed through without interpretation
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Attach an outcome, finishing the request's launch cycle
    pub fn complete(self, outcome: Outcome) -> LaunchRecord {
        LaunchRecord {
            request: self,
            outcome,
        }
    }
}

/// CPU time consumed by an exited process
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub kernel: Duration,
    pub user: Duration,
}

/// What became of a launch request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The process ran and exited on its own
    Exited { code: i32, times: CpuTimes },
    /// The process ran and was terminated by a signal
    Signaled { signal: i32, times: CpuTimes },
    /// The process was never created
    SpawnFailed(String),
    /// The process was created, but its exit status could not be collected
    HarvestFailed(String),
}

impl Outcome {
    /// Only a clean exit with code zero is a success
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Exited { code: 0, .. } => true,
            _ => false,
        }
    }

    /// True if a process was created for the request, whatever became of it
    pub fn has_run(&self) -> bool {
        match self {
            Outcome::SpawnFailed(_) => false,
            Outcome::Exited { .. } | Outcome::Signaled { .. } | Outcome::HarvestFailed(_) => true,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Exited { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn times(&self) -> Option<CpuTimes> {
        match self {
            Outcome::Exited { times, .. } | Outcome::Signaled { times, .. } => Some(*times),
            Outcome::SpawnFailed(_) | Outcome::HarvestFailed(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Exited { code, .. } => write!(f, "exit {}", code),
            Outcome::Signaled { signal, .. } => write!(f, "signal {}", signal),
            Outcome::SpawnFailed(_) => f.write_str("spawn failed"),
            Outcome::HarvestFailed(_) => f.write_str("harvest failed"),
        }
    }
}

/// A request together with its final outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRecord {
    pub request: LaunchRequest,
    pub outcome: Outcome,
}

/// Launch requests keyed by group, in ascending group order
///
/// Requests keep the order they were inserted in within their group, and a group only exists once a
/// request has been added to it, so no group is ever empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchGroups {
    groups: BTreeMap<GroupId, Vec<LaunchRequest>>,
}

impl LaunchGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the request to the end of its group
    pub fn push(&mut self, request: LaunchRequest) {
        self.groups
            .entry(request.group())
            .or_insert_with(Vec::new)
            .push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Number of requests across all groups
    pub fn request_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, group: GroupId) -> Option<&[LaunchRequest]> {
        self.groups.get(&group).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[LaunchRequest])> {
        self.groups.iter().map(|(id, reqs)| (*id, reqs.as_slice()))
    }
}

impl IntoIterator for LaunchGroups {
    type Item = (GroupId, Vec<LaunchRequest>);
    type IntoIter = btree_map::IntoIter<GroupId, Vec<LaunchRequest>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl std::iter::FromIterator<LaunchRequest> for LaunchGroups {
    fn from_iter<I: IntoIterator<Item = LaunchRequest>>(iter: I) -> Self {
        let mut groups = Self::new();
        for request in iter {
            groups.push(request);
        }
        groups
    }
}
