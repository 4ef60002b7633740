// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use futures::stream::{self, StreamExt};
use tokio::task;
use tracing::{error, info};

use crate::procs::{joiner, Launcher};
use crate::request::{GroupId, LaunchGroups, LaunchRecord, LaunchRequest, Outcome};

/// Drive every launch group to completion
///
/// Rules:
/// - a group with more than one request is launched concurrently and joined as a whole
/// - a group with a single request is launched serially
/// - a failing request or group never stops the remaining ones, and every request yields a record
#[derive(Debug)]
pub struct Scheduler;

impl Scheduler {
    /// Run the groups one after another, in group order
    pub fn run(groups: LaunchGroups) -> Vec<LaunchRecord> {
        let mut records = Vec::with_capacity(groups.request_count());

        for (group, requests) in groups {
            records.extend(Self::run_group(group, requests));
        }

        records
    }

    /// Run up to `max_groups` groups at the same time, each on a blocking worker
    ///
    /// Each group keeps its own records, which are reassembled in group order, so the result is ordered
    /// exactly as with [`Scheduler::run`].
    pub async fn run_parallel(groups: LaunchGroups, max_groups: usize) -> Vec<LaunchRecord> {
        let total = groups.request_count();

        let partitions: Vec<Vec<LaunchRecord>> = stream::iter(groups)
            .map(|(group, requests)| async move {
                // kept so a crashed worker still yields a record per request
                let fallback = requests.clone();

                match task::spawn_blocking(move || Self::run_group(group, requests)).await {
                    Ok(records) => records,
                    Err(err) => {
                        error!(group, error = %err, "group worker failed");
                        fallback
                            .into_iter()
                            .map(|request| {
                                request.complete(Outcome::HarvestFailed(format!(
                                    "group worker failed: {}",
                                    err
                                )))
                            })
                            .collect()
                    }
                }
            })
            .buffered(max_groups.max(1))
            .collect()
            .await;

        let mut records = Vec::with_capacity(total);
        records.extend(partitions.into_iter().flatten());
        records
    }

    /// Launch and join a single group, choosing the mode from its size
    pub fn run_group(group: GroupId, requests: Vec<LaunchRequest>) -> Vec<LaunchRecord> {
        info!(group, size = requests.len(), "launching group");

        let joined = if requests.len() == 1 {
            let mut requests = requests;
            match requests.pop() {
                Some(request) => Launcher::launch_serial(request).map(|record| vec![record]),
                None => Ok(Vec::new()),
            }
        } else {
            joiner::join_all(Launcher::launch_concurrent(requests))
        };

        let records = joined.unwrap_or_else(|err| {
            error!(group, error = %err.error, "group join failed");
            err.records
        });

        info!(
            group,
            succeeded = records.iter().filter(|r| r.outcome.is_success()).count(),
            total = records.len(),
            "group finished"
        );
        records
    }
}
