// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::process::{Command, Stdio};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::error::ErrorKind;
use crate::procs::CommandLine;
use crate::request::{CpuTimes, Outcome};
use crate::Error;

/// Ownership of a live child process
///
/// The child is reaped exactly once, by [`ProcessHandle::harvest`], which consumes the handle. The
/// handle is deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: Pid,
    released: bool,
}

impl ProcessHandle {
    /// Start the program named by the first word of the command line
    ///
    /// The child inherits stdin, stdout and stderr.
    pub fn spawn(command_line: &CommandLine) -> Result<Self, Error> {
        let mut words = command_line.words().into_iter();
        let program = words.next().ok_or("empty command line")?;

        let mut command = Command::new(&program);
        command
            .args(words)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // the std Child is only used for its pid, it never waits on drop
        let child = match command.spawn() {
            Ok(child) => child,
            Err(source) => return Err(ErrorKind::SpawnError { program, source }.into()),
        };

        Ok(Self {
            pid: Pid::from_raw(child.id() as libc::pid_t),
            released: false,
        })
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until the process exits, then collect its status and CPU times
    ///
    /// The child is reaped by this call, releasing the handle, whether or not the wait succeeds.
    pub fn harvest(mut self) -> Result<Outcome, Error> {
        self.released = true;
        let pid = self.pid;

        let (status, usage) = wait4(pid).map_err(|source| ErrorKind::WaitError { pid, source })?;
        let times = CpuTimes {
            kernel: to_duration(usage.ru_stime),
            user: to_duration(usage.ru_utime),
        };

        let outcome = match status {
            WaitStatus::Exited(_, code) => Outcome::Exited { code, times },
            WaitStatus::Signaled(_, signal, _) => Outcome::Signaled {
                signal: signal as i32,
                times,
            },
            other => return Err(format!("unexpected wait status for pid {}: {:?}", pid, other).into()),
        };

        debug!(%pid, %outcome, kernel = ?times.kernel, user = ?times.user, "harvested process");
        Ok(outcome)
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        // never harvested, make one attempt without blocking
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => {
                warn!(pid = %self.pid, "abandoning child process that is still running")
            }
            Ok(status) => debug!(pid = %self.pid, ?status, "reaped abandoned child process"),
            Err(err) => warn!(pid = %self.pid, error = %err, "failed to reap abandoned child process"),
        }
    }
}

/// Put SIGCHLD back to its default disposition
///
/// An ignored SIGCHLD is inherited across exec, and with it the kernel reaps children on its own, so
/// every wait would fail with `ECHILD`. Call once before launching anything.
pub fn restore_child_reaping() -> Result<(), Error> {
    // no handler is installed, only the default disposition
    let previous = unsafe { signal::signal(Signal::SIGCHLD, SigHandler::SigDfl) }?;

    if let SigHandler::SigIgn = previous {
        debug!("SIGCHLD was ignored, restored the default disposition");
    }
    Ok(())
}

/// Wait for exactly this pid, returning its status and resource usage
fn wait4(pid: Pid) -> nix::Result<(WaitStatus, libc::rusage)> {
    loop {
        let mut status: libc::c_int = 0;
        // all-zero is a valid rusage
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };

        let res = unsafe { libc::wait4(pid.as_raw(), &mut status, 0, &mut usage) };
        match Errno::result(res) {
            Ok(_) => {
                let status = WaitStatus::from_raw(pid, status)?;
                match status {
                    WaitStatus::Exited(..) | WaitStatus::Signaled(..) => return Ok((status, usage)),
                    // stops and continues are not reported without WUNTRACED, keep waiting
                    _ => continue,
                }
            }
            Err(Errno::EINTR) => continue,
            Err(err) => return Err(err),
        }
    }
}

fn to_duration(time: libc::timeval) -> Duration {
    Duration::from_secs(time.tv_sec as u64) + Duration::from_micros(time.tv_usec as u64)
}
