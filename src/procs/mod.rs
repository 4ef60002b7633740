// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The group launch and join engine

mod command_line;
mod handle;
mod joiner;
mod launcher;
mod scheduler;

pub use command_line::{CommandLine, PathQuoting};
pub use handle::{restore_child_reaping, ProcessHandle};
pub use joiner::{join_all, JoinError};
pub use launcher::{Launched, Launcher};
pub use scheduler::Scheduler;
