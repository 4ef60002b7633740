// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Launch groups of programs and report how each of them ran
//!
//! Requests sharing a group id are started together: a group of several requests runs all of its
//! members concurrently and waits for all of them, a group of one runs alone. Each launch ends in a
//! [`request::LaunchRecord`] holding its exit status and CPU times.

pub mod config;
mod error;
pub mod logging;
pub mod procs;
pub mod report;
pub mod request;

pub use error::{ConfigError, Error, ErrorKind};
