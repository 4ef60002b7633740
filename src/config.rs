// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Reader for launch files
//!
//! One request per line, `group,path,arguments`. Only the first two commas separate fields, anything
//! after the second comma is the argument text. Blank lines are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::request::{GroupId, LaunchGroups, LaunchRequest};
use crate::{ConfigError, Error};

/// The requests read from a launch file, plus every line that was rejected
#[derive(Debug, Default)]
pub struct LaunchFile {
    pub groups: LaunchGroups,
    pub rejected: Vec<ConfigError>,
}

pub fn read_launch_file(path: &Path) -> Result<LaunchFile, Error> {
    let file = File::open(path).map_err(|source| ConfigError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    parse_launch_file(BufReader::new(file))
}

pub fn parse_launch_file<R: BufRead>(reader: R) -> Result<LaunchFile, Error> {
    let mut launch_file = LaunchFile::default();

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(ConfigError::Read)?;
        let line_no = idx + 1;

        let parsed = String::from_utf8(line)
            .map_err(|_| ConfigError::MalformedLine {
                line: line_no,
                reason: "not valid UTF-8".to_string(),
            })
            .and_then(|line| parse_line(line_no, &line));

        match parsed {
            Ok(Some(request)) => launch_file.groups.push(request),
            Ok(None) => (),
            Err(err) => {
                warn!(error = %err, "skipping launch file line");
                launch_file.rejected.push(err);
            }
        }
    }

    Ok(launch_file)
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<LaunchRequest>, ConfigError> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| ConfigError::MalformedLine {
        line: line_no,
        reason,
    };

    let mut fields = line.splitn(3, ',');
    let group = fields.next().unwrap_or_default().trim();
    let path = fields
        .next()
        .ok_or_else(|| malformed("expected `group,path,arguments`".to_string()))?;
    let arguments = fields.next().unwrap_or_default();

    let group: GroupId = group
        .parse()
        .map_err(|_| malformed(format!("invalid group id `{}`", group)))?;

    if path.trim().is_empty() {
        return Err(malformed("empty program path".to_string()));
    }

    Ok(Some(LaunchRequest::new(group, path, arguments)))
}
