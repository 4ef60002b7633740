// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::fmt;

use crate::request::LaunchRequest;
use crate::Error;

/// How the program path is placed on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathQuoting {
    /// `path arguments`
    Bare,
    /// `"path" arguments`, tolerating spaces in the path
    Quoted,
}

/// A full command line, program followed by the raw argument text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    /// Join the program path and the raw argument text
    ///
    /// A quoted path may not itself contain a double quote, it would end the quoting early.
    pub fn new(request: &LaunchRequest, quoting: PathQuoting) -> Result<Self, Error> {
        let path = request.path();
        let arguments = request.arguments();

        if quoting == PathQuoting::Quoted && path.contains('"') {
            return Err(format!("program path `{}` contains a double quote", path).into());
        }

        let mut line = String::with_capacity(path.len() + arguments.len() + 3);
        match quoting {
            PathQuoting::Bare => line.push_str(path),
            PathQuoting::Quoted => {
                line.push('"');
                line.push_str(path);
                line.push('"');
            }
        }
        line.push(' ');
        line.push_str(arguments);

        Ok(Self(line))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into words, program first
    ///
    /// Whitespace separates words, double quotes group them, and `\"` is a literal quote.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut word = String::new();
        let mut in_word = false;
        let mut in_quotes = false;
        let mut chars = self.0.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\\' if chars.peek() == Some(&'"') => {
                    chars.next();
                    word.push('"');
                    in_word = true;
                }
                '"' => {
                    in_quotes = !in_quotes;
                    in_word = true;
                }
                ch if ch.is_whitespace() && !in_quotes => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                ch => {
                    word.push(ch);
                    in_word = true;
                }
            }
        }

        if in_word {
            words.push(word);
        }

        words
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().trim_end())
    }
}
