//! Splitting a flat command line into an argument vector.
//!
//! Only one level of `"` grouping is understood: text outside quotes is split
//! on whitespace, each quoted region becomes a single argument. There is no
//! escaping, nesting, single-quote handling or shell operator support.
//!
//! Quoted arguments keep their surrounding `"` characters. Callers that know
//! their discrete arguments (a commit message, a branch name) should build the
//! argument vector themselves instead of interpolating into a string.

use crate::error::GitHelperError;
use crate::error::Result;

const QUOTE: char = '"';

/// Split `command` into the argument vector handed to the process launcher.
///
/// Fails with [`GitHelperError::MalformedCommand`] when the number of `"`
/// characters is odd.
pub fn split_command(command: &str) -> Result<Vec<String>> {
    if command.matches(QUOTE).count() % 2 != 0 {
        return Err(GitHelperError::MalformedCommand {
            command: command.to_string(),
        });
    }

    let mut tokens = Vec::new();
    for (index, segment) in command.split(QUOTE).enumerate() {
        if index % 2 == 0 {
            tokens.extend(segment.split_whitespace().map(str::to_string));
        } else {
            tokens.push(format!("{QUOTE}{segment}{QUOTE}"));
        }
    }
    Ok(tokens)
}

/// Render an argument vector for logs and error messages.
pub fn display_command(argv: &[String]) -> String {
    argv.join(" ")
}
