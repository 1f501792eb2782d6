use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;

use tracing::debug;

use crate::command::display_command;
use crate::command::split_command;
use crate::error::GitHelperError;
use crate::error::Result;

/// Captured output of a child process that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs one external program to completion.
///
/// `argv[0]` is the program, the remaining elements are passed to it verbatim.
/// Calls block until the child exits; there is no timeout.
pub trait CommandRunner {
    fn run(&self, argv: &[String]) -> Result<CommandOutput>;

    /// Tokenize a flat command line with [`split_command`] and run it.
    fn run_command(&self, command: &str) -> Result<CommandOutput> {
        let argv = split_command(command)?;
        self.run(&argv)
    }
}

/// Spawns real processes in a fixed working directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
}

impl ProcessRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or(GitHelperError::EmptyCommand)?;
        debug!(command = %display_command(argv), cwd = %self.cwd.display(), "spawning");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            // The dialogue owns stdin; children must not consume its answers.
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitHelperError::Spawn {
                program: program.clone(),
                source,
            })?;
        handle_command_output(argv, output)
    }
}

fn handle_command_output(argv: &[String], output: Output) -> Result<CommandOutput> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if output.status.success() {
        if !stderr.is_empty() {
            debug!(command = %display_command(argv), %stderr, "stderr from successful command");
        }
        Ok(CommandOutput { stdout, stderr })
    } else {
        debug!(
            command = %display_command(argv),
            status = ?output.status.code(),
            "command failed"
        );
        Err(GitHelperError::ProcessFailed {
            command: display_command(argv),
            status: output.status.code(),
            stderr,
        })
    }
}
