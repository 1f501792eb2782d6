use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitHelperError>;

#[derive(Error, Debug)]
pub enum GitHelperError {
    /// The command line contains an odd number of `"` characters, so the
    /// quoted regions cannot be paired up.
    #[error("malformed command, unbalanced double quotes: {command}")]
    MalformedCommand { command: String },

    #[error("working directory {} is not usable: {source}", path.display())]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot run an empty command")]
    EmptyCommand,

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child process ran to completion but reported failure.
    #[error("running \"{command}\" failed, stderr:\n{stderr}")]
    ProcessFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("input closed before a required answer was given")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] io::Error),
}
