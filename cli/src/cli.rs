use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use clap::ValueHint;
use git_helper_core::Operation;

/// Initialise a repository if needed, then push or pull it.
#[derive(Parser, Debug)]
#[command(name = "git-helper", version)]
pub struct Cli {
    /// Operation to perform. Prompted for when omitted.
    #[arg(value_enum, value_name = "OPERATION")]
    pub operation: Option<OperationArg>,

    /// Run in this directory instead of the current one.
    #[arg(long = "cd", short = 'C', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub cwd: Option<PathBuf>,

    /// Read configuration from this file instead of `$GIT_HELPER_HOME/config.toml`.
    #[arg(long = "config", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Exit straight away instead of waiting for Enter.
    #[arg(long = "no-pause", default_value_t = false)]
    pub no_pause: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Push,
    Pull,
}

impl From<OperationArg> for Operation {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::Push => Operation::Push,
            OperationArg::Pull => Operation::Pull,
        }
    }
}
