//! Root of the `git-helper-core` library.

// User-visible output goes through `prompt::Prompter`; diagnostics go through
// `tracing`. Nothing in the library writes to stdout/stderr directly.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod prompt;
pub mod workflow;

pub use command::split_command;
pub use config::Config;
pub use error::GitHelperError;
pub use error::Result;
pub use exec::CommandOutput;
pub use exec::CommandRunner;
pub use exec::ProcessRunner;
pub use prompt::Prompter;
pub use prompt::ScriptedPrompter;
pub use prompt::TerminalPrompter;
pub use workflow::Operation;
pub use workflow::Workflow;
pub use workflow::resolve_working_directory;
