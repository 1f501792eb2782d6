// The dialogue owns stdout; logs are written to stderr.
#![deny(clippy::print_stdout)]

mod cli;

pub use cli::Cli;
pub use cli::OperationArg;

use std::io;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use git_helper_core::Config;
use git_helper_core::GitHelperError;
use git_helper_core::Operation;
use git_helper_core::ProcessRunner;
use git_helper_core::Prompter;
use git_helper_core::TerminalPrompter;
use git_helper_core::Workflow;
use git_helper_core::config::default_config_path;
use git_helper_core::resolve_working_directory;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub fn run_main(cli: Cli) -> anyhow::Result<ExitCode> {
    init_tracing();

    let process_cwd = std::env::current_dir()?;
    let stdin = io::stdin();
    let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout());
    if run_with_prompter(cli, &process_cwd, &mut prompter)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Run the whole session against `prompter`: the workflow, the outcome line,
/// and the optional pause before exit. `-C` is taken relative to
/// `process_cwd`. Returns whether the operation succeeded.
pub fn run_with_prompter(
    cli: Cli,
    process_cwd: &Path,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<bool> {
    let Cli {
        operation,
        cwd,
        config: config_path,
        no_pause,
    } = cli;

    let config = load_config(config_path.as_deref());
    // A config that failed to load still pauses, so the error stays readable.
    let pause = !no_pause
        && match &config {
            Ok(config) => config.pause_before_exit,
            Err(_) => true,
        };

    let cwd = match cwd {
        Some(cwd) => process_cwd.join(cwd),
        None => process_cwd.to_path_buf(),
    };
    let outcome = match config {
        Ok(config) => run_workflow(config, &cwd, operation.map(Into::into), prompter),
        Err(err) => Err(err),
    };

    let succeeded = match outcome {
        Ok(operation) => {
            info!(%operation, "finished");
            prompter.say("Finished")?;
            true
        }
        Err(err) => {
            error!(%err, "operation failed");
            prompter.say(&format!("Failed with error:\n{err}"))?;
            false
        }
    };

    if pause {
        match prompter.ask("Press <Enter> to exit") {
            Ok(_) | Err(GitHelperError::InputClosed) => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(succeeded)
}

fn load_config(explicit: Option<&Path>) -> git_helper_core::Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };
    Config::load(&path)
}

fn run_workflow(
    config: Config,
    cwd: &Path,
    operation: Option<Operation>,
    prompter: &mut dyn Prompter,
) -> git_helper_core::Result<Operation> {
    let cwd = resolve_working_directory(cwd)?;
    let runner = ProcessRunner::new(cwd.clone());
    Workflow::new(runner, config, cwd).run(prompter, operation)
}

fn init_tracing() {
    let default_level = "error";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
