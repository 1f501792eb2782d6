//! The git operations offered to the user: initialise a repository when
//! needed, then push (optionally creating a README first) or pull.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use tracing::info;
use tracing::warn;

use crate::command::split_command;
use crate::config::Config;
use crate::error::GitHelperError;
use crate::error::Result;
use crate::exec::CommandOutput;
use crate::exec::CommandRunner;
use crate::prompt::Prompter;
use crate::prompt::ask_with_default;
use crate::prompt::ask_yes_no;

const README_FILE: &str = "README.md";
const REMOTE_URL_PREFIX: &str = "https://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Push,
    Pull,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Push, Operation::Pull];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Push => "push",
            Operation::Pull => "pull",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation `{}`", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Operation::ALL
            .into_iter()
            .find(|operation| operation.as_str() == normalized)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Canonicalize `path` and make sure it is an existing directory, so a bad
/// `-C` is reported against the directory rather than the git program.
pub fn resolve_working_directory(path: &Path) -> Result<PathBuf> {
    let working_directory_error = |source| GitHelperError::WorkingDirectory {
        path: path.to_path_buf(),
        source,
    };
    let resolved = fs::canonicalize(path).map_err(working_directory_error)?;
    if !resolved.is_dir() {
        return Err(working_directory_error(io::Error::from(
            io::ErrorKind::NotADirectory,
        )));
    }
    Ok(resolved)
}

/// Drives git in one working directory. Every command runs to completion
/// before the next starts, and the first failure ends the sequence.
pub struct Workflow<R> {
    runner: R,
    config: Config,
    cwd: PathBuf,
}

impl<R: CommandRunner> Workflow<R> {
    pub fn new(runner: R, config: Config, cwd: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            config,
            cwd: cwd.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Initialise the repository if needed, pick the operation (prompting
    /// when `operation` is `None`) and perform it.
    pub fn run(
        &self,
        prompter: &mut dyn Prompter,
        operation: Option<Operation>,
    ) -> Result<Operation> {
        self.ensure_repository(prompter)?;
        let operation = match operation {
            Some(operation) => operation,
            None => self.select_operation(prompter)?,
        };
        info!(%operation, cwd = %self.cwd.display(), "running operation");
        match operation {
            Operation::Push => self.push(prompter)?,
            Operation::Pull => self.pull()?,
        }
        Ok(operation)
    }

    /// Run `git init` and add the remote when the working directory has no
    /// `.git`. Returns whether a repository was created.
    pub fn ensure_repository(&self, prompter: &mut dyn Prompter) -> Result<bool> {
        if self.cwd.join(".git").exists() {
            return Ok(false);
        }

        prompter.say("Repo not initialised, running git init")?;
        self.git_line("init")?;

        let url = loop {
            let url = prompter.ask("URL of the remote: ")?;
            if url.starts_with(REMOTE_URL_PREFIX) {
                break url;
            }
            warn!(%url, "rejected remote url");
            prompter.say("Enter a URL starting with https://")?;
        };
        self.git(&["remote", "add", &self.config.remote_name, &url])?;
        Ok(true)
    }

    pub fn select_operation(&self, prompter: &mut dyn Prompter) -> Result<Operation> {
        let choices = Operation::ALL.map(Operation::as_str).join("|");
        let question = format!(
            "Operation [{choices}], default {}: ",
            self.config.default_operation
        );
        loop {
            let answer = prompter.ask(&question)?;
            if answer.is_empty() {
                return Ok(self.config.default_operation);
            }
            match answer.parse::<Operation>() {
                Ok(operation) => return Ok(operation),
                Err(err) => {
                    warn!(%err, "rejected operation");
                    prompter.say("Enter a valid operation")?;
                }
            }
        }
    }

    pub fn pull(&self) -> Result<()> {
        self.git_line("pull")?;
        Ok(())
    }

    pub fn push(&self, prompter: &mut dyn Prompter) -> Result<()> {
        if !self.cwd.join(README_FILE).exists() {
            self.offer_readme(prompter)?;
        }

        let message = prompter.ask("Commit message: ")?;
        let default_branch = &self.config.default_branch;
        let branch = ask_with_default(
            prompter,
            &format!("Branch, default {default_branch}: "),
            default_branch,
        )?;

        prompter.say("Pushing to remote")?;
        self.git_line("add --all")?;
        self.git(&["commit", "--message", &message])?;
        self.git(&["push", &self.config.remote_name, &branch])?;
        Ok(())
    }

    fn offer_readme(&self, prompter: &mut dyn Prompter) -> Result<()> {
        let create = ask_yes_no(
            prompter,
            "No README.md file found, create one?",
            self.config.default_create_readme,
        )?;
        if !create {
            return Ok(());
        }

        let default_text = format!("# {}", self.directory_name());
        let text = ask_with_default(
            prompter,
            &format!("Readme text, default \"{default_text}\": "),
            &default_text,
        )?;
        let path = self.cwd.join(README_FILE);
        fs::write(&path, format!("{text}\n"))?;
        info!(path = %path.display(), "wrote readme");
        Ok(())
    }

    fn directory_name(&self) -> String {
        match self.cwd.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.cwd.display().to_string(),
        }
    }

    /// Run git with a fixed, quote-free argument string such as `"add --all"`.
    fn git_line(&self, args: &str) -> Result<CommandOutput> {
        let mut argv = vec![self.config.git_program.clone()];
        argv.extend(split_command(args)?);
        self.runner.run(&argv)
    }

    /// Run git with discrete arguments; values are passed through untouched.
    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(self.config.git_program.clone());
        argv.extend(args.iter().map(|arg| (*arg).to_string()));
        self.runner.run(&argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every argv and fails the command whose subcommand matches
    /// `fail_on`.
    #[derive(Default)]
    struct RecordingRunner {
        commands: RefCell<Vec<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingRunner {
        fn failing_on(subcommand: &'static str) -> Self {
            Self {
                commands: RefCell::default(),
                fail_on: Some(subcommand),
            }
        }

        fn commands(&self) -> Vec<Vec<String>> {
            self.commands.borrow().clone()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, argv: &[String]) -> Result<CommandOutput> {
            self.commands.borrow_mut().push(argv.to_vec());
            if argv.get(1).map(String::as_str) == self.fail_on {
                return Err(GitHelperError::ProcessFailed {
                    command: argv.join(" "),
                    status: Some(1),
                    stderr: "bad".to_string(),
                });
            }
            Ok(CommandOutput::default())
        }
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| (*part).to_string()).collect()
    }

    fn repo_dir() -> Result<TempDir> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join(".git"))?;
        Ok(dir)
    }

    #[test]
    fn operation_parses_case_insensitively() {
        assert_eq!("PUSH".parse::<Operation>(), Ok(Operation::Push));
        assert_eq!(" pull ".parse::<Operation>(), Ok(Operation::Pull));
        assert_eq!(
            "fetch".parse::<Operation>(),
            Err(UnknownOperation("fetch".to_string()))
        );
        assert_eq!(Operation::Pull.to_string(), "pull");
    }

    #[test]
    fn pull_runs_git_pull() -> Result<()> {
        let dir = repo_dir()?;
        let workflow = Workflow::new(RecordingRunner::default(), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::new(["pull"]);

        assert_eq!(workflow.run(&mut prompter, None)?, Operation::Pull);
        assert_eq!(workflow.runner().commands(), vec![argv(&["git", "pull"])]);
        assert_eq!(
            prompter.transcript(),
            ["Operation [push|pull], default push: "]
        );
        Ok(())
    }

    #[test]
    fn empty_operation_answer_uses_configured_default() -> Result<()> {
        let dir = repo_dir()?;
        let config = Config {
            default_operation: Operation::Pull,
            ..Config::default()
        };
        let workflow = Workflow::new(RecordingRunner::default(), config, dir.path());
        let mut prompter = ScriptedPrompter::new(["bogus", ""]);

        assert_eq!(workflow.run(&mut prompter, None)?, Operation::Pull);
        assert_eq!(
            prompter.transcript(),
            [
                "Operation [push|pull], default pull: ",
                "Enter a valid operation",
                "Operation [push|pull], default pull: ",
            ]
        );
        Ok(())
    }

    #[test]
    fn push_with_readme_present_stages_commits_and_pushes() -> Result<()> {
        let dir = repo_dir()?;
        fs::write(dir.path().join(README_FILE), "# existing\n")?;
        let workflow = Workflow::new(RecordingRunner::default(), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::new([r#"say "hi" twice"#, ""]);

        workflow.run(&mut prompter, Some(Operation::Push))?;

        assert_eq!(
            workflow.runner().commands(),
            vec![
                argv(&["git", "add", "--all"]),
                argv(&["git", "commit", "--message", r#"say "hi" twice"#]),
                argv(&["git", "push", "origin", "master"]),
            ]
        );
        assert_eq!(
            prompter.transcript(),
            [
                "Commit message: ",
                "Branch, default master: ",
                "Pushing to remote",
            ]
        );
        Ok(())
    }

    #[test]
    fn push_creates_default_readme_when_missing() -> Result<()> {
        let dir = repo_dir()?;
        let workflow = Workflow::new(RecordingRunner::default(), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::new(["", "", "initial", "dev"]);

        workflow.push(&mut prompter)?;

        let name = dir
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        assert_eq!(
            fs::read_to_string(dir.path().join(README_FILE))?,
            format!("# {name}\n")
        );
        assert_eq!(
            &prompter.transcript()[..2],
            [
                "No README.md file found, create one? [Y|n] ".to_string(),
                format!("Readme text, default \"# {name}\": "),
            ]
        );
        assert_eq!(
            workflow.runner().commands().last(),
            Some(&argv(&["git", "push", "origin", "dev"]))
        );
        Ok(())
    }

    #[test]
    fn push_writes_custom_readme_text() -> Result<()> {
        let dir = repo_dir()?;
        let workflow = Workflow::new(RecordingRunner::default(), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::new(["y", "# My project", "msg", ""]);

        workflow.push(&mut prompter)?;

        assert_eq!(
            fs::read_to_string(dir.path().join(README_FILE))?,
            "# My project\n"
        );
        Ok(())
    }

    #[test]
    fn declining_readme_leaves_directory_untouched() -> Result<()> {
        let dir = repo_dir()?;
        let config = Config {
            default_create_readme: false,
            ..Config::default()
        };
        let workflow = Workflow::new(RecordingRunner::default(), config, dir.path());
        let mut prompter = ScriptedPrompter::new(["", "msg", ""]);

        workflow.push(&mut prompter)?;

        assert!(!dir.path().join(README_FILE).exists());
        assert_eq!(
            prompter.transcript()[0],
            "No README.md file found, create one? [y|N] "
        );
        assert_eq!(workflow.runner().commands().len(), 3);
        Ok(())
    }

    #[test]
    fn failed_stage_stops_before_commit() -> Result<()> {
        let dir = repo_dir()?;
        fs::write(dir.path().join(README_FILE), "# existing\n")?;
        let workflow = Workflow::new(RecordingRunner::failing_on("add"), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::new(["msg", ""]);

        match workflow.push(&mut prompter) {
            Err(GitHelperError::ProcessFailed { stderr, .. }) => assert_eq!(stderr, "bad"),
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
        assert_eq!(
            workflow.runner().commands(),
            vec![argv(&["git", "add", "--all"])]
        );
        Ok(())
    }

    #[test]
    fn missing_repository_is_initialised_with_remote() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config {
            remote_name: "upstream".to_string(),
            ..Config::default()
        };
        let workflow = Workflow::new(RecordingRunner::default(), config, dir.path());
        let mut prompter = ScriptedPrompter::new([
            "git@example.com:me/repo.git",
            "https://example.com/me/repo.git",
        ]);

        assert!(workflow.ensure_repository(&mut prompter)?);
        assert_eq!(
            workflow.runner().commands(),
            vec![
                argv(&["git", "init"]),
                argv(&[
                    "git",
                    "remote",
                    "add",
                    "upstream",
                    "https://example.com/me/repo.git"
                ]),
            ]
        );
        assert_eq!(
            prompter.transcript(),
            [
                "Repo not initialised, running git init",
                "URL of the remote: ",
                "Enter a URL starting with https://",
                "URL of the remote: ",
            ]
        );
        Ok(())
    }

    #[test]
    fn existing_repository_is_left_alone() -> Result<()> {
        let dir = repo_dir()?;
        let workflow = Workflow::new(RecordingRunner::default(), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::default();

        assert!(!workflow.ensure_repository(&mut prompter)?);
        assert!(workflow.runner().commands().is_empty());
        assert!(prompter.transcript().is_empty());
        Ok(())
    }

    #[test]
    fn failed_init_skips_remote_prompt() -> Result<()> {
        let dir = TempDir::new()?;
        let workflow = Workflow::new(RecordingRunner::failing_on("init"), Config::default(), dir.path());
        let mut prompter = ScriptedPrompter::new(["https://example.com/repo.git"]);

        assert!(workflow.run(&mut prompter, Some(Operation::Pull)).is_err());
        assert_eq!(prompter.remaining_answers(), 1);
        assert_eq!(workflow.runner().commands(), vec![argv(&["git", "init"])]);
        Ok(())
    }

    #[test]
    fn custom_git_program_is_used_verbatim() -> Result<()> {
        let dir = repo_dir()?;
        let config = Config {
            git_program: "/opt/git tools/git".to_string(),
            ..Config::default()
        };
        let workflow = Workflow::new(RecordingRunner::default(), config, dir.path());

        workflow.pull()?;

        assert_eq!(
            workflow.runner().commands(),
            vec![argv(&["/opt/git tools/git", "pull"])]
        );
        Ok(())
    }

    #[test]
    fn missing_working_directory_names_the_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let missing = dir.path().join("does-not-exist");

        match resolve_working_directory(&missing) {
            Err(err @ GitHelperError::WorkingDirectory { .. }) => {
                assert!(err.to_string().contains("does-not-exist"));
            }
            other => panic!("expected WorkingDirectory error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn file_is_not_a_working_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("notes.txt");
        fs::write(&file, "x")?;

        match resolve_working_directory(&file) {
            Err(GitHelperError::WorkingDirectory { path, source }) => {
                assert_eq!(path, file);
                assert_eq!(source.kind(), io::ErrorKind::NotADirectory);
            }
            other => panic!("expected WorkingDirectory error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn existing_working_directory_is_canonicalized() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("sub"))?;

        let resolved = resolve_working_directory(&dir.path().join("sub").join(".."))?;
        assert_eq!(resolved, fs::canonicalize(dir.path())?);
        Ok(())
    }
}
