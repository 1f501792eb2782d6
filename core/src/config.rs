//! User configuration, read from `config.toml` in the git-helper home.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::GitHelperError;
use crate::error::Result;
use crate::workflow::Operation;

pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable that overrides the git-helper home directory.
pub const GIT_HELPER_HOME_ENV: &str = "GIT_HELPER_HOME";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Branch pushed to when the branch prompt is left empty.
    pub default_branch: String,
    /// Answer assumed when the README prompt is left empty.
    pub default_create_readme: bool,
    pub default_operation: Operation,
    /// Remote added on `git init` and pushed to.
    pub remote_name: String,
    /// Program invoked for every git command.
    pub git_program: String,
    /// Wait for Enter before exiting so a double-clicked terminal stays open.
    pub pause_before_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_branch: "master".to_string(),
            default_create_readme: true,
            default_operation: Operation::Push,
            remote_name: "origin".to_string(),
            git_program: "git".to_string(),
            pause_before_exit: true,
        }
    }
}

impl Config {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Self::parse(&contents).map_err(|source| GitHelperError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Resolve the git-helper home: `$GIT_HELPER_HOME` when set and non-empty,
/// otherwise `~/.git-helper`.
pub fn find_git_helper_home() -> Option<PathBuf> {
    resolve_git_helper_home(std::env::var(GIT_HELPER_HOME_ENV).ok(), dirs::home_dir())
}

fn resolve_git_helper_home(
    override_dir: Option<String>,
    home_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(value) = override_dir
        && !value.is_empty()
    {
        return Some(PathBuf::from(value));
    }
    home_dir.map(|home| home.join(".git-helper"))
}

/// Path of the default config file, if a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    find_git_helper_home().map(|home| home.join(CONFIG_FILE))
}
