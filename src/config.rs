use std::{
    env,
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use crate::{error::Error, Result};

/// Explicit path of the file to serve
pub const PATH_VAR: &str = "FILE_PATH_TO_SERVE";
/// File name looked up in the working directory if `PATH_VAR` isn't set
pub const FILENAME_VAR: &str = "FILENAME";
pub const STRATEGY_VAR: &str = "LINE_STRATEGY";

pub const DEFAULT_FILENAME: &str = ".base.txt";

/// How lines get looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Build a line index once and seek to the requested line
    #[default]
    Indexed,
    /// Scan the file from the start on every lookup
    Scan,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indexed" => Ok(Self::Indexed),
            "scan" => Ok(Self::Scan),
            other => Err(Error::InvalidConfig(format!(
                "unknown {} '{}', expected 'indexed' or 'scan'",
                STRATEGY_VAR, other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute path of the served file. It isn't required to exist yet.
    pub path: PathBuf,
    pub strategy: Strategy,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(path: P, strategy: Strategy) -> Config {
        Self {
            path: path.into(),
            strategy,
        }
    }

    /// Load the config from the process environment
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the config using `lookup` to resolve variables. Relative paths are resolved against
    /// the current working directory.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cwd = env::current_dir()?;
        Self::from_lookup_in(lookup, &cwd)
    }

    fn from_lookup_in<F>(lookup: F, cwd: &Path) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(PATH_VAR)
            .filter(|p| !p.is_empty())
            .or_else(|| lookup(FILENAME_VAR).filter(|p| !p.is_empty()))
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let path = normalize(&cwd.join(raw));

        let strategy = match lookup(STRATEGY_VAR) {
            Some(s) => s.parse()?,
            None => Strategy::default(),
        };

        Ok(Self { path, strategy })
    }
}

/// Removes `.` and `..` segments without touching the filesystem, so the file doesn't have to
/// exist yet. `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }

    out
}
