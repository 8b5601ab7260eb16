//! Process environment as an injected capability.
//!
//! Model generation and sanitization need the action's working directory and
//! the sandbox temp directory. Both are read through [`Env`] so tests can pin
//! them to deterministic values.

use std::path::PathBuf;

pub trait Env {
    /// The execution root the build action runs in.
    fn working_directory(&self) -> PathBuf;

    /// Temp directory whose prefix leaks into analyzer output, if known.
    fn temp_directory(&self) -> Option<PathBuf>;
}

/// Reads `PWD` and `TMP_DIR` from the running process.
///
/// `PWD` is preferred over the canonical cwd because sandboxes expose the
/// execroot through symlinks and the logical path is what the analyzer echoes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn working_directory(&self) -> PathBuf {
        std::env::var_os("PWD")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default()
    }

    fn temp_directory(&self) -> Option<PathBuf> {
        std::env::var_os("TMP_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

/// Fixed values, for tests and for callers that already resolved them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedEnv {
    pub working_directory: PathBuf,
    pub temp_directory: Option<PathBuf>,
}

impl FixedEnv {
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            temp_directory: None,
        }
    }

    pub fn with_temp_directory(mut self, temp: impl Into<PathBuf>) -> Self {
        self.temp_directory = Some(temp.into());
        self
    }
}

impl Env for FixedEnv {
    fn working_directory(&self) -> PathBuf {
        self.working_directory.clone()
    }

    fn temp_directory(&self) -> Option<PathBuf> {
        self.temp_directory.clone()
    }
}
