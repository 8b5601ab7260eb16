use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by model generation and result interpretation.
///
/// `Format`, `DuplicateDependency` and `Io` raised while generating models
/// abort the build action. `Parse` is only ever raised while reading analyzer
/// output, where `process_results` recovers from it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed {kind} `{encoded}`: expected {expected} fields, found {found}")]
    Format {
        kind: &'static str,
        encoded: String,
        expected: &'static str,
        found: usize,
    },

    #[error("dependency module `{0}` is listed more than once")]
    DuplicateDependency(String),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed analyzer output: {0}")]
    Parse(String),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
