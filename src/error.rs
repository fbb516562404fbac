use std::path::PathBuf;
use thiserror::Error;

/// Errors raised outside the analysis core: loading input, reading config,
/// talking to git and writing reports. The core itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem access failed.
    #[error("Cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset file is not valid JSON for the expected schema.
    #[error("Invalid dataset '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A config file is not valid YAML for the expected schema.
    #[error("Invalid config file '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config parsed but holds a value outside its accepted range.
    #[error("{0}")]
    Config(String),

    /// Running or reading `git` failed.
    #[error("git: {0}")]
    Git(String),

    /// Serializing a report failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
