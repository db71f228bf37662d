use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{path} does not exist")]
    PathMissing { path: PathBuf },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("invalid address \"{input}\" (expected host:port)")]
    InvalidAddress { input: String },

    #[error("stylesheet value contains a disallowed character: {found:?}")]
    DisallowedStylesheet { found: char },

    #[error("{0}")]
    Install(#[from] InstallError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            AppError::Install(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Errors raised while reading stored session data.
#[derive(Debug, Error)]
pub(crate) enum ResultsError {
    #[error("{path} does not exist")]
    MetadataMissing { path: PathBuf },

    #[error("{path}: the metadata do not have all the required fields: {reason}")]
    MetadataInvalid { path: PathBuf, reason: String },

    #[error("invalid system description: {0}")]
    System(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the module bundle installer.
///
/// Exit codes match the CLI contract: 2 for an invalid bundle, 3 when the
/// module is already installed and neither `-u` nor `--force-reinstall`
/// was given.
#[derive(Debug, Error)]
pub(crate) enum InstallError {
    #[error("{path} does not exist")]
    ComponentMissing { path: PathBuf },

    #[error("{path} does not point to a directory")]
    NotADirectory { path: PathBuf },

    #[error("{path} does not point to a file")]
    NotAFile { path: PathBuf },

    #[error("{path} is not a valid YAML file: {reason}")]
    Yaml { path: PathBuf, reason: String },

    #[error("invalid module metadata: {reason}")]
    Metadata { reason: String },

    #[error("this module requires analyser {required} or newer (this is {current})")]
    VersionTooOld { required: String, current: String },

    #[error("{name} is already installed, use the -u flag")]
    AlreadyInstalled { name: String },

    #[error("no application data directory is available on this platform")]
    NoDataDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            InstallError::AlreadyInstalled { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors raised while dispatching a request to a module backend.
#[derive(Debug, Error)]
pub(crate) enum ModuleError {
    #[error("failed to launch the backend of {name}: {source}")]
    Launch {
        name: String,
        source: std::io::Error,
    },

    #[error("the backend of {name} exited with {status}")]
    Failed {
        name: String,
        status: std::process::ExitStatus,
    },

    #[error("failed to encode the module request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
