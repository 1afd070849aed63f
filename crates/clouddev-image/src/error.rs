use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("branch '{branch}' not found in '{url}'")]
    BranchNotFound { url: String, branch: String },

    #[error("failed to prepare checkout directory '{path}'")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' was not found on PATH; install Docker")]
    DockerNotInstalled { program: String },

    #[error("failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed: {stderr}")]
    DockerFailed { command: String, stderr: String },

    #[error("'{uri}' is not a registry URI")]
    InvalidRegistryUri { uri: String },
}
