use std::fs;
use std::path::Path;

use git2::build::RepoBuilder;
use git2::{Cred, ErrorCode, FetchOptions, RemoteCallbacks};
use tracing::info;

use crate::{ImageError, Result};

#[derive(Clone)]
pub struct GitCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for GitCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A remote repository holding the app's source and Dockerfile.
#[derive(Debug, Clone)]
pub struct SourceCheckout {
    url: String,
    credentials: Option<GitCredentials>,
}

impl SourceCheckout {
    #[must_use]
    pub fn github(organisation: &str, repository: &str) -> Self {
        Self::from_url(format!("https://github.com/{organisation}/{repository}.git"))
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Option<GitCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Clone `branch` into `dest`, replacing whatever is there.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::BranchNotFound`] if the remote has no such branch,
    /// or another error if the directory cannot be prepared or the clone fails.
    pub fn clone_into(&self, dest: &Path, branch: &str) -> Result<git2::Repository> {
        if dest.exists() {
            fs::remove_dir_all(dest).map_err(|source| ImageError::Workspace {
                path: dest.to_path_buf(),
                source,
            })?;
        }

        let mut callbacks = RemoteCallbacks::new();
        if let Some(credentials) = &self.credentials {
            callbacks.credentials(move |_url, _username, _allowed| {
                Cred::userpass_plaintext(&credentials.username, &credentials.password)
            });
        }
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(callbacks);

        info!(url = %self.url, branch, dest = %dest.display(), "cloning source");
        RepoBuilder::new()
            .branch(branch)
            .fetch_options(fetch)
            .clone(&self.url, dest)
            .map_err(|err| {
                if err.code() == ErrorCode::NotFound {
                    ImageError::BranchNotFound {
                        url: self.url.clone(),
                        branch: branch.to_string(),
                    }
                } else {
                    ImageError::Git(err)
                }
            })
    }
}
