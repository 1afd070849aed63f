use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{ImageError, Result};

/// Handle on the `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: OsString,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerCli {
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: OsString::from("docker"),
        }
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// `docker build -t {tag} .` inside `context`.
    pub fn build(&self, context: &Path, tag: &str) -> Result<()> {
        self.run(&["build", "-t", tag, "."], Some(context), None)
    }

    /// `docker login` with the password passed on stdin.
    pub fn login(&self, registry: &str, username: &str, password: &str) -> Result<()> {
        self.run(
            &["login", "--username", username, "--password-stdin", registry],
            None,
            Some(password),
        )
    }

    pub fn tag(&self, source: &str, target: &str) -> Result<()> {
        self.run(&["tag", source, target], None, None)
    }

    pub fn push(&self, image: &str) -> Result<()> {
        self.run(&["push", image], None, None)
    }

    fn run(&self, args: &[&str], dir: Option<&Path>, stdin: Option<&str>) -> Result<()> {
        let command = format!("docker {}", args.join(" "));
        debug!(%command, "running docker command");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ImageError::DockerNotInstalled {
                    program: self.program.to_string_lossy().into_owned(),
                }
            } else {
                ImageError::Spawn {
                    command: command.clone(),
                    source,
                }
            }
        })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())
                .map_err(|source| ImageError::Spawn {
                    command: command.clone(),
                    source,
                })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|source| ImageError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ImageError::DockerFailed { command, stderr });
        }
        Ok(())
    }
}
