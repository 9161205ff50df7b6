//! Local runner - runs commands on the host system
//!
//! - Program lookup on PATH before spawning
//! - stdout forwarded or discarded per command, stderr always forwarded
//! - Child killed if the run future is dropped

use crate::command::CommandSpec;
use crate::executor::CommandRunner;
use async_trait::async_trait;
use plugsmith_foundation::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs commands directly on the host
#[derive(Debug, Clone, Default)]
pub struct LocalRunner;

impl LocalRunner {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the program on PATH (relative paths against the command's cwd)
    fn resolve(spec: &CommandSpec) -> Result<PathBuf> {
        let cwd = match &spec.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        which::which_in(&spec.program, std::env::var_os("PATH"), cwd).map_err(|e| {
            Error::command(
                spec.to_string(),
                format!("{} not found on PATH ({})", spec.program, e),
            )
        })
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        let program = Self::resolve(spec)?;

        let mut cmd = Command::new(&program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(if spec.forward_stdout {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        debug!("Running {} ({})", spec, program.display());

        let status = cmd
            .status()
            .await
            .map_err(|e| Error::command(spec.to_string(), e))?;

        if !status.success() {
            return Err(Error::command(spec.to_string(), status));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
