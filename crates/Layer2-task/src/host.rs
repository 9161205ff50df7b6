//! Host process runner - launches the host platform for local testing
//!
//! Lifecycle: `NotStarted -> Running -> Stopped`. The child's stdout and
//! stderr are forwarded line by line by two reader tasks that are never
//! joined; they end on their own once the pipes close. The control task waits
//! on a one-shot stop signal with no timeout and then kills the child.

use crate::command::CommandSpec;
use crate::output::{spawn_forwarder, OutputSink, OutputStream};
use plugsmith_foundation::{Error, Result, ToolchainConfig};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// How the host is launched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Build and run from source
    BuildAndRun,
    /// Run the precompiled binary
    Precompiled,
}

/// Host process state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    NotStarted,
    Running,
    Stopped,
}

/// Handle to the one host process of a run invocation
#[derive(Debug)]
pub struct HostProcess {
    dir: PathBuf,
    command: CommandSpec,
    sink: OutputSink,
    state: HostState,
    child: Option<Child>,
}

impl HostProcess {
    /// Resolve the launch command for `mode` inside `dir`
    pub fn new(dir: impl Into<PathBuf>, mode: HostMode, toolchain: &ToolchainConfig) -> Result<Self> {
        let dir = dir.into();
        let command = match mode {
            HostMode::BuildAndRun => CommandSpec::from_argv(toolchain.run_from_source.clone())?,
            HostMode::Precompiled => {
                CommandSpec::new(toolchain.host_binary_in(&dir).to_string_lossy())
            }
        }
        .with_cwd(&dir);

        Ok(Self {
            dir,
            command,
            sink: OutputSink::Stdout,
            state: HostState::NotStarted,
            child: None,
        })
    }

    /// Send forwarded lines somewhere other than our stdout
    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    /// OS process id while running
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().and_then(|c| c.id())
    }

    /// Spawn the host and attach the output readers
    pub fn start(&mut self) -> Result<()> {
        if self.state != HostState::NotStarted {
            return Err(Error::Launch(format!(
                "host process already {}",
                if self.state == HostState::Running {
                    "running"
                } else {
                    "stopped"
                }
            )));
        }

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Launching host: {} in {}", self.command, self.dir.display());

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::Launch(format!("{}: {}", self.command, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Launch("could not attach to host stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Launch("could not attach to host stderr".to_string()))?;

        spawn_forwarder(stdout, OutputStream::Stdout, self.sink.clone());
        spawn_forwarder(stderr, OutputStream::Stderr, self.sink.clone());

        self.child = Some(child);
        self.state = HostState::Running;

        println!("Host started");
        info!("Host started (pid {:?})", self.id());
        Ok(())
    }

    /// Block until `stop` fires (or its sender is dropped), then kill the host
    pub async fn wait_for_stop(&mut self, stop: oneshot::Receiver<()>) -> Result<()> {
        if stop.await.is_err() {
            debug!("Stop sender dropped, stopping host");
        }
        self.kill().await
    }

    async fn kill(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                // Already exited on its own
                warn!("Failed to kill host process: {}", e);
            }
        }
        self.state = HostState::Stopped;

        println!("Host stopped.");
        info!("Host stopped");
        Ok(())
    }
}

/// Launch the host in `dir`, forward its output, and stop it when `stop` fires
pub async fn run_host(
    dir: impl Into<PathBuf>,
    mode: HostMode,
    toolchain: &ToolchainConfig,
    sink: OutputSink,
    stop: oneshot::Receiver<()>,
) -> Result<()> {
    let mut host = HostProcess::new(dir, mode, toolchain)?.with_sink(sink);
    host.start()?;
    host.wait_for_stop(stop).await
}
