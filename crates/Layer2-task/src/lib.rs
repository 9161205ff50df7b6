//! # plugsmith-task
//!
//! External process execution for Plugsmith.
//!
//! ## Features
//!
//! - `CommandRunner` seam for the build toolchain (generate, compile)
//! - `LocalRunner` with PATH lookup and verbose-gated stdout
//! - Live stdout/stderr forwarding through per-stream reader tasks
//! - `HostProcess` lifecycle: launch, wait for a stop signal, kill

pub mod command;
pub mod executor;
pub mod host;
pub mod output;

pub use command::CommandSpec;
pub use executor::{CommandRunner, LocalRunner};
pub use host::{run_host, HostMode, HostProcess, HostState};
pub use output::{spawn_forwarder, OutputLine, OutputSink, OutputStream};
