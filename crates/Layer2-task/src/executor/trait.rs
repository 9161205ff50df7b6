//! Runner trait

use crate::command::CommandSpec;
use async_trait::async_trait;
use plugsmith_foundation::Result;

/// Runs an external command to completion
///
/// Implement to replace how commands are executed (tests use a recording
/// runner that never spawns anything).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command; non-zero exit or spawn failure is an error naming
    /// the command line
    async fn run(&self, spec: &CommandSpec) -> Result<()>;

    /// Runner name
    fn name(&self) -> &'static str;
}
