//! Command runners
//!
//! - `CommandRunner` - the seam the publish flow runs its steps through
//! - `LocalRunner` - spawns the command on the host

pub mod local;
pub mod r#trait;

pub use local::LocalRunner;
pub use r#trait::CommandRunner;
