//! Publish - build a plugin and copy it into a host installation
//!
//! - `request.rs` - what to publish
//! - `paths.rs` - derived destination paths
//! - `plan.rs` - ordered copy list
//! - `copy.rs` - recursive copy primitive
//! - `publisher.rs` - the publish sequence
//! - `watch.rs` - republish on source changes

pub mod copy;
pub mod paths;
pub mod plan;
pub mod publisher;
pub mod request;
pub mod watch;

pub use copy::copy_path;
pub use paths::PluginPaths;
pub use plan::{copy_plan, FileCopySpec};
pub use publisher::{PublishReport, Publisher, BINARY_MODE};
pub use request::{PublishRequest, DEFAULT_ENTRY_POINT};
pub use watch::watch;
