//! plugsmith-core: plugin publishing for Plugsmith
//!
//! Layer2 - builds a plugin with the external toolchain and syncs it into a
//! host installation's plugin directory.
//!
//! # Usage
//!
//! ```ignore
//! use plugsmith_core::{Publisher, PublishRequest};
//! use plugsmith_task::LocalRunner;
//!
//! let publisher = Publisher::new(Arc::new(LocalRunner::new()), Settings::load()?);
//! let request = PublishRequest::new("auth", "./auth", "/srv/site")
//!     .with_extra_path("templates");
//! let report = publisher.publish(&request).await?;
//! println!("published to {}", report.plugin_path.display());
//! ```

pub mod publish;

pub use publish::{
    copy_path, copy_plan, watch, FileCopySpec, PluginPaths, PublishReport, PublishRequest,
    Publisher, BINARY_MODE, DEFAULT_ENTRY_POINT,
};
