//! Config - settings for the publish and run flows
//!
//! - `layout.rs` - installation directory layout
//! - `toolchain.rs` - external build/run commands
//! - `settings.rs` - merged global + project settings
//! - `store.rs` - JSON file scopes

mod layout;
mod settings;
mod store;
mod toolchain;

pub use layout::{
    LayoutConfig, LayoutScope, DEFAULT_CONTENT_ROOT, DEFAULT_DOCS_FILE, DEFAULT_MANIFEST_FILE,
    DEFAULT_PLUGINS_ROOT,
};
pub use settings::{Settings, SettingsScope, SETTINGS_FILE};
pub use store::JsonStore;
pub use toolchain::{
    ToolchainConfig, ToolchainScope, DEFAULT_HOST_BINARY, ENTRY_PLACEHOLDER, OUTPUT_PLACEHOLDER,
};
