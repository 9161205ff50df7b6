//! # plugsmith-foundation
//!
//! Foundation layer for Plugsmith:
//! - Error: the shared error type for publish and run flows
//! - Config: installation layout, toolchain commands, settings files

pub mod config;
pub mod error;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{
    JsonStore, LayoutConfig, LayoutScope, Settings, SettingsScope, ToolchainConfig, ToolchainScope,
    SETTINGS_FILE,
};
