//! Derived plugin paths

use super::request::PublishRequest;
use plugsmith_foundation::LayoutConfig;
use std::path::{Path, PathBuf};

/// Destination paths of one publish, computed fresh per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPaths {
    /// `<dest>/<content_root>/<plugins_root>/<plugin_name>`
    pub plugin_path: PathBuf,

    /// `<plugin_path>/<binary_name>`
    pub binary_path: PathBuf,
}

impl PluginPaths {
    pub fn derive(request: &PublishRequest, layout: &LayoutConfig) -> Self {
        let plugin_path = normalize(&request.dest_dir)
            .join(&layout.content_root)
            .join(&layout.plugins_root)
            .join(&request.plugin_name);
        let binary_path = plugin_path.join(request.binary_file_name());

        Self {
            plugin_path,
            binary_path,
        }
    }
}

/// Drop trailing separators and `.` segments
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}
