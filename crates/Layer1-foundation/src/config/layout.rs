//! Layout Config - installation directory layout
//!
//! Names the directories and well-known files that make up a plugin
//! installation: `<dest>/<content_root>/<plugins_root>/<plugin>/`.

use serde::{Deserialize, Serialize};

/// Default content directory inside an installation
pub const DEFAULT_CONTENT_ROOT: &str = "content";

/// Default plugins directory inside the content directory
pub const DEFAULT_PLUGINS_ROOT: &str = "plugins";

/// Default plugin manifest file name
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// Default plugin docs entry name
pub const DEFAULT_DOCS_FILE: &str = "docs";

/// Installation layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_content_root")]
    pub content_root: String,

    #[serde(default = "default_plugins_root")]
    pub plugins_root: String,

    /// Manifest file, copied from the plugin source root
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Docs file or directory, copied from the plugin source root
    #[serde(default = "default_docs_file")]
    pub docs_file: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            plugins_root: default_plugins_root(),
            manifest_file: default_manifest_file(),
            docs_file: default_docs_file(),
        }
    }
}

/// One settings scope's layout, only the fields the file sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutScope {
    #[serde(default)]
    pub content_root: Option<String>,
    #[serde(default)]
    pub plugins_root: Option<String>,
    #[serde(default)]
    pub manifest_file: Option<String>,
    #[serde(default)]
    pub docs_file: Option<String>,
}

impl LayoutConfig {
    /// Apply every field a scope sets, even when it equals the default
    pub(crate) fn merge(&mut self, scope: LayoutScope) {
        if let Some(content_root) = scope.content_root {
            self.content_root = content_root;
        }
        if let Some(plugins_root) = scope.plugins_root {
            self.plugins_root = plugins_root;
        }
        if let Some(manifest_file) = scope.manifest_file {
            self.manifest_file = manifest_file;
        }
        if let Some(docs_file) = scope.docs_file {
            self.docs_file = docs_file;
        }
    }

    /// Well-known files copied with every plugin, in copy order
    pub fn well_known_files(&self) -> [&str; 2] {
        [self.manifest_file.as_str(), self.docs_file.as_str()]
    }
}

fn default_content_root() -> String {
    DEFAULT_CONTENT_ROOT.to_string()
}

fn default_plugins_root() -> String {
    DEFAULT_PLUGINS_ROOT.to_string()
}

fn default_manifest_file() -> String {
    DEFAULT_MANIFEST_FILE.to_string()
}

fn default_docs_file() -> String {
    DEFAULT_DOCS_FILE.to_string()
}
