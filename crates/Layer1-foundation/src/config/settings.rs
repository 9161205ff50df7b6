//! Settings - merged global and project configuration

use super::layout::LayoutScope;
use super::store::JsonStore;
use super::toolchain::ToolchainScope;
use super::{LayoutConfig, ToolchainConfig};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Settings file name
pub const SETTINGS_FILE: &str = "plugsmith.json";

/// Plugsmith settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// Contents of one `plugsmith.json`; unset fields leave earlier scopes alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsScope {
    #[serde(default)]
    pub layout: LayoutScope,

    #[serde(default)]
    pub toolchain: ToolchainScope,
}

impl Settings {
    /// Load global settings, then overlay project settings
    pub fn load() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(global) = JsonStore::global() {
            if let Some(global_settings) = global.load_optional::<SettingsScope>(SETTINGS_FILE)? {
                settings.merge(global_settings);
            }
        }

        let project = JsonStore::current_project()?;
        if let Some(project_settings) = project.load_optional::<SettingsScope>(SETTINGS_FILE)? {
            settings.merge(project_settings);
        }

        Ok(settings)
    }

    /// Load settings from the given scopes, later scopes winning
    pub fn load_from(stores: &[JsonStore]) -> Result<Self> {
        let mut settings = Self::default();
        for store in stores {
            if let Some(scoped) = store.load_optional::<SettingsScope>(SETTINGS_FILE)? {
                settings.merge(scoped);
            }
        }
        Ok(settings)
    }

    /// Overlay one scope, field by field
    pub fn merge(&mut self, scope: SettingsScope) {
        self.layout.merge(scope.layout);
        self.toolchain.merge(scope.toolchain);
    }
}
