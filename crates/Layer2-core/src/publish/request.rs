//! Publish Request - what to build and where to put it

use plugsmith_foundation::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Default entry point passed to the generate and build steps
pub const DEFAULT_ENTRY_POINT: &str = "main.go";

/// One publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Plugin name (required)
    pub plugin_name: String,

    /// Plugin source root
    pub source_dir: PathBuf,

    /// Host installation root
    pub dest_dir: PathBuf,

    /// Entry point, relative to `source_dir`
    pub entry_point: String,

    /// Output binary name (defaults to the plugin name)
    pub binary_name: Option<String>,

    /// Extra files or directories to copy, in order
    pub extra_paths: Vec<PathBuf>,

    /// Remove existing destination content before copying
    pub hard: bool,

    /// Republish whenever the source changes
    pub watch: bool,
}

impl PublishRequest {
    pub fn new(
        plugin_name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            binary_name: None,
            extra_paths: Vec::new(),
            hard: false,
            watch: false,
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn with_binary_name(mut self, binary_name: impl Into<String>) -> Self {
        self.binary_name = Some(binary_name.into());
        self
    }

    pub fn with_extra_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_paths.push(path.into());
        self
    }

    pub fn with_extra_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.extra_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_hard(mut self, hard: bool) -> Self {
        self.hard = hard;
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Binary file name, falling back to the plugin name
    pub fn binary_file_name(&self) -> &str {
        match self.binary_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.plugin_name,
        }
    }

    /// Entry point path handed to the toolchain
    pub fn entry_path(&self) -> PathBuf {
        self.source_dir.join(&self.entry_point)
    }

    /// Check required fields before anything runs
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() || self.dest_dir.as_os_str().is_empty() {
            return Err(Error::validation(
                "A source and destination directory must be specified.",
            ));
        }

        if self.plugin_name.is_empty() {
            return Err(Error::validation(
                "A plugin name must be specified with the --name or -n flag.",
            ));
        }

        if !is_single_component(&self.plugin_name) {
            return Err(Error::validation(format!(
                "Invalid plugin name '{}': must not contain path separators.",
                self.plugin_name
            )));
        }

        if !is_single_component(self.binary_file_name()) {
            return Err(Error::validation(format!(
                "Invalid binary name '{}': must not contain path separators.",
                self.binary_file_name()
            )));
        }

        if self.entry_point.is_empty() {
            return Err(Error::validation("An entry point must not be empty."));
        }

        Ok(())
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}
