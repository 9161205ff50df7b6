//! Plugin Publisher - build a plugin and sync it into an installation
//!
//! Steps run strictly in order: validate, generate, build, chmod, assemble
//! the copy plan, copy. Generate/build/copy failures abort the run; a chmod
//! failure is reported and the run continues. Nothing is rolled back.

use super::copy::copy_path;
use super::paths::PluginPaths;
use super::plan::{copy_plan, FileCopySpec};
use super::request::PublishRequest;
use plugsmith_foundation::{Error, Result, Settings};
use plugsmith_task::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Executable mode applied to the built binary
pub const BINARY_MODE: u32 = 0o755;

/// Outcome of a successful publish
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub plugin_path: PathBuf,
    pub binary_path: PathBuf,

    /// Set when the binary could not be marked executable
    pub permission_error: Option<String>,

    /// Entries copied, in order
    pub copied: Vec<FileCopySpec>,

    /// Optional entries skipped because their source does not exist
    pub skipped: Vec<PathBuf>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.permission_error.is_none()
    }
}

/// Runs the publish sequence through a [`CommandRunner`]
pub struct Publisher {
    runner: Arc<dyn CommandRunner>,
    settings: Settings,
    verbose: bool,
}

impl Publisher {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: Settings) -> Self {
        Self {
            runner,
            settings,
            verbose: false,
        }
    }

    /// Forward toolchain stdout (stderr is always forwarded)
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Paths a request publishes to
    pub fn paths(&self, request: &PublishRequest) -> PluginPaths {
        PluginPaths::derive(request, &self.settings.layout)
    }

    /// Run the whole publish sequence once
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishReport> {
        self.publish_with(request, || {}).await
    }

    /// Like [`publish`](Self::publish), calling `after_generate` once the
    /// generate step has succeeded and before the build starts
    pub async fn publish_with<F>(
        &self,
        request: &PublishRequest,
        after_generate: F,
    ) -> Result<PublishReport>
    where
        F: FnOnce() + Send,
    {
        request.validate()?;

        let paths = self.paths(request);
        let entry = request.entry_path();
        let toolchain = &self.settings.toolchain;

        info!(
            "Publishing plugin {} to {}",
            request.plugin_name,
            paths.plugin_path.display()
        );

        // 1. Code generation
        let generate = CommandSpec::from_argv(toolchain.generate_argv(&entry))?
            .with_forward_stdout(self.verbose);
        self.runner.run(&generate).await?;
        debug!("Generate step finished: {}", generate);
        after_generate();

        // 2. Build
        let build = CommandSpec::from_argv(toolchain.build_argv(&entry, &paths.binary_path))?
            .with_forward_stdout(self.verbose);
        fs::create_dir_all(&paths.plugin_path)
            .await
            .map_err(|e| {
                Error::copy(
                    &paths.plugin_path,
                    format!("cannot create plugin directory: {}", e),
                )
            })?;
        self.runner.run(&build).await?;
        info!("Built {}", paths.binary_path.display());

        // 3. Executable permission (non-fatal)
        let permission_error = match set_executable(&paths.binary_path).await {
            Ok(()) => None,
            Err(e) => {
                warn!("{}", e);
                Some(e.to_string())
            }
        };

        // 4. Copy plan
        let plan = copy_plan(request, &self.settings.layout, &paths.plugin_path);

        // 5. Copy, stopping at the first failure
        let mut report = PublishReport {
            plugin_path: paths.plugin_path,
            binary_path: paths.binary_path,
            permission_error,
            ..Default::default()
        };

        for entry in plan {
            if !entry.required {
                match fs::try_exists(&entry.source).await {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("Skipping missing {}", entry.source.display());
                        report.skipped.push(entry.source);
                        continue;
                    }
                    Err(e) => return Err(Error::copy(&entry.source, e)),
                }
            }

            // Replacing the plugin directory itself would delete the new binary
            if request.hard && entry.dest == report.plugin_path {
                return Err(Error::copy(
                    &entry.source,
                    format!(
                        "would replace the whole plugin directory {}",
                        report.plugin_path.display()
                    ),
                ));
            }

            let files = copy_path(&entry.source, &entry.dest, request.hard)
                .await
                .map_err(|e| Error::copy(&entry.source, e))?;
            debug!(
                "Copied {} ({} files) -> {}",
                entry.source.display(),
                files,
                entry.dest.display()
            );
            report.copied.push(entry);
        }

        info!(
            "Published plugin {} ({} entries copied)",
            request.plugin_name,
            report.copied.len()
        );
        Ok(report)
    }
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(BINARY_MODE))
        .await
        .map_err(|e| Error::permission(path, e))
}

#[cfg(not(unix))]
async fn set_executable(path: &Path) -> Result<()> {
    fs::metadata(path)
        .await
        .map(|_| ())
        .map_err(|e| Error::permission(path, e))
}
