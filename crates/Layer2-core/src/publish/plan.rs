//! Copy plan - which files go where
//!
//! The plan is `[manifest, docs] ++ extra_paths`. Each destination is the
//! source path with the source root stripped and the plugin path substituted.

use super::paths::normalize;
use super::request::PublishRequest;
use plugsmith_foundation::LayoutConfig;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// One entry of the copy plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopySpec {
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Missing required entries fail the copy step; others are skipped
    pub required: bool,
}

impl FileCopySpec {
    /// Map `source` from under `source_dir` to under `plugin_path`
    pub fn resolve(source: PathBuf, source_dir: &Path, plugin_path: &Path, required: bool) -> Self {
        let relative = normalize(&source)
            .strip_prefix(normalize(source_dir))
            .ok()
            .filter(|rel| rel.components().all(|c| matches!(c, Component::Normal(_))))
            .map(Path::to_path_buf);

        let dest = match relative {
            Some(rel) if !rel.as_os_str().is_empty() => plugin_path.join(rel),
            Some(_) => plugin_path.to_path_buf(),
            None => {
                let name = source.file_name().map(PathBuf::from).unwrap_or_default();
                warn!(
                    "{} is outside {}, copying as {}",
                    source.display(),
                    source_dir.display(),
                    name.display()
                );
                plugin_path.join(name)
            }
        };

        Self {
            source,
            dest,
            required,
        }
    }
}

/// Build the ordered copy list for a request
pub fn copy_plan(
    request: &PublishRequest,
    layout: &LayoutConfig,
    plugin_path: &Path,
) -> Vec<FileCopySpec> {
    let source_dir = &request.source_dir;

    let well_known = layout.well_known_files().into_iter().map(|name| {
        FileCopySpec::resolve(source_dir.join(name), source_dir, plugin_path, false)
    });

    let extras = request.extra_paths.iter().map(|path| {
        let source = if path.is_absolute() {
            path.clone()
        } else {
            source_dir.join(path)
        };
        FileCopySpec::resolve(source, source_dir, plugin_path, true)
    });

    well_known.chain(extras).collect()
}
