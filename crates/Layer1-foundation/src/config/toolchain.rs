//! Toolchain Config - external commands used to build and run
//!
//! Commands are argv templates. `{entry}` expands to the entry point path and
//! `{output}` to the binary path being produced.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder for the entry point path
pub const ENTRY_PLACEHOLDER: &str = "{entry}";

/// Placeholder for the output binary path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Precompiled host binary, relative to the host working directory
#[cfg(windows)]
pub const DEFAULT_HOST_BINARY: &str = "host.exe";
#[cfg(not(windows))]
pub const DEFAULT_HOST_BINARY: &str = "./host";

/// External toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainConfig {
    /// Code generation step
    #[serde(default = "default_generate")]
    pub generate: Vec<String>,

    /// Compile step
    #[serde(default = "default_build")]
    pub build: Vec<String>,

    /// Host build-and-run command
    #[serde(default = "default_run_from_source")]
    pub run_from_source: Vec<String>,

    /// Host precompiled binary
    #[serde(default = "default_host_binary")]
    pub host_binary: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            generate: default_generate(),
            build: default_build(),
            run_from_source: default_run_from_source(),
            host_binary: default_host_binary(),
        }
    }
}

impl ToolchainConfig {
    /// Generate argv for the given entry point
    pub fn generate_argv(&self, entry: &Path) -> Vec<String> {
        expand(&self.generate, entry, None)
    }

    /// Build argv for the given entry point and output binary
    pub fn build_argv(&self, entry: &Path, output: &Path) -> Vec<String> {
        expand(&self.build, entry, Some(output))
    }

    /// Binary to launch in precompiled mode, resolved against `dir` when it
    /// is a relative path with more than one component
    pub fn host_binary_in(&self, dir: &Path) -> PathBuf {
        let binary = &self.host_binary;
        if binary.is_relative() && binary.components().count() > 1 {
            dir.join(binary)
        } else {
            binary.clone()
        }
    }

    /// Apply every field a scope sets, even when it equals the default
    pub(crate) fn merge(&mut self, scope: ToolchainScope) {
        if let Some(generate) = scope.generate {
            self.generate = generate;
        }
        if let Some(build) = scope.build {
            self.build = build;
        }
        if let Some(run_from_source) = scope.run_from_source {
            self.run_from_source = run_from_source;
        }
        if let Some(host_binary) = scope.host_binary {
            self.host_binary = host_binary;
        }
    }
}

/// One settings scope's toolchain, only the fields the file sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainScope {
    #[serde(default)]
    pub generate: Option<Vec<String>>,
    #[serde(default)]
    pub build: Option<Vec<String>>,
    #[serde(default)]
    pub run_from_source: Option<Vec<String>>,
    #[serde(default)]
    pub host_binary: Option<PathBuf>,
}

fn expand(template: &[String], entry: &Path, output: Option<&Path>) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            let mut arg = arg.replace(ENTRY_PLACEHOLDER, &entry.to_string_lossy());
            if let Some(output) = output {
                arg = arg.replace(OUTPUT_PLACEHOLDER, &output.to_string_lossy());
            }
            arg
        })
        .collect()
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn default_generate() -> Vec<String> {
    argv(&["go", "generate", ENTRY_PLACEHOLDER])
}

fn default_build() -> Vec<String> {
    argv(&["go", "build", "-o", OUTPUT_PLACEHOLDER, ENTRY_PLACEHOLDER])
}

fn default_run_from_source() -> Vec<String> {
    argv(&["go", "run", "main.go"])
}

fn default_host_binary() -> PathBuf {
    PathBuf::from(DEFAULT_HOST_BINARY)
}
