//! Publish flow integration tests
//!
//! `cargo test -p plugsmith-core --test publish_flow`
//!
//! A recording runner stands in for the toolchain: it logs every command,
//! optionally fails one step, and writes the `-o` output for build commands.

use async_trait::async_trait;
use plugsmith_core::{watch, PublishRequest, Publisher};
use plugsmith_foundation::{Error, LayoutConfig, Result, Settings};
use plugsmith_task::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    /// Fail any command whose first argument matches (e.g. "generate")
    fail_step: Option<&'static str>,
    /// Write the `-o` output file for build commands
    write_outputs: bool,
    /// How long each build takes
    build_time: Option<Duration>,
}

impl RecordingRunner {
    fn producing_binaries() -> Self {
        Self {
            write_outputs: true,
            ..Default::default()
        }
    }

    fn failing(step: &'static str) -> Self {
        Self {
            fail_step: Some(step),
            write_outputs: true,
            ..Default::default()
        }
    }

    fn slow_build(build_time: Duration) -> Self {
        Self {
            write_outputs: true,
            build_time: Some(build_time),
            ..Default::default()
        }
    }

    fn steps(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.args.first().cloned().unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        self.calls.lock().unwrap().push(spec.clone());

        let step = spec.args.first().map(String::as_str);
        if step.is_some() && step == self.fail_step {
            return Err(Error::command(spec.to_string(), "exit status: 2"));
        }

        if step == Some("build") {
            if let Some(build_time) = self.build_time {
                tokio::time::sleep(build_time).await;
            }
        }

        if self.write_outputs {
            if let Some(pos) = spec.args.iter().position(|a| a == "-o") {
                std::fs::write(&spec.args[pos + 1], b"\x7fELF").map_err(Error::Io)?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Plugin source tree with a manifest, a docs directory and some extras
fn plugin_source(root: &Path) -> PathBuf {
    let src = root.join("src/auth");
    std::fs::create_dir_all(src.join("docs")).unwrap();
    std::fs::create_dir_all(src.join("templates")).unwrap();
    std::fs::write(src.join("main.go"), "package main").unwrap();
    std::fs::write(src.join("manifest.json"), r#"{"id":"auth"}"#).unwrap();
    std::fs::write(src.join("docs/README.md"), "# auth").unwrap();
    std::fs::write(src.join("templates/login.html"), "<form>").unwrap();
    src
}

fn publisher(runner: &Arc<RecordingRunner>) -> Publisher {
    Publisher::new(runner.clone(), Settings::default())
}

#[tokio::test]
async fn test_publish_scenario() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let request = PublishRequest::new("auth", &src, &inst).with_extra_path("templates");
    let report = publisher(&runner).publish(&request).await.unwrap();

    let plugin = inst.join("content/plugins/auth");
    assert_eq!(report.plugin_path, plugin);
    assert_eq!(report.binary_path, plugin.join("auth"));
    assert!(report.is_clean());
    assert!(plugin.join("auth").exists());
    assert_eq!(
        std::fs::read_to_string(plugin.join("manifest.json")).unwrap(),
        r#"{"id":"auth"}"#
    );
    assert!(plugin.join("docs/README.md").exists());
    assert!(plugin.join("templates/login.html").exists());

    let calls = runner.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    let entry = src.join("main.go").to_string_lossy().to_string();
    assert_eq!(calls[0].args, vec!["generate".to_string(), entry.clone()]);
    assert_eq!(
        calls[1].args,
        vec![
            "build".to_string(),
            "-o".to_string(),
            plugin.join("auth").to_string_lossy().to_string(),
            entry
        ]
    );
    assert!(!calls[0].forward_stdout, "stdout is only forwarded when verbose");
}

#[cfg(unix)]
#[tokio::test]
async fn test_binary_marked_executable() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let report = publisher(&runner)
        .publish(&PublishRequest::new("auth", &src, tmp.path().join("inst")))
        .await
        .unwrap();

    let mode = std::fs::metadata(&report.binary_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[tokio::test]
async fn test_empty_name_invokes_nothing() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let err = publisher(&runner)
        .publish(&PublishRequest::new("", &src, &inst))
        .await
        .unwrap_err();

    assert!(err.is_user_facing());
    assert!(runner.steps().is_empty());
    assert!(!inst.exists());
}

#[tokio::test]
async fn test_generate_failure_skips_build_and_copy() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::failing("generate"));

    let err = publisher(&runner)
        .publish(&PublishRequest::new("auth", &src, &inst))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Command { .. }));
    assert_eq!(runner.steps(), vec!["generate"]);
    assert!(!inst.join("content/plugins/auth/manifest.json").exists());
}

#[tokio::test]
async fn test_build_failure_reports_command() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::failing("build"));

    let err = publisher(&runner)
        .publish(&PublishRequest::new("auth", &src, &inst))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("go build -o"));
    assert_eq!(runner.steps(), vec!["generate", "build"]);
    assert!(!inst.join("content/plugins/auth/manifest.json").exists());
}

#[tokio::test]
async fn test_permission_failure_still_copies() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    // Build "succeeds" without producing a binary, so chmod fails
    let runner = Arc::new(RecordingRunner::default());

    let report = publisher(&runner)
        .publish(&PublishRequest::new("auth", &src, &inst))
        .await
        .unwrap();

    assert!(report.permission_error.is_some());
    assert!(!report.is_clean());
    assert!(inst.join("content/plugins/auth/manifest.json").exists());
    assert_eq!(report.copied.len(), 2);
}

#[tokio::test]
async fn test_missing_extra_aborts_remaining_copies() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let request = PublishRequest::new("auth", &src, &inst)
        .with_extra_path("missing.css")
        .with_extra_path("templates");
    let err = publisher(&runner).publish(&request).await.unwrap_err();

    match err {
        Error::Copy { path, .. } => assert_eq!(path, src.join("missing.css")),
        other => panic!("Expected copy error, got {:?}", other),
    }
    let plugin = inst.join("content/plugins/auth");
    assert!(plugin.join("manifest.json").exists());
    assert!(!plugin.join("templates").exists());
}

#[tokio::test]
async fn test_missing_well_known_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("bare");
    std::fs::create_dir_all(&src).unwrap();
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let report = publisher(&runner)
        .publish(&PublishRequest::new("bare", &src, tmp.path().join("inst")))
        .await
        .unwrap();

    assert!(report.copied.is_empty());
    assert_eq!(report.skipped, vec![src.join("manifest.json"), src.join("docs")]);
}

#[tokio::test]
async fn test_hard_replace_removes_stale_content() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let stale = inst.join("content/plugins/auth/docs/old.md");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old").unwrap();
    let runner = Arc::new(RecordingRunner::producing_binaries());
    let publisher = publisher(&runner);

    publisher
        .publish(&PublishRequest::new("auth", &src, &inst))
        .await
        .unwrap();
    assert!(stale.exists(), "merge copy keeps unrelated files");

    publisher
        .publish(&PublishRequest::new("auth", &src, &inst).with_hard(true))
        .await
        .unwrap();
    assert!(!stale.exists());
    assert!(inst.join("content/plugins/auth/docs/README.md").exists());
}

#[tokio::test]
async fn test_hard_copy_of_source_root_keeps_binary() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let request = PublishRequest::new("auth", &src, &inst)
        .with_extra_path(".")
        .with_hard(true);
    let err = publisher(&runner).publish(&request).await.unwrap_err();

    assert!(matches!(err, Error::Copy { .. }));
    assert!(err.to_string().contains("whole plugin directory"));
    assert!(inst.join("content/plugins/auth/auth").exists());
}

#[tokio::test]
async fn test_plugin_dir_creation_failure_is_not_a_build_error() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    // Destination is a regular file, so the plugin directory cannot exist
    let inst = tmp.path().join("inst");
    std::fs::write(&inst, "not a directory").unwrap();
    let runner = Arc::new(RecordingRunner::producing_binaries());

    let err = publisher(&runner)
        .publish(&PublishRequest::new("auth", &src, &inst))
        .await
        .unwrap_err();

    match err {
        Error::Copy { path, message } => {
            assert_eq!(path, inst.join("content/plugins/auth"));
            assert!(message.contains("cannot create plugin directory"));
        }
        other => panic!("Expected copy error, got {:?}", other),
    }
    assert_eq!(runner.steps(), vec!["generate"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_well_known_entry_is_a_copy_error() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    std::fs::write(src.join("notes.txt"), "plain file").unwrap();
    let runner = Arc::new(RecordingRunner::producing_binaries());
    let settings = Settings {
        layout: LayoutConfig {
            // Stat fails with ENOTDIR rather than reporting "missing"
            manifest_file: "notes.txt/manifest.json".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = Publisher::new(runner.clone(), settings)
        .publish(&PublishRequest::new("auth", &src, tmp.path().join("inst")))
        .await
        .unwrap_err();

    match err {
        Error::Copy { path, .. } => assert_eq!(path, src.join("notes.txt/manifest.json")),
        other => panic!("Expected copy error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_republish_overwrites_previous_artifacts() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::producing_binaries());
    let publisher = publisher(&runner);
    let request = PublishRequest::new("auth", &src, &inst);

    publisher.publish(&request).await.unwrap();
    std::fs::write(src.join("manifest.json"), r#"{"id":"auth","v":2}"#).unwrap();
    publisher.publish(&request).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(inst.join("content/plugins/auth/manifest.json")).unwrap(),
        r#"{"id":"auth","v":2}"#
    );
    assert_eq!(runner.steps().len(), 4);
}

#[tokio::test]
async fn test_watch_republishes_on_change() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::producing_binaries());
    let publisher = Arc::new(publisher(&runner));
    let request = PublishRequest::new("auth", &src, &inst).with_watch(true);

    let (stop_tx, stop_rx) = oneshot::channel();
    let watching = {
        let publisher = Arc::clone(&publisher);
        tokio::spawn(async move { watch(&publisher, &request, stop_rx).await })
    };

    // Initial publish
    wait_for_generate_calls(&runner, 1).await;

    std::fs::write(src.join("main.go"), "package main // edited").unwrap();
    wait_for_generate_calls(&runner, 2).await;

    stop_tx.send(()).unwrap();
    let runs = watching.await.unwrap().unwrap();
    assert!(runs >= 2);
    assert!(inst.join("content/plugins/auth/manifest.json").exists());
}

#[tokio::test]
async fn test_watch_republishes_edit_made_during_build() {
    let tmp = TempDir::new().unwrap();
    let src = plugin_source(tmp.path());
    let inst = tmp.path().join("inst");
    let runner = Arc::new(RecordingRunner::slow_build(Duration::from_millis(1500)));
    let publisher = Arc::new(publisher(&runner));
    let request = PublishRequest::new("auth", &src, &inst).with_watch(true);

    let (stop_tx, stop_rx) = oneshot::channel();
    let watching = {
        let publisher = Arc::clone(&publisher);
        tokio::spawn(async move { watch(&publisher, &request, stop_rx).await })
    };

    wait_for_generate_calls(&runner, 1).await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    std::fs::write(src.join("main.go"), "package main // saved mid-build").unwrap();

    wait_for_generate_calls(&runner, 2).await;
    stop_tx.send(()).unwrap();
    let runs = watching.await.unwrap().unwrap();
    assert!(runs >= 2);
}

#[tokio::test]
async fn test_watch_rejects_invalid_request() {
    let runner = Arc::new(RecordingRunner::default());
    let (_stop_tx, stop_rx) = oneshot::channel();

    let err = watch(
        &publisher(&runner),
        &PublishRequest::new("auth", "", "/inst"),
        stop_rx,
    )
    .await
    .unwrap_err();

    assert!(err.is_user_facing());
    assert!(runner.steps().is_empty());
}

async fn wait_for_generate_calls(runner: &RecordingRunner, count: usize) {
    for _ in 0..200 {
        let generated = runner.steps().iter().filter(|s| *s == "generate").count();
        if generated >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("expected {} generate calls, saw {:?}", count, runner.steps());
}
