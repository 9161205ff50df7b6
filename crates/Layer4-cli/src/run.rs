//! `plugsmith run` - launch the host platform for local testing

use crate::ctrl_c_stop;
use plugsmith_foundation::Settings;
use plugsmith_task::{run_host, HostMode, OutputSink};
use std::path::PathBuf;
use tracing::error;

pub async fn run(dir: PathBuf, dev: bool, settings: Settings) -> anyhow::Result<()> {
    let mode = if dev {
        HostMode::BuildAndRun
    } else {
        HostMode::Precompiled
    };

    let result = run_host(
        dir,
        mode,
        &settings.toolchain,
        OutputSink::Stdout,
        ctrl_c_stop(),
    )
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
