//! `plugsmith plugin` - build a plugin and publish it into an installation

use crate::ctrl_c_stop;
use plugsmith_core::{watch, PublishReport, PublishRequest, Publisher};
use plugsmith_foundation::Settings;
use plugsmith_task::LocalRunner;
use std::path::PathBuf;
use std::sync::Arc;

/// Parsed `plugin` subcommand arguments
#[derive(Debug, Clone, Default)]
pub struct PluginArgs {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub name: String,
    pub delete: bool,
    pub watch: bool,
    pub entry: String,
    pub binary: Option<String>,
    pub copy: Vec<PathBuf>,
}

impl PluginArgs {
    fn into_request(self) -> PublishRequest {
        let mut request = PublishRequest::new(self.name, self.source, self.dest)
            .with_entry_point(self.entry)
            .with_extra_paths(self.copy)
            .with_hard(self.delete)
            .with_watch(self.watch);
        if let Some(binary) = self.binary {
            request = request.with_binary_name(binary);
        }
        request
    }
}

pub async fn run(args: PluginArgs, settings: Settings, verbose: bool) -> anyhow::Result<()> {
    let request = args.into_request();

    // Usage problems are reported, not treated as failures
    if let Err(e) = request.validate() {
        println!("{}", e);
        return Ok(());
    }

    let publisher = Publisher::new(Arc::new(LocalRunner::new()), settings).with_verbose(verbose);

    if request.watch {
        println!(
            "Watching {} (Ctrl+C to stop)",
            request.source_dir.display()
        );
        let runs = watch(&publisher, &request, ctrl_c_stop()).await?;
        println!("Stopped watching after {} publish runs.", runs);
        return Ok(());
    }

    match publisher.publish(&request).await {
        Ok(report) => print_report(&request, &report),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn print_report(request: &PublishRequest, report: &PublishReport) {
    if let Some(e) = &report.permission_error {
        println!("{}", e);
    }
    println!(
        "Published {} to {}",
        request.plugin_name,
        report.plugin_path.display()
    );
    for entry in &report.copied {
        println!("  {} -> {}", entry.source.display(), entry.dest.display());
    }
}
