//! Plugsmith CLI - Main entry point

mod plugin;
mod run;

use clap::{Parser, Subcommand};
use plugsmith_foundation::Settings;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Plugsmith - build plugins and sync them into a host installation
#[derive(Parser, Debug)]
#[command(name = "plugsmith")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Forward toolchain stdout and enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a plugin and copy it into an installation
    Plugin {
        /// Plugin source directory
        source: Option<PathBuf>,

        /// Installation root to publish into
        dest: Option<PathBuf>,

        /// Plugin name (also the default binary name)
        #[arg(short, long, default_value = "")]
        name: String,

        /// Delete existing files at each destination before copying
        #[arg(short, long)]
        delete: bool,

        /// Republish whenever the source directory changes
        #[arg(short, long)]
        watch: bool,

        /// Entry point file, relative to the source directory
        #[arg(short, long, default_value = plugsmith_core::DEFAULT_ENTRY_POINT)]
        entry: String,

        /// Binary file name (defaults to the plugin name)
        #[arg(short, long)]
        binary: Option<String>,

        /// Additional file or directory to copy (repeatable)
        #[arg(short, long = "copy")]
        copy: Vec<PathBuf>,
    },
    /// Launch the host platform in a directory until Ctrl+C
    Run {
        /// Host working directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Build and run from source instead of the precompiled binary
        #[arg(long)]
        dev: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let Some(settings) = usable_settings(Settings::load()) else {
        return Ok(());
    };

    match args.command {
        Command::Plugin {
            source,
            dest,
            name,
            delete,
            watch,
            entry,
            binary,
            copy,
        } => {
            let opts = plugin::PluginArgs {
                source: source.unwrap_or_default(),
                dest: dest.unwrap_or_default(),
                name,
                delete,
                watch,
                entry,
                binary,
                copy,
            };
            plugin::run(opts, settings, args.verbose).await
        }
        Command::Run { dir, dev } => run::run(dir, dev, settings).await,
    }
}

/// Report a settings error instead of falling back to the default layout
fn usable_settings(loaded: plugsmith_foundation::Result<Settings>) -> Option<Settings> {
    match loaded {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", e);
            None
        }
    }
}

/// One-shot stop signal fired by the first Ctrl+C
pub(crate) fn ctrl_c_stop() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => {
                // Keep the sender alive so the receiver does not fire early
                tracing::warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
                drop(tx);
            }
        }
    });
    rx
}
