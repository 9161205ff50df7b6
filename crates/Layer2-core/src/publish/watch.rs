//! Watch mode - republish whenever the plugin source changes
//!
//! Every trigger runs the full publish sequence as an independent request.
//! A failed publish is logged and watching continues. Events raised before
//! the generate step finishes are dropped, since generate writes into the
//! source tree and the build that follows compiles whatever is on disk.
//! Relevant events raised after that collapse into a single follow-up publish.

use super::publisher::Publisher;
use super::request::PublishRequest;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use plugsmith_foundation::{Error, Result};
use std::path::Path;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// Whether an event should trigger a republish
///
/// Access events are ignored, as are events that only touch `ignore` (the
/// plugin's own install directory, which may live under the source tree).
pub fn is_relevant(event: &Event, ignore: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    kind_matches && event.paths.iter().any(|p| !p.starts_with(ignore))
}

/// Publish once, then again on every relevant change until `stop` fires
///
/// Returns the number of publish runs attempted.
pub async fn watch(
    publisher: &Publisher,
    request: &PublishRequest,
    mut stop: oneshot::Receiver<()>,
) -> Result<usize> {
    request.validate()?;
    let ignore = publisher.paths(request).plugin_path;

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |event: notify::Result<Event>| match event {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => error!("Watch error: {}", e),
        })
        .map_err(|e| Error::Watch(e.to_string()))?;

    watcher
        .watch(&request.source_dir, RecursiveMode::Recursive)
        .map_err(|e| Error::Watch(format!("{}: {}", request.source_dir.display(), e)))?;

    info!("Watching {} for changes", request.source_dir.display());

    let mut runs = 0;
    let mut pending = true;

    loop {
        if pending {
            match stop.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => break,
            }

            runs += 1;
            let result = publisher.publish_with(request, || drain(&mut rx)).await;
            if let Err(e) = result {
                error!("{}", e);
            }

            pending = take_pending(&mut rx, &ignore);
            if pending {
                debug!("Source changed during publish, publishing again");
            }
            continue;
        }

        tokio::select! {
            _ = &mut stop => break,
            event = rx.recv() => {
                let Some(event) = event else { break };
                if is_relevant(&event, &ignore) {
                    debug!("Change detected: {:?}", event.paths);
                    pending = true;
                }
            }
        }
    }

    info!("Stopped watching {}", request.source_dir.display());
    Ok(runs)
}

/// Drop everything queued so far
fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) {
    let mut dropped = 0;
    while rx.try_recv().is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        debug!("Dropped {} events raised before the build", dropped);
    }
}

/// Consume everything queued so far, reporting whether any of it matters
fn take_pending(rx: &mut mpsc::UnboundedReceiver<Event>, ignore: &Path) -> bool {
    let mut pending = false;
    while let Ok(event) = rx.try_recv() {
        pending |= is_relevant(&event, ignore);
    }
    pending
}
