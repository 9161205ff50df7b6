//! Output forwarding - line readers attached to child process pipes
//!
//! Each reader runs as its own task for the life of the pipe. Lines keep
//! their per-stream order; there is no ordering between streams.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        }
    }
}

/// A single forwarded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub content: String,
}

/// Where forwarded lines go
#[derive(Debug, Clone, Default)]
pub enum OutputSink {
    /// Our own standard output
    #[default]
    Stdout,
    /// A channel, for callers that consume lines themselves
    Channel(mpsc::UnboundedSender<OutputLine>),
}

impl OutputSink {
    /// Create a channel sink and its receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutputLine>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (OutputSink::Channel(tx), rx)
    }

    pub fn emit(&self, line: OutputLine) {
        match self {
            OutputSink::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{}", line.content);
            }
            OutputSink::Channel(tx) => {
                let _ = tx.send(line);
            }
        }
    }
}

/// Spawn a task forwarding every line of `reader` to `sink`
pub fn spawn_forwarder<R>(reader: R, stream: OutputStream, sink: OutputSink) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    // Invalid UTF-8 is replaced, never a reason to stop reading
                    let content = String::from_utf8_lossy(trim_line_end(&buf)).into_owned();
                    sink.emit(OutputLine { stream, content });
                }
                Err(e) => {
                    warn!("{} reader failed: {}", stream.as_str(), e);
                    break;
                }
            }
        }
        debug!("{} reader finished", stream.as_str());
    })
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
