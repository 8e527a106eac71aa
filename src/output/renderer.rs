//! External graph renderer invocation

use std::io::{self, Read};
use std::path::Path;
use std::process::{ChildStderr, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{Result, WalkError};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Bytes of renderer stderr kept for error messages
const STDERR_LIMIT: u64 = 8 * 1024;

/// Read the child's stderr until it closes so a chatty renderer never blocks
/// on a full pipe. Only the first [`STDERR_LIMIT`] bytes are kept.
fn drain_stderr(pipe: ChildStderr) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut pipe = pipe;
        let mut kept = Vec::new();
        let _ = pipe.by_ref().take(STDERR_LIMIT).read_to_end(&mut kept);
        let _ = io::copy(&mut pipe, &mut io::sink());
        String::from_utf8_lossy(&kept).into_owned()
    })
}

/// Turns a DOT file into an image
pub trait Renderer: Send + Sync {
    /// Command name used in log and error messages
    fn name(&self) -> &str;

    /// Render `dot_file` into `image` using the output `format` (svg, png, pdf)
    fn render(&self, dot_file: &Path, image: &Path, format: &str) -> Result<()>;
}

/// Renders through a Graphviz-compatible executable (`dot -T<format> <in> -o <out>`)
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    command: String,
    timeout: Duration,
}

impl GraphvizRenderer {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("dot", Duration::from_secs(60))
    }
}

impl Renderer for GraphvizRenderer {
    fn name(&self) -> &str {
        &self.command
    }

    fn render(&self, dot_file: &Path, image: &Path, format: &str) -> Result<()> {
        debug!(
            "Running {} -T{} {} -o {}",
            self.command,
            format,
            dot_file.display(),
            image.display()
        );

        let mut child = Command::new(&self.command)
            .arg(format!("-T{}", format))
            .arg(dot_file)
            .arg("-o")
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| WalkError::render_error(&self.command, format!("cannot start: {}", err)))?;
        let stderr_reader = child.stderr.take().map(drain_stderr);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                // The reader thread is left to finish on its own: a killed
                // renderer's children may still hold the pipe open
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WalkError::render_error(
                        &self.command,
                        format!("timed out after {:.1?}", self.timeout),
                    ));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    let _ = child.kill();
                    return Err(WalkError::render_error(&self.command, err.to_string()));
                }
            }
        };

        let stderr = stderr_reader
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();
        if status.success() {
            if !stderr.trim().is_empty() {
                debug!("{} reported: {}", self.command, stderr.trim());
            }
            return Ok(());
        }

        if stderr.trim().is_empty() {
            Err(WalkError::render_error(&self.command, format!("exited with {}", status)))
        } else {
            Err(WalkError::render_error(
                &self.command,
                format!("exited with {}: {}", status, stderr.trim()),
            ))
        }
    }
}
