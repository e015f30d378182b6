//! Runs an external renderer over a serialized graph.
//!
//! One invocation owns the child process and its three pipes. The stderr drain and the
//! stdout consumer are polled before the stdin writer starts, all three progress
//! concurrently, and the result is produced only after every pipe is drained and the
//! child has been reaped. A renderer that fills one pipe before reading its input can
//! therefore never block the writer.

use crate::dot_writer::ToDot;
use crate::error::{BoxError, DotError};
use crate::text_codec::decode_text_owned;
use crate::types::{DotGraph, NodeLabel};
use async_trait::async_trait;
use bytes::Bytes;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStderr, ChildStdin, ChildStdout, Command};
use tracing::instrument;

/// Handles the renderer's stdout.
///
/// The consumer may stop reading early or fail; whatever it leaves unread is drained
/// before the invocation completes.
#[async_trait]
pub trait OutputConsumer: Send {
  type Output: Send;

  async fn consume(
    self,
    stdout: &mut (dyn AsyncRead + Send + Unpin),
  ) -> Result<Self::Output, BoxError>;
}

/// Collects stdout into memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectBytes;

#[async_trait]
impl OutputConsumer for CollectBytes {
  type Output = Bytes;

  async fn consume(self, stdout: &mut (dyn AsyncRead + Send + Unpin)) -> Result<Bytes, BoxError> {
    let mut buf = Vec::new();
    stdout.read_to_end(&mut buf).await?;
    Ok(Bytes::from(buf))
  }
}

/// Streams stdout into a file, returning the number of bytes written.
#[derive(Debug, Clone)]
pub struct WriteToFile(pub PathBuf);

#[async_trait]
impl OutputConsumer for WriteToFile {
  type Output = u64;

  async fn consume(self, stdout: &mut (dyn AsyncRead + Send + Unpin)) -> Result<u64, BoxError> {
    let mut file = tokio::fs::File::create(&self.0).await?;
    let written = tokio::io::copy(stdout, &mut file).await?;
    file.flush().await?;
    Ok(written)
  }
}

/// Reads and drops stdout, returning the number of bytes seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

#[async_trait]
impl OutputConsumer for Discard {
  type Output = u64;

  async fn consume(self, stdout: &mut (dyn AsyncRead + Send + Unpin)) -> Result<u64, BoxError> {
    Ok(tokio::io::copy(stdout, &mut tokio::io::sink()).await?)
  }
}

/// Per-invocation settings.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
  /// Kill the renderer if it has not exited after this long. `None` waits forever.
  pub timeout: Option<Duration>,
}

impl InvokeOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }
}

/// Runs `command args`, feeding it the compact DOT form of `graph` on stdin and handing
/// its stdout to `consumer`.
///
/// Fails with [`DotError::ExternalToolUnavailable`] if the command cannot be spawned,
/// [`DotError::ExternalToolError`] (with the captured stderr) if it exits unsuccessfully,
/// [`DotError::OutputConsumerError`] if `consumer` fails, [`DotError::ExternalToolIo`]
/// if a pipe or the wait fails, and [`DotError::Timeout`] if `options.timeout` elapses.
pub async fn invoke<N, A, C>(
  command: &str,
  args: &[A],
  graph: &DotGraph<N>,
  consumer: C,
  options: &InvokeOptions,
) -> Result<C::Output, DotError>
where
  N: NodeLabel,
  A: AsRef<str>,
  C: OutputConsumer,
{
  let input = graph.to_compact_dot().into_bytes();
  invoke_bytes(command, args, input, consumer, options).await
}

/// Like [`invoke`] but returns stdout decoded as UTF-8.
pub async fn invoke_text<N, A>(
  command: &str,
  args: &[A],
  graph: &DotGraph<N>,
  options: &InvokeOptions,
) -> Result<String, DotError>
where
  N: NodeLabel,
  A: AsRef<str>,
{
  let bytes = invoke(command, args, graph, CollectBytes, options).await?;
  decode_text_owned(bytes.to_vec())
}

/// Like [`invoke`] with stdout streamed to `path`, returning the number of bytes written.
///
/// Output goes to a hidden sibling file that replaces `path` only once the renderer has
/// succeeded, so a failed or timed-out run never leaves a partial file at `path`.
pub async fn invoke_to_file<N, A>(
  command: &str,
  args: &[A],
  graph: &DotGraph<N>,
  path: &Path,
  options: &InvokeOptions,
) -> Result<u64, DotError>
where
  N: NodeLabel,
  A: AsRef<str>,
{
  let staging = staging_path(path)?;
  let result = match invoke(command, args, graph, WriteToFile(staging.clone()), options).await {
    Ok(written) => tokio::fs::rename(&staging, path)
      .await
      .map(|_| written)
      .map_err(DotError::from),
    Err(e) => Err(e),
  };
  if result.is_err()
    && let Err(e) = tokio::fs::remove_file(&staging).await
    && e.kind() != io::ErrorKind::NotFound
  {
    tracing::debug!(path = %staging.display(), error = %e, "could not remove partial output");
  }
  result
}

/// `dir/.name.partial` for `dir/name`.
fn staging_path(path: &Path) -> Result<PathBuf, DotError> {
  let Some(name) = path.file_name() else {
    return Err(DotError::Io(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("output path {} has no file name", path.display()),
    )));
  };
  let mut staged = OsString::from(".");
  staged.push(name);
  staged.push(".partial");
  Ok(path.with_file_name(staged))
}

/// Everything the three pipe tasks produced. `stderr` keeps whatever was read
/// before `stderr_read` failed.
pub(crate) struct SessionOutcome<T> {
  pub(crate) consumed: Result<T, BoxError>,
  pub(crate) drained: io::Result<u64>,
  pub(crate) stderr: Vec<u8>,
  pub(crate) stderr_read: io::Result<()>,
  pub(crate) written: io::Result<()>,
}

/// Runs `command args` with `input` as its whole stdin. See [`invoke`].
#[instrument(level = "debug", skip_all, fields(command = %command))]
pub async fn invoke_bytes<A, C>(
  command: &str,
  args: &[A],
  input: Vec<u8>,
  consumer: C,
  options: &InvokeOptions,
) -> Result<C::Output, DotError>
where
  A: AsRef<str>,
  C: OutputConsumer,
{
  let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();

  let mut child = match Command::new(command)
    .args(&args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
  {
    Ok(child) => child,
    Err(source) => {
      tracing::warn!(command, ?args, error = %source, "could not spawn renderer");
      return Err(DotError::ExternalToolUnavailable {
        command: command.to_string(),
        args,
        source,
      });
    }
  };

  let (Some(stdin), Some(stdout), Some(stderr)) =
    (child.stdin.take(), child.stdout.take(), child.stderr.take())
  else {
    let _ = child.kill().await;
    return Err(DotError::ExternalToolIo {
      command: command.to_string(),
      args,
      source: io::Error::other("renderer pipes were not captured"),
    });
  };
  tracing::debug!(command, pid = ?child.id(), input_bytes = input.len(), "renderer started");

  let run = async {
    let outcome = run_session(stdin, stdout, stderr, input, consumer).await;
    let status = child.wait().await;
    (outcome, status)
  };
  let (outcome, status) = match options.timeout {
    None => run.await,
    Some(limit) => {
      let bounded = tokio::time::timeout(limit, run).await;
      let Ok(finished) = bounded else {
        tracing::warn!(command, ?limit, "renderer timed out; killing it");
        if let Err(e) = child.kill().await {
          tracing::debug!(error = %e, "kill after timeout failed");
        }
        return Err(DotError::Timeout {
          command: command.to_string(),
          args,
          timeout: limit,
        });
      };
      finished
    }
  };

  let status = match status {
    Ok(status) => status,
    Err(source) => {
      return Err(DotError::ExternalToolIo {
        command: command.to_string(),
        args,
        source,
      });
    }
  };
  finish(command, args, outcome, status)
}

/// Drains stderr, runs the stdout consumer, and writes stdin, in that poll order.
async fn run_session<C: OutputConsumer>(
  mut stdin: ChildStdin,
  mut stdout: ChildStdout,
  mut stderr: ChildStderr,
  input: Vec<u8>,
  consumer: C,
) -> SessionOutcome<C::Output> {
  let errors = async move {
    let mut buf = Vec::new();
    let read = stderr.read_to_end(&mut buf).await.map(|_| ());
    (buf, read)
  };
  let output = async move {
    let consumed = consumer.consume(&mut stdout).await;
    let drained = tokio::io::copy(&mut stdout, &mut tokio::io::sink()).await;
    (consumed, drained)
  };
  let writer = async move {
    let written = stdin.write_all(&input).await;
    // The renderer reads until end of input; dropping the handle closes the pipe.
    drop(stdin);
    written
  };
  let ((stderr, stderr_read), (consumed, drained), written) = tokio::join!(errors, output, writer);
  SessionOutcome {
    consumed,
    drained,
    stderr,
    stderr_read,
    written,
  }
}

/// Maps a finished session to its result: exit failure first, then consumer
/// failure, then pipe faults.
pub(crate) fn finish<T>(
  command: &str,
  args: Vec<String>,
  outcome: SessionOutcome<T>,
  status: ExitStatus,
) -> Result<T, DotError> {
  tracing::debug!(command, %status, "renderer exited");
  let tool_io = |args: Vec<String>, source: io::Error| DotError::ExternalToolIo {
    command: command.to_string(),
    args,
    source,
  };
  if !status.success() {
    if let Err(e) = &outcome.stderr_read {
      tracing::debug!(command, error = %e, "stderr read failed; reporting partial text");
    }
    return Err(DotError::ExternalToolError {
      command: command.to_string(),
      args,
      status,
      stderr: String::from_utf8(outcome.stderr),
    });
  }
  let value = match outcome.consumed {
    Ok(value) => value,
    Err(source) => {
      return Err(DotError::OutputConsumerError {
        command: command.to_string(),
        args,
        source,
      });
    }
  };
  if let Err(e) = outcome.stderr_read {
    return Err(tool_io(args, e));
  }
  if !outcome.stderr.is_empty() {
    tracing::debug!(command, stderr = %String::from_utf8_lossy(&outcome.stderr), "renderer wrote to stderr");
  }
  let leftover = match outcome.drained {
    Ok(n) => n,
    Err(e) => return Err(tool_io(args, e)),
  };
  if leftover > 0 {
    tracing::trace!(command, leftover, "drained unread stdout");
  }
  match outcome.written {
    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
      tracing::debug!(command, "renderer closed stdin before reading all input");
    }
    Err(e) => return Err(tool_io(args, e)),
    Ok(()) => {}
  }
  Ok(value)
}
