//! Error type shared by parsing, decoding, file I/O and renderer invocation.

use std::borrow::Cow;
use std::process::ExitStatus;
use std::string::FromUtf8Error;
use std::time::Duration;
use thiserror::Error;

/// Boxed error raised by caller-supplied output consumers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by this crate. Graph construction itself never fails.
#[derive(Error, Debug)]
pub enum DotError {
  /// Text is not DOT this parser accepts.
  #[error("malformed DOT at line {line}, column {column}: {message}")]
  MalformedInput {
    message: String,
    line: usize,
    column: usize,
  },

  /// Bytes are not valid UTF-8.
  #[error("not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
  NotValidTextEncoding {
    valid_up_to: usize,
    #[source]
    source: std::str::Utf8Error,
  },

  /// The command could not be spawned at all.
  #[error("could not start `{command}` with args {args:?}: {source} (is it installed and on PATH?)")]
  ExternalToolUnavailable {
    command: String,
    args: Vec<String>,
    #[source]
    source: std::io::Error,
  },

  /// The command ran and exited with a failure status.
  ///
  /// `stderr` holds the captured text, or the raw bytes (via
  /// [`FromUtf8Error::into_bytes`]) when the tool did not write UTF-8.
  #[error("`{command}` with args {args:?} failed ({status}): {}", stderr_text(.stderr))]
  ExternalToolError {
    command: String,
    args: Vec<String>,
    status: ExitStatus,
    stderr: Result<String, FromUtf8Error>,
  },

  /// Reading or writing a pipe, or waiting for the process, failed.
  #[error("i/o with `{command}` with args {args:?} failed: {source}")]
  ExternalToolIo {
    command: String,
    args: Vec<String>,
    #[source]
    source: std::io::Error,
  },

  /// The caller's stdout handler failed; the process was still drained and reaped.
  #[error("output handler for `{command}` with args {args:?} failed: {source}")]
  OutputConsumerError {
    command: String,
    args: Vec<String>,
    #[source]
    source: BoxError,
  },

  /// The command did not exit within the configured timeout and was killed.
  #[error("`{command}` with args {args:?} did not finish within {timeout:?}")]
  Timeout {
    command: String,
    args: Vec<String>,
    timeout: Duration,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn stderr_text(stderr: &Result<String, FromUtf8Error>) -> Cow<'_, str> {
  match stderr {
    Ok(text) => Cow::Borrowed(text),
    Err(e) => Cow::Owned(format!(
      "<{} bytes of non-UTF-8 stderr, invalid at offset {}>",
      e.as_bytes().len(),
      e.utf8_error().valid_up_to()
    )),
  }
}
