// src/exec/process.rs

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::output::{LineSplitter, StreamKind, format_block};

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the child; `None` inherits ours.
    pub cwd: Option<PathBuf>,
}

impl ProcessSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the child was terminated by a signal.
    pub code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Whether captured output is echoed to our own stdout/stderr as it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Stream,
    Silent,
}

/// Spawn `spec`, drain both pipes concurrently and wait for the exit status.
///
/// A non-zero exit is *not* an error here; callers decide what it means.
/// Errors are reserved for failing to spawn or wait on the child.
pub async fn run_process(spec: &ProcessSpec, mode: OutputMode) -> Result<ProcessOutput> {
    info!(command = %spec, cwd = ?spec.cwd, "starting process");

    // `npm` and friends are batch shims on Windows and need the shell.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&spec.program).args(&spec.args);
        c
    } else {
        let mut c = Command::new(&spec.program);
        c.args(&spec.args);
        c
    };

    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{spec}`"))?;

    let echo = mode == OutputMode::Stream;
    let stdout_task = child
        .stdout
        .take()
        .map(|pipe| tokio::spawn(pump(pipe, StreamKind::Stdout, echo)));
    let stderr_task = child
        .stderr
        .take()
        .map(|pipe| tokio::spawn(pump(pipe, StreamKind::Stderr, echo)));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{spec}`"))?;

    let stdout = match stdout_task {
        Some(handle) => handle.await.context("joining stdout reader")?,
        None => Vec::new(),
    };
    let stderr = match stderr_task {
        Some(handle) => handle.await.context("joining stderr reader")?,
        None => Vec::new(),
    };

    let code = status.code().unwrap_or(-1);
    info!(command = %spec, exit_code = code, success = status.success(), "process exited");

    Ok(ProcessOutput {
        code,
        stdout,
        stderr,
    })
}

/// Read a pipe to EOF, returning its lines and optionally echoing each chunk.
async fn pump<R>(mut pipe: R, kind: StreamKind, echo: bool) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut splitter = LineSplitter::new();
    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(stream = kind.label(), error = %e, "pipe read failed; stopping");
                break;
            }
        };
        let lines = splitter.push(&buf[..n]);
        emit(kind, &lines, echo);
        captured.extend(lines);
    }

    if let Some(tail) = splitter.finish() {
        let lines = vec![tail];
        emit(kind, &lines, echo);
        captured.extend(lines);
    }

    captured
}

fn emit(kind: StreamKind, lines: &[String], echo: bool) {
    if lines.is_empty() {
        return;
    }
    if !echo {
        for line in lines {
            debug!(stream = kind.label(), "{line}");
        }
        return;
    }
    match kind {
        StreamKind::Stdout => println!("{}", format_block(kind, lines)),
        StreamKind::Stderr => eprintln!("{}", format_block(kind, lines)),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_both_streams_and_exit_code() {
        let spec = ProcessSpec::new("sh", ["-c", "printf 'a\\nb'; printf 'oops\\r\\n' >&2; exit 3"]);
        let out = run_process(&spec, OutputMode::Silent).await.unwrap();

        assert_eq!(out.code, 3);
        assert!(!out.success());
        assert_eq!(out.stdout, vec!["a", "b"]);
        assert_eq!(out.stderr, vec!["oops"]);
    }

    #[tokio::test]
    async fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        let spec = ProcessSpec::new("pwd", Vec::<String>::new()).in_dir(&expected);

        let out = run_process(&spec, OutputMode::Silent).await.unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, vec![expected.display().to_string()]);
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let spec = ProcessSpec::new("taskwire-no-such-binary", Vec::<String>::new());
        assert!(run_process(&spec, OutputMode::Silent).await.is_err());
    }

    #[test]
    fn display_joins_program_and_args() {
        let spec = ProcessSpec::new("npm", ["publish", "--access", "public"]);
        assert_eq!(spec.to_string(), "npm publish --access public");
    }
}
