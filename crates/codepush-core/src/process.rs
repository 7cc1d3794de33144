//! External process execution
//!
//! Native build tools run through a blocking "run and capture" call, the React
//! Native bundler through an awaited spawn whose output is streamed line by
//! line. Both sit behind [`ProcessRunner`] so the pipeline can be exercised
//! without launching anything.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use console::Term;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

/// A program, its arguments and the directory to run it in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Space-joined command line, for logs and messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a synchronous run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launches external programs on behalf of the release pipeline
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion, capturing output
    fn run_sync(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;

    /// Spawn and await the child, streaming its output.
    ///
    /// Returns the exit code, or `None` when the child was terminated by a
    /// signal.
    async fn spawn(&self, invocation: &Invocation) -> io::Result<Option<i32>>;

    /// Whether a program can be found on `PATH`
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Runs programs on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    fn run_sync(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        debug!(command = %invocation.command_line(), "running");
        let output = std::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn spawn(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
        debug!(command = %invocation.command_line(), "spawning");
        let mut child = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout_task = child.stdout.take().map(|out| tokio::spawn(forward_lines(out)));
        let stderr_task = child.stderr.take().map(|err| tokio::spawn(forward_lines(err)));

        let status = child.wait().await?;

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            if let Err(e) = task.await {
                warn!(error = %e, "output forwarding task failed");
            }
        }

        Ok(status.code())
    }
}

/// Echo child output to our stderr so stdout stays reserved for results
async fn forward_lines<R>(reader: R)
where
    R: AsyncRead + Unpin,
{
    let term = Term::stderr();
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let _ = term.write_line(&line);
    }
}
