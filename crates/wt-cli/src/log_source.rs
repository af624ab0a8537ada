//! Where power log lines come from: the log command's stdout or a saved file.
//!
//! The log is decoded as Latin-1 so arbitrary bytes never abort reading, and
//! the log command is killed and reaped when the source is dropped, however
//! much of its output was consumed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result};

use crate::Config;

/// A running log command whose stdout is read line by line.
#[derive(Debug)]
pub struct LogProcess {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl LogProcess {
    /// Starts `command` (program followed by its arguments).
    pub fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().context("log command is empty")?;
        tracing::debug!(%program, ?args, "starting log command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start {program}"))?;

        let stdout = child
            .stdout
            .take()
            .with_context(|| format!("failed to capture {program} stdout"))?;
        Ok(Self {
            child,
            reader: BufReader::new(stdout),
        })
    }

    pub fn lines(&mut self) -> Latin1Lines<&mut BufReader<ChildStdout>> {
        Latin1Lines::new(&mut self.reader)
    }
}

impl Drop for LogProcess {
    fn drop(&mut self) {
        // The command may already have exited; killing a finished child is harmless.
        if let Err(err) = self.child.kill() {
            tracing::debug!(error = %err, "log command already stopped");
        }
        match self.child.wait() {
            Ok(status) => tracing::debug!(%status, "log command reaped"),
            Err(err) => tracing::warn!(error = %err, "failed to reap log command"),
        }
    }
}

/// Log lines from either the configured command or a file.
#[derive(Debug)]
pub enum LogSource {
    Process(LogProcess),
    File(BufReader<File>),
}

impl LogSource {
    /// Opens `log_file` if given, otherwise starts the configured log command.
    pub fn open(config: &Config, log_file: Option<&Path>) -> Result<Self> {
        match log_file {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Self::File(BufReader::new(file)))
            }
            None => LogProcess::spawn(&config.log_command).map(Self::Process),
        }
    }

    /// Lazily yields decoded lines without their terminators.
    pub fn lines(&mut self) -> Latin1Lines<&mut dyn BufRead> {
        let reader: &mut dyn BufRead = match self {
            Self::Process(process) => &mut process.reader,
            Self::File(file) => file,
        };
        Latin1Lines::new(reader)
    }
}

/// Iterator over Latin-1 decoded lines of a reader.
///
/// A read error is logged and ends the stream.
#[derive(Debug)]
pub struct Latin1Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Latin1Lines<R> {
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for Latin1Lines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut line: &[u8] = &self.buf;
                if let Some(rest) = line.strip_suffix(b"\n") {
                    line = rest;
                }
                if let Some(rest) = line.strip_suffix(b"\r") {
                    line = rest;
                }
                Some(decode_latin1(line))
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read power log");
                None
            }
        }
    }
}

/// Every byte maps to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
