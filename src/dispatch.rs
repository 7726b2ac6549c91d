//! External tool invocation.

use crate::error::{Result, ToolingError};
use crate::settings::{DispatchMode, Tool};

use std::ffi::OsString;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// One command line: `<program> <args...> <files...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Split `files` into command lines according to the tool's dispatch mode
    pub fn plan(tool: &Tool, files: &[PathBuf]) -> Vec<Invocation> {
        let chunk_size = match tool.mode {
            DispatchMode::PerFile => 1,
            DispatchMode::Batch(size) => size.max(1),
        };

        files
            .chunks(chunk_size)
            .map(|chunk| Invocation {
                program: tool.name.clone(),
                args: tool
                    .args
                    .iter()
                    .map(OsString::from)
                    .chain(chunk.iter().map(|f| f.as_os_str().to_os_string()))
                    .collect(),
            })
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&shell_words::quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_words::quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Runs a command to completion.
///
/// Returns the exit code, or `None` when the process was killed by a signal.
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Option<i32>>;
}

/// Spawns the real executable, inheriting stdio
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Option<i32>> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()?;
        Ok(status.code())
    }
}

/// Prints what would run instead of running it
pub struct DryRunner<W: Write> {
    out: W,
}

impl<W: Write> DryRunner<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CommandRunner for DryRunner<W> {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<Option<i32>> {
        writeln!(self.out, "Would run: {}", invocation)?;
        Ok(Some(0))
    }
}

/// Sends accepted files to their tools, stopping at the first failure
pub struct Dispatcher<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> Dispatcher<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Run `tool` over `files`; returns the number of invocations made.
    ///
    /// An empty file list runs nothing. A non-zero exit aborts immediately
    /// with [`ToolingError::ToolFailed`]; it is not retried.
    pub fn dispatch(&mut self, tool: &Tool, files: &[PathBuf]) -> Result<usize> {
        let invocations = Invocation::plan(tool, files);

        for invocation in &invocations {
            debug!(command = %invocation, "running");

            let code = self
                .runner
                .run(invocation)
                .map_err(|source| ToolingError::Spawn {
                    tool: tool.name.clone(),
                    source,
                })?;

            match code {
                Some(0) => {}
                Some(code) => {
                    return Err(ToolingError::ToolFailed {
                        tool: tool.name.clone(),
                        code,
                    })
                }
                None => {
                    return Err(ToolingError::ToolFailed {
                        tool: tool.name.clone(),
                        code: 1,
                    })
                }
            }
        }

        Ok(invocations.len())
    }
}
