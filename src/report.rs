//! Accepted/ignored counts per tool.

use crate::exclusions::IgnoreReason;
use crate::workflow::ToolRun;

use colored::Colorize;
use std::io::{self, Write};

/// Summary of one classification pass
pub struct Report<'r, 's> {
    runs: &'r [ToolRun<'s>],
}

impl<'r, 's> Report<'r, 's> {
    pub fn new(runs: &'r [ToolRun<'s>]) -> Self {
        Self { runs }
    }

    pub fn total_accepted(&self) -> usize {
        self.runs.iter().map(|r| r.classification.accepted.len()).sum()
    }

    pub fn total_ignored(&self) -> usize {
        self.runs.iter().map(|r| r.classification.ignored.len()).sum()
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        for run in self.runs {
            let classification = &run.classification;
            writeln!(
                out,
                "{} ({}): {} accepted, {} ignored",
                run.tool.name.bold(),
                run.kind,
                classification.accepted.len(),
                classification.ignored.len()
            )?;

            for ignored in &classification.ignored {
                let why = match &ignored.reason {
                    IgnoreReason::File => "listed file".to_string(),
                    IgnoreReason::Directory(dir) => format!("under {}", dir.display()),
                };
                writeln!(
                    out,
                    "  {} {} ({})",
                    "ignored".yellow(),
                    ignored.path.display(),
                    why
                )?;
            }
        }

        writeln!(out, "========================================")?;
        writeln!(
            out,
            "{}",
            format!(
                "Total: {} accepted, {} ignored",
                self.total_accepted(),
                self.total_ignored()
            )
            .green()
        )?;
        Ok(())
    }

    /// Render to stdout
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render(&mut out)
    }
}
