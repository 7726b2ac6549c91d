//! The `format` and `lint` operations: enumerate, classify, then dispatch.
//!
//! Enumeration and classification finish for every tool before the first
//! external command runs, so a bad path aborts the run with nothing touched.

use crate::dispatch::{CommandRunner, Dispatcher};
use crate::error::Result;
use crate::exclusions::{Classification, IgnoreKind};
use crate::patterns::FileKind;
use crate::scanner::{Candidate, Scanner};
use crate::settings::{Settings, Tool};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// clang-format over sources and headers, cmake-format over build files
    Format,
    /// clang-tidy over sources and headers
    Lint,
}

/// One tool with the files classified for it
#[derive(Debug)]
pub struct ToolRun<'s> {
    pub tool: &'s Tool,
    pub kind: IgnoreKind,
    pub classification: Classification,
}

/// Enumerate the project roots and classify the candidates for every tool
/// the operation uses.
pub fn plan(settings: &Settings, operation: Operation) -> Result<Vec<ToolRun<'_>>> {
    let candidates = Scanner::new(&settings.projects, &settings.patterns)
        .with_skip_dir(settings.build_dir.clone())
        .scan_all()?;

    let cxx: Vec<&Candidate> = candidates.iter().filter(|c| c.kind.is_cxx()).collect();

    match operation {
        Operation::Format => {
            info!("Formatting all files");
            let build: Vec<&Candidate> = candidates
                .iter()
                .filter(|c| c.kind == FileKind::BuildDescriptor)
                .collect();
            Ok(vec![
                classify(settings, &settings.formatter, IgnoreKind::Format, cxx)?,
                classify(settings, &settings.build_formatter, IgnoreKind::Format, build)?,
            ])
        }
        Operation::Lint => {
            info!("Statically analyzing all files");
            Ok(vec![classify(
                settings,
                &settings.analyzer,
                IgnoreKind::Analyze,
                cxx,
            )?])
        }
    }
}

fn classify<'s>(
    settings: &'s Settings,
    tool: &'s Tool,
    kind: IgnoreKind,
    candidates: Vec<&Candidate>,
) -> Result<ToolRun<'s>> {
    let classification = settings.ignore.classify(candidates, kind)?;
    for ignored in &classification.ignored {
        warn!(tool = %tool.name, "Ignoring {}", ignored.path.display());
    }
    Ok(ToolRun {
        tool,
        kind,
        classification,
    })
}

/// Dispatch every run in order; returns the total number of invocations.
/// Stops at the first failing tool.
pub fn execute<R: CommandRunner>(
    runs: &[ToolRun<'_>],
    dispatcher: &mut Dispatcher<R>,
) -> Result<usize> {
    let mut invocations = 0;
    for run in runs {
        invocations += dispatcher.dispatch(run.tool, &run.classification.accepted)?;
    }
    Ok(invocations)
}
