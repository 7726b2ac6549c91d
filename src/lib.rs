//! cxx-tooling - source discovery and dispatch for C/C++ formatters and linters
//!
//! Walks the project roots listed in `tooling.toml`, picks up C/C++ sources,
//! headers and CMake files by name, applies per-tool ignore rules, and hands
//! what is left to `clang-format`, `cmake-format` or `clang-tidy`.
//!
//! ## Flow
//!
//! 1. [`settings`] loads an immutable configuration value
//! 2. [`scanner`] enumerates candidate files under every project root
//! 3. [`exclusions`] partitions candidates into accepted and ignored per tool
//! 4. [`report`] prints counts and the ignored paths
//! 5. [`dispatch`] runs the external tools, stopping at the first failure

pub mod dispatch;
pub mod error;
pub mod exclusions;
pub mod patterns;
pub mod report;
pub mod scanner;
pub mod settings;
pub mod workflow;

// Re-export commonly used items
pub use dispatch::{CommandRunner, Dispatcher, DryRunner, Invocation, ProcessRunner};
pub use error::{Result, ToolingError};
pub use exclusions::{Classification, IgnoreKind, IgnorePolicy, IgnoreReason, IgnoreSet, Verdict};
pub use patterns::{FileKind, FilePatterns};
pub use report::Report;
pub use scanner::{Candidate, Scanner};
pub use settings::{DispatchMode, Settings, Tool};
pub use workflow::{execute, plan, Operation, ToolRun};
