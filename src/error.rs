//! Error taxonomy for configuration, discovery and tool dispatch.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolingError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Project root does not exist or is not a directory: {0}")]
    MissingProjectRoot(PathBuf),

    #[error("Failed to walk {root}")]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("{path} is not under project root {root}")]
    OutsideProjectRoot { path: PathBuf, root: PathBuf },

    #[error("Failed to run {tool}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {code}")]
    ToolFailed { tool: String, code: i32 },
}

impl ToolingError {
    /// Process exit code to surface for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolingError::ToolFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_project_root() {
        let err = ToolingError::MissingProjectRoot(PathBuf::from("/repo/app"));
        assert_eq!(
            err.to_string(),
            "Project root does not exist or is not a directory: /repo/app"
        );
    }

    #[test]
    fn test_error_display_outside_project_root() {
        let err = ToolingError::OutsideProjectRoot {
            path: PathBuf::from("/elsewhere/a.cpp"),
            root: PathBuf::from("/repo/app"),
        };
        assert_eq!(
            err.to_string(),
            "/elsewhere/a.cpp is not under project root /repo/app"
        );
    }

    #[test]
    fn test_tool_failed_exit_code_is_forwarded() {
        let err = ToolingError::ToolFailed {
            tool: "clang-tidy".to_string(),
            code: 3,
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "clang-tidy exited with status 3");
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let err = ToolingError::InvalidConfig("no projects".to_string());
        assert_eq!(err.exit_code(), 1);
    }
}
