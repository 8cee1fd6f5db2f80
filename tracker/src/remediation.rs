use crate::errors::{Result, TrackerError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Brings an unavailable tracking service online.
///
/// Called at most once per run. Implementations block until the action
/// finishes and report a non-zero exit as [`TrackerError::RemediationFailed`].
#[async_trait]
pub trait Remediation: Send + Sync {
    async fn start(&self) -> Result<()>;
}

/// Runs an external command, `docker compose up -d` by default.
#[derive(Clone, Debug)]
pub struct CommandRemediation {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandRemediation {
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: Option<PathBuf>) -> Self {
        CommandRemediation {
            program: program.into(),
            args,
            working_dir,
        }
    }

    pub fn docker_compose(working_dir: Option<PathBuf>) -> Self {
        Self::new(
            "docker",
            vec!["compose".into(), "up".into(), "-d".into()],
            working_dir,
        )
    }
}

#[async_trait]
impl Remediation for CommandRemediation {
    async fn start(&self) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::info!(program = %self.program, args = ?self.args, dir = ?self.working_dir, "Running remediation");

        let output = command
            .output()
            .await
            .map_err(|e| TrackerError::RemediationFailed {
                code: None,
                stderr: format!("could not run {}: {e}", self.program),
            })?;

        if !output.status.success() {
            return Err(TrackerError::RemediationFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
