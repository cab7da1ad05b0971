/*!
 * Ordered execution of media commands.
 *
 * A failing invocation never stops the batch: each outcome is recorded in
 * an `ExecutionReport`, in the same order as the input commands, so the
 * caller can drop or flag the affected cards and print a summary.
 */

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::process::Command;

use super::command::{CommandKind, MediaCommand};
use crate::errors::MediaToolError;

/// Runs a single command to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &MediaCommand) -> Result<(), MediaToolError>;
}

/// Runs commands as child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &MediaCommand) -> Result<(), MediaToolError> {
        debug!("Running: {}", command);

        let child_future = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            result = child_future => {
                result.map_err(|e| MediaToolError::Spawn {
                    program: command.program.clone(),
                    message: e.to_string(),
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(MediaToolError::TimedOut {
                    program: command.program.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaToolError::Failed {
                program: command.program.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: filter_tool_stderr(&stderr),
            });
        }

        Ok(())
    }
}

/// Result of one command
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: MediaCommand,
    pub error: Option<MediaToolError>,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a batch, in input order
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub outcomes: Vec<CommandOutcome>,
}

impl ExecutionReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn failure_count_for(&self, kind: CommandKind) -> usize {
        self.failures().filter(|o| o.command.kind == kind).count()
    }

    /// Human readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} commands: {} succeeded, {} failed ({} audio, {} screenshot, {} normalize)",
            self.total(),
            self.total() - self.failure_count(),
            self.failure_count(),
            self.failure_count_for(CommandKind::Audio),
            self.failure_count_for(CommandKind::Screenshot),
            self.failure_count_for(CommandKind::Normalize),
        )
    }
}

/// Executes command batches through a runner
pub struct BatchExecutor {
    runner: Arc<dyn CommandRunner>,
    jobs: usize,
}

impl BatchExecutor {
    /// `jobs` = 1 runs one command at a time, in order
    pub fn new(runner: Arc<dyn CommandRunner>, jobs: usize) -> Self {
        Self {
            runner,
            jobs: jobs.max(1),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Run every command, reporting progress as `(completed, total)`
    pub async fn execute(
        &self,
        commands: Vec<MediaCommand>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> ExecutionReport {
        let total = commands.len();
        let completed = Arc::new(AtomicUsize::new(0));

        // `buffered` keeps results in input order even when jobs > 1
        let outcomes = stream::iter(commands)
            .map(|command| {
                let runner = Arc::clone(&self.runner);
                let completed = Arc::clone(&completed);
                let progress_callback = progress_callback.clone();

                async move {
                    let error = runner.run(&command).await.err();
                    if let Some(e) = &error {
                        warn!("{} command failed for {:?}: {}", command.kind, command.output, e);
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(done, total);

                    CommandOutcome { command, error }
                }
            })
            .buffered(self.jobs)
            .collect::<Vec<_>>()
            .await;

        ExecutionReport { outcomes }
    }
}

/// Keep only meaningful error lines from a tool's stderr, dropping the
/// ffmpeg banner and stream metadata noise.
pub fn filter_tool_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
