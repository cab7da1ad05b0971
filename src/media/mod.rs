/*!
 * External media tool plumbing.
 *
 * - `command`: structured ffmpeg / mp3gain invocations
 * - `executor`: ordered execution with per-command failure reporting
 */

pub use self::command::{CommandBuilder, CommandKind, MediaCommand};
pub use self::executor::{BatchExecutor, CommandOutcome, CommandRunner, ExecutionReport, ProcessRunner};

pub mod command;
pub mod executor;
