/*!
 * Error types for the subs2cards application.
 *
 * This module contains custom error types for the different stages of a run,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading subtitle text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// A block did not start with a numeric index
    #[error("Missing or invalid subtitle index at line {line}: '{found}'")]
    MissingIndex {
        /// 1-based line number in the source text
        line: usize,
        /// Offending line content
        found: String,
    },

    /// The timing line of a block could not be parsed
    #[error("Malformed timestamp at line {line}: '{found}'")]
    MalformedTimestamp {
        /// 1-based line number in the source text
        line: usize,
        /// Offending line content
        found: String,
    },

    /// A block had an index and timing but no text
    #[error("Subtitle {index} at line {line} has no text")]
    MissingText {
        /// Index as written in the file
        index: usize,
        /// 1-based line number of the block
        line: usize,
    },

    /// End time precedes start time
    #[error("Subtitle {index} ends before it starts ({start_ms}ms > {end_ms}ms)")]
    InvalidTimeRange {
        /// Index as written in the file
        index: usize,
        /// Start time in ms
        start_ms: u64,
        /// End time in ms
        end_ms: u64,
    },

    /// The input held no subtitle blocks at all
    #[error("No subtitle entries found")]
    Empty,
}

/// Errors raised while locating the input files of a run
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A path given explicitly does not exist
    #[error("Input file does not exist: {0:?}")]
    MissingInput(PathBuf),

    /// No video/subtitle pair was found in the searched directory
    #[error("No video file with a matching subtitle file found in {0:?}")]
    NoMatchingPair(PathBuf),

    /// Directory could not be read
    #[error("Failed to scan directory {path:?}: {message}")]
    Unreadable {
        /// Directory being scanned
        path: PathBuf,
        /// Underlying error message
        message: String,
    },
}

/// Errors raised by a single external tool invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaToolError {
    /// The program could not be started at all
    #[error("Failed to launch {program}: {message}")]
    Spawn {
        /// Program name or path
        program: String,
        /// OS error message
        message: String,
    },

    /// The program ran but reported failure
    #[error("{program} exited with status {status}: {stderr}")]
    Failed {
        /// Program name or path
        program: String,
        /// Exit code, -1 when killed by a signal
        status: i32,
        /// Filtered stderr output
        stderr: String,
    },

    /// The program did not finish within the configured timeout
    #[error("{program} timed out after {timeout_secs}s")]
    TimedOut {
        /// Program name or path
        program: String,
        /// Timeout that elapsed
        timeout_secs: u64,
    },
}
