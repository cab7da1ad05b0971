/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use subs2cards::errors::{DiscoveryError, MediaToolError, SubtitleError};

#[test]
fn test_subtitleError_malformedTimestamp_shouldDisplayLineAndContent() {
    let error = SubtitleError::MalformedTimestamp { line: 12, found: "00:00 -> 00:01".to_string() };
    let display = format!("{}", error);
    assert!(display.contains("line 12"));
    assert!(display.contains("00:00 -> 00:01"));
}

#[test]
fn test_subtitleError_missingText_shouldDisplayIndex() {
    let error = SubtitleError::MissingText { index: 4, line: 10 };
    assert_eq!(error.to_string(), "Subtitle 4 at line 10 has no text");
}

#[test]
fn test_discoveryError_noMatchingPair_shouldDisplayDirectory() {
    let error = DiscoveryError::NoMatchingPair(PathBuf::from("/videos"));
    assert!(error.to_string().contains("/videos"));
}

#[test]
fn test_mediaToolError_failed_shouldDisplayStatusAndStderr() {
    let error = MediaToolError::Failed {
        program: "ffmpeg".to_string(),
        status: 1,
        stderr: "Invalid data found".to_string(),
    };
    assert_eq!(error.to_string(), "ffmpeg exited with status 1: Invalid data found");
}

#[test]
fn test_mediaToolError_timedOut_shouldDisplayTimeout() {
    let error = MediaToolError::TimedOut { program: "mp3gain".to_string(), timeout_secs: 3 };
    assert_eq!(error.to_string(), "mp3gain timed out after 3s");
}

#[test]
fn test_subtitleError_inAnyhowContext_shouldStillDowncast() {
    let error = anyhow::Error::new(SubtitleError::Empty).context("Failed to parse subtitle file");
    assert_eq!(error.downcast_ref::<SubtitleError>(), Some(&SubtitleError::Empty));
    assert_eq!(error.root_cause().to_string(), "No subtitle entries found");
}
