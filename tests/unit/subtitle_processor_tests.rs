/*!
 * Tests for subtitle loading
 */

use std::fmt::Write;
use anyhow::Result;
use subs2cards::errors::SubtitleError;
use subs2cards::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::common;

#[test]
fn test_format_timestamp_withHoursAndMillis_shouldUseSrtLayout() {
    assert_eq!(SubtitleEntry::format_timestamp(5_025_678), "01:23:45,678");
    assert_eq!(SubtitleEntry::format_timestamp(0), "00:00:00,000");
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

#[test]
fn test_parse_srt_string_withValidContent_shouldParseCorrectly() -> Result<()> {
    let srt_content = "1\n00:00:01,000 --> 00:00:04,000\nHello world\n\n2\n00:00:05,000 --> 00:00:08,000\nTest subtitle\nSecond line\n\n";

    let entries = SubtitleCollection::parse_srt_string(srt_content)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], SubtitleEntry::new(1, 1000, 4000, "Hello world".to_string()));
    assert_eq!(entries[1], SubtitleEntry::new(2, 5000, 8000, "Test subtitle\nSecond line".to_string()));

    Ok(())
}

#[test]
fn test_parse_srt_string_withBomCrlfAndUnorderedBlocks_shouldSortAndReindex() -> Result<()> {
    let entries = SubtitleCollection::parse_srt_string(common::UNORDERED_SRT)?;

    let seq: Vec<usize> = entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(seq, vec![1, 2, 3]);

    let starts: Vec<u64> = entries.iter().map(|e| e.start_time_ms).collect();
    assert_eq!(starts, vec![1000, 5000, 65000]);

    assert_eq!(entries[0].text, "This is a test\nsubtitle.");
    assert_eq!(entries[2].end_time_ms, 67250);

    Ok(())
}

#[test]
fn test_parse_srt_string_withDotSeparatorAndShortMillis_shouldParse() -> Result<()> {
    let entries = SubtitleCollection::parse_srt_string("1\n0:00:01.5 --> 0:00:02.25\nShort\n")?;

    assert_eq!(entries[0].start_time_ms, 1500);
    assert_eq!(entries[0].end_time_ms, 2250);

    Ok(())
}

#[test]
fn test_parse_srt_string_withExtraBlankLines_shouldIgnoreThem() -> Result<()> {
    let entries = SubtitleCollection::parse_srt_string("\n\n1\n00:00:01,000 --> 00:00:02,000\nA\n\n\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n\n\n")?;
    assert_eq!(entries.len(), 2);
    Ok(())
}

#[test]
fn test_parse_srt_string_withMalformedTimestamp_shouldReturnParseError() {
    let result = SubtitleCollection::parse_srt_string("1\n00:00:01 --> 00:00:02,000\nHello\n");

    assert!(matches!(result, Err(SubtitleError::MalformedTimestamp { line: 2, .. })));
}

#[test]
fn test_parse_srt_string_withMissingIndex_shouldReturnParseError() {
    let result = SubtitleCollection::parse_srt_string("00:00:01,000 --> 00:00:02,000\nHello\n");

    assert!(matches!(result, Err(SubtitleError::MissingIndex { line: 1, .. })));
}

#[test]
fn test_parse_srt_string_withMissingText_shouldReturnParseError() {
    let result = SubtitleCollection::parse_srt_string("1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n");

    assert_eq!(result, Err(SubtitleError::MissingText { index: 1, line: 1 }));
}

#[test]
fn test_parse_srt_string_withEndBeforeStart_shouldReturnParseError() {
    let result = SubtitleCollection::parse_srt_string("1\n00:00:05,000 --> 00:00:02,000\nBackwards\n");

    assert!(matches!(result, Err(SubtitleError::InvalidTimeRange { index: 1, .. })));
}

#[test]
fn test_parse_srt_string_withOnlyWhitespace_shouldReturnEmpty() {
    assert_eq!(SubtitleCollection::parse_srt_string("\u{feff}\n \n"), Err(SubtitleError::Empty));
}

#[test]
fn test_load_withSubtitleFile_shouldKeepSourcePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "ep01.srt")?;

    let collection = SubtitleCollection::load(&path)?;

    assert_eq!(collection.source_file, path);
    assert_eq!(collection.entries.len(), 3);

    Ok(())
}

#[test]
fn test_load_withMalformedFile_shouldExposeSubtitleError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.srt", "x\n00:00:01,000 --> 00:00:02,000\nA\n")?;

    let err = SubtitleCollection::load(&path).unwrap_err();

    assert!(err.downcast_ref::<SubtitleError>().is_some());

    Ok(())
}

#[test]
fn test_single_line_text_withMultilineEntry_shouldJoinWithoutSeparator() {
    let entry = SubtitleEntry::new(1, 0, 1, "first\nsecond".to_string());
    assert_eq!(entry.single_line_text(), "firstsecond");
}
