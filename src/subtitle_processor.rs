use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{debug, warn};
use crate::errors::SubtitleError;

// @module: Subtitle loading and normalization

// @const: SRT timing line regex, accepts ',' or '.' before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})")
        .expect("timestamp regex is valid")
});

const BOM: char = '\u{feff}';

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Text with line breaks removed, as used on cards
    pub fn single_line_text(&self) -> String {
        self.text.replace(['\r', '\n'], "")
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_time_ms),
            Self::format_timestamp(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Parsed subtitle file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Entries in chronological order, numbered 1..=n
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Read and parse an SRT file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;

        let entries = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", path))?;

        debug!("Loaded {} subtitle entries from {:?}", entries.len(), path);

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT text into entries sorted by start time and renumbered from 1.
    ///
    /// Unlike a lenient reader, any malformed block is an error: nothing
    /// should be extracted from a file that was only partially understood.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = content.strip_prefix(BOM).unwrap_or(content);

        let mut entries = Vec::new();
        let mut lines = content.lines().enumerate().peekable();

        loop {
            // Skip blank lines between blocks
            while lines.peek().is_some_and(|(_, l)| l.trim().is_empty()) {
                lines.next();
            }

            let Some((index_line_no, index_line)) = lines.next() else {
                break;
            };

            let seq_num: usize = index_line.trim().parse().map_err(|_| SubtitleError::MissingIndex {
                line: index_line_no + 1,
                found: index_line.trim().to_string(),
            })?;

            let (timing_line_no, timing_line) = lines.next().ok_or(SubtitleError::MalformedTimestamp {
                line: index_line_no + 2,
                found: String::new(),
            })?;

            let (start_time_ms, end_time_ms) = Self::parse_timing_line(timing_line).ok_or_else(|| {
                SubtitleError::MalformedTimestamp {
                    line: timing_line_no + 1,
                    found: timing_line.trim().to_string(),
                }
            })?;

            let mut text_lines = Vec::new();
            while let Some((_, line)) = lines.peek() {
                if line.trim().is_empty() {
                    break;
                }
                text_lines.push(line.trim_end().to_string());
                lines.next();
            }

            if text_lines.is_empty() {
                return Err(SubtitleError::MissingText {
                    index: seq_num,
                    line: index_line_no + 1,
                });
            }

            if end_time_ms < start_time_ms {
                return Err(SubtitleError::InvalidTimeRange {
                    index: seq_num,
                    start_ms: start_time_ms,
                    end_ms: end_time_ms,
                });
            }

            entries.push(SubtitleEntry::new(seq_num, start_time_ms, end_time_ms, text_lines.join("\n")));
        }

        if entries.is_empty() {
            return Err(SubtitleError::Empty);
        }

        Ok(Self::sort_and_reindex(entries))
    }

    /// Sort entries chronologically and assign contiguous 1-based indices
    pub fn sort_and_reindex(mut entries: Vec<SubtitleEntry>) -> Vec<SubtitleEntry> {
        // Stable sort keeps file order for entries sharing a start time
        entries.sort_by_key(|entry| (entry.start_time_ms, entry.end_time_ms));

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        entries
    }

    fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
        let caps = TIMESTAMP_REGEX.captures(line.trim())?;
        Some((Self::captures_to_ms(&caps, 1)?, Self::captures_to_ms(&caps, 5)?))
    }

    /// Convert four consecutive capture groups (h, m, s, ms) to milliseconds
    fn captures_to_ms(caps: &regex::Captures, start_idx: usize) -> Option<u64> {
        let field = |offset: usize| -> Option<u64> { caps.get(start_idx + offset)?.as_str().parse().ok() };

        let hours = field(0)?;
        let minutes = field(1)?;
        let seconds = field(2)?;
        let millis_str = caps.get(start_idx + 3)?.as_str();
        // "5" after the separator means 500ms, not 5ms
        let millis = format!("{:0<3}", millis_str).parse::<u64>().ok()?;

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        Some((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
    }
}
