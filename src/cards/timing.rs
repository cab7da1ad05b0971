use crate::subtitle_processor::SubtitleEntry;

// @module: Extraction windows

/// Entry timing widened by the pad, never starting before zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl PaddedWindow {
    /// `(max(0, start - pad), end + pad)`
    pub fn new(start_ms: u64, end_ms: u64, pad_ms: u64) -> Self {
        Self {
            start_ms: start_ms.saturating_sub(pad_ms),
            end_ms: end_ms.saturating_add(pad_ms),
        }
    }

    pub fn for_entry(entry: &SubtitleEntry, pad_ms: u64) -> Self {
        Self::new(entry.start_time_ms, entry.end_time_ms, pad_ms)
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// start + (end - start) / 2, rounded down to the millisecond
    pub fn midpoint_ms(&self) -> u64 {
        self.start_ms + self.duration_ms() / 2
    }
}

/// Render milliseconds as seconds with three decimals, e.g. `65.250`
pub fn format_seconds(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}
