/*!
 * Context lookup for card rows.
 *
 * Neighbours are found by logical index (`seq_num ± 1`), not by position in
 * the slice, so filtered or reordered input still resolves correctly.
 */

use std::collections::HashMap;

use crate::subtitle_processor::SubtitleEntry;

/// Current line plus its neighbours, newlines removed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextLines {
    pub before: String,
    pub current: String,
    pub after: String,
}

/// Index → entry map over a borrowed entry list
pub struct ContextResolver<'a> {
    by_index: HashMap<usize, &'a SubtitleEntry>,
}

impl<'a> ContextResolver<'a> {
    /// Build the lookup table. Later duplicates of an index win.
    pub fn new(entries: &'a [SubtitleEntry]) -> Self {
        let by_index = entries.iter().map(|entry| (entry.seq_num, entry)).collect();
        Self { by_index }
    }

    /// Entry with exactly this index, if any
    pub fn get(&self, seq_num: usize) -> Option<&'a SubtitleEntry> {
        self.by_index.get(&seq_num).copied()
    }

    /// Text of the entry one index earlier, or an empty string
    pub fn before(&self, entry: &SubtitleEntry) -> String {
        entry
            .seq_num
            .checked_sub(1)
            .and_then(|seq| self.get(seq))
            .map(SubtitleEntry::single_line_text)
            .unwrap_or_default()
    }

    /// Text of the entry one index later, or an empty string
    pub fn after(&self, entry: &SubtitleEntry) -> String {
        entry
            .seq_num
            .checked_add(1)
            .and_then(|seq| self.get(seq))
            .map(SubtitleEntry::single_line_text)
            .unwrap_or_default()
    }

    /// All three lines for one entry
    pub fn resolve(&self, entry: &SubtitleEntry) -> ContextLines {
        ContextLines {
            before: self.before(entry),
            current: entry.single_line_text(),
            after: self.after(entry),
        }
    }
}
