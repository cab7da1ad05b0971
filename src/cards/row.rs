use std::fmt;

use super::naming::MediaNames;

// @module: Card row formatting

/// Number of empty columns between the current line and its context
pub const RESERVED_FIELDS: usize = 2;

/// Marker appended to the tag column of rows with missing media
pub const MISSING_MEDIA_MARKER: &str = "missing-media";

/// One line of the card import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub tag: String,
    pub text: String,
    pub context_before: String,
    pub context_after: String,
    pub screenshot_ref: String,
    pub audio_ref: String,
}

impl CardRow {
    pub fn new(tag: &str, text: &str, context_before: &str, context_after: &str, names: &MediaNames) -> Self {
        Self {
            tag: tag.to_string(),
            text: text.to_string(),
            context_before: context_before.to_string(),
            context_after: context_after.to_string(),
            screenshot_ref: format!("<img src=\"{}\">", names.screenshot),
            audio_ref: format!("[sound:{}]", names.audio),
        }
    }

    /// Tag the row as referencing media that failed to extract
    pub fn flag_missing_media(&mut self) {
        if self.tag.is_empty() {
            self.tag = MISSING_MEDIA_MARKER.to_string();
        } else if !self.tag.split(' ').any(|t| t == MISSING_MEDIA_MARKER) {
            self.tag = format!("{} {}", self.tag, MISSING_MEDIA_MARKER);
        }
    }

    /// Render as a tab-separated line, including the trailing tab and newline
    pub fn to_tsv_line(&self, include_tag_column: bool) -> String {
        let mut fields: Vec<String> = Vec::with_capacity(7 + RESERVED_FIELDS);
        if include_tag_column {
            fields.push(sanitize_field(&self.tag));
        }
        fields.push(sanitize_field(&self.text));
        fields.extend(std::iter::repeat_n(String::new(), RESERVED_FIELDS));
        fields.push(sanitize_field(&self.context_before));
        fields.push(sanitize_field(&self.context_after));
        fields.push(self.screenshot_ref.clone());
        fields.push(self.audio_ref.clone());

        let mut line = fields.join("\t");
        line.push_str("\t\n");
        line
    }
}

impl fmt::Display for CardRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_tsv_line(true))
    }
}

// Tabs and line breaks would shift or split columns
fn sanitize_field(value: &str) -> String {
    value.replace('\t', " ").replace(['\r', '\n'], "")
}
