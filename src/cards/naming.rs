/*!
 * Media file naming.
 *
 * Names embed the tag, the optional episode and fixed-width timestamps
 * (`SSSSS.mmm`), so files of one run sort chronologically. Tags and
 * episodes may not contain `_`, which keeps `tag_episode` prefixes apart
 * from plain tags. Entries sharing a window or midpoint are told apart by
 * `UniqueNames`.
 */

use std::collections::HashSet;

use super::timing::PaddedWindow;

const AUDIO_EXTENSION: &str = "mp3";
const SCREENSHOT_EXTENSION: &str = "jpg";

/// File names (not paths) for one entry's media
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaNames {
    pub audio: String,
    pub screenshot: String,
}

/// Naming parameters shared by every entry of a run
#[derive(Debug, Clone)]
pub struct NamingScheme {
    prefix: String,
}

impl NamingScheme {
    pub fn new(tag: &str, episode: Option<&str>) -> Self {
        let prefix = match episode {
            Some(episode) if !episode.is_empty() => format!("{}_{}", tag, episode),
            _ => tag.to_string(),
        };
        Self { prefix }
    }

    pub fn audio_name(&self, window: &PaddedWindow) -> String {
        format!(
            "{}_{}-{}.{}",
            self.prefix,
            fixed_width_seconds(window.start_ms),
            fixed_width_seconds(window.end_ms),
            AUDIO_EXTENSION
        )
    }

    pub fn screenshot_name(&self, window: &PaddedWindow) -> String {
        format!(
            "{}_{}.{}",
            self.prefix,
            fixed_width_seconds(window.midpoint_ms()),
            SCREENSHOT_EXTENSION
        )
    }

    pub fn names_for(&self, window: &PaddedWindow) -> MediaNames {
        MediaNames {
            audio: self.audio_name(window),
            screenshot: self.screenshot_name(window),
        }
    }
}

/// Hands out names once per run, suffixing repeats with `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct UniqueNames {
    used: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve both names of an entry, renaming whichever is already taken
    pub fn claim(&mut self, names: MediaNames) -> MediaNames {
        MediaNames {
            audio: self.claim_name(&names.audio),
            screenshot: self.claim_name(&names.screenshot),
        }
    }

    fn claim_name(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut counter = 1;
        while !self.used.insert(candidate.clone()) {
            counter += 1;
            candidate = with_suffix(name, counter);
        }
        candidate
    }
}

// `a_00001.000.jpg` -> `a_00001.000-2.jpg`
fn with_suffix(name: &str, counter: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, extension)) => format!("{}-{}.{}", stem, counter, extension),
        None => format!("{}-{}", name, counter),
    }
}

/// Zero-padded seconds with millisecond precision, nine characters wide
/// for anything under 100000 seconds.
pub fn fixed_width_seconds(ms: u64) -> String {
    format!("{:05}.{:03}", ms / 1000, ms % 1000)
}
