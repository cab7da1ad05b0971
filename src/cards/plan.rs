use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::media::command::{CommandBuilder, MediaCommand};
use crate::subtitle_processor::SubtitleEntry;

use super::context::ContextResolver;
use super::naming::{MediaNames, NamingScheme, UniqueNames};
use super::row::CardRow;
use super::timing::PaddedWindow;

// @module: Per-entry card planning

/// Everything derived for one subtitle entry
#[derive(Debug, Clone)]
pub struct CardPlan {
    pub seq_num: usize,
    pub window: PaddedWindow,
    pub names: MediaNames,
    pub row: CardRow,
    pub audio: MediaCommand,
    pub screenshot: MediaCommand,
}

/// Turns entries into card plans for one video
pub struct DeckPlanner {
    tag: String,
    pad_ms: u64,
    naming: NamingScheme,
    builder: CommandBuilder,
    video: PathBuf,
    media_dir: PathBuf,
}

impl DeckPlanner {
    pub fn new(config: &Config, video: &Path) -> Self {
        Self {
            tag: config.tag.clone(),
            pad_ms: config.pad_ms(),
            naming: NamingScheme::new(&config.tag, config.episode.as_deref()),
            builder: CommandBuilder::from_config(config),
            video: video.to_path_buf(),
            media_dir: config.media_dir(),
        }
    }

    /// One plan per entry, in entry order. Media names are unique across
    /// the returned plans even when windows or midpoints coincide.
    pub fn plan(&self, entries: &[SubtitleEntry]) -> Vec<CardPlan> {
        let resolver = ContextResolver::new(entries);
        let mut unique = UniqueNames::new();

        entries
            .iter()
            .map(|entry| self.plan_entry(&resolver, &mut unique, entry))
            .collect()
    }

    fn plan_entry(&self, resolver: &ContextResolver<'_>, unique: &mut UniqueNames, entry: &SubtitleEntry) -> CardPlan {
        let context = resolver.resolve(entry);
        let window = PaddedWindow::for_entry(entry, self.pad_ms);
        let names = unique.claim(self.naming.names_for(&window));

        let audio = self
            .builder
            .audio_extraction(&self.video, &window, &self.media_dir.join(&names.audio));
        let screenshot = self
            .builder
            .screenshot_capture(&self.video, &window, &self.media_dir.join(&names.screenshot));

        let row = CardRow::new(&self.tag, &context.current, &context.before, &context.after, &names);

        CardPlan {
            seq_num: entry.seq_num,
            window,
            names,
            row,
            audio,
            screenshot,
        }
    }

    pub fn command_builder(&self) -> &CommandBuilder {
        &self.builder
    }
}
