use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::debug;

use crate::errors::DiscoveryError;

// @module: File and directory utilities

// @const: Video extensions recognised by discovery
pub const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ogv", "ts", "mts", "m2ts",
];

// @const: Subtitle extensions recognised by discovery
pub const SUBTITLE_EXTENSIONS: [&str; 1] = ["srt"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// @struct: File operations utility
pub struct FileManager;

/// A video and the subtitle file that belongs to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPair {
    pub video: PathBuf,
    pub subtitle: PathBuf,
}

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with one of the given extensions directly inside a directory, sorted by name
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::has_extension(path, extensions) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Write UTF-8 text preceded by a byte order mark, as card importers expect
    pub fn write_with_bom<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut bytes = Vec::with_capacity(UTF8_BOM.len() + content.len());
        bytes.extend_from_slice(UTF8_BOM);
        bytes.extend_from_slice(content.as_bytes());

        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Find a video in `dir` together with its subtitle file.
    ///
    /// Videos are tried in name order. A subtitle matches when its name
    /// starts with the video's stem followed by a dot (`ep01.mkv` ↔
    /// `ep01.jpn.srt`); failing that, any subtitle whose name contains the
    /// stem is accepted.
    pub fn discover_media_pair<P: AsRef<Path>>(dir: P) -> Result<MediaPair, DiscoveryError> {
        let dir = dir.as_ref();
        let unreadable = |e: anyhow::Error| DiscoveryError::Unreadable {
            path: dir.to_path_buf(),
            message: e.to_string(),
        };

        let videos = Self::find_files(dir, &VIDEO_EXTENSIONS).map_err(unreadable)?;
        let subtitles = Self::find_files(dir, &SUBTITLE_EXTENSIONS).map_err(unreadable)?;
        debug!("Discovery in {:?}: {} video(s), {} subtitle(s)", dir, videos.len(), subtitles.len());

        for video in &videos {
            if let Some(subtitle) = Self::match_subtitle(video, &subtitles) {
                return Ok(MediaPair {
                    video: video.clone(),
                    subtitle: subtitle.clone(),
                });
            }
        }

        Err(DiscoveryError::NoMatchingPair(dir.to_path_buf()))
    }

    /// Find the subtitle file next to a given video, using the same matching as discovery
    pub fn find_subtitle_for_video<P: AsRef<Path>>(video: P) -> Result<PathBuf, DiscoveryError> {
        let video = video.as_ref();
        if !video.exists() {
            return Err(DiscoveryError::MissingInput(video.to_path_buf()));
        }

        let dir = match video.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let subtitles = Self::find_files(&dir, &SUBTITLE_EXTENSIONS).map_err(|e| DiscoveryError::Unreadable {
            path: dir.clone(),
            message: e.to_string(),
        })?;

        Self::match_subtitle(video, &subtitles)
            .cloned()
            .ok_or(DiscoveryError::NoMatchingPair(dir))
    }

    fn match_subtitle<'a>(video: &Path, subtitles: &'a [PathBuf]) -> Option<&'a PathBuf> {
        let stem = video.file_stem()?.to_string_lossy().into_owned();
        let file_name = |p: &PathBuf| p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

        let dotted = format!("{}.", stem);
        subtitles
            .iter()
            .find(|s| file_name(*s).starts_with(&dotted))
            .or_else(|| subtitles.iter().find(|s| file_name(*s).contains(&stem)))
    }

    fn has_extension(path: &Path, extensions: &[&str]) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| extensions.contains(&ext.as_str()))
    }
}
