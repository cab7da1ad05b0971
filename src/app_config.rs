use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use log::warn;

/// Application configuration module
/// This module handles loading, validating and saving the settings that
/// drive card generation: padding, fades, screenshot size and tool paths.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Namespace for this run's files; empty means "ask or derive from the video"
    #[serde(default)]
    pub tag: String,

    /// Optional episode identifier embedded in media names
    #[serde(default)]
    pub episode: Option<String>,

    /// Seconds added before and after each subtitle
    #[serde(default = "default_pad_secs")]
    pub pad_secs: f64,

    /// Audio fade-in/fade-out length in seconds
    #[serde(default = "default_fade_secs")]
    pub fade_secs: f64,

    /// Screenshot width in pixels, height follows the aspect ratio
    #[serde(default = "default_screenshot_width")]
    pub screenshot_width: u32,

    /// JPEG quality passed to ffmpeg's -q:v (1 best, 31 worst)
    #[serde(default = "default_screenshot_quality")]
    pub screenshot_quality: u32,

    /// Media tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Run the gain normalizer over the extracted audio
    #[serde(default)]
    pub normalize_audio: bool,

    /// Number of media commands allowed to run at once
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Prepend the tag as the first column of each row
    #[serde(default = "default_true")]
    pub include_tag_column: bool,

    /// What to do with rows whose media could not be extracted
    #[serde(default)]
    pub failed_media: FailedMediaPolicy,

    /// Directory receiving `<tag>.tsv` and the `<tag>/` media folder
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// External tool settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolsConfig {
    /// ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// mp3gain executable
    #[serde(default = "default_mp3gain_path")]
    pub mp3gain_path: String,

    /// Timeout for a single invocation in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            mp3gain_path: default_mp3gain_path(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

/// Handling of rows whose audio or screenshot failed
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailedMediaPolicy {
    /// Leave the row out of the TSV
    #[default]
    Omit,
    /// Keep the row but mark its tag column
    Flag,
}

impl std::str::FromStr for FailedMediaPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "omit" => Ok(Self::Omit),
            "flag" => Ok(Self::Flag),
            _ => Err(anyhow!("Invalid failed media policy: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_pad_secs() -> f64 {
    0.35
}

fn default_fade_secs() -> f64 {
    0.2
}

fn default_screenshot_width() -> u32 {
    400
}

fn default_screenshot_quality() -> u32 {
    2
}

fn default_jobs() -> usize {
    1 // strictly sequential, like running the commands by hand
}

fn default_command_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_mp3gain_path() -> String {
    "mp3gain".to_string()
}

impl Config {
    /// Load the configuration from a JSON file, writing a default one if it doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !self.tag.is_empty() {
            validate_name_component("tag", &self.tag)?;
        }

        if let Some(episode) = &self.episode {
            if episode.is_empty() {
                return Err(anyhow!("Episode must not be empty when set"));
            }
            validate_name_component("episode", episode)?;
        }

        if !self.pad_secs.is_finite() || self.pad_secs < 0.0 {
            return Err(anyhow!("Pad must be a non-negative number of seconds, got {}", self.pad_secs));
        }

        if !self.fade_secs.is_finite() || self.fade_secs < 0.0 {
            return Err(anyhow!("Fade must be a non-negative number of seconds, got {}", self.fade_secs));
        }

        if self.screenshot_width == 0 {
            return Err(anyhow!("Screenshot width must be greater than zero"));
        }

        if !(1..=31).contains(&self.screenshot_quality) {
            return Err(anyhow!("Screenshot quality must be between 1 and 31, got {}", self.screenshot_quality));
        }

        if self.jobs == 0 {
            return Err(anyhow!("Jobs must be at least 1"));
        }

        if self.tools.ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("ffmpeg path must not be empty"));
        }

        if self.normalize_audio && self.tools.mp3gain_path.trim().is_empty() {
            return Err(anyhow!("mp3gain path must not be empty when normalization is enabled"));
        }

        Ok(())
    }

    /// Pad duration in whole milliseconds
    pub fn pad_ms(&self) -> u64 {
        secs_to_ms(self.pad_secs)
    }

    /// Fade duration in whole milliseconds
    pub fn fade_ms(&self) -> u64 {
        secs_to_ms(self.fade_secs)
    }

    /// Directory holding this run's media files
    pub fn media_dir(&self) -> PathBuf {
        self.output_root.join(&self.tag)
    }

    /// Path of this run's TSV file
    pub fn tsv_path(&self) -> PathBuf {
        self.output_root.join(format!("{}.tsv", self.tag))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            tag: String::new(),
            episode: None,
            pad_secs: default_pad_secs(),
            fade_secs: default_fade_secs(),
            screenshot_width: default_screenshot_width(),
            screenshot_quality: default_screenshot_quality(),
            tools: ToolsConfig::default(),
            normalize_audio: false,
            jobs: default_jobs(),
            include_tag_column: true,
            failed_media: FailedMediaPolicy::default(),
            output_root: default_output_root(),
            log_level: LogLevel::default(),
        }
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

// Tags and episodes end up in file names and in the TSV
fn validate_name_component(what: &str, value: &str) -> Result<()> {
    // '_' separates tag, episode and timestamps in media names
    if value.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '_')) {
        return Err(anyhow!("{} '{}' must not contain whitespace, '_' or path separators", what, value));
    }
    if value == "." || value == ".." {
        return Err(anyhow!("{} '{}' is not a valid name", what, value));
    }
    Ok(())
}
