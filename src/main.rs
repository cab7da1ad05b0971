// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context, anyhow};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use dialoguer::Input;

use subs2cards::app_config::{self, Config, FailedMediaPolicy};
use subs2cards::app_controller::Controller;
use subs2cards::file_utils::FileManager;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for FailedMediaPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFailedMedia {
    Omit,
    Flag,
}

impl From<CliFailedMedia> for FailedMediaPolicy {
    fn from(cli_policy: CliFailedMedia) -> Self {
        match cli_policy {
            CliFailedMedia::Omit => FailedMediaPolicy::Omit,
            CliFailedMedia::Flag => FailedMediaPolicy::Flag,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for subs2cards
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subs2cards - turn a subtitled video into flashcards
///
/// For every subtitle line, extracts an audio clip and a screenshot with
/// ffmpeg and writes a tab-separated row referencing both, ready for import
/// into a spaced-repetition deck.
#[derive(Parser, Debug)]
#[command(name = "subs2cards")]
#[command(version)]
#[command(about = "Subtitle + video to flashcard generator")]
#[command(long_about = "subs2cards cuts one audio clip and one screenshot per subtitle line and writes <tag>.tsv.

EXAMPLES:
    subs2cards ep01.mkv ep01.jpn.srt --tag show   # Explicit inputs
    subs2cards ep01.mkv --tag show --episode 01   # Subtitle found next to the video
    subs2cards --dir ~/anime/show                 # Discover a video/subtitle pair and prompt for a tag
    subs2cards -j 4 --normalize ep01.mkv          # Parallel extraction, then mp3gain
    subs2cards completions bash > subs2cards.bash # Generate bash completions

CONFIGURATION:
    Settings are read from subs2cards.json by default. If the file doesn't
    exist, a default one is created. Command line flags override it.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Video file to extract media from
    #[arg(value_name = "VIDEO")]
    video: Option<PathBuf>,

    /// Subtitle file (SRT); looked up next to the video when omitted
    #[arg(value_name = "SUBTITLE", requires = "video")]
    subtitle: Option<PathBuf>,

    /// Directory searched for a video/subtitle pair when no video is given
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Tag naming the output directory, TSV and media files
    #[arg(short, long)]
    tag: Option<String>,

    /// Episode identifier embedded in media file names
    #[arg(short, long)]
    episode: Option<String>,

    /// Seconds of padding around each subtitle
    #[arg(long)]
    pad: Option<f64>,

    /// Number of media commands to run at once
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Normalize clip volume with mp3gain after extraction
    #[arg(short, long)]
    normalize: bool,

    /// What to do with cards whose media failed to extract
    #[arg(long, value_enum)]
    failed_media: Option<CliFailedMedia>,

    /// Directory receiving <tag>.tsv and the <tag>/ media folder
    #[arg(short, long)]
    output_root: Option<PathBuf>,

    /// Force overwrite of an existing TSV
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long = "config", value_name = "FILE", default_value = "subs2cards.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subs2cards", &mut std::io::stdout());
        return Ok(());
    }

    run(cli).await
}

async fn run(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Resolve inputs before asking anything, so a missing pair fails fast
    let (video, subtitle) = match (&options.video, &options.subtitle) {
        (Some(video), Some(subtitle)) => (video.clone(), subtitle.clone()),
        (Some(video), None) => (video.clone(), FileManager::find_subtitle_for_video(video)?),
        (None, _) => {
            let pair = FileManager::discover_media_pair(&options.dir)?;
            (pair.video, pair.subtitle)
        }
    };
    info!("Video: {:?}", video);
    info!("Subtitles: {:?}", subtitle);

    if config.tag.is_empty() {
        resolve_tag_interactively(&mut config, &video)?;
    }

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let summary = controller.run(&video, &subtitle, options.force_overwrite).await?;

    if !summary.skipped && !summary.extraction.is_success() {
        return Err(anyhow!(
            "{} of {} media files failed; {} of {} cards written",
            summary.extraction.failure_count(),
            summary.extraction.total(),
            summary.rows_written,
            summary.entries
        ));
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(tag) = &options.tag {
        config.tag = tag.clone();
    }
    if let Some(episode) = &options.episode {
        config.episode = Some(episode.clone());
    }
    if let Some(pad) = options.pad {
        config.pad_secs = pad;
    }
    if let Some(jobs) = options.jobs {
        config.jobs = jobs;
    }
    if options.normalize {
        config.normalize_audio = true;
    }
    if let Some(policy) = &options.failed_media {
        config.failed_media = policy.clone().into();
    }
    if let Some(root) = &options.output_root {
        config.output_root = root.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

/// Ask for tag and episode on a terminal, otherwise derive the tag from the video name
fn resolve_tag_interactively(config: &mut Config, video: &Path) -> Result<()> {
    let fallback = default_tag_for(video);

    if !std::io::stdin().is_terminal() {
        info!("No tag given, using '{}'", fallback);
        config.tag = fallback;
        return Ok(());
    }

    let tag: String = Input::new()
        .with_prompt("Tag name")
        .default(fallback)
        .interact_text()
        .context("Failed to read tag")?;
    config.tag = tag.trim().to_string();

    if config.episode.is_none() {
        let episode: String = Input::new()
            .with_prompt("Episode number (empty for none)")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read episode")?;
        let episode = episode.trim();
        if !episode.is_empty() {
            config.episode = Some(episode.to_string());
        }
    }

    Ok(())
}

fn default_tag_for(video: &Path) -> String {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cards".to_string());

    stem.chars()
        .map(|c| if c.is_whitespace() || matches!(c, '/' | '\\' | '_') { '-' } else { c })
        .collect()
}
