use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{Config, FailedMediaPolicy};
use crate::cards::{CardPlan, CardRow, DeckPlanner};
use crate::errors::DiscoveryError;
use crate::file_utils::FileManager;
use crate::media::{BatchExecutor, CommandRunner, ExecutionReport, MediaCommand, ProcessRunner};
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for card generation

/// Outcome of one run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Subtitle entries parsed
    pub entries: usize,
    /// Rows written to the TSV
    pub rows_written: usize,
    /// Rows left out because their media failed
    pub rows_omitted: usize,
    /// Rows kept but marked as missing media
    pub rows_flagged: usize,
    /// Extraction command outcomes
    pub extraction: ExecutionReport,
    /// Normalization outcome, when it ran
    pub normalization: Option<ExecutionReport>,
    /// Written TSV file
    pub tsv_path: PathBuf,
    /// True when nothing was done because the output already existed
    pub skipped: bool,
}

/// Main application controller for flashcard generation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Executes media tool invocations
    runner: Arc<dyn CommandRunner>,
}

impl Controller {
    // @method: Create a new controller running real tool processes
    pub fn with_config(config: Config) -> Result<Self> {
        let runner = Arc::new(ProcessRunner::new(config.tools.command_timeout_secs));
        Self::with_runner(config, runner)
    }

    /// Create a controller with a custom command runner
    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        if config.tag.is_empty() {
            return Err(anyhow::anyhow!("A tag is required to name the output files"));
        }

        Ok(Self { config, runner })
    }

    /// Discover a video/subtitle pair in `dir` and process it
    pub async fn run_in_dir(&self, dir: &Path, force_overwrite: bool) -> Result<RunSummary> {
        let pair = FileManager::discover_media_pair(dir)?;
        info!("Found video {:?} with subtitles {:?}", pair.video, pair.subtitle);
        self.run(&pair.video, &pair.subtitle, force_overwrite).await
    }

    /// Run the whole pipeline for one video and its subtitle file
    pub async fn run(&self, video: &Path, subtitle: &Path, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        for input in [video, subtitle] {
            if !FileManager::file_exists(input) {
                return Err(DiscoveryError::MissingInput(input.to_path_buf()).into());
            }
        }

        let tsv_path = self.config.tsv_path();
        if tsv_path.exists() && !force_overwrite {
            warn!("Skipping, {:?} already exists (use -f to force overwrite)", tsv_path);
            return Ok(RunSummary {
                tsv_path,
                skipped: true,
                ..RunSummary::default()
            });
        }

        // Parse errors abort before anything touches the disk
        let subtitles = SubtitleCollection::load(subtitle)?;
        let planner = DeckPlanner::new(&self.config, video);
        let plans = planner.plan(&subtitles.entries);
        info!("Planned {} cards for tag '{}'", plans.len(), self.config.tag);

        let media_dir = self.config.media_dir();
        FileManager::ensure_dir(&media_dir)?;

        let extraction = self.extract_media(&plans).await;

        let normalization = if self.config.normalize_audio {
            Some(self.normalize_audio(&planner, &media_dir).await?)
        } else {
            None
        };

        let (rows, omitted, flagged) = self.collect_rows(&plans, &extraction);
        let content: String = rows
            .iter()
            .map(|row| row.to_tsv_line(self.config.include_tag_column))
            .collect();
        FileManager::write_with_bom(&tsv_path, &content)?;

        let summary = RunSummary {
            entries: plans.len(),
            rows_written: rows.len(),
            rows_omitted: omitted,
            rows_flagged: flagged,
            extraction,
            normalization,
            tsv_path,
            skipped: false,
        };

        self.log_summary(&summary, start_time.elapsed());

        Ok(summary)
    }

    /// Audio clips first, then screenshots, each in entry order
    async fn extract_media(&self, plans: &[CardPlan]) -> ExecutionReport {
        let commands: Vec<MediaCommand> = plans
            .iter()
            .map(|p| p.audio.clone())
            .chain(plans.iter().map(|p| p.screenshot.clone()))
            .collect();

        let progress_bar = ProgressBar::new(commands.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Extracting");

        let executor = BatchExecutor::new(Arc::clone(&self.runner), self.config.jobs);
        let pb = progress_bar.clone();
        let report = executor
            .execute(commands, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;

        progress_bar.finish_and_clear();
        report
    }

    /// Gain-normalize every mp3 in the media directory; failures only warn
    async fn normalize_audio(&self, planner: &DeckPlanner, media_dir: &Path) -> Result<ExecutionReport> {
        let files = FileManager::find_files(media_dir, &["mp3"])?;
        if files.is_empty() {
            warn!("No audio files to normalize in {:?}", media_dir);
            return Ok(ExecutionReport::default());
        }

        info!("Normalizing {} audio files", files.len());
        let command = planner.command_builder().gain_normalization(media_dir, &files);
        let executor = BatchExecutor::new(Arc::clone(&self.runner), 1);
        let report = executor.execute(vec![command], |_, _| {}).await;

        if !report.is_success() {
            warn!("Audio normalization failed, clips keep their original volume");
        }

        Ok(report)
    }

    /// Rows in entry order, dropping or flagging those with failed media.
    /// Returns the rows plus the omitted and flagged counts.
    fn collect_rows(&self, plans: &[CardPlan], report: &ExecutionReport) -> (Vec<CardRow>, usize, usize) {
        let failed_outputs: HashSet<&Path> = report
            .failures()
            .map(|outcome| outcome.command.output.as_path())
            .collect();

        let mut rows = Vec::with_capacity(plans.len());
        let mut omitted = 0;
        let mut flagged = 0;

        for plan in plans {
            let media_failed = failed_outputs.contains(plan.audio.output.as_path())
                || failed_outputs.contains(plan.screenshot.output.as_path());

            if !media_failed {
                rows.push(plan.row.clone());
                continue;
            }

            match self.config.failed_media {
                FailedMediaPolicy::Omit => {
                    debug!("Omitting card {} with missing media", plan.seq_num);
                    omitted += 1;
                }
                FailedMediaPolicy::Flag => {
                    let mut row = plan.row.clone();
                    row.flag_missing_media();
                    rows.push(row);
                    flagged += 1;
                }
            }
        }

        (rows, omitted, flagged)
    }

    fn log_summary(&self, summary: &RunSummary, elapsed: std::time::Duration) {
        if summary.extraction.is_success() {
            info!("All {} media files extracted", summary.extraction.total());
        } else {
            error!("{}", summary.extraction.summary());
            for failure in summary.extraction.failures() {
                if let Some(e) = &failure.error {
                    debug!("  {:?}: {}", failure.command.output, e);
                }
            }
        }

        if summary.rows_omitted > 0 {
            warn!("{} cards omitted because their media failed", summary.rows_omitted);
        }
        if summary.rows_flagged > 0 {
            warn!("{} cards flagged as missing media", summary.rows_flagged);
        }

        info!(
            "Wrote {} of {} cards to {} in {}",
            summary.rows_written,
            summary.entries,
            summary.tsv_path.display(),
            Self::format_duration(elapsed)
        );
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
