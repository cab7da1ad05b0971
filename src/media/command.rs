use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::cards::timing::{format_seconds, PaddedWindow};

// @module: Media command construction

/// What a command produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Audio,
    Screenshot,
    Normalize,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Audio => "audio",
            Self::Screenshot => "screenshot",
            Self::Normalize => "normalize",
        };
        write!(f, "{}", name)
    }
}

/// A program plus its argument list, never passed through a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCommand {
    pub kind: CommandKind,
    pub program: String,
    pub args: Vec<OsString>,
    /// File the command writes, or the directory it operates on
    pub output: PathBuf,
}

impl MediaCommand {
    /// Arguments as lossy strings, for logging and assertions
    pub fn args_lossy(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }
}

impl fmt::Display for MediaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Builds the per-entry extraction commands for one run
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    ffmpeg: String,
    mp3gain: String,
    fade_ms: u64,
    screenshot_width: u32,
    screenshot_quality: u32,
}

impl CommandBuilder {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ffmpeg: config.tools.ffmpeg_path.clone(),
            mp3gain: config.tools.mp3gain_path.clone(),
            fade_ms: config.fade_ms(),
            screenshot_width: config.screenshot_width,
            screenshot_quality: config.screenshot_quality,
        }
    }

    /// Trim the window's audio from the first audio stream, with a fade at both ends
    pub fn audio_extraction(&self, video: &Path, window: &PaddedWindow, output: &Path) -> MediaCommand {
        let length_ms = window.duration_ms();

        let mut args = ffmpeg_prelude();
        args.extend(
            [
                "-ss".to_string(),
                format_seconds(window.start_ms),
                "-i".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(video.as_os_str().to_owned());
        args.extend(
            [
                "-t".to_string(),
                format_seconds(length_ms),
                "-map".to_string(),
                "0:a:0".to_string(),
                "-af".to_string(),
                self.fade_filter(length_ms),
            ]
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());

        MediaCommand {
            kind: CommandKind::Audio,
            program: self.ffmpeg.clone(),
            args,
            output: output.to_path_buf(),
        }
    }

    /// Grab one frame at the window's midpoint, scaled to the configured width
    pub fn screenshot_capture(&self, video: &Path, window: &PaddedWindow, output: &Path) -> MediaCommand {
        let mut args = ffmpeg_prelude();
        args.extend(
            [
                "-ss".to_string(),
                format_seconds(window.midpoint_ms()),
                "-i".to_string(),
            ]
            .map(OsString::from),
        );
        args.push(video.as_os_str().to_owned());
        args.extend(
            [
                "-frames:v".to_string(),
                "1".to_string(),
                "-filter:v".to_string(),
                format!("scale={}:-1", self.screenshot_width),
                "-q:v".to_string(),
                self.screenshot_quality.to_string(),
            ]
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());

        MediaCommand {
            kind: CommandKind::Screenshot,
            program: self.ffmpeg.clone(),
            args,
            output: output.to_path_buf(),
        }
    }

    /// Apply track gain in place to all given files, avoiding clipping
    pub fn gain_normalization(&self, media_dir: &Path, files: &[PathBuf]) -> MediaCommand {
        let mut args: Vec<OsString> = ["-r", "-k", "-q"].map(OsString::from).to_vec();
        args.extend(files.iter().map(|f| f.as_os_str().to_owned()));

        MediaCommand {
            kind: CommandKind::Normalize,
            program: self.mp3gain.clone(),
            args,
            output: media_dir.to_path_buf(),
        }
    }

    /// Parametric fade-in at 0 and fade-out ending exactly at the clip end.
    /// Clips shorter than two fades get half the clip per fade.
    pub fn fade_filter(&self, length_ms: u64) -> String {
        let fade_ms = self.fade_ms.min(length_ms / 2);
        let fade = format_seconds(fade_ms);
        format!(
            "afade=t=in:curve=ipar:st=0.000:d={fade},afade=t=out:curve=ipar:st={}:d={fade}",
            format_seconds(length_ms - fade_ms),
        )
    }
}

fn ffmpeg_prelude() -> Vec<OsString> {
    ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
        .map(OsString::from)
        .to_vec()
}
