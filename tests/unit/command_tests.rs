/*!
 * Tests for media command construction
 */

use std::path::{Path, PathBuf};
use subs2cards::app_config::Config;
use subs2cards::cards::PaddedWindow;
use subs2cards::media::{CommandBuilder, CommandKind};

fn builder() -> CommandBuilder {
    CommandBuilder::from_config(&Config::default())
}

#[test]
fn test_audio_extraction_withPaddedWindow_shouldSeekTrimAndFade() {
    let window = PaddedWindow::new(1000, 2000, 350);
    let command = builder().audio_extraction(Path::new("in put.mkv"), &window, Path::new("demo/a.mp3"));

    assert_eq!(command.kind, CommandKind::Audio);
    assert_eq!(command.program, "ffmpeg");
    assert_eq!(command.output, PathBuf::from("demo/a.mp3"));
    assert_eq!(
        command.args_lossy(),
        vec![
            "-hide_banner", "-nostdin", "-loglevel", "error", "-y",
            "-ss", "0.650",
            "-i", "in put.mkv",
            "-t", "1.700",
            "-map", "0:a:0",
            "-af", "afade=t=in:curve=ipar:st=0.000:d=0.200,afade=t=out:curve=ipar:st=1.500:d=0.200",
            "demo/a.mp3",
        ]
    );
}

#[test]
fn test_screenshot_capture_withWindow_shouldGrabOneScaledFrameAtMidpoint() {
    let window = PaddedWindow::new(1000, 2000, 350);
    let command = builder().screenshot_capture(Path::new("video.mkv"), &window, Path::new("demo/s.jpg"));

    assert_eq!(command.kind, CommandKind::Screenshot);
    assert_eq!(
        command.args_lossy(),
        vec![
            "-hide_banner", "-nostdin", "-loglevel", "error", "-y",
            "-ss", "1.500",
            "-i", "video.mkv",
            "-frames:v", "1",
            "-filter:v", "scale=400:-1",
            "-q:v", "2",
            "demo/s.jpg",
        ]
    );
}

#[test]
fn test_commands_withCustomConfig_shouldUseConfiguredToolAndSizes() {
    let mut config = Config::default();
    config.tools.ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg".to_string();
    config.screenshot_width = 640;
    config.screenshot_quality = 5;
    config.fade_secs = 0.5;

    let builder = CommandBuilder::from_config(&config);
    let window = PaddedWindow::new(10_000, 13_000, 0);

    let shot = builder.screenshot_capture(Path::new("v.mkv"), &window, Path::new("s.jpg"));
    assert_eq!(shot.program, "/opt/ffmpeg/bin/ffmpeg");
    assert!(shot.args_lossy().contains(&"scale=640:-1".to_string()));
    assert!(shot.args_lossy().contains(&"5".to_string()));

    assert_eq!(
        builder.fade_filter(window.duration_ms()),
        "afade=t=in:curve=ipar:st=0.000:d=0.500,afade=t=out:curve=ipar:st=2.500:d=0.500"
    );
}

#[test]
fn test_gain_normalization_withFiles_shouldListEveryFile() {
    let files = vec![PathBuf::from("demo/a.mp3"), PathBuf::from("demo/b.mp3")];
    let command = builder().gain_normalization(Path::new("demo"), &files);

    assert_eq!(command.kind, CommandKind::Normalize);
    assert_eq!(command.program, "mp3gain");
    assert_eq!(command.args_lossy(), vec!["-r", "-k", "-q", "demo/a.mp3", "demo/b.mp3"]);
    assert_eq!(command.output, PathBuf::from("demo"));
}

#[test]
fn test_display_withCommand_shouldRenderProgramAndArgs() {
    let command = builder().gain_normalization(Path::new("d"), &[PathBuf::from("d/x.mp3")]);
    assert_eq!(command.to_string(), "mp3gain -r -k -q d/x.mp3");
}
