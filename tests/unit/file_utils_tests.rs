/*!
 * Tests for file utility functions and input discovery
 */

use std::fs;
use anyhow::Result;
use subs2cards::errors::DiscoveryError;
use subs2cards::file_utils::{FileManager, MediaPair};
use crate::common;

#[test]
fn test_file_exists_withFilesAndDirs_shouldOnlyAcceptFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.tmp")));

    Ok(())
}

#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());

    Ok(())
}

#[test]
fn test_write_with_bom_withContent_shouldPrefixBom() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("demo.tsv");

    FileManager::write_with_bom(&path, "a\tb\t\n")?;

    assert_eq!(fs::read(&path)?, b"\xEF\xBB\xBFa\tb\t\n");

    Ok(())
}

#[test]
fn test_find_files_withMixedFiles_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.MP3", "")?;
    common::create_test_file(temp_dir.path(), "a.mp3", "")?;
    common::create_test_file(temp_dir.path(), "c.jpg", "")?;
    fs::create_dir(temp_dir.path().join("nested"))?;
    common::create_test_file(&temp_dir.path().join("nested"), "d.mp3", "")?;

    let files = FileManager::find_files(temp_dir.path(), &["mp3"])?;

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.mp3", "b.MP3"]);

    Ok(())
}

#[test]
fn test_discover_media_pair_withMatchingNames_shouldPickFirstVideoWithSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    // "a" has no subtitle, so "b" wins even though "a" sorts first
    common::create_test_video(temp_dir.path(), "a.mkv")?;
    let video = common::create_test_video(temp_dir.path(), "b.mp4")?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "b.jpn.srt")?;
    common::create_test_subtitle(temp_dir.path(), "other.srt")?;

    let pair = FileManager::discover_media_pair(temp_dir.path())?;

    assert_eq!(pair, MediaPair { video, subtitle });

    Ok(())
}

#[test]
fn test_discover_media_pair_withOnlyLooseMatch_shouldFallBackToContainment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_video(temp_dir.path(), "ep01.mkv")?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "[subs] ep01 japanese.srt")?;

    let pair = FileManager::discover_media_pair(temp_dir.path())?;

    assert_eq!(pair.video, video);
    assert_eq!(pair.subtitle, subtitle);

    Ok(())
}

#[test]
fn test_discover_media_pair_withNoPair_shouldReturnDiscoveryError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_video(temp_dir.path(), "ep01.mkv")?;
    common::create_test_subtitle(temp_dir.path(), "ep02.srt")?;

    let result = FileManager::discover_media_pair(temp_dir.path());

    assert!(matches!(result, Err(DiscoveryError::NoMatchingPair(_))));

    Ok(())
}

#[test]
fn test_find_subtitle_for_video_withSiblingSubtitle_shouldFindIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_video(temp_dir.path(), "ep01.mkv")?;
    let subtitle = common::create_test_subtitle(temp_dir.path(), "ep01.en.srt")?;

    assert_eq!(FileManager::find_subtitle_for_video(&video)?, subtitle);

    Ok(())
}

#[test]
fn test_find_subtitle_for_video_withMissingVideo_shouldReturnMissingInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = FileManager::find_subtitle_for_video(temp_dir.path().join("nope.mkv"));

    assert!(matches!(result, Err(DiscoveryError::MissingInput(_))));

    Ok(())
}
