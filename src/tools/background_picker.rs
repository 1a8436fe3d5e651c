use crate::config::ComposerSettings;
use crate::error::{AssetKind, ComposeError};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 列出背景影片資料夾第一層中副檔名符合的檔案，依路徑排序
pub fn list_backgrounds(
    directory: &Path,
    settings: &ComposerSettings,
) -> Result<Vec<PathBuf>, ComposeError> {
    if !directory.is_dir() {
        return Err(ComposeError::MissingAsset {
            kind: AssetKind::BackgroundLibrary,
            path: directory.to_path_buf(),
        });
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| settings.is_video_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    candidates.sort();
    Ok(candidates)
}

/// 從背景影片資料夾中隨機挑選一部
pub fn pick_background<R: Rng + ?Sized>(
    directory: &Path,
    settings: &ComposerSettings,
    rng: &mut R,
) -> Result<PathBuf, ComposeError> {
    let candidates = list_backgrounds(directory, settings)?;
    debug!(
        "背景影片候選 {} 部: {}",
        candidates.len(),
        directory.display()
    );

    candidates
        .choose(rng)
        .cloned()
        .ok_or_else(|| ComposeError::EmptyLibrary {
            dir: directory.to_path_buf(),
        })
}
