use super::caption_track::{CaptionCue, write_srt};
use crate::error::ComposeError;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 字幕暫存檔
///
/// 離開作用域時一定刪除檔案，成功或失敗的路徑都一樣
#[derive(Debug)]
pub struct TempCaptionFile {
    path: PathBuf,
}

impl TempCaptionFile {
    pub fn create(path: PathBuf, cues: &[CaptionCue]) -> Result<Self, ComposeError> {
        // 先建立 guard，寫入到一半失敗也會清除
        let guard = Self { path };
        write_srt(&guard.path, cues)?;
        debug!("已寫入字幕暫存檔: {}", guard.path.display());
        Ok(guard)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempCaptionFile {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("已刪除字幕暫存檔: {}", self.path.display()),
            Err(e) => warn!("無法刪除字幕暫存檔 {}: {e}", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue() -> CaptionCue {
        CaptionCue {
            index: 1,
            start: 0.0,
            end: 1.0,
            text: "hello".to_string(),
        }
    }

    #[test]
    fn test_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtitles_1.srt");
        {
            let file = TempCaptionFile::create(path.clone(), &[cue()]).unwrap();
            assert!(file.path().exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_removed_on_early_return() {
        fn failing_step(path: PathBuf) -> Result<(), ComposeError> {
            let _file = TempCaptionFile::create(path, &[cue()])?;
            Err(ComposeError::Encoding {
                message: "boom".to_string(),
            })
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtitles_2.srt");
        assert!(failing_step(path.clone()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_already_removed_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtitles_3.srt");
        let file = TempCaptionFile::create(path.clone(), &[cue()]).unwrap();
        fs::remove_file(&path).unwrap();
        drop(file);
        assert!(!path.exists());
    }
}
