//! 影片合成錯誤分類
//!
//! 所有錯誤都不自動重試，直接回報給呼叫端，並保留外部工具的原始訊息

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 必要素材的種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    NarrationAudio,
    BackgroundLibrary,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NarrationAudio => write!(f, "旁白音訊"),
            Self::BackgroundLibrary => write!(f, "背景影片資料夾"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("必須提供旁白文字或字幕列表其中之一")]
    MissingCaptionSource,

    #[error("旁白文字與字幕列表只能擇一提供")]
    ConflictingCaptionSource,

    #[error("字幕列表不可為空")]
    EmptyCueList,

    #[error("第 {index} 個字幕時間無效: start={start}, end={end}")]
    InvalidCue { index: usize, start: f64, end: f64 },

    #[error("第 {index} 個字幕的開始時間早於前一個字幕")]
    NonMonotonic { index: usize },

    #[error("音訊長度無效: {0}")]
    InvalidDuration(f64),

    #[error("背景亮度係數必須介於 0 與 1 之間: {0}")]
    InvalidDimFactor(f64),

    #[error("幀率必須大於 0: {0}")]
    InvalidFrameRate(f64),
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("找不到{kind}: {}", path.display())]
    MissingAsset { kind: AssetKind, path: PathBuf },

    #[error("背景影片資料夾中沒有可用的影片: {}", dir.display())]
    EmptyLibrary { dir: PathBuf },

    #[error("無法取得音訊長度 {}: {message}", path.display())]
    Probe { path: PathBuf, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("濾鏡圖不一致: {message}")]
    FilterGraph { message: String },

    #[error("ffmpeg 編碼失敗: {message}")]
    Encoding { message: String },

    #[error("檔案操作失敗 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ComposeError {
    /// 驗證錯誤時回傳對應的字幕編號
    #[must_use]
    pub const fn cue_index(&self) -> Option<usize> {
        match self {
            Self::Validation(
                ValidationError::InvalidCue { index, .. } | ValidationError::NonMonotonic { index },
            ) => Some(*index),
            _ => None,
        }
    }
}
