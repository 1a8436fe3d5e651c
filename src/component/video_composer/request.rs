use super::style_profile::CaptionStyle;
use crate::config::RequestDefaults;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 明確指定時間的字幕
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitCue {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl ExplicitCue {
    #[must_use]
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// 單次影片合成請求
///
/// `narration_text` 與 `explicit_cues` 必須恰好提供其中一個
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRequest {
    #[serde(default)]
    pub narration_text: Option<String>,
    #[serde(default)]
    pub explicit_cues: Option<Vec<ExplicitCue>>,
    #[serde(default)]
    pub style: CaptionStyle,
    #[serde(default = "default_dim_factor")]
    pub background_dim_factor: f64,
    #[serde(default)]
    pub zoom_enabled: bool,
    /// 此請求專用的旁白音訊
    pub audio_path: PathBuf,
    /// 未指定時輸出到 `output_dir/final_<token>.mp4`
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

const fn default_dim_factor() -> f64 {
    0.6
}

/// 字幕來源
#[derive(Debug, Clone, Copy)]
pub enum CaptionSource<'a> {
    Narration(&'a str),
    Explicit(&'a [ExplicitCue]),
}

impl CompositionRequest {
    #[must_use]
    pub fn from_text(text: impl Into<String>, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            narration_text: Some(text.into()),
            explicit_cues: None,
            style: CaptionStyle::default(),
            background_dim_factor: default_dim_factor(),
            zoom_enabled: false,
            audio_path: audio_path.into(),
            output_path: None,
        }
    }

    #[must_use]
    pub fn from_cues(cues: Vec<ExplicitCue>, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            narration_text: None,
            explicit_cues: Some(cues),
            ..Self::from_text(String::new(), audio_path)
        }
    }

    /// 以互動模式的預設值建立請求
    #[must_use]
    pub fn with_defaults(text: impl Into<String>, defaults: &RequestDefaults) -> Self {
        Self {
            style: defaults.style,
            background_dim_factor: defaults.background_dim_factor,
            zoom_enabled: defaults.zoom_enabled,
            ..Self::from_text(text, defaults.audio_path.clone())
        }
    }

    pub fn caption_source(&self) -> Result<CaptionSource<'_>, ValidationError> {
        match (&self.narration_text, &self.explicit_cues) {
            (Some(text), None) => Ok(CaptionSource::Narration(text)),
            (None, Some(cues)) if cues.is_empty() => Err(ValidationError::EmptyCueList),
            (None, Some(cues)) => Ok(CaptionSource::Explicit(cues)),
            (None, None) => Err(ValidationError::MissingCaptionSource),
            (Some(_), Some(_)) => Err(ValidationError::ConflictingCaptionSource),
        }
    }

    /// 檢查請求本身的欄位，不涉及檔案系統
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.caption_source()?;
        if !(0.0..=1.0).contains(&self.background_dim_factor) {
            return Err(ValidationError::InvalidDimFactor(self.background_dim_factor));
        }
        Ok(())
    }
}
