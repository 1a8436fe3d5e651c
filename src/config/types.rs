use crate::component::video_composer::CaptionStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_RECENT_PATHS: usize = 10;

/// 影片合成設定
///
/// 所有路徑都是明確欄位，不依賴全域常數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerSettings {
    /// 背景影片資料夾
    pub background_dir: PathBuf,
    /// 輸出影片資料夾
    pub output_dir: PathBuf,
    /// 暫存字幕檔資料夾
    pub temp_dir: PathBuf,
    /// 可用的背景影片副檔名（含 `.`，不分大小寫）
    pub video_extensions: Vec<String>,
    /// 輸出幀率，縮放特效的幀數依此計算
    pub frame_rate: f64,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            background_dir: PathBuf::from("videos"),
            output_dir: PathBuf::from("outputs"),
            temp_dir: PathBuf::from("outputs"),
            video_extensions: vec![".mp4".to_string(), ".mov".to_string(), ".mkv".to_string()],
            frame_rate: 30.0,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 20,
        }
    }
}

impl ComposerSettings {
    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let dotted = format!(".{}", ext.to_lowercase());
                self.video_extensions
                    .iter()
                    .any(|allowed| allowed.to_lowercase() == dotted)
            })
    }
}

/// 互動模式下的預設合成參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub audio_path: PathBuf,
    pub style: CaptionStyle,
    pub background_dim_factor: f64,
    pub zoom_enabled: bool,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            audio_path: PathBuf::from("final.wav"),
            style: CaptionStyle::default(),
            background_dim_factor: 0.6,
            zoom_enabled: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub composer: ComposerSettings,
    pub defaults: RequestDefaults,
    pub recent_audio_paths: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
