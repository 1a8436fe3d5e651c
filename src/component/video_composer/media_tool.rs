use super::ffmpeg_command::{EncodeJob, FfmpegCommand};
use crate::config::ComposerSettings;
use crate::error::ComposeError;
use crate::tools::probe_audio_duration;
use log::{debug, info};
use std::path::Path;

/// 外部媒體工具的呼叫介面
///
/// 兩個操作都是同步阻塞呼叫，不重試也沒有逾時
pub trait MediaToolkit: Send + Sync {
    fn probe_duration(&self, audio_path: &Path) -> Result<f64, ComposeError>;
    fn encode(&self, job: &EncodeJob) -> Result<(), ComposeError>;
}

/// 使用系統上的 ffprobe / ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    settings: ComposerSettings,
}

impl FfmpegToolkit {
    #[must_use]
    pub const fn new(settings: ComposerSettings) -> Self {
        Self { settings }
    }
}

impl MediaToolkit for FfmpegToolkit {
    fn probe_duration(&self, audio_path: &Path) -> Result<f64, ComposeError> {
        probe_audio_duration(&self.settings.ffprobe_path, audio_path).map_err(|e| {
            ComposeError::Probe {
                path: audio_path.to_path_buf(),
                message: format!("{e:#}"),
            }
        })
    }

    fn encode(&self, job: &EncodeJob) -> Result<(), ComposeError> {
        let ffmpeg_cmd = FfmpegCommand::new(job, &self.settings);
        debug!("編碼工作: {job}");
        debug!("ffmpeg 參數: {:?}", ffmpeg_cmd.build_args());

        let output = ffmpeg_cmd
            .build_command()
            .output()
            .map_err(|e| ComposeError::Encoding {
                message: format!("無法執行 {}: {e}", self.settings.ffmpeg_path),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ComposeError::Encoding {
                message: stderr.trim().to_string(),
            });
        }

        info!("編碼完成: {}", ffmpeg_cmd.destination_path().display());
        Ok(())
    }
}
