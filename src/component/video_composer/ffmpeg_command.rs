use crate::config::ComposerSettings;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 交給編碼器的一次合成工作
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub background_path: PathBuf,
    pub audio_path: PathBuf,
    /// 已轉為文字的濾鏡圖
    pub filter_graph: String,
    /// 濾鏡圖最後輸出的視訊串流（不含中括號）
    pub video_label: String,
    /// 字幕暫存檔，已包含在濾鏡圖中，不另外傳給 ffmpeg，只出現在日誌
    pub caption_path: PathBuf,
    pub output_path: PathBuf,
}

impl fmt::Display for EncodeJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "背景={} 音訊={} 字幕={} 輸出={}",
            self.background_path.display(),
            self.audio_path.display(),
            self.caption_path.display(),
            self.output_path.display()
        )
    }
}

pub struct FfmpegCommand<'a> {
    job: &'a EncodeJob,
    settings: &'a ComposerSettings,
}

impl<'a> FfmpegCommand<'a> {
    #[must_use]
    pub const fn new(job: &'a EncodeJob, settings: &'a ComposerSettings) -> Self {
        Self { job, settings }
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.job.output_path
    }

    /// 產生 ffmpeg 參數
    ///
    /// `-shortest` 讓輸出長度跟著較短的串流（旁白音訊）結束
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let crf = self.settings.crf.to_string();
        let video_map = format!("[{}]", self.job.video_label);

        let mut args: Vec<String> = [
            "-hide_banner",
            "-nostdin",
            "-loglevel",
            "error",
            "-y",
            "-i",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        args.push(self.job.background_path.to_string_lossy().to_string());
        args.push("-i".to_string());
        args.push(self.job.audio_path.to_string_lossy().to_string());

        args.extend(
            [
                "-filter_complex",
                self.job.filter_graph.as_str(),
                "-map",
                video_map.as_str(),
                "-map",
                "1:a:0",
                "-c:v",
                self.settings.video_codec.as_str(),
                "-preset",
                self.settings.preset.as_str(),
                "-crf",
                crf.as_str(),
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                self.settings.audio_codec.as_str(),
                "-b:a",
                "192k",
                "-movflags",
                "+faststart",
                "-shortest",
            ]
            .iter()
            .map(ToString::to_string),
        );
        args.push(self.job.output_path.to_string_lossy().to_string());

        args
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.settings.ffmpeg_path);
        cmd.args(self.build_args());
        cmd
    }
}
