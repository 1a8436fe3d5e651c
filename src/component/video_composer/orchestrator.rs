use super::caption_track::build_caption_track;
use super::ffmpeg_command::EncodeJob;
use super::filter_graph::{GraphParams, compose_filter_graph};
use super::media_tool::{FfmpegToolkit, MediaToolkit};
use super::request::CompositionRequest;
use super::temp_caption::TempCaptionFile;
use crate::config::ComposerSettings;
use crate::error::{AssetKind, ComposeError};
use crate::tools::{pick_background, unique_token};
use log::{debug, info};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// 影片合成流程
///
/// 1. 確認旁白音訊存在
/// 2. 隨機挑選背景影片
/// 3. 取得音訊長度
/// 4. 建立字幕並寫入暫存檔
/// 5. 解析樣式並組裝濾鏡圖
/// 6. 呼叫 ffmpeg，結束後刪除字幕暫存檔
pub struct Composer<T: MediaToolkit = FfmpegToolkit> {
    settings: ComposerSettings,
    toolkit: T,
}

impl Composer<FfmpegToolkit> {
    #[must_use]
    pub fn new(settings: ComposerSettings) -> Self {
        Self {
            toolkit: FfmpegToolkit::new(settings.clone()),
            settings,
        }
    }
}

impl<T: MediaToolkit> Composer<T> {
    pub const fn with_toolkit(settings: ComposerSettings, toolkit: T) -> Self {
        Self { settings, toolkit }
    }

    #[must_use]
    pub const fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    #[must_use]
    pub const fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn create_video(&self, request: &CompositionRequest) -> Result<PathBuf, ComposeError> {
        self.create_video_with_rng(request, &mut rand::thread_rng())
    }

    pub fn create_video_with_rng<R: Rng + ?Sized>(
        &self,
        request: &CompositionRequest,
        rng: &mut R,
    ) -> Result<PathBuf, ComposeError> {
        request.validate()?;

        if !request.audio_path.is_file() {
            return Err(ComposeError::MissingAsset {
                kind: AssetKind::NarrationAudio,
                path: request.audio_path.clone(),
            });
        }

        let background = pick_background(&self.settings.background_dir, &self.settings, rng)?;
        info!("背景影片: {}", background.display());

        let duration = self.toolkit.probe_duration(&request.audio_path)?;
        info!("旁白長度: {duration:.3}s");

        let cues = build_caption_track(request, duration)?;

        let token = unique_token();
        create_dir(&self.settings.temp_dir)?;
        let output_path = match &request.output_path {
            Some(path) => path.clone(),
            None => self.settings.output_dir.join(format!("final_{token}.mp4")),
        };
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }

        let caption = TempCaptionFile::create(
            self.settings.temp_dir.join(format!("subtitles_{token}.srt")),
            &cues,
        )?;

        let profile = request.style.profile();
        let composed = compose_filter_graph(&GraphParams {
            background_dim_factor: request.background_dim_factor,
            zoom_enabled: request.zoom_enabled,
            audio_duration: duration,
            frame_rate: self.settings.frame_rate,
            caption_path: caption.path(),
            force_style: profile.force_style(),
        })?;
        debug!(
            "濾鏡圖 ({} 個階段, 樣式 {}): {:?}",
            composed.graph.nodes().len(),
            request.style,
            composed.graph.stage_names()
        );

        let job = EncodeJob {
            background_path: background,
            audio_path: request.audio_path.clone(),
            filter_graph: composed.graph.render(),
            video_label: composed.output_label.as_str().to_string(),
            caption_path: caption.path().to_path_buf(),
            output_path,
        };

        self.toolkit.encode(&job)?;
        drop(caption);

        info!("影片已輸出: {}", job.output_path.display());
        Ok(job.output_path)
    }
}

fn create_dir(path: &Path) -> Result<(), ComposeError> {
    fs::create_dir_all(path).map_err(|source| ComposeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
