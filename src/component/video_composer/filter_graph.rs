//! 濾鏡圖組裝
//!
//! 以有型別的階段描述建立濾鏡鏈，只在交給 ffmpeg 前才轉為文字。
//! 階段順序固定：放大 → 置中裁切 → 緩慢推近（選用）→ 像素格式 → 亮度/對比 → 燒入字幕

use crate::error::{ComposeError, ValidationError};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

pub const TARGET_WIDTH: u32 = 1080;
pub const TARGET_HEIGHT: u32 = 1920;

/// 推近特效的最大倍率
pub const MAX_ZOOM: f64 = 1.1;
/// 亮度偏移比例：dim=0 時亮度 -0.3
pub const BRIGHTNESS_SCALE: f64 = 0.3;
/// 對比隨變暗程度提高的比例
pub const CONTRAST_SCALE: f64 = 0.1;
pub const PIXEL_FORMAT: &str = "yuv420p";

pub const VIDEO_SOURCE: &str = "0:v";
pub const OUTPUT_LABEL: &str = "vout";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamLabel(String);

impl StreamLabel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// 等比放大到兩邊都不小於目標尺寸
    ScaleUp { width: u32, height: u32 },
    CenterCrop { width: u32, height: u32 },
    /// 從 1.0 單調遞增到 `max_zoom`，每幀重新置中
    ZoomIn {
        max_zoom: f64,
        frames: u64,
        width: u32,
        height: u32,
        frame_rate: f64,
    },
    PixelFormat { format: &'static str },
    Equalize { brightness: f64, contrast: f64 },
    BurnSubtitles { path: PathBuf, force_style: String },
}

impl FilterStage {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScaleUp { .. } => "scale",
            Self::CenterCrop { .. } => "crop",
            Self::ZoomIn { .. } => "zoompan",
            Self::PixelFormat { .. } => "format",
            Self::Equalize { .. } => "eq",
            Self::BurnSubtitles { .. } => "subtitles",
        }
    }

    /// 推近倍率在第 `frame` 幀的值，與渲染出的 zoompan 運算式相同
    #[must_use]
    pub fn zoom_at(max_zoom: f64, frames: u64, frame: u64) -> f64 {
        let frames = frames.max(1) as f64;
        (1.0 + (max_zoom - 1.0) * frame as f64 / frames).min(max_zoom)
    }

    fn render(&self) -> String {
        match self {
            Self::ScaleUp { width, height } => {
                format!("scale={width}:{height}:force_original_aspect_ratio=increase")
            }
            Self::CenterCrop { width, height } => format!("crop={width}:{height}"),
            Self::ZoomIn {
                max_zoom,
                frames,
                width,
                height,
                frame_rate,
            } => format!(
                "zoompan=z='min(1+{step:.3}*on/{frames},{max_zoom})':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d=1:s={width}x{height}:fps={frame_rate}",
                step = max_zoom - 1.0,
            ),
            Self::PixelFormat { format } => format!("format={format}"),
            Self::Equalize {
                brightness,
                contrast,
            } => format!("eq=brightness={brightness:.3}:contrast={contrast:.3}"),
            Self::BurnSubtitles { path, force_style } => format!(
                "subtitles={}:force_style='{}'",
                escape_filter_path(path),
                force_style.replace('\'', "")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub inputs: Vec<StreamLabel>,
    pub stage: FilterStage,
    pub output: StreamLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterGraph {
    sources: Vec<StreamLabel>,
    nodes: Vec<FilterNode>,
}

impl FilterGraph {
    #[must_use]
    pub fn new(sources: Vec<StreamLabel>) -> Self {
        Self {
            sources,
            nodes: Vec::new(),
        }
    }

    pub fn push(&mut self, inputs: Vec<StreamLabel>, stage: FilterStage, output: StreamLabel) {
        self.nodes.push(FilterNode {
            inputs,
            stage,
            output,
        });
    }

    #[must_use]
    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.stage.name()).collect()
    }

    /// 確認每個輸入標籤都是來源串流或由前面的階段產生
    pub fn validate(&self) -> Result<(), ComposeError> {
        let mut available: HashSet<&StreamLabel> = self.sources.iter().collect();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(missing) = node.inputs.iter().find(|l| !available.contains(l)) {
                return Err(ComposeError::FilterGraph {
                    message: format!("階段 {i} ({}) 使用了未定義的串流 {missing}", node.stage.name()),
                });
            }
            if !available.insert(&node.output) {
                return Err(ComposeError::FilterGraph {
                    message: format!("階段 {i} ({}) 重複產生串流 {}", node.stage.name(), node.output),
                });
            }
        }
        Ok(())
    }

    /// 轉為 `-filter_complex` 使用的文字
    #[must_use]
    pub fn render(&self) -> String {
        self.nodes
            .iter()
            .map(|node| {
                let inputs: String = node.inputs.iter().map(ToString::to_string).collect();
                format!("{inputs}{}{}", node.stage.render(), node.output)
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// 組裝濾鏡圖所需的參數
#[derive(Debug, Clone)]
pub struct GraphParams<'a> {
    pub background_dim_factor: f64,
    pub zoom_enabled: bool,
    pub audio_duration: f64,
    pub frame_rate: f64,
    pub caption_path: &'a Path,
    pub force_style: String,
}

#[derive(Debug, Clone)]
pub struct ComposedGraph {
    pub graph: FilterGraph,
    pub output_label: StreamLabel,
}

pub fn compose_filter_graph(params: &GraphParams<'_>) -> Result<ComposedGraph, ComposeError> {
    let dim = params.background_dim_factor;
    if !(0.0..=1.0).contains(&dim) {
        return Err(ValidationError::InvalidDimFactor(dim).into());
    }
    if !params.frame_rate.is_finite() || params.frame_rate <= 0.0 {
        return Err(ValidationError::InvalidFrameRate(params.frame_rate).into());
    }

    let mut stages = vec![
        FilterStage::ScaleUp {
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
        },
        FilterStage::CenterCrop {
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
        },
    ];

    if params.zoom_enabled {
        stages.push(FilterStage::ZoomIn {
            max_zoom: MAX_ZOOM,
            frames: zoom_frame_count(params.audio_duration, params.frame_rate),
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            frame_rate: params.frame_rate,
        });
    }

    stages.push(FilterStage::PixelFormat {
        format: PIXEL_FORMAT,
    });
    stages.push(FilterStage::Equalize {
        brightness: (dim - 1.0) * BRIGHTNESS_SCALE,
        contrast: 1.0 + (1.0 - dim) * CONTRAST_SCALE,
    });
    stages.push(FilterStage::BurnSubtitles {
        path: params.caption_path.to_path_buf(),
        force_style: params.force_style.clone(),
    });

    let source = StreamLabel::new(VIDEO_SOURCE);
    let output_label = StreamLabel::new(OUTPUT_LABEL);
    let mut graph = FilterGraph::new(vec![source.clone()]);

    let last = stages.len() - 1;
    let mut current = source;
    for (i, stage) in stages.into_iter().enumerate() {
        let output = if i == last {
            output_label.clone()
        } else {
            StreamLabel::new(format!("v{i}"))
        };
        graph.push(vec![current], stage, output.clone());
        current = output;
    }

    graph.validate()?;

    Ok(ComposedGraph {
        graph,
        output_label,
    })
}

/// 推近特效的總幀數，至少 1
#[must_use]
pub fn zoom_frame_count(duration: f64, frame_rate: f64) -> u64 {
    let frames = (duration.max(0.0) * frame_rate).ceil();
    if frames.is_finite() { (frames as u64).max(1) } else { 1 }
}

/// 將路徑轉成可直接放進濾鏡圖的參數值
///
/// ffmpeg 會先以濾鏡圖規則、再以濾鏡選項規則各解析一次，因此要跳脫兩層：
/// 選項層處理 `\ ' :`，濾鏡圖層處理 `\ ' [ ] , ;`。Windows 反斜線先改為 `/`。
#[must_use]
pub fn escape_filter_path(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let option_level = escape_chars(&normalized, &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
