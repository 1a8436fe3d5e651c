//! 短影片合成元件
//!
//! 旁白文字 → 逐詞字幕 → 濾鏡圖（裁切、調暗、推近、燒入字幕）→ ffmpeg 合成

mod batch_runner;
mod caption_track;
mod ffmpeg_command;
mod filter_graph;
mod main;
mod media_tool;
mod orchestrator;
mod request;
mod srt_time;
mod style_profile;
mod temp_caption;

pub use batch_runner::{BatchOutcome, BatchStatus, load_batch_file, run_batch};
pub use caption_track::{CaptionCue, build_caption_track, render_srt, write_srt};
pub use ffmpeg_command::{EncodeJob, FfmpegCommand};
pub use filter_graph::{
    ComposedGraph, FilterGraph, FilterNode, FilterStage, GraphParams, MAX_ZOOM, OUTPUT_LABEL,
    StreamLabel, TARGET_HEIGHT, TARGET_WIDTH, compose_filter_graph, zoom_frame_count,
};
pub use main::{VideoComposer, print_styles, prompt_style};
pub use media_tool::{FfmpegToolkit, MediaToolkit};
pub use orchestrator::Composer;
pub use request::{CompositionRequest, ExplicitCue};
pub use srt_time::{format_srt_time, parse_srt_time};
pub use style_profile::{CaptionStyle, StyleProfile, resolve_style};
pub use temp_caption::TempCaptionFile;
