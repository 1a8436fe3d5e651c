use super::request::{CaptionSource, CompositionRequest, ExplicitCue};
use super::srt_time::format_srt_time;
use crate::error::{ComposeError, ValidationError};
use log::debug;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// 單一字幕
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionCue {
    /// 從 1 開始的連續編號
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// 依請求建立字幕軌
///
/// 有明確字幕列表時驗證後直接使用；否則將旁白依空白切詞，
/// 以音訊長度平均分配給每個詞（不做語意加權）
pub fn build_caption_track(
    request: &CompositionRequest,
    total_duration: f64,
) -> Result<Vec<CaptionCue>, ComposeError> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(ValidationError::InvalidDuration(total_duration).into());
    }

    let cues = match request.caption_source()? {
        CaptionSource::Explicit(entries) => validate_explicit_cues(entries)?,
        CaptionSource::Narration(text) => split_evenly(text, total_duration),
    };

    debug!("建立 {} 個字幕，總長 {total_duration:.3}s", cues.len());
    Ok(cues)
}

fn validate_explicit_cues(entries: &[ExplicitCue]) -> Result<Vec<CaptionCue>, ValidationError> {
    let mut previous_start: Option<f64> = None;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let index = i + 1;
            let valid_times = entry.start.is_finite()
                && entry.end.is_finite()
                && entry.start >= 0.0
                && entry.end > entry.start;
            if !valid_times {
                return Err(ValidationError::InvalidCue {
                    index,
                    start: entry.start,
                    end: entry.end,
                });
            }
            if previous_start.is_some_and(|prev| entry.start < prev) {
                return Err(ValidationError::NonMonotonic { index });
            }
            previous_start = Some(entry.start);

            Ok(CaptionCue {
                index,
                start: entry.start,
                end: entry.end,
                text: entry.text.clone(),
            })
        })
        .collect()
}

fn split_evenly(text: &str, total_duration: f64) -> Vec<CaptionCue> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        tokens.push("");
    }

    let count = tokens.len();
    let slice = total_duration / count as f64;

    tokens
        .into_iter()
        .enumerate()
        .map(|(i, token)| {
            let end = if i + 1 == count {
                total_duration
            } else {
                (i + 1) as f64 * slice
            };
            CaptionCue {
                index: i + 1,
                start: i as f64 * slice,
                end,
                text: token.to_string(),
            }
        })
        .collect()
}

/// 轉為 SRT 文字
#[must_use]
pub fn render_srt(cues: &[CaptionCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        // 字幕內的空行會被當成分隔，須移除
        let text = cue
            .text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let _ = writeln!(out, "{}", cue.index);
        let _ = writeln!(
            out,
            "{} --> {}",
            format_srt_time(cue.start),
            format_srt_time(cue.end)
        );
        let _ = writeln!(out, "{text}");
        out.push('\n');
    }
    out
}

/// 以 UTF-8 寫入 SRT 檔
pub fn write_srt(path: &Path, cues: &[CaptionCue]) -> Result<(), ComposeError> {
    fs::write(path, render_srt(cues)).map_err(|source| ComposeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
