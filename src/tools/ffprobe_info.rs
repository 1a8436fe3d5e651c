use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

/// 使用 ffprobe 取得音訊長度（秒）
pub fn probe_audio_duration(ffprobe_path: &str, path: &Path) -> Result<f64> {
    let output = Command::new(ffprobe_path)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {}", stderr.trim());
    }

    parse_duration_output(&String::from_utf8_lossy(&output.stdout))
}

/// 解析 ffprobe JSON 輸出中的 `format.duration`
fn parse_duration_output(stdout: &str) -> Result<f64> {
    let probe: FfprobeOutput =
        serde_json::from_str(stdout).with_context(|| "無法解析 ffprobe 輸出")?;

    let raw = probe
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| anyhow!("ffprobe 輸出缺少 duration 欄位"))?;

    let duration: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("duration 欄位不是數字: {raw}"))?;

    if !duration.is_finite() || duration <= 0.0 {
        bail!("音訊長度無效: {duration}");
    }

    Ok(duration)
}
