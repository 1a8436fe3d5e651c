use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::sync::LazyLock;

/// 二進位浮點誤差容許值（毫秒），避免 2.299 被截成 298
const MS_EPSILON: f64 = 1e-6;

static SRT_TIME_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(\d{2,}):([0-5]\d):([0-5]\d),(\d{3})$"));

/// 將秒數轉為字幕時間格式 `HH:MM:SS,mmm`
///
/// 時分秒以整數除法截斷，毫秒取小數部分並截斷，永遠不會進位
/// （1.9995 秒輸出 `00:00:01,999`）。負數視為 0。
#[must_use]
pub fn format_srt_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    let whole = seconds.trunc();
    let total_secs = whole as u64;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;

    let ms = ((seconds - whole) * 1000.0 + MS_EPSILON).floor().min(999.0) as u64;

    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// 解析 `HH:MM:SS,mmm` 回秒數
pub fn parse_srt_time(raw: &str) -> Result<f64> {
    let time_regex = SRT_TIME_REGEX
        .as_ref()
        .map_err(|e| anyhow!("字幕時間規則編譯失敗: {e}"))?;
    let caps = time_regex
        .captures(raw.trim())
        .ok_or_else(|| anyhow!("字幕時間格式錯誤: {raw}"))?;

    let field = |i: usize| -> Result<u64> {
        caps[i]
            .parse::<u64>()
            .with_context(|| format!("字幕時間欄位無法解析: {raw}"))
    };

    let total_ms = (field(1)? * 3600 + field(2)? * 60 + field(3)?) * 1000 + field(4)?;
    Ok(total_ms as f64 / 1000.0)
}
