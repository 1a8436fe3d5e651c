use super::media_tool::MediaToolkit;
use super::orchestrator::Composer;
use super::request::CompositionRequest;
use crate::tools::validate_file_exists;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Completed(PathBuf),
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub index: usize,
    pub audio_path: PathBuf,
    pub status: BatchStatus,
}

impl BatchOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, BatchStatus::Completed(_))
    }
}

/// 讀取批次檔（JSON 陣列，每個元素為一個合成請求）
pub fn load_batch_file(path: &Path) -> Result<Vec<CompositionRequest>> {
    validate_file_exists(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("無法讀取批次檔: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("無法解析批次檔: {}", path.display()))
}

/// 平行執行多個合成請求
///
/// 每個請求各自使用自己的音訊與輸出路徑；結果順序與輸入相同。
/// 收到中斷信號後，尚未開始的請求標記為取消
pub fn run_batch<T: MediaToolkit>(
    composer: &Composer<T>,
    requests: Vec<CompositionRequest>,
    shutdown_signal: &Arc<AtomicBool>,
    progress: Option<&ProgressBar>,
) -> Vec<BatchOutcome> {
    info!("開始批次合成，共 {} 個請求", requests.len());
    let conflicts = conflicting_outputs(&requests);

    requests
        .into_par_iter()
        .enumerate()
        .map(|(index, request)| {
            let status = if shutdown_signal.load(Ordering::SeqCst) {
                BatchStatus::Cancelled
            } else if let Some(first) = conflicts.get(&index) {
                BatchStatus::Failed(format!("輸出路徑與第 {} 個請求重複", first + 1))
            } else {
                match composer.create_video(&request) {
                    Ok(path) => BatchStatus::Completed(path),
                    Err(e) => {
                        error!("批次請求 [{}] 失敗: {e}", index + 1);
                        BatchStatus::Failed(e.to_string())
                    }
                }
            };

            if let Some(bar) = progress {
                bar.inc(1);
            }

            BatchOutcome {
                index,
                audio_path: request.audio_path,
                status,
            }
        })
        .collect()
}

/// 找出輸出路徑與前面請求重複的請求，回傳 index -> 第一次出現的 index
fn conflicting_outputs(requests: &[CompositionRequest]) -> HashMap<usize, usize> {
    let mut seen: HashMap<&Path, usize> = HashMap::new();
    let mut conflicts = HashMap::new();

    for (index, request) in requests.iter().enumerate() {
        if let Some(path) = request.output_path.as_deref() {
            if let Some(&first) = seen.get(path) {
                warn!("批次請求 [{}] 的輸出路徑重複: {}", index + 1, path.display());
                conflicts.insert(index, first);
            } else {
                seen.insert(path, index);
            }
        }
    }

    conflicts
}
