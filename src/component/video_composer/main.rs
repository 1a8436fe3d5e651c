use super::batch_runner::{BatchStatus, load_batch_file, run_batch};
use super::orchestrator::Composer;
use super::request::CompositionRequest;
use super::style_profile::CaptionStyle;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

pub struct VideoComposer {
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoComposer {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    /// 互動式產生單支短影片
    pub fn run(&self, config: &mut Config) -> Result<()> {
        println!("{}", style("=== 產生短影片 ===").cyan().bold());

        let text: String = Input::new()
            .with_prompt("請輸入旁白文字")
            .interact_text()?;

        let mut request = CompositionRequest::with_defaults(text.trim(), &config.settings.defaults);
        request.audio_path = self.prompt_audio_path(config)?;
        request.style = prompt_style(request.style)?;

        request.background_dim_factor = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("背景亮度係數 (0 = 最暗, 1 = 原始)")
            .default(request.background_dim_factor)
            .validate_with(|v: &f64| {
                if (0.0..=1.0).contains(v) {
                    Ok(())
                } else {
                    Err("必須介於 0 與 1 之間")
                }
            })
            .interact_text()?;

        request.zoom_enabled = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("啟用緩慢推近特效？")
            .default(request.zoom_enabled)
            .interact()?;

        let audio = request.audio_path.to_string_lossy().to_string();
        add_recent_path(&mut config.settings, &audio);
        if let Err(e) = save_settings(&config.settings) {
            warn!("無法儲存設定: {e:#}");
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_message("合成中...");
        spinner.enable_steady_tick(Duration::from_millis(120));

        let composer = Composer::new(config.settings.composer.clone());
        let result = composer.create_video(&request);
        spinner.finish_and_clear();

        match result {
            Ok(path) => {
                println!(
                    "{} {}",
                    style("影片已輸出:").green().bold(),
                    path.display()
                );
                Ok(())
            }
            Err(e) => {
                error!("影片合成失敗: {e}");
                Err(e.into())
            }
        }
    }

    /// 讀取批次檔並平行合成
    pub fn run_batch(&self, config: &Config) -> Result<()> {
        println!("{}", style("=== 批次產生短影片 ===").cyan().bold());

        let input: String = Input::new()
            .with_prompt("請輸入批次檔路徑 (JSON)")
            .interact_text()?;
        let requests = load_batch_file(&PathBuf::from(input.trim()))?;

        if requests.is_empty() {
            println!("{}", style("批次檔中沒有任何請求").yellow());
            return Ok(());
        }

        let bar = ProgressBar::new(requests.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
                .progress_chars("=>-"),
        );

        let composer = Composer::new(config.settings.composer.clone());
        let outcomes = run_batch(&composer, requests, &self.shutdown_signal, Some(&bar));
        bar.finish_and_clear();

        println!();
        println!("{}", style("=== 批次合成摘要 ===").cyan().bold());
        for outcome in &outcomes {
            let label = format!("  {}. {}", outcome.index + 1, outcome.audio_path.display());
            match &outcome.status {
                BatchStatus::Completed(path) => {
                    println!("{label} -> {}", style(path.display()).green());
                }
                BatchStatus::Failed(message) => {
                    println!("{label} {}", style(format!("失敗: {message}")).red());
                }
                BatchStatus::Cancelled => println!("{label} {}", style("已取消").yellow()),
            }
        }

        let completed = outcomes.iter().filter(|o| o.is_completed()).count();
        info!("批次合成完成 - 成功: {completed}, 總計: {}", outcomes.len());
        Ok(())
    }

    fn prompt_audio_path(&self, config: &Config) -> Result<PathBuf> {
        let default = config
            .settings
            .recent_audio_paths
            .first()
            .cloned()
            .unwrap_or_else(|| config.settings.defaults.audio_path.to_string_lossy().to_string());

        let path: String = Input::new()
            .with_prompt("旁白音訊路徑")
            .default(default)
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }
}

pub fn prompt_style(current: CaptionStyle) -> Result<CaptionStyle> {
    let names: Vec<&str> = CaptionStyle::ALL.iter().map(|s| s.name()).collect();
    let default = CaptionStyle::ALL
        .iter()
        .position(|s| *s == current)
        .unwrap_or_default();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("字幕樣式")
        .items(&names)
        .default(default)
        .interact()?;

    Ok(CaptionStyle::ALL[selection])
}

/// 列出所有字幕樣式
pub fn print_styles() {
    println!("{}", style("=== 字幕樣式 ===").cyan().bold());
    for caption_style in CaptionStyle::ALL {
        let profile = caption_style.profile();
        println!(
            "  {} {}",
            style(format!("{:<8}", caption_style.name())).bold(),
            style(profile.force_style()).dim()
        );
    }
}
