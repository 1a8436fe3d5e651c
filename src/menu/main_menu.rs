use crate::component::video_composer::prompt_style;
use crate::config::save::save_settings;
use crate::config::types::Config;
use crate::menu::handlers::{run_batch_composer, run_style_list, run_video_composer};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const ESC_HINT: &str = "（按 ESC 返回）";

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 自動短影片產生器 ===").cyan().bold());
    println!("{}", style(ESC_HINT).dim());

    let options = vec!["產生短影片", "批次產生 (JSON)", "字幕樣式一覽", "設定", "離開"];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_video_composer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_batch_composer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(2) => {
            run_style_list(term)?;
            Ok(true)
        }
        Some(3) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(4) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== 設定 ===").cyan().bold());
        println!("{}", style(ESC_HINT).dim());

        let composer = &config.settings.composer;
        let defaults = &config.settings.defaults;
        println!(
            "{}",
            style(format!(
                "背景: {} | 輸出: {} | 幀率: {} | 編碼: {}/{} | 樣式: {} | 亮度: {} | 推近: {}",
                composer.background_dir.display(),
                composer.output_dir.display(),
                composer.frame_rate,
                composer.video_codec,
                composer.audio_codec,
                defaults.style,
                defaults.background_dim_factor,
                if defaults.zoom_enabled { "開" } else { "關" }
            ))
            .dim()
        );

        let options = vec![
            "背景影片資料夾",
            "輸出資料夾",
            "輸出幀率",
            "預設字幕樣式",
            "預設背景亮度",
            "預設推近特效",
            "編碼器",
            "返回",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要修改的項目")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => {
                let current = config.settings.composer.background_dir.clone();
                config.settings.composer.background_dir = prompt_path("背景影片資料夾", &current)?;
            }
            Some(1) => {
                let current = config.settings.composer.output_dir.clone();
                let path = prompt_path("輸出資料夾", &current)?;
                config.settings.composer.output_dir.clone_from(&path);
                config.settings.composer.temp_dir = path;
            }
            Some(2) => {
                config.settings.composer.frame_rate = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("輸出幀率")
                    .default(config.settings.composer.frame_rate)
                    .validate_with(|v: &f64| {
                        if v.is_finite() && *v > 0.0 {
                            Ok(())
                        } else {
                            Err("幀率必須大於 0")
                        }
                    })
                    .interact_text()?;
            }
            Some(3) => {
                config.settings.defaults.style = prompt_style(config.settings.defaults.style)?;
            }
            Some(4) => {
                config.settings.defaults.background_dim_factor =
                    Input::with_theme(&ColorfulTheme::default())
                        .with_prompt("背景亮度係數 (0 = 最暗, 1 = 原始)")
                        .default(config.settings.defaults.background_dim_factor)
                        .validate_with(|v: &f64| {
                            if (0.0..=1.0).contains(v) {
                                Ok(())
                            } else {
                                Err("必須介於 0 與 1 之間")
                            }
                        })
                        .interact_text()?;
            }
            Some(5) => {
                config.settings.defaults.zoom_enabled = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt("預設啟用緩慢推近特效？")
                    .default(config.settings.defaults.zoom_enabled)
                    .interact()?;
            }
            Some(6) => show_encoder_settings(config)?,
            Some(7) | None => break, // ESC or back
            _ => unreachable!(),
        }

        save_settings(&config.settings)?;
    }

    Ok(())
}

fn show_encoder_settings(config: &mut Config) -> Result<()> {
    let composer = &mut config.settings.composer;

    composer.video_codec = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("視訊編碼器")
        .default(composer.video_codec.clone())
        .interact_text()?;
    composer.audio_codec = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("音訊編碼器")
        .default(composer.audio_codec.clone())
        .interact_text()?;
    composer.preset = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("編碼預設 (preset)")
        .default(composer.preset.clone())
        .interact_text()?;
    composer.crf = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("CRF (0-51)")
        .default(composer.crf)
        .validate_with(|v: &u8| if *v <= 51 { Ok(()) } else { Err("CRF 必須介於 0 與 51 之間") })
        .interact_text()?;

    Ok(())
}

fn prompt_path(prompt: &str, current: &std::path::Path) -> Result<PathBuf> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current.to_string_lossy().to_string())
        .interact_text()?;
    Ok(PathBuf::from(input.trim()))
}
