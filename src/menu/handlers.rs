use crate::component::VideoComposer;
use crate::component::video_composer::print_styles;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_video_composer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let composer = VideoComposer::new(Arc::clone(shutdown_signal));

    if let Err(e) = composer.run(config) {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_batch_composer(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let composer = VideoComposer::new(Arc::clone(shutdown_signal));

    if let Err(e) = composer.run_batch(config) {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_style_list(term: &Term) -> Result<()> {
    print_styles();
    pause(term)?;
    Ok(())
}
