//! 功能元件模組

pub mod video_composer;

pub use video_composer::VideoComposer;
