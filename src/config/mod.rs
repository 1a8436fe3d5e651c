pub mod load;
pub mod save;
pub mod types;

pub use types::{ComposerSettings, Config, MAX_RECENT_PATHS, RequestDefaults, UserSettings};
