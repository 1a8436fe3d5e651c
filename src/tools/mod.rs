mod background_picker;
mod ffprobe_info;
mod path_validator;
mod unique_token;

pub use background_picker::{list_backgrounds, pick_background};
pub use ffprobe_info::probe_audio_duration;
pub use path_validator::validate_file_exists;
pub use unique_token::unique_token;
