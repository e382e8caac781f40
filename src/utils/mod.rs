pub mod constants;
pub mod encoding;
pub mod progress;

pub use constants::*;
pub use encoding::{decode_text, read_text_file};
pub use progress::ProgressReporter;
