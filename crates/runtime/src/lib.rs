mod config;
pub mod logging;
mod patterns;

pub use config::{DEFAULT_IGNORE_FILE, PROGRAM_LOG_LEVEL, PROGRAM_NAME};
pub use logging::init;
pub use patterns::{parse_patterns, read_pattern_file};
