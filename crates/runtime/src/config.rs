pub const PROGRAM_NAME: &str = "statwalk";
/// Environment variable holding the log level (`error` .. `trace`).
pub const PROGRAM_LOG_LEVEL: &str = "STATWALK_LOG_LEVEL";
/// Pattern file picked up from the walk root when present.
pub const DEFAULT_IGNORE_FILE: &str = ".statwalkignore";
