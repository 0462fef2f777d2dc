use std::time::Duration;

/// How many times a scenario is replayed when the caller does not say.
pub const DEFAULT_RUN_COUNT: usize = 100;

/// Per-run deadline. A run that is still going after this long is treated
/// as deadlocked.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(10);
