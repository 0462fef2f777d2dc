//! Tuning knobs for the repeated-run loop.

use std::time::Duration;

use crate::def::{DEFAULT_RUN_COUNT, DEFAULT_RUN_TIMEOUT};
use crate::verdict::Mode;

/// Settings for [`run_scenario`](crate::verdict::run_scenario).
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Maximum number of runs. Modes other than [`Mode::Normal`] may stop
    /// earlier.
    pub runs: usize,
    /// Early-exit policy.
    pub mode: Mode,
    /// Deadline for a single run.
    pub run_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUN_COUNT,
            mode: Mode::Normal,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }
}

impl HarnessConfig {
    /// Default settings under the given early-exit policy.
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
