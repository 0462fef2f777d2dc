//! Repeated-run outcome classification.
//!
//! A scenario under investigation is replayed up to a configured number of
//! times. Each run reports whether the condition being hunted for was
//! reached; runs that blow the per-run deadline are recorded as timed out.
//! The verdict summarizes what the whole batch observed: the condition held
//! on every completed run, on none of them, on some of them, or no run
//! completed at all.

use std::sync::Arc;
use std::thread;

use crossbeam::channel::{bounded, RecvTimeoutError};
use log::{debug, info};

use crate::config::HarnessConfig;

/// Early-exit policy for the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stop at the first run that misses the condition.
    Strict,
    /// Run the configured number of times.
    Normal,
    /// Stop at the first run that reaches the condition.
    Permissive,
}

/// What a single run observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The condition was observed.
    Reached,
    /// The run completed without observing the condition.
    Missed,
    /// The run was still going at the deadline and was abandoned.
    TimedOut,
}

/// Summary over a whole batch of runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every completed run reached the condition.
    Always,
    /// No completed run reached the condition.
    Never,
    /// Some completed runs reached it, some did not.
    Sometimes,
    /// No run completed before its deadline.
    Timeout,
}

/// Per-outcome run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub reached: usize,
    pub missed: usize,
    pub timed_out: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Reached => self.reached += 1,
            Outcome::Missed => self.missed += 1,
            Outcome::TimedOut => self.timed_out += 1,
        }
    }

    /// Total runs recorded, including timed-out ones.
    pub fn runs(&self) -> usize {
        self.reached + self.missed + self.timed_out
    }
}

impl Verdict {
    /// Classifies a batch from its counters.
    pub fn classify(stats: &RunStats) -> Self {
        match (stats.reached > 0, stats.missed > 0) {
            (true, true) => Verdict::Sometimes,
            (true, false) => Verdict::Always,
            (false, true) => Verdict::Never,
            (false, false) => Verdict::Timeout,
        }
    }
}

/// Replays `scenario` per `config` and classifies the observations.
///
/// The scenario returns `true` when the condition under investigation was
/// reached during that run. Every run executes on a fresh thread; a run that
/// exceeds `config.run_timeout` is recorded as [`Outcome::TimedOut`] and its
/// thread is abandoned (a deadlocked run never finishes by itself, and the
/// barrier offers no cancellation).
pub fn run_scenario<F>(config: &HarnessConfig, scenario: F) -> (Verdict, RunStats)
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    let scenario = Arc::new(scenario);
    let mut stats = RunStats::default();
    for run in 0..config.runs {
        let outcome = run_once(config, scenario.clone());
        stats.record(outcome);
        debug!("run {} of {}: {:?}", run + 1, config.runs, outcome);
        match (config.mode, outcome) {
            (Mode::Strict, Outcome::Missed) => break,
            (Mode::Permissive, Outcome::Reached) => break,
            _ => {}
        }
    }
    let verdict = Verdict::classify(&stats);
    info!(
        "verdict {:?} after {} runs (reached={} missed={} timed_out={})",
        verdict,
        stats.runs(),
        stats.reached,
        stats.missed,
        stats.timed_out
    );
    (verdict, stats)
}

fn run_once<F>(config: &HarnessConfig, scenario: Arc<F>) -> Outcome
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    let (sender, receiver) = bounded(1);
    thread::spawn(move || {
        let reached = (*scenario)();
        // The receiver is gone if the run already timed out; the late
        // result is simply dropped.
        let _ = sender.send(reached);
    });
    match receiver.recv_timeout(config.run_timeout) {
        Ok(true) => Outcome::Reached,
        Ok(false) => Outcome::Missed,
        Err(RecvTimeoutError::Timeout) => Outcome::TimedOut,
        // The scenario thread died without reporting; the condition was
        // not observed on that run.
        Err(RecvTimeoutError::Disconnected) => Outcome::Missed,
    }
}
