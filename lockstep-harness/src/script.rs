//! Scripted interleavings.
//!
//! A script is an ordered list of switch points: "now thread T runs this
//! action". The position of a step in the list is its step number on a
//! private [`StepBarrier`]. Each participating thread walks its own steps in
//! order, waiting for the step's turn, running the action, then announcing
//! the step so the next one in the global order can proceed. The result is
//! that the actions execute in exactly the listed order, independent of how
//! the OS schedules the threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use log::debug;

use lockstep::StepBarrier;

use crate::error::ScriptError;

type Action = Box<dyn FnOnce() + Send + 'static>;

/// Ordered list of per-thread actions, built with [`step`](Self::step) and
/// executed with [`run`](Self::run).
///
/// ```
/// use lockstep_harness::Script;
/// use std::sync::{Arc, Mutex};
///
/// let order = Arc::new(Mutex::new(Vec::new()));
/// let push = |tag: &'static str| {
///     let order = order.clone();
///     move || order.lock().unwrap().push(tag)
/// };
/// Script::new()
///     .step(0, push("a1"))
///     .step(1, push("b1"))
///     .step(0, push("a2"))
///     .run()
///     .unwrap();
/// assert_eq!(*order.lock().unwrap(), ["a1", "b1", "a2"]);
/// ```
#[derive(Default)]
pub struct Script {
    steps: Vec<(u64, Action)>,
}

impl Script {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a switch point: the next step in the global order belongs to
    /// `thread_id` and runs `action`.
    pub fn step(mut self, thread_id: u64, action: impl FnOnce() + Send + 'static) -> Self {
        self.steps.push((thread_id, Box::new(action)));
        self
    }

    /// Number of steps recorded so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Spawns one thread per scripted thread id and replays the steps in the
    /// recorded order, coordinated through a fresh step barrier.
    ///
    /// A panicking action does not stall the script: its thread stops
    /// running actions but keeps announcing its remaining steps, so the
    /// other threads drain normally. The first panicking thread is reported
    /// as [`ScriptError::ThreadPanicked`] after every thread has joined.
    pub fn run(self) -> Result<(), ScriptError> {
        if self.steps.is_empty() {
            return Err(ScriptError::EmptyScript);
        }
        let total = self.steps.len();

        // Split the global order into per-thread step lists, keeping the
        // first-appearance order of thread ids for deterministic spawning.
        let mut per_thread: Vec<(u64, Vec<(u64, Action)>)> = Vec::new();
        for (position, (thread_id, action)) in self.steps.into_iter().enumerate() {
            let slot = (position as u64, action);
            match per_thread.iter_mut().find(|(id, _)| *id == thread_id) {
                Some((_, slots)) => slots.push(slot),
                None => per_thread.push((thread_id, vec![slot])),
            }
        }
        debug!(
            "running script: {} steps across {} threads",
            total,
            per_thread.len()
        );

        let barrier = Arc::new(StepBarrier::new());
        let handles: Vec<_> = per_thread
            .into_iter()
            .map(|(thread_id, slots)| {
                let barrier = barrier.clone();
                let handle = thread::spawn(move || {
                    let mut panicked = false;
                    for (step, action) in slots {
                        barrier.wait_for(step, thread_id);
                        if !panicked {
                            panicked = panic::catch_unwind(AssertUnwindSafe(action)).is_err();
                        }
                        barrier.release(step, thread_id);
                    }
                    panicked
                });
                (thread_id, handle)
            })
            .collect();

        let mut result = Ok(());
        for (thread_id, handle) in handles {
            // The closure catches action panics itself, so join only fails
            // if the thread died outside an action.
            let panicked = handle.join().unwrap_or(true);
            if panicked && result.is_ok() {
                result = Err(ScriptError::ThreadPanicked(thread_id));
            }
        }
        result
    }
}
