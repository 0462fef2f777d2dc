//! The step barrier itself: one shared counter, one lock, one condvar.
//!
//! All reads and writes of the counter happen while holding the mutex, so
//! every `wait_for`/`release` call observes and produces counter values in a
//! single total order. Waiters re-check their predicate in a loop after every
//! wakeup, because notifications are broadcast to all blocked threads and are
//! not specific to any one waiter's target.

use log::debug;
use parking_lot::{Condvar, Mutex};

/// Barrier over a global progress counter.
///
/// The counter holds the highest step announced so far, starting at 0.
/// Threads block in [`wait_for`](Self::wait_for) until the counter reaches
/// their target and advance it with [`release`](Self::release). The counter
/// never decreases.
pub struct StepBarrier {
    /// Highest announced step. Only touched while the mutex is held.
    counter: Mutex<u64>,
    /// Signaled (broadcast) whenever the counter may have advanced.
    step_done: Condvar,
}

impl StepBarrier {
    /// Creates a barrier with the counter at 0.
    ///
    /// `const`, so a barrier can also live in a plain `static`.
    pub const fn new() -> Self {
        Self {
            counter: Mutex::new(0),
            step_done: Condvar::new(),
        }
    }

    /// Blocks the calling thread until the counter reaches `target`.
    ///
    /// Returns immediately if the counter is already at or past `target`.
    /// Otherwise the thread sleeps on the condvar, re-checking the counter
    /// after every wakeup, until some [`release`](Self::release) call has
    /// advanced the counter far enough. When this returns, the counter is at
    /// least `target` (another thread may push it further right after).
    ///
    /// Before going to sleep the thread broadcasts a notification of its own:
    /// a thread about to block here may be the very thread an earlier waiter
    /// is stalled on, and the wakeup lets that waiter re-check its predicate.
    ///
    /// # Arguments
    /// * `target` - step the counter must reach before the call returns
    /// * `thread_id` - caller's identifier, used only in trace output
    pub fn wait_for(&self, target: u64, thread_id: u64) {
        let mut counter = self.counter.lock();
        if *counter >= target {
            return;
        }
        debug!("paused thread {} at {} until {}", thread_id, *counter, target);
        self.step_done.notify_all();
        while *counter < target {
            self.step_done.wait(&mut counter);
        }
        drop(counter);
        debug!("resumed thread {} at {}", thread_id, target);
    }

    /// Announces that step `target` has completed, advancing the counter to
    /// `target + 1` and waking every blocked waiter.
    ///
    /// If a later step has already been announced (counter > `target`), the
    /// call is a no-op: racing or out-of-order announcements never move the
    /// counter backwards. Announcing the same step twice therefore leaves the
    /// counter at `target + 1`, not `target + 2`.
    ///
    /// # Arguments
    /// * `target` - step being completed; the counter becomes `target + 1`
    /// * `thread_id` - caller's identifier, used only in trace output
    pub fn release(&self, target: u64, thread_id: u64) {
        let mut counter = self.counter.lock();
        if *counter > target {
            return;
        }
        *counter = target + 1;
        self.step_done.notify_all();
        debug!("thread {} released step {}", thread_id, *counter);
    }

    /// Snapshot of the counter.
    ///
    /// Advisory: the value may be stale by the time the caller looks at it.
    /// For coordination use [`wait_for`](Self::wait_for).
    pub fn current(&self) -> u64 {
        *self.counter.lock()
    }
}

impl Default for StepBarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fast_path_does_not_block() {
        let barrier = StepBarrier::new();
        barrier.wait_for(0, 1); // counter 0 >= target 0
        barrier.release(0, 1);
        barrier.wait_for(1, 1);
        assert_eq!(barrier.current(), 1);
    }

    #[test]
    fn release_advances_by_one() {
        let barrier = StepBarrier::new();
        barrier.release(0, 1);
        assert_eq!(barrier.current(), 1);
        barrier.release(1, 1);
        assert_eq!(barrier.current(), 2);
    }

    #[test]
    fn release_is_idempotent() {
        let barrier = StepBarrier::new();
        barrier.release(4, 1);
        barrier.release(4, 2);
        assert_eq!(barrier.current(), 5);
    }

    #[test]
    fn release_never_regresses() {
        let barrier = StepBarrier::new();
        barrier.release(5, 1);
        assert_eq!(barrier.current(), 6);
        barrier.release(2, 1);
        assert_eq!(barrier.current(), 6);
    }

    #[test]
    fn out_of_order_release_unblocks_skipped_targets() {
        let barrier = Arc::new(StepBarrier::new());
        barrier.release(2, 0);
        assert_eq!(barrier.current(), 3);

        // Waiters for targets 4, 5 and 6 must all be freed by release(5),
        // which jumps the counter straight from 3 to 6.
        let resumed = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (4..=6)
            .map(|target| {
                let barrier = barrier.clone();
                let resumed = resumed.clone();
                thread::spawn(move || {
                    barrier.wait_for(target, target);
                    resumed.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(resumed.load(Ordering::SeqCst), 0);

        barrier.release(5, 0);
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(resumed.load(Ordering::SeqCst), 3);
        assert_eq!(barrier.current(), 6);
    }

    #[test]
    fn waiter_wakes_exactly_at_its_target() {
        let barrier = Arc::new(StepBarrier::new());
        let woke = Arc::new(AtomicBool::new(false));

        let b = barrier.clone();
        let w = woke.clone();
        let handle = thread::spawn(move || {
            b.wait_for(10, 1);
            w.store(true, Ordering::SeqCst);
        });

        // Counter 9 is still short of the target.
        barrier.release(8, 0);
        thread::sleep(Duration::from_millis(50));
        assert!(!woke.load(Ordering::SeqCst));

        // Counter 10 satisfies it.
        barrier.release(9, 0);
        handle.join().unwrap();
        assert!(woke.load(Ordering::SeqCst));
    }

    #[test]
    fn concurrent_same_step_releases_count_once() {
        let barrier = Arc::new(StepBarrier::new());
        barrier.release(6, 0);

        let handles: Vec<_> = (0..8)
            .map(|thread_id| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.release(7, thread_id);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(barrier.current(), 8);
    }

    #[test]
    fn counter_is_monotonic_under_contention() {
        let barrier = Arc::new(StepBarrier::new());
        let handles: Vec<_> = (0..4)
            .map(|thread_id| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let mut last = 0;
                    for step in 0..1000u64 {
                        barrier.release(step, thread_id);
                        let seen = barrier.current();
                        assert!(seen >= last);
                        last = seen;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(barrier.current(), 1000);
    }
}
