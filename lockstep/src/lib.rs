//! # Step-counter barrier
//!
//! Threads under test coordinate around a single monotonically increasing
//! progress counter. A thread calls [`StepBarrier::wait_for`] to suspend
//! itself until the counter has reached a target step, and some other thread
//! calls [`StepBarrier::release`] to announce that a step has completed,
//! waking every blocked waiter. Driving all cross-thread dependencies through
//! one counter pins the threads to a single, repeatable interleaving, which
//! is what a replay/verification harness needs.
//!
//! The counter starts at zero and only ever grows. `release` is idempotent:
//! announcing a step that a later announcement already covered is a no-op,
//! so racing announcers can never move the counter backwards.
//!
//! A `StepBarrier` is normally shared between threads via `Arc`:
//!
//! ```
//! use lockstep::StepBarrier;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let barrier = Arc::new(StepBarrier::new());
//! let b = barrier.clone();
//! let waiter = thread::spawn(move || {
//!     b.wait_for(1, 0); // blocks until step 0 is announced
//! });
//! barrier.release(0, 1); // counter becomes 1, the waiter resumes
//! waiter.join().unwrap();
//! ```
//!
//! For harnesses that instrument code with no place to thread an `Arc`
//! through, [`global`] exposes one process-wide barrier behind free
//! functions.
//!
//! Blocking has no timeout: a target step that nobody ever announces blocks
//! its waiter forever. Arranging a sufficient `release` for every `wait_for`
//! is the caller's obligation; an outer harness that wants an escape hatch
//! must impose its own deadline (see the `lockstep-harness` crate).

pub mod barrier;
pub mod global;

pub use barrier::StepBarrier;
