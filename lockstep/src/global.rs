//! Process-wide step barrier.
//!
//! Instrumented code often has no way to thread an `Arc<StepBarrier>` through
//! to every call site, so this module keeps a single barrier for the whole
//! process and exposes it behind free functions. The barrier is constructed
//! exactly once, no matter which thread touches it first: `lazy_static`
//! drives the construction through a one-time initializer, so concurrent
//! first calls cannot double-construct it or observe it half-built.
//!
//! The global counter is never reset. Callers that need a fresh counter per
//! run should own their own [`StepBarrier`] instead.

use lazy_static::lazy_static;
use log::debug;

use crate::barrier::StepBarrier;

lazy_static! {
    static ref BARRIER: StepBarrier = {
        debug!("initialized the global step barrier");
        StepBarrier::new()
    };
}

/// Blocks until the global counter reaches `target`.
///
/// See [`StepBarrier::wait_for`].
pub fn wait_for(target: u64, thread_id: u64) {
    BARRIER.wait_for(target, thread_id)
}

/// Announces step `target` on the global barrier.
///
/// See [`StepBarrier::release`].
pub fn release(target: u64, thread_id: u64) {
    BARRIER.release(target, thread_id)
}

/// Snapshot of the global counter.
pub fn current() -> u64 {
    BARRIER.current()
}
