//! Harness pieces built on top of the `lockstep` step barrier.
//!
//! Two layers live here:
//!
//! - [`script`]: replay a fixed global order of per-thread actions. A
//!   [`Script`](script::Script) lists switch points in the order they must
//!   happen; the runner spawns one thread per participant and uses a private
//!   step barrier to force exactly that order, whatever the OS scheduler
//!   does.
//! - [`verdict`]: replay a whole scenario many times and classify what was
//!   observed across runs (`Always` / `Never` / `Sometimes` / `Timeout`),
//!   with a per-run deadline so a deadlocked run cannot hang the harness.
//!
//! The two compose: a scenario handed to the verdict runner will typically
//! build and run a `Script` internally, then report whether the condition
//! under investigation showed up.

pub mod config;
pub mod def;
pub mod error;
pub mod script;
pub mod verdict;

pub use config::HarnessConfig;
pub use error::ScriptError;
pub use script::Script;
pub use verdict::{Mode, Outcome, RunStats, Verdict};
