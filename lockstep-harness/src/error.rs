#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Script: no steps to run")]
    EmptyScript,

    #[error("Script: thread {0} panicked during a scripted action")]
    ThreadPanicked(u64),
}
