//! Working timer: state machine and display derivations

pub mod engine;
pub mod progress;

pub use engine::{RunId, TickOutcome, TimerEngine};
pub use progress::{format_remaining, progress, ProgressAnimator, ProgressView};
