//! Background tasks module
//!
//! Recurring tickers that run alongside the HTTP server, each owned through
//! a `TaskHandle` by the component that spawned it.

pub mod clock_ticker;
pub mod countdown;
pub mod handle;

// Re-export main functions
pub use clock_ticker::clock_ticker_task;
pub use countdown::countdown_task;
pub use handle::TaskHandle;
