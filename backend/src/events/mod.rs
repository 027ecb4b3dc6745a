//! Forced dispatch events
//!
//! Exogenous instructions to put a given process on the CPU at a given tick,
//! preempting whoever holds it.

pub mod feed;
pub mod types;

pub use feed::EventFeed;
pub use types::ForcedDispatch;
