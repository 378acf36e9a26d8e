//! Change events module.
//!
//! Provides the normalized change-event type published after successful
//! mutations and the sink trait used to emit them. Runtime adapters (the
//! server's broadcast bus, test harnesses) implement the sink.

mod change_event;
mod sink;

pub use change_event::*;
pub use sink::*;
