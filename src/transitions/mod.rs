//! Transitions: the per-player diff stream.
//!
//! Every observable mutation (zone add/remove, tracked attribute change,
//! game over) produces a [`Transition`]. The [`TransitionLog`] queues them
//! per player until the caller drains them after an action.

mod log;
mod transition;

pub use log::TransitionLog;
pub use transition::Transition;
