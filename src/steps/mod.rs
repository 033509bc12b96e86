//! Step engine: suspendable, multi-step resolution.
//!
//! Actions enqueue steps; the game drains the queue front first. A step
//! whose requirements are unmet suspends the whole queue and the game
//! reports a [`Prompt`] until the awaited player supplies the value.
//!
//! ## Key Components
//!
//! - [`StepDef`]: Named body with ordered [`Requirement`]s
//! - [`PendingStep`]: Queued invocation with bound args, `save_as`, `using`
//! - [`StepQueue`]: Queue, result bindings and supplied information
//! - [`TriggerRegistry`]: Before/after hooks on named steps
//!
//! ## States
//!
//! `Idle` → `Running` → (`AwaitingInput` → `Running`)* → `Idle`. Result
//! bindings are flushed when the queue drains, so they never outlive the
//! action that created them.

mod definition;
mod queue;
mod requirement;
mod trigger;

pub use definition::{StepBody, StepDef};
pub use queue::{EngineState, PendingStep, StepQueue};
pub use requirement::{ArgShape, ArgType, Container, Predicate, Prompt, Requirement};
pub use trigger::{StepTrigger, TriggerHandler, TriggerId, TriggerRegistry, TriggerTiming};
