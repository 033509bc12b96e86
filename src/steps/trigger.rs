//! Step triggers.
//!
//! A trigger watches one step by name and runs immediately before or after
//! its body, receiving the step's player and arguments. Triggers fire in
//! registration order and can be removed by id, so rules can attach them
//! when a card enters play and detach them when it leaves.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::args::Args;
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::game::Game;

/// Unique identifier for a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl TriggerId {
    /// Create a new trigger ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

/// When the trigger fires relative to the step body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerTiming {
    /// Before the body, after requirements pass.
    Before,
    /// After the body.
    #[default]
    After,
}

/// Trigger callback.
pub type TriggerHandler = Arc<dyn Fn(&mut Game, PlayerId, &Args) -> Result<()> + Send + Sync>;

/// A registered trigger.
#[derive(Clone)]
pub struct StepTrigger {
    /// Assigned id.
    pub id: TriggerId,
    /// Watched step name.
    pub step: String,
    /// Before or after the body.
    pub timing: TriggerTiming,
    handler: TriggerHandler,
}

impl fmt::Debug for StepTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepTrigger")
            .field("id", &self.id)
            .field("step", &self.step)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

/// Registry for step triggers.
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    /// Triggers in registration order.
    triggers: Vec<StepTrigger>,

    /// Next trigger ID to allocate.
    next_id: u32,
}

impl TriggerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger, returns its ID.
    pub fn register<F>(&mut self, step: impl Into<String>, timing: TriggerTiming, handler: F) -> TriggerId
    where
        F: Fn(&mut Game, PlayerId, &Args) -> Result<()> + Send + Sync + 'static,
    {
        let id = TriggerId::new(self.next_id);
        self.next_id += 1;
        self.triggers.push(StepTrigger {
            id,
            step: step.into(),
            timing,
            handler: Arc::new(handler),
        });
        id
    }

    /// Unregister a trigger. Returns false if the id is unknown.
    pub fn unregister(&mut self, id: TriggerId) -> bool {
        let before = self.triggers.len();
        self.triggers.retain(|t| t.id != id);
        self.triggers.len() != before
    }

    /// Handlers watching `step` at `timing`, in registration order.
    #[must_use]
    pub fn handlers(&self, step: &str, timing: TriggerTiming) -> Vec<TriggerHandler> {
        self.triggers
            .iter()
            .filter(|t| t.step == step && t.timing == timing)
            .map(|t| Arc::clone(&t.handler))
            .collect()
    }

    /// Get a trigger by ID.
    #[must_use]
    pub fn get(&self, id: TriggerId) -> Option<&StepTrigger> {
        self.triggers.iter().find(|t| t.id == id)
    }

    /// Get total trigger count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
