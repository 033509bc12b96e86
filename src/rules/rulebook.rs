//! Registration tables for actions, steps and initial triggers.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::args::Args;
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::game::Game;
use crate::steps::{StepDef, TriggerId, TriggerRegistry, TriggerTiming};

use super::action::ActionDef;

/// Name of the built-in action that answers a prompt.
pub const SEND_INFORMATION: &str = "send_information";

/// Everything a game registers up front.
///
/// Filled by [`GameRules::register`](super::GameRules::register) and then
/// shared read-only by every clone of the game.
#[derive(Clone, Debug, Default)]
pub struct Rulebook {
    actions: FxHashMap<String, Arc<ActionDef>>,
    steps: FxHashMap<String, Arc<StepDef>>,
    triggers: TriggerRegistry,
}

impl Rulebook {
    /// Create an empty rulebook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action.
    ///
    /// Panics if the name is taken or reserved.
    pub fn action(&mut self, action: ActionDef) -> &mut Self {
        assert!(action.name != SEND_INFORMATION, "{} is a built-in action", SEND_INFORMATION);
        assert!(!self.actions.contains_key(&action.name), "Action {} already registered", action.name);
        debug!(action = %action.name, params = action.params.len(), "registered action");
        self.actions.insert(action.name.clone(), Arc::new(action));
        self
    }

    /// Register a step.
    ///
    /// Panics if the name is taken.
    pub fn step(&mut self, step: StepDef) -> &mut Self {
        assert!(!self.steps.contains_key(&step.name), "Step {} already registered", step.name);
        debug!(step = %step.name, requirements = step.requirements.len(), "registered step");
        self.steps.insert(step.name.clone(), Arc::new(step));
        self
    }

    /// Register a trigger present from the start of every game.
    pub fn trigger<F>(&mut self, step: impl Into<String>, timing: TriggerTiming, handler: F) -> TriggerId
    where
        F: Fn(&mut Game, PlayerId, &Args) -> Result<()> + Send + Sync + 'static,
    {
        self.triggers.register(step, timing, handler)
    }

    /// Look up an action.
    #[must_use]
    pub fn get_action(&self, name: &str) -> Option<&Arc<ActionDef>> {
        self.actions.get(name)
    }

    /// Look up a step.
    #[must_use]
    pub fn get_step(&self, name: &str) -> Option<&Arc<StepDef>> {
        self.steps.get(name)
    }

    /// Has a step with this name been registered?
    #[must_use]
    pub fn has_step(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Registered action names, sorted.
    #[must_use]
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Initial triggers.
    #[must_use]
    pub fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }
}
