//! Step definitions.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::core::args::Args;
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::core::value::Value;
use crate::game::Game;

use super::requirement::Requirement;

/// Step body. The returned value can be saved for later steps.
pub type StepBody = Arc<dyn Fn(&mut Game, PlayerId, &Args) -> Result<Value> + Send + Sync>;

/// An atomic unit of resolution.
///
/// Requirements are checked in declaration order before the body runs.
#[derive(Clone)]
pub struct StepDef {
    /// Registered name.
    pub name: String,
    /// Arguments the body needs.
    pub requirements: SmallVec<[Requirement; 2]>,
    body: StepBody,
}

impl StepDef {
    /// Create a step with no requirements.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Game, PlayerId, &Args) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            requirements: SmallVec::new(),
            body: Arc::new(body),
        }
    }

    /// Add a requirement (builder pattern).
    #[must_use]
    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// First requirement not met by `args`.
    #[must_use]
    pub fn first_unmet(&self, game: &Game, player: PlayerId, args: &Args) -> Option<&Requirement> {
        self.requirements.iter().find(|req| !req.is_met(game, player, args))
    }

    /// Run the body.
    pub fn run(&self, game: &mut Game, player: PlayerId, args: &Args) -> Result<Value> {
        (self.body)(game, player, args)
    }
}

impl fmt::Debug for StepDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDef")
            .field("name", &self.name)
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}
