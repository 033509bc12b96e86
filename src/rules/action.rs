//! Action definitions: parameters, restrictions and bodies.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::core::args::Args;
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::game::Game;
use crate::steps::{ArgShape, ArgType, Predicate};

/// Action body.
pub type ActionBody = Arc<dyn Fn(&mut Game, PlayerId, &Args) -> Result<()> + Send + Sync>;

/// Declared action parameter, resolved from raw ids before the body runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// Argument name.
    pub name: String,
    /// Expected shape.
    pub shape: ArgShape,
}

/// Ordered restriction clauses.
///
/// Each clause has a reason; the first failing clause rejects the action
/// with its reason.
#[derive(Clone, Default)]
pub struct Restriction {
    clauses: Vec<(String, Predicate)>,
}

impl Restriction {
    /// No clauses: always allowed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause (builder pattern).
    #[must_use]
    pub fn clause<F>(mut self, reason: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Game, PlayerId, &Args) -> bool + Send + Sync + 'static,
    {
        self.clauses.push((reason.into(), Arc::new(test)));
        self
    }

    /// Reason of the first failing clause.
    #[must_use]
    pub fn check(&self, game: &Game, player: PlayerId, args: &Args) -> Option<&str> {
        self.clauses
            .iter()
            .find(|(_, test)| !test(game, player, args))
            .map(|(reason, _)| reason.as_str())
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// No clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Debug for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clauses.iter().map(|(reason, _)| reason)).finish()
    }
}

/// Something a player can do.
#[derive(Clone)]
pub struct ActionDef {
    /// Registered name.
    pub name: String,
    /// Declared parameters.
    pub params: SmallVec<[Param; 2]>,
    /// Legality clauses.
    pub restriction: Restriction,
    body: ActionBody,
}

impl ActionDef {
    /// Create an unrestricted action without parameters.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Game, PlayerId, &Args) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: SmallVec::new(),
            restriction: Restriction::new(),
            body: Arc::new(body),
        }
    }

    /// Declare a single-valued parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, arg_type: ArgType) -> Self {
        self.params.push(Param { name: name.into(), shape: ArgShape::single(arg_type) });
        self
    }

    /// Declare a list parameter.
    #[must_use]
    pub fn list_param(mut self, name: impl Into<String>, arg_type: ArgType) -> Self {
        self.params.push(Param { name: name.into(), shape: ArgShape::list(arg_type) });
        self
    }

    /// Add a restriction clause.
    #[must_use]
    pub fn restrict<F>(mut self, reason: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Game, PlayerId, &Args) -> bool + Send + Sync + 'static,
    {
        self.restriction = self.restriction.clause(reason, test);
        self
    }

    /// Run the body.
    pub fn run(&self, game: &mut Game, player: PlayerId, args: &Args) -> Result<()> {
        (self.body)(game, player, args)
    }
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("restriction", &self.restriction)
            .finish_non_exhaustive()
    }
}
