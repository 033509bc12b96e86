//! Argument shapes, step requirements and input prompts.
//!
//! The same [`ArgShape`] describes action parameters and step
//! requirements. Both resolve raw ids coming from the transport into
//! entity references before any rule code sees them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::args::Args;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::core::registry::Registry;
use crate::core::value::Value;
use crate::game::Game;

/// Predicate over the full argument set of a step or action.
pub type Predicate = Arc<dyn Fn(&Game, PlayerId, &Args) -> bool + Send + Sync>;

/// Expected type of an argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgType {
    /// Anything but `Null`.
    Any,
    /// A boolean.
    Bool,
    /// An integer.
    Int,
    /// A string.
    Text,
    /// A registered entity, optionally of one kind.
    Entity(Option<String>),
}

impl ArgType {
    /// Entity of a given kind.
    pub fn entity(kind: impl Into<String>) -> Self {
        ArgType::Entity(Some(kind.into()))
    }

    fn matches(&self, registry: &Registry, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (ArgType::Any, _) => true,
            (ArgType::Bool, Value::Bool(_)) | (ArgType::Int, Value::Int(_)) | (ArgType::Text, Value::Text(_)) => true,
            (ArgType::Entity(kind), Value::Entity(id)) => registry.lookup(*id, kind.as_deref()).is_some(),
            _ => false,
        }
    }

    fn resolve(&self, registry: &Registry, value: Value) -> Option<Value> {
        let ArgType::Entity(kind) = self else {
            return self.matches(registry, &value).then_some(value);
        };
        let id = match value {
            Value::Entity(id) => id,
            Value::Int(raw) => EntityId(u32::try_from(raw).ok()?),
            _ => return None,
        };
        registry.lookup(id, kind.as_deref()).map(|_| Value::Entity(id))
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Any => write!(f, "value"),
            ArgType::Bool => write!(f, "bool"),
            ArgType::Int => write!(f, "int"),
            ArgType::Text => write!(f, "text"),
            ArgType::Entity(Some(kind)) => write!(f, "{}", kind),
            ArgType::Entity(None) => write!(f, "entity"),
        }
    }
}

/// Whether an argument is a single value or a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    /// One value.
    #[default]
    Single,
    /// A list of values, possibly empty.
    List,
}

/// Type and container of an argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgShape {
    /// Element type.
    pub arg_type: ArgType,
    /// Single value or list.
    pub container: Container,
}

impl ArgShape {
    /// A single value of this type.
    #[must_use]
    pub fn single(arg_type: ArgType) -> Self {
        Self { arg_type, container: Container::Single }
    }

    /// A list of values of this type.
    #[must_use]
    pub fn list(arg_type: ArgType) -> Self {
        Self { arg_type, container: Container::List }
    }

    /// Does an already resolved value have this shape?
    #[must_use]
    pub fn matches(&self, registry: &Registry, value: &Value) -> bool {
        match self.container {
            Container::Single => self.arg_type.matches(registry, value),
            Container::List => value
                .as_list()
                .is_some_and(|items| items.iter().all(|item| self.arg_type.matches(registry, item))),
        }
    }

    /// Turn a raw value into this shape, resolving ids into entities.
    ///
    /// Returns `None` if any element doesn't resolve.
    #[must_use]
    pub fn resolve(&self, registry: &Registry, value: Value) -> Option<Value> {
        match self.container {
            Container::Single => self.arg_type.resolve(registry, value),
            Container::List => match value {
                Value::List(items) => items
                    .into_iter()
                    .map(|item| self.arg_type.resolve(registry, item))
                    .collect::<Option<Vec<_>>>()
                    .map(Value::List),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.container {
            Container::Single => write!(f, "{}", self.arg_type),
            Container::List => write!(f, "list of {}", self.arg_type),
        }
    }
}

/// Argument a step needs before its body may run.
#[derive(Clone)]
pub struct Requirement {
    /// Argument name.
    pub name: String,
    /// Expected shape.
    pub shape: ArgShape,
    /// Text shown to the player being asked.
    pub prompt: Option<String>,
    test: Option<Predicate>,
}

impl Requirement {
    /// Require a single value.
    pub fn new(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self {
            name: name.into(),
            shape: ArgShape::single(arg_type),
            prompt: None,
            test: None,
        }
    }

    /// Require a list of values.
    pub fn list(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self {
            shape: ArgShape::list(arg_type),
            ..Self::new(name, ArgType::Any)
        }
    }

    /// Set the prompt text.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Add a validation predicate over all arguments.
    #[must_use]
    pub fn with_test<F>(mut self, test: F) -> Self
    where
        F: Fn(&Game, PlayerId, &Args) -> bool + Send + Sync + 'static,
    {
        self.test = Some(Arc::new(test));
        self
    }

    /// Present, well-typed, and passing the predicate.
    #[must_use]
    pub fn is_met(&self, game: &Game, player: PlayerId, args: &Args) -> bool {
        let Some(value) = args.get(&self.name) else {
            return false;
        };
        self.shape.matches(game.registry(), value) && self.test.as_ref().map_or(true, |test| test(game, player, args))
    }

    /// Prompt asking `player` for this argument.
    #[must_use]
    pub fn to_prompt(&self, player: PlayerId) -> Prompt {
        Prompt {
            player,
            name: self.name.clone(),
            shape: self.shape.clone(),
            prompt: self.prompt.clone(),
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("prompt", &self.prompt)
            .field("test", &self.test.is_some())
            .finish()
    }
}

/// Outstanding request for information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Player who must answer.
    pub player: PlayerId,
    /// Argument name to supply.
    pub name: String,
    /// Expected shape.
    #[serde(flatten)]
    pub shape: ArgShape,
    /// Text for the player.
    pub prompt: Option<String>,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must provide {} ({})", self.player, self.name, self.shape)
    }
}
