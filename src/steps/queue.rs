//! Pending steps and the invocation-scoped step state.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::core::args::Args;
use crate::core::player::PlayerId;
use crate::core::value::Value;

use super::requirement::{Prompt, Requirement};

/// A step waiting in the queue.
///
/// ```
/// use deckr_engine::core::PlayerId;
/// use deckr_engine::steps::PendingStep;
///
/// let step = PendingStep::new(PlayerId::new(1), "draw_cards")
///     .using("count", "discarded")
///     .at_front();
/// assert!(step.prepend);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PendingStep {
    /// Player the step acts for.
    pub player: PlayerId,
    /// Registered step name.
    pub step: String,
    /// Arguments bound at enqueue time.
    pub args: Args,
    /// Store the step's result under this binding name.
    pub save_as: Option<String>,
    /// `(argument, binding)` pairs copied in before the step runs.
    pub using: Vec<(String, String)>,
    /// Queue at the front instead of the back.
    pub prepend: bool,
}

impl PendingStep {
    /// A step for `player` with no arguments.
    pub fn new(player: PlayerId, step: impl Into<String>) -> Self {
        Self {
            player,
            step: step.into(),
            args: Args::new(),
            save_as: None,
            using: Vec::new(),
            prepend: false,
        }
    }

    /// Bind an argument.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name, value);
        self
    }

    /// Replace all bound arguments.
    #[must_use]
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Save the result for later steps of the same action.
    #[must_use]
    pub fn save_as(mut self, binding: impl Into<String>) -> Self {
        self.save_as = Some(binding.into());
        self
    }

    /// Pass the saved `binding` as argument `local`.
    #[must_use]
    pub fn using(mut self, local: impl Into<String>, binding: impl Into<String>) -> Self {
        self.using.push((local.into(), binding.into()));
        self
    }

    /// Run before everything already queued.
    #[must_use]
    pub fn at_front(mut self) -> Self {
        self.prepend = true;
        self
    }
}

/// Lifecycle of the step engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing queued.
    Idle,
    /// Draining the queue.
    Running,
    /// The front step is missing an argument.
    AwaitingInput,
}

/// Step queue with result bindings and supplied information.
///
/// Bindings live until the queue next drains; supplied information only
/// until the front step completes.
#[derive(Clone, Debug, Default)]
pub struct StepQueue {
    queue: VecDeque<PendingStep>,
    bindings: FxHashMap<String, Value>,
    supplied: Args,
    awaiting: Option<(Prompt, Requirement)>,
    running: bool,
}

impl StepQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        if self.awaiting.is_some() {
            EngineState::AwaitingInput
        } else if self.running {
            EngineState::Running
        } else {
            EngineState::Idle
        }
    }

    /// Add a step at the back, or the front when `prepend` is set.
    pub fn enqueue(&mut self, step: PendingStep) {
        if step.prepend {
            self.queue.push_front(step);
        } else {
            self.queue.push_back(step);
        }
    }

    /// Step that runs next.
    #[must_use]
    pub fn front(&self) -> Option<&PendingStep> {
        self.queue.front()
    }

    /// Queued step names, front first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(|step| step.step.as_str())
    }

    /// Number of queued steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Nothing queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Arguments the front step would run with.
    ///
    /// Bound arguments, overlaid by `using` bindings, overlaid by supplied
    /// information. Missing bindings are skipped.
    #[must_use]
    pub fn arguments_for(&self, step: &PendingStep) -> Args {
        let mut args = step.args.clone();
        for (local, binding) in &step.using {
            if let Some(value) = self.bindings.get(binding) {
                args.insert(local.clone(), value.clone());
            }
        }
        args.merge(self.supplied.clone());
        args
    }

    /// Saved result of an earlier step.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Outstanding prompt.
    #[must_use]
    pub fn awaiting(&self) -> Option<&Prompt> {
        self.awaiting.as_ref().map(|(prompt, _)| prompt)
    }

    /// Requirement behind the outstanding prompt.
    #[must_use]
    pub fn awaited_requirement(&self) -> Option<&Requirement> {
        self.awaiting.as_ref().map(|(_, requirement)| requirement)
    }

    pub(crate) fn begin(&mut self) {
        self.running = true;
    }

    pub(crate) fn suspend(&mut self, prompt: Prompt, requirement: Requirement) {
        self.running = false;
        self.awaiting = Some((prompt, requirement));
    }

    pub(crate) fn supply(&mut self, name: impl Into<String>, value: Value) {
        self.supplied.insert(name, value);
    }

    /// Remove the front step once its requirements have passed.
    pub(crate) fn take_front(&mut self) -> Option<PendingStep> {
        self.supplied = Args::new();
        self.awaiting = None;
        self.queue.pop_front()
    }

    pub(crate) fn bind(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Queue drained: forget everything scoped to the invocation.
    pub(crate) fn finish(&mut self) {
        self.bindings.clear();
        self.supplied = Args::new();
        self.awaiting = None;
        self.running = false;
    }

    /// Drop every queued step and all scoped state.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.finish();
    }
}
