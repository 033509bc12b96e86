//! Action dispatch and step resolution.
//!
//! ## Flow
//!
//! 1. `make_action` checks the lifecycle, the acting player and the
//!    declared parameters, then the restriction clauses. A rejection
//!    happens before anything is mutated.
//! 2. The action body runs and usually queues steps.
//! 3. Steps run front-first. A step whose requirements are not met stays at
//!    the front and resolution returns [`ResolutionStatus::AwaitingInput`].
//! 4. `send_information` supplies the missing value and resumes.
//! 5. Once the queue drains or suspends, the rules are asked whether the
//!    game is over.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::args::Args;
use crate::core::error::{GameError, Result};
use crate::core::player::PlayerId;
use crate::core::value::Value;
use crate::rules::SEND_INFORMATION;
use crate::steps::{PendingStep, StepDef, TriggerTiming};
use crate::transitions::Transition;

use super::{Game, GamePhase, ResolutionStatus};

impl Game {
    /// Run the rules' set-up and start accepting actions.
    ///
    /// Runs at most once. A failed set-up returns the game to
    /// configuration.
    pub fn start_game(&mut self) -> Result<ResolutionStatus> {
        if self.phase != GamePhase::Configuring {
            return Err(GameError::state("game is already set up"));
        }
        if self.players.len() < self.config.min_players {
            return Err(GameError::NotEnoughPlayers {
                joined: self.players.len(),
                min: self.config.min_players,
            });
        }

        self.phase = GamePhase::SettingUp;
        let rules = Arc::clone(&self.rules);
        if let Err(err) = rules.set_up(self) {
            warn!(game = %self.config.name, error = %err, "set-up failed");
            self.steps.clear();
            self.phase = GamePhase::Configuring;
            return Err(err);
        }

        self.phase = GamePhase::InProgress;
        info!(game = %self.config.name, players = self.players.len(), "game started");
        self.resolve()
    }

    /// Perform an action on behalf of a player.
    ///
    /// `send_information` is routed to [`Game::send_information`].
    pub fn make_action(&mut self, name: &str, player: PlayerId, args: Args) -> Result<ResolutionStatus> {
        if name == SEND_INFORMATION {
            return self.send_information(player, args);
        }
        if self.phase != GamePhase::InProgress {
            return Err(GameError::state("game is not in progress"));
        }
        if let Some(prompt) = self.requires_information() {
            return Err(GameError::state(format!("waiting for information: {}", prompt)));
        }
        if !self.has_player(player) {
            return Err(GameError::invalid(format!("{} is not in this game", player)));
        }

        let action = self
            .rulebook
            .get_action(name)
            .cloned()
            .ok_or_else(|| GameError::UnknownAction(name.to_string()))?;

        let mut args = args;
        for param in &action.params {
            let raw = args
                .remove(&param.name)
                .ok_or_else(|| GameError::invalid(format!("missing argument {}", param.name)))?;
            let resolved = param.shape.resolve(&self.registry, raw).ok_or_else(|| {
                GameError::invalid(format!("argument {} must be {}", param.name, param.shape))
            })?;
            args.insert(param.name.clone(), resolved);
        }

        if let Some(reason) = action.restriction.check(self, player, &args) {
            warn!(action = name, %player, reason, "action rejected");
            return Err(GameError::invalid(reason));
        }

        debug!(action = name, %player, "running action");
        if let Err(err) = action.run(self, player, &args) {
            self.steps.clear();
            return Err(err);
        }
        self.resolve()
    }

    /// Answer the outstanding prompt and resume resolution.
    ///
    /// `values` must hold the prompted name; raw ids are resolved against
    /// the registry. A value that doesn't resolve is rejected and nothing
    /// is merged. A value that resolves but fails the requirement's test
    /// produces the same prompt again.
    pub fn send_information(&mut self, player: PlayerId, values: Args) -> Result<ResolutionStatus> {
        let Some(requirement) = self.steps.awaited_requirement().cloned() else {
            return Err(GameError::state("no information is required"));
        };
        let expected = self.steps.awaiting().map_or(player, |prompt| prompt.player);
        if expected != player {
            warn!(%expected, got = %player, "information from the wrong player");
            return Err(GameError::WrongPlayer { expected, got: player });
        }

        let mut values = values;
        let raw = values
            .remove(&requirement.name)
            .ok_or_else(|| GameError::invalid(format!("missing argument {}", requirement.name)))?;
        let resolved = requirement.shape.resolve(&self.registry, raw).ok_or_else(|| {
            GameError::invalid(format!("argument {} must be {}", requirement.name, requirement.shape))
        })?;

        debug!(%player, name = %requirement.name, "information supplied");
        for (name, value) in values.iter() {
            self.steps.supply(name, value.clone());
        }
        self.steps.supply(requirement.name.clone(), resolved);
        self.resolve()
    }

    /// Queue a step. Bodies of actions and steps call this.
    pub fn enqueue(&mut self, step: PendingStep) -> Result<()> {
        if !self.rulebook.has_step(&step.step) {
            return Err(GameError::UnknownStep(step.step));
        }
        debug!(step = %step.step, player = %step.player, prepend = step.prepend, "queued step");
        self.steps.enqueue(step);
        Ok(())
    }

    /// Queued step names, front first.
    pub fn queued_steps(&self) -> impl Iterator<Item = &str> {
        self.steps.names()
    }

    /// Drain the queue, then check for game over.
    ///
    /// The check also runs when resolution suspends; a game that ended
    /// drops the outstanding prompt with the rest of the queue.
    fn resolve(&mut self) -> Result<ResolutionStatus> {
        let status = self.run_steps()?;
        self.check_over();
        if self.is_over() {
            return Ok(ResolutionStatus::Complete);
        }
        Ok(status)
    }

    fn run_steps(&mut self) -> Result<ResolutionStatus> {
        self.steps.begin();
        while let Some(pending) = self.steps.front().cloned() {
            let Some(def) = self.rulebook.get_step(&pending.step).cloned() else {
                self.steps.clear();
                return Err(GameError::UnknownStep(pending.step));
            };

            let args = self.steps.arguments_for(&pending);
            if let Some(requirement) = def.first_unmet(self, pending.player, &args) {
                let requirement = requirement.clone();
                let prompt = requirement.to_prompt(pending.player);
                debug!(step = %pending.step, player = %pending.player, name = %requirement.name, "step suspended");
                self.steps.suspend(prompt.clone(), requirement);
                return Ok(ResolutionStatus::AwaitingInput(prompt));
            }

            self.steps.take_front();
            match self.execute(&def, pending.player, &args) {
                Ok(value) => {
                    if let Some(binding) = pending.save_as {
                        self.steps.bind(binding, value);
                    }
                }
                Err(err) => {
                    warn!(step = %pending.step, error = %err, "step failed");
                    self.steps.clear();
                    return Err(err);
                }
            }
        }
        self.steps.finish();
        Ok(ResolutionStatus::Complete)
    }

    fn execute(&mut self, def: &StepDef, player: PlayerId, args: &Args) -> Result<Value> {
        debug!(step = %def.name, %player, "running step");
        self.fire(&def.name, TriggerTiming::Before, player, args)?;
        let value = def.run(self, player, args)?;
        self.fire(&def.name, TriggerTiming::After, player, args)?;
        Ok(value)
    }

    fn fire(&mut self, step: &str, timing: TriggerTiming, player: PlayerId, args: &Args) -> Result<()> {
        for handler in self.triggers.handlers(step, timing) {
            handler(self, player, args)?;
        }
        Ok(())
    }

    fn check_over(&mut self) {
        if self.phase != GamePhase::InProgress || !self.rules.is_over(self) {
            return;
        }
        let winners = self.rules.winners(self);
        self.phase = GamePhase::Over;
        self.steps.clear();
        info!(game = %self.config.name, ?winners, "game over");
        self.transitions.record(Transition::IsOver { winners: winners.clone() }, None);
        self.winners = winners;
    }
}
