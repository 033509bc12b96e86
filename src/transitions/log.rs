//! Per-player transition queues.

use rustc_hash::FxHashMap;

use crate::core::player::PlayerId;

use super::transition::Transition;

/// Outgoing transitions, queued per player.
///
/// Only subscribed players receive anything. A broadcast reaches the
/// players subscribed at the moment it is recorded, so late joiners never
/// see earlier history.
#[derive(Clone, Debug, Default)]
pub struct TransitionLog {
    subscribers: Vec<PlayerId>,
    queues: FxHashMap<PlayerId, Vec<Transition>>,
}

impl TransitionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start queueing transitions for a player.
    pub fn subscribe(&mut self, player: PlayerId) {
        if !self.subscribers.contains(&player) {
            self.subscribers.push(player);
            self.queues.insert(player, Vec::new());
        }
    }

    /// Stop queueing for a player and drop whatever is pending.
    pub fn unsubscribe(&mut self, player: PlayerId) {
        self.subscribers.retain(|p| *p != player);
        self.queues.remove(&player);
    }

    /// Is this player subscribed?
    #[must_use]
    pub fn is_subscribed(&self, player: PlayerId) -> bool {
        self.queues.contains_key(&player)
    }

    /// Subscribed players in join order.
    #[must_use]
    pub fn subscribers(&self) -> &[PlayerId] {
        &self.subscribers
    }

    /// Queue a transition for one player, or every subscriber when `None`.
    pub fn record(&mut self, transition: Transition, player: Option<PlayerId>) {
        match player {
            Some(player) => {
                if let Some(queue) = self.queues.get_mut(&player) {
                    queue.push(transition);
                }
            }
            None => {
                for queue in self.queues.values_mut() {
                    queue.push(transition.clone());
                }
            }
        }
    }

    /// Take everything queued for a player.
    pub fn drain(&mut self, player: PlayerId) -> Vec<Transition> {
        self.queues.get_mut(&player).map(std::mem::take).unwrap_or_default()
    }

    /// Number of transitions waiting for a player.
    #[must_use]
    pub fn pending(&self, player: PlayerId) -> usize {
        self.queues.get(&player).map_or(0, Vec::len)
    }
}
