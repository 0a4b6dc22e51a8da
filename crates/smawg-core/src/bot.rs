//! Bot players.
//!
//! Bots only use the public query and action API of [`Game`]:
//! - Random: picks any legal action
//! - Greedy: buys the best combo, makes the cheapest conquests, tries its
//!   luck with the die and then deploys everything

use crate::actions::{Action, GameEvent};
use crate::game::{Game, GameError};
use crate::rules::basic::BASE_CONQUEST_COST;
use crate::rules::Rules;
use crate::stage::TurnStage;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on actions in a single turn, in case a strategy keeps
/// shuffling tokens back and forth
const MAX_ACTIONS_PER_TURN: usize = 500;

/// How the bot picks its actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotStrategy {
    Random,
    Greedy,
}

/// A bot that plays for whoever is the current player
pub struct Bot {
    pub strategy: BotStrategy,
    rng: StdRng,
}

impl Bot {
    pub fn new(strategy: BotStrategy) -> Self {
        Self {
            strategy,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(strategy: BotStrategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose one of the current player's legal actions
    pub fn choose_action<R: Rules>(&mut self, game: &Game<R>) -> Option<Action> {
        let actions = game.legal_actions();
        if actions.is_empty() {
            return None;
        }

        match self.strategy {
            BotStrategy::Random => actions.choose(&mut self.rng).copied(),
            BotStrategy::Greedy => self.choose_greedy(game, &actions),
        }
    }

    fn choose_greedy<R: Rules>(&mut self, game: &Game<R>, actions: &[Action]) -> Option<Action> {
        let state = game.state();
        let player = state.player();

        // Best value combo: tokens plus coins on it, minus the price
        let best_combo = actions
            .iter()
            .filter_map(|a| match *a {
                Action::SelectCombo(i) => state.combos().get(i).map(|c| {
                    let value = i64::from(c.base_tokens(state.assets())) + i64::from(c.coins)
                        - i as i64;
                    (value, *a)
                }),
                _ => None,
            })
            .max_by_key(|(value, _)| *value);
        if let Some((_, action)) = best_combo {
            return Some(action);
        }

        // Worn out race
        if state.turn_stage() == TurnStage::CanDecline
            && player.tokens_on_hand < BASE_CONQUEST_COST
            && actions.contains(&Action::Decline)
        {
            return Some(Action::Decline);
        }

        let cheapest = |with_dice: bool| {
            actions
                .iter()
                .filter_map(|a| match *a {
                    Action::Conquer(r) if !with_dice => Some((r, *a)),
                    Action::ConquerWithDice(r) if with_dice => Some((r, *a)),
                    _ => None,
                })
                .min_by_key(|(r, _)| game.rules().conquest_cost(state, *r))
                .map(|(_, a)| a)
        };
        if let Some(action) = cheapest(false).or_else(|| cheapest(true)) {
            return Some(action);
        }

        let biggest_deploy = actions
            .iter()
            .filter(|a| matches!(a, Action::Deploy { .. }))
            .max_by_key(|a| match a {
                Action::Deploy { n_tokens, .. } => *n_tokens,
                _ => 0,
            });
        if let Some(action) = biggest_deploy {
            return Some(*action);
        }

        if actions.contains(&Action::EndTurn) {
            return Some(Action::EndTurn);
        }

        actions.choose(&mut self.rng).copied()
    }

    /// Play until the current player's turn (or pseudo-turn) is over.
    ///
    /// Returns the events of every applied action.
    pub fn play_turn<R: Rules>(&mut self, game: &mut Game<R>) -> Result<Vec<GameEvent>, GameError> {
        let mut events = Vec::new();
        for _ in 0..MAX_ACTIONS_PER_TURN {
            let Some(action) = self.choose_action(game) else {
                break;
            };
            debug!(player = game.state().player_id(), %action, "bot action");
            events.extend(game.apply(action)?);
            if action == Action::EndTurn {
                return Ok(events);
            }
        }
        // Out of patience: finish the turn if the rules let us
        if game.check(&Action::EndTurn).is_ok() {
            events.extend(game.apply(Action::EndTurn)?);
        }
        Ok(events)
    }
}
