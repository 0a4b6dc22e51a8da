//! Combo queue: the window of selectable Race+Ability pairs.
//!
//! The window is refilled from two hidden FIFO backlogs. Banners released by
//! a decline go back to the tail of the backlogs.

use crate::assets::{AbilityId, Assets, RaceId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A revealed Race+Ability pair with the coins accumulated on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub race: RaceId,
    pub ability: AbilityId,
    /// Coins put on this combo by players who skipped it
    pub coins: u32,
}

impl Combo {
    pub fn new(race: RaceId, ability: AbilityId) -> Self {
        Self {
            race,
            ability,
            coins: 0,
        }
    }

    /// Tokens a player receives when selecting this combo, capped by the
    /// number of race tokens in the box.
    pub fn base_tokens(&self, assets: &Assets) -> u32 {
        let Some(race) = assets.race(self.race) else {
            return 0;
        };
        let ability_tokens = assets.ability(self.ability).map_or(0, |a| a.n_tokens);
        (race.n_tokens + ability_tokens).min(race.max_n_tokens)
    }
}

/// Visible combos plus the hidden race and ability backlogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboQueue {
    capacity: usize,
    visible: Vec<Combo>,
    hidden_races: VecDeque<RaceId>,
    hidden_abilities: VecDeque<AbilityId>,
}

impl ComboQueue {
    /// Create a queue over `n_races` races and `n_abilities` abilities in
    /// catalog order and reveal as many combos as fit.
    pub fn new(n_races: usize, n_abilities: usize, capacity: usize) -> Self {
        let mut queue = Self {
            capacity,
            visible: Vec::with_capacity(capacity),
            hidden_races: (0..n_races).collect(),
            hidden_abilities: (0..n_abilities).collect(),
        };
        while queue.reveal_next() {}
        queue
    }

    /// Reveal one more combo. Returns `false` and does nothing if the window
    /// is full or either backlog is empty.
    pub fn reveal_next(&mut self) -> bool {
        if self.visible.len() >= self.capacity
            || self.hidden_races.is_empty()
            || self.hidden_abilities.is_empty()
        {
            return false;
        }
        match (
            self.hidden_races.pop_front(),
            self.hidden_abilities.pop_front(),
        ) {
            (Some(race), Some(ability)) => {
                self.visible.push(Combo::new(race, ability));
                true
            }
            _ => false,
        }
    }

    /// Pay for and remove the combo at `index`, then refill the window.
    ///
    /// Puts one coin on every combo before `index` and collects the coins
    /// lying on the selected one. Returns the combo together with the coins
    /// collected from it, or `None` if `index` is out of range.
    pub fn select(&mut self, index: usize) -> Option<(Combo, u32)> {
        if index >= self.visible.len() {
            return None;
        }
        for skipped in &mut self.visible[..index] {
            skipped.coins += 1;
        }
        let mut combo = self.visible.remove(index);
        let collected = std::mem::take(&mut combo.coins);
        self.reveal_next();
        Some((combo, collected))
    }

    /// Return discarded banners to the tail of the hidden backlogs
    pub fn requeue(&mut self, ability: Option<AbilityId>, race: Option<RaceId>) {
        if let Some(ability) = ability {
            self.hidden_abilities.push_back(ability);
        }
        if let Some(race) = race {
            self.hidden_races.push_back(race);
        }
    }

    pub fn visible(&self) -> &[Combo] {
        &self.visible
    }

    pub fn get(&self, index: usize) -> Option<&Combo> {
        self.visible.get(index)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Maximum number of visible combos
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hidden_races(&self) -> &VecDeque<RaceId> {
        &self.hidden_races
    }

    pub fn hidden_abilities(&self) -> &VecDeque<AbilityId> {
        &self.hidden_abilities
    }
}
