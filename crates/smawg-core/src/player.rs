//! Per-seat player state.

use crate::assets::{AbilityId, RaceId};
use crate::board::RegionId;
use crate::combo::Combo;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Seat index, 0-based
pub type PlayerId = usize;

/// Mutable stats of a single player
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Player {
    pub active_race: Option<RaceId>,
    pub active_ability: Option<AbilityId>,
    pub decline_race: Option<RaceId>,
    /// Regions held by the active race, with their garrisons
    pub active_regions: BTreeMap<RegionId, u32>,
    /// Regions held by a single declined race token each
    pub decline_regions: BTreeSet<RegionId>,
    pub tokens_on_hand: u32,
    pub coins: u32,
}

impl Player {
    pub fn new(coins: u32) -> Self {
        Self {
            coins,
            ..Default::default()
        }
    }

    /// Check if the player owns `region` with either race
    pub fn is_owning(&self, region: RegionId) -> bool {
        self.active_regions.contains_key(&region) || self.decline_regions.contains(&region)
    }

    pub fn has_active_race(&self) -> bool {
        self.active_race.is_some()
    }

    /// Total number of owned regions, active and declined
    pub fn n_regions(&self) -> usize {
        self.active_regions.len() + self.decline_regions.len()
    }

    /// Put the active race in decline.
    ///
    /// Returns the banners that leave the player: the active ability and the
    /// previously declined race.
    pub(crate) fn decline(&mut self) -> (Option<AbilityId>, Option<RaceId>) {
        let discarded_ability = self.active_ability.take();
        let discarded_race = self.decline_race.take();
        self.decline_race = self.active_race.take();
        self.decline_regions = std::mem::take(&mut self.active_regions)
            .into_keys()
            .collect();
        self.tokens_on_hand = 0;
        (discarded_ability, discarded_race)
    }

    /// Leave one token in every active region and take the rest on hand
    pub(crate) fn pick_up_tokens(&mut self) {
        for garrison in self.active_regions.values_mut() {
            self.tokens_on_hand += garrison.saturating_sub(1);
            *garrison = (*garrison).min(1);
        }
    }

    pub(crate) fn set_active(&mut self, combo: &Combo, tokens: u32) {
        self.active_race = Some(combo.race);
        self.active_ability = Some(combo.ability);
        self.tokens_on_hand = tokens;
    }
}
