//! The ruleset used by default: basic rules plus terrain effects.
//!
//! - Mountains cost one extra token to conquer
//! - Seas and lakes can't be conquered
//! - A race may enter the map through the shore of a sea that touches the
//!   map border, not only through border regions

use super::{BasicRules, Rules, RulesViolation};
use crate::board::{RegionId, Terrain};
use crate::game::GameState;

/// Terrain-aware rules, delegating everything else to [`BasicRules`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRules {
    basic: BasicRules,
}

impl DefaultRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `region` borders a sea that lies at the map border
    fn is_border_shore(game: &GameState, region: RegionId) -> bool {
        game.adjacent(region).any(|r| {
            game.regions()
                .get(r)
                .is_some_and(|r| r.terrain == Terrain::Sea && r.is_at_map_border)
        })
    }
}

impl Rules for DefaultRules {
    fn check_decline(&self, game: &GameState) -> Vec<RulesViolation> {
        self.basic.check_decline(game)
    }

    fn check_select_combo(&self, game: &GameState, index: usize) -> Vec<RulesViolation> {
        self.basic.check_select_combo(game, index)
    }

    fn check_abandon(&self, game: &GameState, region: RegionId) -> Vec<RulesViolation> {
        self.basic.check_abandon(game, region)
    }

    fn check_conquer(
        &self,
        game: &GameState,
        region: RegionId,
        use_dice: bool,
    ) -> Vec<RulesViolation> {
        let cost = self.conquest_cost(game, region);
        let mut violations = self
            .basic
            .check_conquer_with_cost(game, region, use_dice, cost);

        if Self::is_border_shore(game, region) {
            violations.retain(|v| *v != RulesViolation::NotAtBorder);
        }

        let is_water = game
            .regions()
            .get(region)
            .is_some_and(|r| r.terrain.is_water());
        if is_water {
            let at = violations
                .iter()
                .position(|v| {
                    matches!(
                        v,
                        RulesViolation::RollingWithoutTokens
                            | RulesViolation::NotEnoughTokensToRoll { .. }
                            | RulesViolation::NotEnoughTokensToConquer { .. }
                    )
                })
                .unwrap_or(violations.len());
            violations.insert(at, RulesViolation::ConqueringWater);
        }
        violations
    }

    fn check_start_redeployment(&self, game: &GameState) -> Vec<RulesViolation> {
        self.basic.check_start_redeployment(game)
    }

    fn check_deploy(
        &self,
        game: &GameState,
        n_tokens: u32,
        region: RegionId,
    ) -> Vec<RulesViolation> {
        self.basic.check_deploy(game, n_tokens, region)
    }

    fn check_end_turn(&self, game: &GameState) -> Vec<RulesViolation> {
        self.basic.check_end_turn(game)
    }

    fn conquest_cost(&self, game: &GameState, region: RegionId) -> u32 {
        let cost = self.basic.conquest_cost(game, region);
        match game.regions().get(region).map(|r| r.terrain) {
            Some(Terrain::Mountain) => cost + 1,
            _ => cost,
        }
    }

    fn calculate_turn_reward(&self, game: &GameState) -> u32 {
        self.basic.calculate_turn_reward(game)
    }
}
