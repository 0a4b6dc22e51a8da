//! Rules without terrain, race or ability effects.

use super::{Rules, RulesViolation};
use crate::board::RegionId;
use crate::game::GameState;
use crate::stage::TurnStage;

/// Tokens every conquest costs before garrisons and lost tribes
pub const BASE_CONQUEST_COST: u32 = 3;

/// Highest value of the reinforcements die
pub const MAX_DICE_VALUE: u32 = 3;

/// The generic ruleset other rulesets build on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicRules;

impl BasicRules {
    /// Conquest checks against an explicit `cost`.
    ///
    /// Rulesets with their own cost formula call this instead of
    /// [`Rules::check_conquer`].
    pub fn check_conquer_with_cost(
        &self,
        game: &GameState,
        region: RegionId,
        use_dice: bool,
        cost: u32,
    ) -> Vec<RulesViolation> {
        let mut violations = self.check_conquer_common(game, region);
        let tokens_on_hand = game.player().tokens_on_hand;
        if use_dice {
            if tokens_on_hand < 1 {
                violations.push(RulesViolation::RollingWithoutTokens);
            }
            let minimum_required = cost.saturating_sub(MAX_DICE_VALUE);
            if tokens_on_hand < minimum_required {
                violations.push(RulesViolation::NotEnoughTokensToRoll {
                    tokens_on_hand,
                    minimum_required,
                });
            }
        } else if tokens_on_hand < cost {
            violations.push(RulesViolation::NotEnoughTokensToConquer {
                tokens_on_hand,
                tokens_required: cost,
            });
        }
        violations
    }

    fn check_conquer_common(&self, game: &GameState, region: RegionId) -> Vec<RulesViolation> {
        let mut violations = self.common(game, true, true);
        if game.turn_stage() == TurnStage::UsedDice {
            violations.push(RulesViolation::AlreadyUsedDice);
        }

        let active = &game.player().active_regions;
        let at_border = game
            .regions()
            .get(region)
            .is_some_and(|r| r.is_at_map_border);
        if active.is_empty() && !at_border {
            violations.push(RulesViolation::NotAtBorder);
        }
        if active.contains_key(&region) {
            violations.push(RulesViolation::ConqueringOwnRegion);
        }
        if !active.is_empty() && !game.adjacent(region).any(|r| active.contains_key(&r)) {
            violations.push(RulesViolation::NonAdjacentRegion);
        }
        violations
    }

    /// Checks shared by most actions: game over, missing race, redeployment
    fn common(
        &self,
        game: &GameState,
        needs_race: bool,
        forbidden_in_redeployment: bool,
    ) -> Vec<RulesViolation> {
        let mut violations = Vec::new();
        if game.has_ended() {
            violations.push(RulesViolation::GameEnded);
        }
        if needs_race && !game.player().has_active_race() {
            violations.push(RulesViolation::NoActiveRace);
        }
        if forbidden_in_redeployment && game.turn_stage().is_redeployment() {
            violations.push(RulesViolation::ForbiddenDuringRedeployment);
        }
        violations
    }
}

impl Rules for BasicRules {
    fn check_decline(&self, game: &GameState) -> Vec<RulesViolation> {
        let mut violations = self.common(game, true, true);
        if matches!(
            game.turn_stage(),
            TurnStage::Active | TurnStage::Conquests | TurnStage::UsedDice
        ) {
            violations.push(RulesViolation::DecliningWhenActive);
        }
        violations
    }

    fn check_select_combo(&self, game: &GameState, index: usize) -> Vec<RulesViolation> {
        let mut violations = self.common(game, false, true);
        match game.turn_stage() {
            TurnStage::Declined => violations.push(RulesViolation::SelectingOnDeclineTurn),
            TurnStage::SelectCombo => {}
            stage if stage.is_redeployment() => {}
            _ => violations.push(RulesViolation::SelectingWhenActive),
        }
        let coins_getting = game.combos().get(index).map_or(0, |c| c.coins);
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        if index > game.player().coins.saturating_add(coins_getting) {
            violations.push(RulesViolation::NotEnoughCoins);
        }
        violations
    }

    fn check_abandon(&self, game: &GameState, region: RegionId) -> Vec<RulesViolation> {
        let mut violations = self.common(game, true, true);
        if !game.player().active_regions.contains_key(&region) {
            violations.push(RulesViolation::NonControlledRegion);
        }
        if matches!(
            game.turn_stage(),
            TurnStage::Conquests | TurnStage::UsedDice
        ) {
            violations.push(RulesViolation::AbandoningAfterConquests);
        }
        violations
    }

    fn check_conquer(
        &self,
        game: &GameState,
        region: RegionId,
        use_dice: bool,
    ) -> Vec<RulesViolation> {
        let cost = self.conquest_cost(game, region);
        self.check_conquer_with_cost(game, region, use_dice, cost)
    }

    fn check_start_redeployment(&self, game: &GameState) -> Vec<RulesViolation> {
        let mut violations = self.common(game, true, true);
        if game.player().active_regions.is_empty() {
            violations.push(RulesViolation::NoActiveRegions);
        }
        violations
    }

    fn check_deploy(
        &self,
        game: &GameState,
        n_tokens: u32,
        region: RegionId,
    ) -> Vec<RulesViolation> {
        let mut violations = self.common(game, true, false);
        let player = game.player();
        if !player.active_regions.contains_key(&region) {
            violations.push(RulesViolation::NonControlledRegion);
        }
        if n_tokens > player.tokens_on_hand {
            violations.push(RulesViolation::NotEnoughTokensToDeploy {
                tokens_on_hand: player.tokens_on_hand,
            });
        }
        violations
    }

    fn check_end_turn(&self, game: &GameState) -> Vec<RulesViolation> {
        let mut violations = self.common(game, false, false);
        let stage = game.turn_stage();
        if stage == TurnStage::SelectCombo {
            violations.push(RulesViolation::EndBeforeSelect);
        }
        let player = game.player();
        // nowhere to deploy after a failed roll with no regions left
        let stranded = stage == TurnStage::UsedDice && player.active_regions.is_empty();
        if player.tokens_on_hand > 0 && !stranded {
            violations.push(RulesViolation::UndeployedTokens {
                tokens_on_hand: player.tokens_on_hand,
                can_decline: stage == TurnStage::CanDecline,
            });
        }
        violations
    }

    fn conquest_cost(&self, game: &GameState, region: RegionId) -> u32 {
        let defence = match game.owner_of(region) {
            Some(owner) => game
                .players()
                .get(owner)
                .and_then(|p| p.active_regions.get(&region).copied())
                .unwrap_or(1),
            None if game.regions().get(region).is_some_and(|r| r.has_lost_tribe) => 1,
            None => 0,
        };
        BASE_CONQUEST_COST + defence
    }

    fn calculate_turn_reward(&self, game: &GameState) -> u32 {
        let regions = game.player().n_regions();
        u32::try_from(regions).unwrap_or(u32::MAX)
    }
}
