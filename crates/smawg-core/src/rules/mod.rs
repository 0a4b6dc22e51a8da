//! Pluggable rule checking.
//!
//! A [`Rules`] implementation decides whether an action is legal in a given
//! [`GameState`] and computes the numbers that depend on the ruleset
//! (conquest cost and turn reward). Every check returns all applicable
//! violations in a fixed order; the game acts on the first one.
//!
//! Two rulesets are bundled:
//! - [`BasicRules`]: no terrain, race or ability effects
//! - [`DefaultRules`]: wraps [`BasicRules`] and adds terrain effects

pub mod basic;
pub mod default;

pub use basic::BasicRules;
pub use default::DefaultRules;

use crate::actions::Action;
use crate::board::RegionId;
use crate::game::GameState;
use crate::stage::TurnStage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons why an action breaks the rules
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RulesViolation {
    // ==================== Turn Flow ====================
    #[error("The game is over, this action is not available anymore")]
    GameEnded,

    #[error("To do this, you need to control an active race")]
    NoActiveRace,

    #[error("This action is not allowed during redeployment")]
    ForbiddenDuringRedeployment,

    #[error(
        "You've already used your active race during this turn. \
         You can only decline during the next turn"
    )]
    DecliningWhenActive,

    #[error("You need to finish your turn now and select a new race during the next turn")]
    SelectingOnDeclineTurn,

    #[error("You need to decline first")]
    SelectingWhenActive,

    #[error("You need to select a new race+ability combo before ending this turn")]
    EndBeforeSelect,

    #[error("Not enough coins, select a different race")]
    NotEnoughCoins,

    #[error("This action is not available during the {stage} stage of a turn")]
    ForbiddenInStage { stage: TurnStage },

    // ==================== Regions ====================
    #[error("The region must be controlled by your active race")]
    NonControlledRegion,

    #[error("You can't abandon regions after making conquests")]
    AbandoningAfterConquests,

    #[error("You must control at least one active region")]
    NoActiveRegions,

    // ==================== Conquests ====================
    #[error("You've already rolled the dice during this turn and can't make any more conquests")]
    AlreadyUsedDice,

    #[error("The initial conquest must be at the map border")]
    NotAtBorder,

    #[error("Can't conquer your own region")]
    ConqueringOwnRegion,

    #[error("The region must be adjacent to any of your active regions")]
    NonAdjacentRegion,

    #[error("Seas and lakes can't be conquered")]
    ConqueringWater,

    #[error("To roll the dice, you need to have at least 1 token on hand")]
    RollingWithoutTokens,

    #[error("Not enough tokens on hand (you have {tokens_on_hand}, but need {tokens_required})")]
    NotEnoughTokensToConquer {
        tokens_on_hand: u32,
        tokens_required: u32,
    },

    #[error(
        "Not enough tokens on hand (you have {tokens_on_hand}, \
         but need at least {minimum_required} to have a chance)"
    )]
    NotEnoughTokensToRoll {
        tokens_on_hand: u32,
        minimum_required: u32,
    },

    // ==================== Tokens ====================
    #[error("Not enough tokens on hand (you have {tokens_on_hand})")]
    NotEnoughTokensToDeploy { tokens_on_hand: u32 },

    #[error(
        "You need to use remaining {tokens_on_hand} tokens on hand{}",
        or_decline(.can_decline)
    )]
    UndeployedTokens {
        tokens_on_hand: u32,
        can_decline: bool,
    },

    // ==================== Plugins ====================
    /// Violation defined by a custom ruleset
    #[error("{reason}")]
    Custom { reason: String },
}

fn or_decline(can_decline: &bool) -> &'static str {
    if *can_decline {
        " or decline"
    } else {
        ""
    }
}

impl RulesViolation {
    pub fn custom(reason: impl Into<String>) -> Self {
        RulesViolation::Custom {
            reason: reason.into(),
        }
    }
}

/// A ruleset.
///
/// Checks receive the game they are applied to on every call. Arguments are
/// already known to be in range: the game rejects malformed region and
/// combo indices before consulting the rules.
pub trait Rules {
    /// Check any action, dispatching to the specific check
    fn check(&self, game: &GameState, action: &Action) -> Vec<RulesViolation> {
        match *action {
            Action::Decline => self.check_decline(game),
            Action::SelectCombo(index) => self.check_select_combo(game, index),
            Action::Abandon(region) => self.check_abandon(game, region),
            Action::Conquer(region) => self.check_conquer(game, region, false),
            Action::ConquerWithDice(region) => self.check_conquer(game, region, true),
            Action::StartRedeployment => self.check_start_redeployment(game),
            Action::Deploy { n_tokens, region } => self.check_deploy(game, n_tokens, region),
            Action::EndTurn => self.check_end_turn(game),
        }
    }

    fn check_decline(&self, game: &GameState) -> Vec<RulesViolation>;

    fn check_select_combo(&self, game: &GameState, index: usize) -> Vec<RulesViolation>;

    fn check_abandon(&self, game: &GameState, region: RegionId) -> Vec<RulesViolation>;

    fn check_conquer(&self, game: &GameState, region: RegionId, use_dice: bool)
        -> Vec<RulesViolation>;

    fn check_start_redeployment(&self, game: &GameState) -> Vec<RulesViolation>;

    fn check_deploy(&self, game: &GameState, n_tokens: u32, region: RegionId)
        -> Vec<RulesViolation>;

    fn check_end_turn(&self, game: &GameState) -> Vec<RulesViolation>;

    /// Tokens needed to conquer `region` without the die
    fn conquest_cost(&self, game: &GameState, region: RegionId) -> u32;

    /// Coins the current player earns for the turn being ended
    fn calculate_turn_reward(&self, game: &GameState) -> u32;
}

impl<R: Rules + ?Sized> Rules for Box<R> {
    fn check(&self, game: &GameState, action: &Action) -> Vec<RulesViolation> {
        (**self).check(game, action)
    }

    fn check_decline(&self, game: &GameState) -> Vec<RulesViolation> {
        (**self).check_decline(game)
    }

    fn check_select_combo(&self, game: &GameState, index: usize) -> Vec<RulesViolation> {
        (**self).check_select_combo(game, index)
    }

    fn check_abandon(&self, game: &GameState, region: RegionId) -> Vec<RulesViolation> {
        (**self).check_abandon(game, region)
    }

    fn check_conquer(
        &self,
        game: &GameState,
        region: RegionId,
        use_dice: bool,
    ) -> Vec<RulesViolation> {
        (**self).check_conquer(game, region, use_dice)
    }

    fn check_start_redeployment(&self, game: &GameState) -> Vec<RulesViolation> {
        (**self).check_start_redeployment(game)
    }

    fn check_deploy(
        &self,
        game: &GameState,
        n_tokens: u32,
        region: RegionId,
    ) -> Vec<RulesViolation> {
        (**self).check_deploy(game, n_tokens, region)
    }

    fn check_end_turn(&self, game: &GameState) -> Vec<RulesViolation> {
        (**self).check_end_turn(game)
    }

    fn conquest_cost(&self, game: &GameState, region: RegionId) -> u32 {
        (**self).conquest_cost(game, region)
    }

    fn calculate_turn_reward(&self, game: &GameState) -> u32 {
        (**self).calculate_turn_reward(game)
    }
}

/// Pick a ruleset by name
pub fn by_name(name: &str) -> Option<Box<dyn Rules>> {
    match name {
        "basic" => Some(Box::new(BasicRules)),
        "default" => Some(Box::new(DefaultRules::default())),
        _ => None,
    }
}
