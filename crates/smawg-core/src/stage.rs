//! Turn-stage state machine.
//!
//! A [`TurnStage`] tells which actions the current player may take. The
//! tables here are independent of any ruleset: [`TurnStage::allows`] lists
//! the legal entry stages of every action kind and [`TurnStage::after`] the
//! stage an applied action leads to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the current player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnStage {
    /// No active race yet, a combo must be picked
    SelectCombo,
    /// Start of a turn with an active race, nothing done yet
    CanDecline,
    /// The active race was just put in decline
    Declined,
    /// Some non-conquest action was taken
    Active,
    /// At least one diceless conquest was made
    Conquests,
    /// The reinforcements die was rolled, no more conquests
    UsedDice,
    /// Tokens were picked up for redeployment
    Redeployment,
    /// Pseudo-turn to place tokens lost in another player's turn
    RedeploymentTurn,
}

/// Kind of a player action, without its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Decline,
    SelectCombo,
    Abandon,
    Conquer,
    ConquerWithDice,
    StartRedeployment,
    Deploy,
    EndTurn,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Decline,
        ActionKind::SelectCombo,
        ActionKind::Abandon,
        ActionKind::Conquer,
        ActionKind::ConquerWithDice,
        ActionKind::StartRedeployment,
        ActionKind::Deploy,
        ActionKind::EndTurn,
    ];
}

impl TurnStage {
    pub const ALL: [TurnStage; 8] = [
        TurnStage::SelectCombo,
        TurnStage::CanDecline,
        TurnStage::Declined,
        TurnStage::Active,
        TurnStage::Conquests,
        TurnStage::UsedDice,
        TurnStage::Redeployment,
        TurnStage::RedeploymentTurn,
    ];

    /// Stage of a player who just got the turn
    pub fn turn_start(has_active_race: bool) -> Self {
        if has_active_race {
            TurnStage::CanDecline
        } else {
            TurnStage::SelectCombo
        }
    }

    pub fn is_redeployment(&self) -> bool {
        matches!(self, TurnStage::Redeployment | TurnStage::RedeploymentTurn)
    }

    /// Whether an action of `kind` may be taken in this stage.
    ///
    /// Rulesets add their own conditions on top. `Game::check` rejects
    /// anything this table forbids, whatever the ruleset says.
    pub fn allows(&self, kind: ActionKind) -> bool {
        use TurnStage::*;
        match kind {
            ActionKind::Decline => matches!(self, CanDecline),
            ActionKind::SelectCombo => matches!(self, SelectCombo),
            ActionKind::Abandon => matches!(self, CanDecline | Active),
            ActionKind::Conquer | ActionKind::ConquerWithDice => {
                matches!(self, CanDecline | Active | Conquests)
            }
            ActionKind::StartRedeployment => {
                matches!(self, CanDecline | Active | Conquests | UsedDice)
            }
            ActionKind::Deploy => !matches!(self, SelectCombo | Declined),
            ActionKind::EndTurn => !matches!(self, SelectCombo),
        }
    }

    /// Stage after an action of `kind` was applied in this stage
    pub fn after(&self, kind: ActionKind) -> TurnStage {
        match kind {
            ActionKind::Decline => TurnStage::Declined,
            ActionKind::SelectCombo | ActionKind::Abandon => TurnStage::Active,
            ActionKind::Conquer => TurnStage::Conquests,
            ActionKind::ConquerWithDice => TurnStage::UsedDice,
            ActionKind::StartRedeployment => TurnStage::Redeployment,
            ActionKind::Deploy => match self {
                TurnStage::CanDecline => TurnStage::Active,
                other => *other,
            },
            // the player switch decides the next stage
            ActionKind::EndTurn => *self,
        }
    }
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnStage::SelectCombo => "select combo",
            TurnStage::CanDecline => "can decline",
            TurnStage::Declined => "declined",
            TurnStage::Active => "active",
            TurnStage::Conquests => "conquests",
            TurnStage::UsedDice => "used dice",
            TurnStage::Redeployment => "redeployment",
            TurnStage::RedeploymentTurn => "redeployment turn",
        };
        f.write_str(name)
    }
}
