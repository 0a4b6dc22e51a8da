//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions. The same [`Action`] values are used for
//! dry-run checks and for actually applying moves.

use crate::assets::{AbilityId, RaceId};
use crate::board::RegionId;
use crate::player::PlayerId;
use crate::stage::ActionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions the current player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // ==================== Race Management ====================
    /// Put the active race in decline
    Decline,
    /// Select the visible combo at the given index
    SelectCombo(usize),

    // ==================== Map Actions ====================
    /// Give up an actively held region, taking its tokens on hand
    Abandon(RegionId),
    /// Conquer a region paying the full cost
    Conquer(RegionId),
    /// Conquer a region with the help of the reinforcements die
    ConquerWithDice(RegionId),

    // ==================== Redeployment ====================
    /// Pick up all but one token from every active region
    StartRedeployment,
    /// Move tokens from hand to an actively held region
    Deploy { n_tokens: u32, region: RegionId },

    // ==================== Turn Management ====================
    /// End the turn (or the redeployment pseudo-turn)
    EndTurn,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Decline => ActionKind::Decline,
            Action::SelectCombo(_) => ActionKind::SelectCombo,
            Action::Abandon(_) => ActionKind::Abandon,
            Action::Conquer(_) => ActionKind::Conquer,
            Action::ConquerWithDice(_) => ActionKind::ConquerWithDice,
            Action::StartRedeployment => ActionKind::StartRedeployment,
            Action::Deploy { .. } => ActionKind::Deploy,
            Action::EndTurn => ActionKind::EndTurn,
        }
    }

    /// Target region of map actions
    pub fn region(&self) -> Option<RegionId> {
        match *self {
            Action::Abandon(region)
            | Action::Conquer(region)
            | Action::ConquerWithDice(region)
            | Action::Deploy { region, .. } => Some(region),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Decline => write!(f, "decline"),
            Action::SelectCombo(index) => write!(f, "combo {index}"),
            Action::Abandon(region) => write!(f, "abandon {region}"),
            Action::Conquer(region) => write!(f, "conquer {region}"),
            Action::ConquerWithDice(region) => write!(f, "conquer-dice {region}"),
            Action::StartRedeployment => write!(f, "redeploy"),
            Action::Deploy { n_tokens, region } => write!(f, "deploy {n_tokens} {region}"),
            Action::EndTurn => write!(f, "end-turn"),
        }
    }
}

/// Outcome of a conquest attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conquest {
    pub region: RegionId,
    /// Full conquest cost before the die
    pub cost: u32,
    /// Value rolled on the reinforcements die, if it was used
    pub dice: Option<u32>,
    pub success: bool,
    /// Tokens moved from hand into the region
    pub tokens_spent: u32,
    /// Previous owner of the region
    pub evicted: Option<PlayerId>,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A race was put in decline
    Declined {
        player: PlayerId,
        race: Option<RaceId>,
    },

    /// A combo was bought
    ComboSelected {
        player: PlayerId,
        race: RaceId,
        ability: AbilityId,
        /// Coins put on the skipped combos
        coins_paid: u32,
        /// Coins collected from the selected combo
        coins_collected: u32,
        tokens: u32,
    },

    /// A region was abandoned
    Abandoned {
        player: PlayerId,
        region: RegionId,
        tokens_returned: u32,
    },

    /// A conquest was attempted
    Conquered {
        player: PlayerId,
        conquest: Conquest,
    },

    /// Tokens were picked up for redeployment
    RedeploymentStarted {
        player: PlayerId,
        tokens_on_hand: u32,
    },

    /// Tokens were deployed from hand
    Deployed {
        player: PlayerId,
        region: RegionId,
        n_tokens: u32,
    },

    /// A turn was finished and paid
    TurnEnded {
        player: PlayerId,
        reward: u32,
    },

    /// A redeployment pseudo-turn was inserted
    RedeploymentTurnStarted { player: PlayerId },

    /// A regular turn started
    TurnStarted { player: PlayerId, turn: u32 },

    /// The last turn is over
    GameEnded,
}
