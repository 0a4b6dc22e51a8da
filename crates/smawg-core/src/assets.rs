//! Game assets: the immutable catalog of banners, the map and game constants.
//!
//! Assets are usually loaded from a JSON file and validated once. After that
//! the engine only refers to races and abilities by their index in the
//! catalog.

use crate::board::{Map, RegionId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of a race in [`Assets::races`]
pub type RaceId = usize;

/// Index of an ability in [`Assets::abilities`]
pub type AbilityId = usize;

/// Immutable description of a race banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    /// Tokens the player gets regardless of the ability
    pub n_tokens: u32,
    /// Total number of tokens of this race in the box
    pub max_n_tokens: u32,
}

impl Race {
    pub fn new(name: impl Into<String>, n_tokens: u32, max_n_tokens: u32) -> Self {
        Self {
            name: name.into(),
            n_tokens,
            max_n_tokens,
        }
    }
}

/// Immutable description of an ability banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    /// Additional race tokens the player gets
    pub n_tokens: u32,
}

impl Ability {
    pub fn new(name: impl Into<String>, n_tokens: u32) -> Self {
        Self {
            name: name.into(),
            n_tokens,
        }
    }
}

/// Errors produced while loading or validating assets
#[derive(Debug, Error)]
pub enum AssetsError {
    #[error("invalid assets JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be at least 1")]
    ZeroConstant { field: &'static str },

    #[error(
        "for {n_players} players {n_races} races are not enough; \
         need at least {required} races to always have a combo to choose from"
    )]
    NotEnoughRaces {
        n_players: usize,
        n_races: usize,
        required: usize,
    },

    #[error(
        "for {n_players} players {n_abilities} abilities are not enough; \
         need at least {required} abilities to always have a combo to choose from"
    )]
    NotEnoughAbilities {
        n_players: usize,
        n_abilities: usize,
        required: usize,
    },

    #[error("race '{name}' must have at least 1 token")]
    RaceWithoutTokens { name: String },

    #[error("invalid border ({a}, {b}): the map only has {n_regions} regions")]
    BorderOutOfRange {
        a: RegionId,
        b: RegionId,
        n_regions: usize,
    },

    #[error("invalid border ({region}, {region}): a region can't border itself")]
    SelfBorder { region: RegionId },
}

fn default_name() -> String {
    "<no name provided>".to_string()
}

fn default_description() -> String {
    "<no description provided>".to_string()
}

/// A complete set of game assets and constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_description")]
    pub description: String,
    /// Number of seats in this game setup
    pub n_players: usize,
    /// Coins every player starts with
    pub n_coins_on_start: u32,
    /// Maximum number of revealed combos at any time
    pub n_selectable_combos: usize,
    /// Number of turns after which the game ends
    pub n_turns: u32,
    pub abilities: Vec<Ability>,
    pub races: Vec<Race>,
    pub map: Map,
}

impl Assets {
    /// Parse and validate assets from a JSON document
    pub fn from_json(json: &str) -> Result<Self, AssetsError> {
        let assets: Assets = serde_json::from_str(json)?;
        assets.validate()?;
        Ok(assets)
    }

    /// Check the guarantees the engine relies on.
    ///
    /// Map borders are already checked when the [`Map`] is built.
    pub fn validate(&self) -> Result<(), AssetsError> {
        if self.n_players == 0 {
            return Err(AssetsError::ZeroConstant { field: "n_players" });
        }
        if self.n_selectable_combos == 0 {
            return Err(AssetsError::ZeroConstant {
                field: "n_selectable_combos",
            });
        }
        if self.n_turns == 0 {
            return Err(AssetsError::ZeroConstant { field: "n_turns" });
        }

        let required = 2 * self.n_players;
        if self.races.len() < required {
            return Err(AssetsError::NotEnoughRaces {
                n_players: self.n_players,
                n_races: self.races.len(),
                required,
            });
        }
        if self.abilities.len() < self.n_players {
            return Err(AssetsError::NotEnoughAbilities {
                n_players: self.n_players,
                n_abilities: self.abilities.len(),
                required: self.n_players,
            });
        }

        if let Some(race) = self
            .races
            .iter()
            .find(|r| r.n_tokens == 0 || r.max_n_tokens == 0)
        {
            return Err(AssetsError::RaceWithoutTokens {
                name: race.name.clone(),
            });
        }

        Ok(())
    }

    /// Shuffle the order of race and ability banners, like before a
    /// physical game. Everything else stays as it is.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.races.shuffle(rng);
        self.abilities.shuffle(rng);
    }

    pub fn race(&self, id: RaceId) -> Option<&Race> {
        self.races.get(id)
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.get(id)
    }
}
