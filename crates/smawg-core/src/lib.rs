//! Smawg - a rules engine for Small World-style territory conquest games
//!
//! This crate provides the core game logic, including:
//! - The map: regions, terrain and borders
//! - Game assets: races, abilities and game constants loaded from JSON
//! - The combo queue of selectable race+ability pairs
//! - Player state and the turn-stage state machine
//! - Pluggable rulesets and the game orchestrator that enforces them
//!
//! # Architecture
//!
//! A [`Game`] owns a [`GameState`], a [`Rules`] implementation, a die and a
//! set of [`Hooks`]. Every [`Action`] is first checked against the rules and
//! only then applied. Consumers (text interfaces, bots) drive the game purely
//! through actions and read-only queries.
//!
//! # Modules
//!
//! - [`board`]: Map representation
//! - [`assets`]: Asset catalog, loading and validation
//! - [`combo`]: Combo queue
//! - [`player`]: Player state
//! - [`stage`]: Turn stages and their transition table
//! - [`actions`]: Actions and the events they produce
//! - [`rules`]: The [`Rules`] capability, [`BasicRules`] and [`DefaultRules`]
//! - [`game`]: Game state and orchestrator
//! - [`bot`]: Automated players

pub mod actions;
pub mod assets;
pub mod board;
pub mod bot;
pub mod combo;
pub mod game;
pub mod player;
pub mod rules;
pub mod stage;

// Re-export commonly used types
pub use actions::{Action, Conquest, GameEvent};
pub use assets::{Ability, AbilityId, Assets, AssetsError, Race, RaceId};
pub use board::{Map, Region, RegionId, Terrain, LOST_TRIBE_MARKER};
pub use bot::{Bot, BotStrategy};
pub use combo::{Combo, ComboQueue};
pub use game::{Game, GameError, GameOptions, GameState, Hooks, DICE_FACES};
pub use player::{Player, PlayerId};
pub use rules::{BasicRules, DefaultRules, Rules, RulesViolation};
pub use stage::{ActionKind, TurnStage};
