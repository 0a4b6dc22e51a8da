//! Core game state machine.
//!
//! This module contains the [`GameState`] aggregate, read by rulesets and
//! observers, and the [`Game`] orchestrator that checks actions against a
//! [`Rules`] implementation, applies them and fires lifecycle hooks.

use crate::actions::{Action, Conquest, GameEvent};
use crate::assets::{Assets, AssetsError};
use crate::board::{Region, RegionId};
use crate::combo::ComboQueue;
use crate::player::{Player, PlayerId};
use crate::rules::{DefaultRules, Rules, RulesViolation};
use crate::stage::TurnStage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Faces of the reinforcements die
pub const DICE_FACES: [u32; 6] = [0, 0, 0, 1, 2, 3];

/// Errors that can occur when checking or applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("region must be between 0 and {n_regions}, got {region}")]
    RegionOutOfRange { region: RegionId, n_regions: usize },

    #[error("combo index must be between 0 and {n_combos}, got {index}")]
    ComboOutOfRange { index: usize, n_combos: usize },

    #[error("n_tokens must be greater than 0")]
    NonPositiveTokens,

    #[error(transparent)]
    Rules(#[from] RulesViolation),
}

impl GameError {
    /// Malformed arguments, rejected before any ruleset is consulted
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, GameError::Rules(_))
    }

    /// The rules violation, if this is one
    pub fn violation(&self) -> Option<&RulesViolation> {
        match self {
            GameError::Rules(violation) => Some(violation),
            _ => None,
        }
    }
}

/// The complete state of a game, without the ruleset and hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    assets: Assets,
    /// Regions with their current lost-tribe flags
    regions: Vec<Region>,
    combos: ComboQueue,
    players: Vec<Player>,
    /// Turn number (starts at 1)
    current_turn: u32,
    player_id: PlayerId,
    /// Seat of the next regular turn, kept during redeployment turns
    next_player_id: PlayerId,
    turn_stage: TurnStage,
}

impl GameState {
    /// Fresh state for player 0's first turn. `assets` must be validated.
    fn new(assets: Assets) -> Self {
        let regions = assets.map.regions().to_vec();
        let combos = ComboQueue::new(
            assets.races.len(),
            assets.abilities.len(),
            assets.n_selectable_combos,
        );
        let players = (0..assets.n_players)
            .map(|_| Player::new(assets.n_coins_on_start))
            .collect();
        let next_player_id = 1 % assets.n_players.max(1);
        Self {
            assets,
            regions,
            combos,
            players,
            current_turn: 1,
            player_id: 0,
            next_player_id,
            turn_stage: TurnStage::SelectCombo,
        }
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn n_turns(&self) -> u32 {
        self.assets.n_turns
    }

    pub fn current_turn(&self) -> u32 {
        self.current_turn
    }

    /// The game is over once the last turn has been played by everyone
    pub fn has_ended(&self) -> bool {
        self.current_turn > self.assets.n_turns
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn combos(&self) -> &ComboQueue {
        &self.combos
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Seat of the player who acts now
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn player(&self) -> &Player {
        &self.players[self.player_id]
    }

    pub fn next_player_id(&self) -> PlayerId {
        self.next_player_id
    }

    pub fn turn_stage(&self) -> TurnStage {
        self.turn_stage
    }

    pub fn is_in_redeployment_turn(&self) -> bool {
        self.turn_stage == TurnStage::RedeploymentTurn
    }

    /// Player owning `region` with either an active or a declined race
    pub fn owner_of(&self, region: RegionId) -> Option<PlayerId> {
        self.players.iter().position(|p| p.is_owning(region))
    }

    /// Neighbours of `region` on the map
    pub fn adjacent(&self, region: RegionId) -> impl Iterator<Item = RegionId> + '_ {
        self.assets.map.adjacent(region)
    }

    fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.player_id]
    }

    // ==================== Mutations ====================

    fn decline(&mut self) {
        let (ability, race) = self.current_mut().decline();
        self.combos.requeue(ability, race);
    }

    fn select_combo(&mut self, index: usize) -> Option<GameEvent> {
        let player = self.player_id;
        let (combo, coins_collected) = self.combos.select(index)?;
        let coins_paid = u32::try_from(index).unwrap_or(u32::MAX);
        let tokens = combo.base_tokens(&self.assets);

        let current = self.current_mut();
        current.coins = current
            .coins
            .saturating_add(coins_collected)
            .saturating_sub(coins_paid);
        current.set_active(&combo, tokens);

        Some(GameEvent::ComboSelected {
            player,
            race: combo.race,
            ability: combo.ability,
            coins_paid,
            coins_collected,
            tokens,
        })
    }

    fn abandon(&mut self, region: RegionId) -> u32 {
        let current = self.current_mut();
        let returned = current.active_regions.remove(&region).unwrap_or(0);
        current.tokens_on_hand += returned;
        returned
    }

    /// Remove the owner and lost tribe from `region`. The owner keeps all but
    /// one of the evicted tokens on hand.
    fn evict(&mut self, region: RegionId) -> Option<PlayerId> {
        if let Some(r) = self.regions.get_mut(region) {
            r.has_lost_tribe = false;
        }
        let owner_id = self.owner_of(region)?;
        let owner = &mut self.players[owner_id];
        match owner.active_regions.remove(&region) {
            Some(garrison) => owner.tokens_on_hand += garrison.saturating_sub(1),
            None => {
                owner.decline_regions.remove(&region);
            }
        }
        Some(owner_id)
    }

    fn occupy(&mut self, region: RegionId, tokens: u32) {
        let current = self.current_mut();
        current.tokens_on_hand = current.tokens_on_hand.saturating_sub(tokens);
        current.active_regions.insert(region, tokens);
    }

    fn deploy(&mut self, n_tokens: u32, region: RegionId) {
        let current = self.current_mut();
        current.tokens_on_hand = current.tokens_on_hand.saturating_sub(n_tokens);
        *current.active_regions.entry(region).or_insert(0) += n_tokens;
    }
}

type Hook = Box<dyn FnMut(&GameState)>;
type DiceHook = Box<dyn FnMut(&GameState, u32, bool)>;

/// Callbacks fired at fixed points of the game, all no-ops by default
pub struct Hooks {
    on_turn_start: Hook,
    on_dice_rolled: DiceHook,
    on_turn_end: Hook,
    on_redeploy: Hook,
    on_game_end: Hook,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            on_turn_start: Box::new(|_| {}),
            on_dice_rolled: Box::new(|_, _, _| {}),
            on_turn_end: Box::new(|_| {}),
            on_redeploy: Box::new(|_| {}),
            on_game_end: Box::new(|_| {}),
        }
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired when a player starts a regular turn, including the very first
    pub fn on_turn_start(mut self, hook: impl FnMut(&GameState) + 'static) -> Self {
        self.on_turn_start = Box::new(hook);
        self
    }

    /// Fired after every roll of the reinforcements die with the rolled
    /// value and whether the conquest succeeded
    pub fn on_dice_rolled(mut self, hook: impl FnMut(&GameState, u32, bool) + 'static) -> Self {
        self.on_dice_rolled = Box::new(hook);
        self
    }

    /// Fired when a regular turn ends, after the reward is paid
    pub fn on_turn_end(mut self, hook: impl FnMut(&GameState) + 'static) -> Self {
        self.on_turn_end = Box::new(hook);
        self
    }

    /// Fired when a redeployment pseudo-turn starts
    pub fn on_redeploy(mut self, hook: impl FnMut(&GameState) + 'static) -> Self {
        self.on_redeploy = Box::new(hook);
        self
    }

    /// Fired once, when the last turn is over
    pub fn on_game_end(mut self, hook: impl FnMut(&GameState) + 'static) -> Self {
        self.on_game_end = Box::new(hook);
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

/// Options for creating a [`Game`]
pub struct GameOptions {
    /// Shuffle races and abilities before the game
    pub shuffle: bool,
    /// Seed for shuffling and the default die, random if not set
    pub seed: Option<u64>,
    /// Custom die, overriding [`DICE_FACES`]
    pub dice: Option<Box<dyn FnMut() -> u32>>,
    pub hooks: Hooks,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            shuffle: true,
            seed: None,
            dice: None,
            hooks: Hooks::default(),
        }
    }
}

impl GameOptions {
    /// Keep races and abilities in asset order
    pub fn no_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_dice(mut self, dice: impl FnMut() -> u32 + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }
}

impl fmt::Debug for GameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameOptions")
            .field("shuffle", &self.shuffle)
            .field("seed", &self.seed)
            .field("dice", &self.dice.as_ref().map(|_| "custom"))
            .field("hooks", &self.hooks)
            .finish()
    }
}

fn default_dice(mut rng: StdRng) -> Box<dyn FnMut() -> u32> {
    Box::new(move || DICE_FACES[rng.gen_range(0..DICE_FACES.len())])
}

/// A running game: state, ruleset, hooks and the die
pub struct Game<R = DefaultRules> {
    state: GameState,
    rules: R,
    hooks: Hooks,
    dice: Box<dyn FnMut() -> u32>,
}

impl<R: Rules> Game<R> {
    /// Create a game with shuffled banners, a random die and no hooks
    pub fn new(assets: Assets, rules: R) -> Result<Self, AssetsError> {
        Self::with_options(assets, rules, GameOptions::default())
    }

    /// Create a game. Fires the turn-start hook for player 0.
    pub fn with_options(
        mut assets: Assets,
        rules: R,
        options: GameOptions,
    ) -> Result<Self, AssetsError> {
        assets.validate()?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        if options.shuffle {
            assets.shuffle(&mut rng);
        }
        let dice = options.dice.unwrap_or_else(|| default_dice(rng));

        debug!(
            assets = %assets.name,
            n_players = assets.n_players,
            n_turns = assets.n_turns,
            shuffle = options.shuffle,
            "creating game"
        );

        let mut game = Self {
            state: GameState::new(assets),
            rules,
            hooks: options.hooks,
            dice,
        };
        (game.hooks.on_turn_start)(&game.state);
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    // ==================== Checks ====================

    fn check_arguments(&self, action: &Action) -> Result<(), GameError> {
        match *action {
            Action::SelectCombo(index) if index >= self.state.combos.len() => {
                return Err(GameError::ComboOutOfRange {
                    index,
                    n_combos: self.state.combos.len(),
                });
            }
            Action::Deploy { n_tokens: 0, .. } => return Err(GameError::NonPositiveTokens),
            _ => {}
        }
        match action.region() {
            Some(region) if region >= self.state.regions.len() => Err(GameError::RegionOutOfRange {
                region,
                n_regions: self.state.regions.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Dry run: the error `apply` would return, without changing anything
    pub fn check(&self, action: &Action) -> Result<(), GameError> {
        self.check_arguments(action)?;
        if let Some(violation) = self.rules.check(&self.state, action).into_iter().next() {
            return Err(violation.into());
        }
        let stage = self.state.turn_stage;
        if !stage.allows(action.kind()) {
            return Err(RulesViolation::ForbiddenInStage { stage }.into());
        }
        Ok(())
    }

    /// All actions that would currently pass [`Game::check`].
    ///
    /// Deploys are listed for one token and for the whole hand only.
    pub fn legal_actions(&self) -> Vec<Action> {
        let n_regions = self.state.regions.len();
        let mut candidates = vec![Action::Decline];
        candidates.extend((0..self.state.combos.len()).map(Action::SelectCombo));
        for region in 0..n_regions {
            candidates.push(Action::Abandon(region));
            candidates.push(Action::Conquer(region));
            candidates.push(Action::ConquerWithDice(region));
        }
        candidates.push(Action::StartRedeployment);

        let player = self.state.player();
        for &region in player.active_regions.keys() {
            candidates.push(Action::Deploy {
                n_tokens: 1,
                region,
            });
            if player.tokens_on_hand > 1 {
                candidates.push(Action::Deploy {
                    n_tokens: player.tokens_on_hand,
                    region,
                });
            }
        }
        candidates.push(Action::EndTurn);

        candidates
            .into_iter()
            .filter(|action| self.check(action).is_ok())
            .collect()
    }

    // ==================== Actions ====================

    /// Check and apply an action of the current player
    pub fn apply(&mut self, action: Action) -> Result<Vec<GameEvent>, GameError> {
        self.check(&action)?;

        let player = self.state.player_id;
        let stage = self.state.turn_stage;
        let mut events = Vec::new();
        let mut rolled = None;
        debug!(player, %action, %stage, "applying action");

        match action {
            // ==================== Race Management ====================
            Action::Decline => {
                let race = self.state.player().active_race;
                self.state.decline();
                events.push(GameEvent::Declined { player, race });
            }

            Action::SelectCombo(index) => {
                let event = self.state.select_combo(index).ok_or_else(|| {
                    GameError::ComboOutOfRange {
                        index,
                        n_combos: self.state.combos.len(),
                    }
                })?;
                events.push(event);
            }

            // ==================== Map Actions ====================
            Action::Abandon(region) => {
                let tokens_returned = self.state.abandon(region);
                events.push(GameEvent::Abandoned {
                    player,
                    region,
                    tokens_returned,
                });
            }

            Action::Conquer(region) => {
                let cost = self.rules.conquest_cost(&self.state, region);
                let evicted = self.state.evict(region);
                self.state.occupy(region, cost);
                events.push(GameEvent::Conquered {
                    player,
                    conquest: Conquest {
                        region,
                        cost,
                        dice: None,
                        success: true,
                        tokens_spent: cost,
                        evicted,
                    },
                });
            }

            Action::ConquerWithDice(region) => {
                let cost = self.rules.conquest_cost(&self.state, region);
                let roll = (self.dice)();
                let success = self.state.player().tokens_on_hand.saturating_add(roll) >= cost;
                let mut conquest = Conquest {
                    region,
                    cost,
                    dice: Some(roll),
                    success,
                    tokens_spent: 0,
                    evicted: None,
                };
                if success {
                    let spent = cost.saturating_sub(roll).max(1);
                    conquest.evicted = self.state.evict(region);
                    conquest.tokens_spent = spent;
                    self.state.occupy(region, spent);
                }
                debug!(player, region, cost, roll, success, "rolled reinforcements die");
                rolled = Some((roll, success));
                events.push(GameEvent::Conquered { player, conquest });
            }

            // ==================== Redeployment ====================
            Action::StartRedeployment => {
                self.state.current_mut().pick_up_tokens();
                events.push(GameEvent::RedeploymentStarted {
                    player,
                    tokens_on_hand: self.state.player().tokens_on_hand,
                });
            }

            Action::Deploy { n_tokens, region } => {
                self.state.deploy(n_tokens, region);
                events.push(GameEvent::Deployed {
                    player,
                    region,
                    n_tokens,
                });
            }

            // ==================== Turn Management ====================
            Action::EndTurn => {
                self.end_turn_unchecked(&mut events);
                return Ok(events);
            }
        }

        self.state.turn_stage = stage.after(action.kind());
        if let Some((roll, success)) = rolled {
            (self.hooks.on_dice_rolled)(&self.state, roll, success);
        }
        Ok(events)
    }

    pub fn decline(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.apply(Action::Decline)
    }

    pub fn select_combo(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(Action::SelectCombo(index))
    }

    pub fn abandon(&mut self, region: RegionId) -> Result<Vec<GameEvent>, GameError> {
        self.apply(Action::Abandon(region))
    }

    /// Conquer `region`, with or without the reinforcements die
    pub fn conquer(&mut self, region: RegionId, use_dice: bool) -> Result<Vec<GameEvent>, GameError> {
        if use_dice {
            self.apply(Action::ConquerWithDice(region))
        } else {
            self.apply(Action::Conquer(region))
        }
    }

    pub fn start_redeployment(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.apply(Action::StartRedeployment)
    }

    pub fn deploy(&mut self, n_tokens: u32, region: RegionId) -> Result<Vec<GameEvent>, GameError> {
        self.apply(Action::Deploy { n_tokens, region })
    }

    pub fn end_turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.apply(Action::EndTurn)
    }

    // ==================== Turn Switching ====================

    fn end_turn_unchecked(&mut self, events: &mut Vec<GameEvent>) {
        if !self.state.is_in_redeployment_turn() {
            let player = self.state.player_id;
            let reward = self.rules.calculate_turn_reward(&self.state);
            let current = self.state.current_mut();
            current.coins = current.coins.saturating_add(reward);
            debug!(player, reward, "turn ended");
            events.push(GameEvent::TurnEnded { player, reward });
            (self.hooks.on_turn_end)(&self.state);
        }
        self.switch_player(events);
    }

    fn switch_player(&mut self, events: &mut Vec<GameEvent>) {
        let scheduled = self.state.next_player_id;

        // Someone lost tokens to a conquest and has to place them first
        let owed = self.state.players.iter().enumerate().find_map(|(id, p)| {
            let needs_redeploy = p.tokens_on_hand > 0 && !p.active_regions.is_empty();
            (needs_redeploy && id != scheduled).then_some(id)
        });
        if let Some(player) = owed {
            self.state.player_id = player;
            self.state.turn_stage = TurnStage::RedeploymentTurn;
            debug!(player, scheduled, "inserting redeployment turn");
            events.push(GameEvent::RedeploymentTurnStarted { player });
            (self.hooks.on_redeploy)(&self.state);
            return;
        }

        let n_players = self.state.players.len().max(1);
        let player = scheduled;
        self.state.player_id = player;
        self.state.next_player_id = (player + 1) % n_players;
        if player == 0 {
            self.state.current_turn += 1;
        }
        self.state.turn_stage = TurnStage::turn_start(self.state.player().has_active_race());

        if self.state.has_ended() {
            info!(
                turn = self.state.current_turn,
                n_turns = self.state.n_turns(),
                "game ended"
            );
            events.push(GameEvent::GameEnded);
            (self.hooks.on_game_end)(&self.state);
        } else {
            self.state.current_mut().pick_up_tokens();
            debug!(player, turn = self.state.current_turn, "turn started");
            events.push(GameEvent::TurnStarted {
                player,
                turn: self.state.current_turn,
            });
            (self.hooks.on_turn_start)(&self.state);
        }
    }
}

impl<R> fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
