//! Interactive text client.

use std::collections::BTreeMap;
use std::io::{self, Write};

use smawg_core::{Bot, BotStrategy, Game, GameError, GameEvent, PlayerId, Rules};
use tracing::{debug, info};

use crate::command::{Command, CommandError, COMMANDS, HELP};

const HELP_SUGGESTION: &str = "Type 'help' to see available commands.";

/// Drives a game from lines of text, letting bots play their seats
pub struct Client<R: Rules> {
    game: Game<R>,
    bots: BTreeMap<PlayerId, Bot>,
    print_events: bool,
    /// Player, turn and redeployment flag of the last announced turn
    last_announced: Option<(PlayerId, u32, bool)>,
    reported_end: bool,
}

impl<R: Rules> Client<R> {
    pub fn new(game: Game<R>) -> Self {
        Self {
            game,
            bots: BTreeMap::new(),
            print_events: false,
            last_announced: None,
            reported_end: false,
        }
    }

    /// Let a greedy bot play `seat`
    pub fn with_bot(mut self, seat: PlayerId, seed: Option<u64>) -> Self {
        let bot = match seed {
            Some(seed) => Bot::with_seed(BotStrategy::Greedy, seed.wrapping_add(seat as u64)),
            None => Bot::new(BotStrategy::Greedy),
        };
        self.bots.insert(seat, bot);
        self
    }

    /// Print every event as a JSON line
    pub fn with_event_log(mut self) -> Self {
        self.print_events = true;
        self
    }

    #[cfg(test)]
    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    /// Interpret lines until `quit` or end of input
    pub fn run(
        &mut self,
        input: impl IntoIterator<Item = io::Result<String>>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        writeln!(out, "smawg {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "{HELP_SUGGESTION}")?;
        writeln!(out)?;

        let mut lines = input.into_iter();
        loop {
            self.play_bots(out)?;
            self.print_player_change(out)?;
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                return Ok(());
            };
            let line = line?;
            match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => return Ok(()),
                Ok(Some(command)) => self.execute(command, out)?,
                Err(e) => self.print_invalid_command(&e, out)?,
            }
        }
    }

    fn play_bots(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        while !self.game.state().has_ended() {
            let seat = self.game.state().player_id();
            if !self.bots.contains_key(&seat) {
                break;
            }
            self.print_player_change(out)?;
            let Some(bot) = self.bots.get_mut(&seat) else {
                break;
            };
            let events = bot.play_turn(&mut self.game)?;
            debug!(seat, n_events = events.len(), "bot finished its turn");
            self.print_events(&events, out)?;
            let switched = events.iter().any(|e| {
                matches!(
                    e,
                    GameEvent::TurnStarted { .. }
                        | GameEvent::RedeploymentTurnStarted { .. }
                        | GameEvent::GameEnded
                )
            });
            if !switched {
                // The bot could not end its turn, hand it over to the console
                writeln!(out, "Bot of player {seat} is stuck, continue manually.")?;
                self.bots.remove(&seat);
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
        match command {
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => {}
            Command::ShowCombos => self.show_combos(out)?,
            Command::ShowPlayers => self.show_players(out)?,
            Command::ShowRegions(player) => self.show_regions(player, out)?,
            Command::Play {
                action,
                dry_run: true,
            } => match self.game.check(&action) {
                Ok(()) => writeln!(
                    out,
                    "Check passed: this action is legal, you can remove '?' and perform it"
                )?,
                Err(e) => print_game_error(&e, out)?,
            },
            Command::Play {
                action,
                dry_run: false,
            } => match self.game.apply(action) {
                Ok(events) => self.print_events(&events, out)?,
                Err(e) => print_game_error(&e, out)?,
            },
        }
        Ok(())
    }

    fn print_events(&self, events: &[GameEvent], out: &mut impl Write) -> anyhow::Result<()> {
        for event in events {
            if self.print_events {
                writeln!(out, "{}", serde_json::to_string(event)?)?;
            }
            if let GameEvent::Conquered { conquest, .. } = event {
                if let Some(roll) = conquest.dice {
                    let outcome = if conquest.success {
                        "successful"
                    } else {
                        "unsuccessful"
                    };
                    writeln!(out, "Rolled {roll} on the die, conquest was {outcome}.")?;
                }
            }
        }
        Ok(())
    }

    fn print_player_change(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        let state = self.game.state();
        if state.has_ended() {
            if !self.reported_end {
                self.show_players(out)?;
                writeln!(out)?;
                writeln!(out, "{} turns have passed, the game is over.", state.n_turns())?;
                writeln!(out, "You can take a final look around and type 'quit' to quit.")?;
                info!(n_turns = state.n_turns(), "game over");
                self.reported_end = true;
            }
            return Ok(());
        }
        let turn = (
            state.player_id(),
            state.current_turn(),
            state.is_in_redeployment_turn(),
        );
        if self.last_announced == Some(turn) {
            return Ok(());
        }
        if state.is_in_redeployment_turn() {
            writeln!(
                out,
                "Player {} redeploys {} tokens.",
                state.player_id(),
                state.player().tokens_on_hand
            )?;
        } else {
            writeln!(
                out,
                "Player {} starts turn {}/{}.",
                state.player_id(),
                state.current_turn(),
                state.n_turns()
            )?;
        }
        self.last_announced = Some(turn);
        Ok(())
    }

    fn print_invalid_command(&self, error: &CommandError, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(out, "Invalid command: {error}")?;
        if let CommandError::Unknown(name) = error {
            let close: Vec<&str> = match name.chars().next() {
                Some(first) => COMMANDS.into_iter().filter(|c| c.starts_with(first)).collect(),
                None => Vec::new(),
            };
            if !close.is_empty() {
                writeln!(out, "Did you mean: {}?", close.join(", "))?;
            }
        }
        writeln!(out, "{HELP_SUGGESTION}")?;
        Ok(())
    }

    // ==================== Tables ====================

    fn show_combos(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let state = self.game.state();
        let assets = state.assets();
        writeln!(
            out,
            "{:^7} {:^13} {:^16} {:^16} {:^14}",
            "Price", "Coins you get", "Ability", "Race", "Tokens you get"
        )?;
        for (price, combo) in state.combos().visible().iter().enumerate() {
            writeln!(
                out,
                "{:^7} {:^13} {:^16} {:^16} {:^14}",
                price,
                combo.coins,
                assets.ability(combo.ability).map_or("?", |a| a.name.as_str()),
                assets.race(combo.race).map_or("?", |r| r.name.as_str()),
                combo.base_tokens(assets)
            )?;
        }
        Ok(())
    }

    fn show_players(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let state = self.game.state();
        let assets = state.assets();
        let race_name =
            |id: Option<usize>| id.and_then(|id| assets.race(id)).map_or("-", |r| r.name.as_str());
        writeln!(
            out,
            "{:^6} {:^16} {:^16} {:^16} {:^14} {:^5}",
            "Player", "Active ability", "Active race", "Declined race", "Tokens on hand", "Coins"
        )?;
        for (id, player) in state.players().iter().enumerate() {
            let ability = player
                .active_ability
                .and_then(|a| assets.ability(a))
                .map_or("-", |a| a.name.as_str());
            writeln!(
                out,
                "{:^6} {:^16} {:^16} {:^16} {:^14} {:^5}",
                id,
                ability,
                race_name(player.active_race),
                race_name(player.decline_race),
                player.tokens_on_hand,
                player.coins
            )?;
        }
        Ok(())
    }

    fn show_regions(&self, player_id: PlayerId, out: &mut impl Write) -> anyhow::Result<()> {
        let players = self.game.state().players();
        let Some(player) = players.get(player_id) else {
            writeln!(
                out,
                "Invalid argument: <player> must be between 0 and {}",
                players.len().saturating_sub(1)
            )?;
            return Ok(());
        };
        writeln!(out, "{:^6} {:^6} {:^8}", "Region", "Tokens", "Type")?;
        for (region, tokens) in &player.active_regions {
            writeln!(out, "{:^6} {:^6} {:^8}", region, tokens, "Active")?;
        }
        for region in &player.decline_regions {
            writeln!(out, "{:^6} {:^6} {:^8}", region, 1, "Declined")?;
        }
        Ok(())
    }
}

fn print_game_error(error: &GameError, out: &mut impl Write) -> io::Result<()> {
    if error.is_invalid_argument() {
        writeln!(out, "Invalid argument: {error}")
    } else {
        writeln!(out, "Rules violated: {error}")
    }
}
