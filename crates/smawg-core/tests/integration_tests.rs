//! Integration tests for the smawg game engine.
//!
//! These tests drive complete games through the public API only.

use pretty_assertions::assert_eq;
use smawg_core::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

fn tiny_assets() -> Assets {
    Assets::from_json(include_str!("../assets/tiny.json")).unwrap()
}

/// Assets with plenty of banners around a custom map
fn custom_assets(n_players: usize, regions: Vec<Region>, borders: Vec<(RegionId, RegionId)>) -> Assets {
    Assets {
        name: "custom".into(),
        description: String::new(),
        n_players,
        n_coins_on_start: 5,
        n_selectable_combos: 3,
        n_turns: 5,
        abilities: (0..n_players + 2)
            .map(|i| Ability::new(format!("Ability{i}"), 4))
            .collect(),
        races: (0..2 * n_players + 2)
            .map(|i| Race::new(format!("Race{i}"), 5, 20))
            .collect(),
        map: Map::new(regions, borders).unwrap(),
    }
}

/// Die returning the given values, then zeros
fn dice(values: &[u32]) -> impl FnMut() -> u32 {
    let mut values: VecDeque<u32> = values.iter().copied().collect();
    move || values.pop_front().unwrap_or(0)
}

fn new_game<R: Rules>(assets: Assets, rules: R, rolls: &[u32]) -> Game<R> {
    let options = GameOptions::default().no_shuffle().with_dice(dice(rolls));
    Game::with_options(assets, rules, options).unwrap()
}

fn coins<R: Rules>(game: &Game<R>) -> Vec<u32> {
    game.state().players().iter().map(|p| p.coins).collect()
}

fn violation<T>(result: Result<T, GameError>) -> RulesViolation {
    match result {
        Err(GameError::Rules(violation)) => violation,
        Err(other) => panic!("expected a rules violation, got {other:?}"),
        Ok(_) => panic!("expected a rules violation, got success"),
    }
}

/// Select the first combo, conquer the first free border region and deploy
/// everything there
fn play_simple_turn<R: Rules>(game: &mut Game<R>) {
    if game.state().turn_stage() == TurnStage::SelectCombo {
        game.select_combo(0).unwrap();
    }
    let target = game
        .legal_actions()
        .into_iter()
        .find(|a| matches!(a, Action::Conquer(_)));
    if let Some(action) = target {
        game.apply(action).unwrap();
    }
    let hand = game.state().player().tokens_on_hand;
    if hand > 0 {
        let region = *game.state().player().active_regions.keys().next().unwrap();
        game.deploy(hand, region).unwrap();
    }
    game.end_turn().unwrap();
}

// ==================== Scenarios ====================

#[test]
fn test_combo_payment_and_turn_reward() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    assert_eq!(coins(&game), vec![1, 1]);

    game.select_combo(1).unwrap();
    assert_eq!(coins(&game), vec![0, 1]);
    assert_eq!(game.state().combos().get(0).unwrap().coins, 1);

    for region in [0, 1, 2] {
        let events = game.conquer(region, false).unwrap();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::Conquered { conquest: Conquest { cost: 3, success: true, .. }, .. }]
        ));
    }
    assert_eq!(game.state().player().tokens_on_hand, 0);

    let events = game.end_turn().unwrap();
    assert_eq!(events[0], GameEvent::TurnEnded { player: 0, reward: 3 });
    assert_eq!(coins(&game), vec![3, 1]);
    assert_eq!(game.state().player_id(), 1);
}

#[test]
fn test_failed_dice_conquest() {
    let mut assets = tiny_assets();
    let regions = assets
        .map
        .regions()
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, r)| if i == 2 { r.with_lost_tribe() } else { r })
        .collect();
    assets.map = Map::new(regions, assets.map.borders().to_vec()).unwrap();

    let rolls = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&rolls);
    let hooks = Hooks::new().on_dice_rolled(move |_, roll, success| {
        log.borrow_mut().push((roll, success));
    });
    let options = GameOptions::default()
        .no_shuffle()
        .with_dice(dice(&[1]))
        .with_hooks(hooks);
    let mut game = Game::with_options(assets, BasicRules, options).unwrap();

    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();
    game.deploy(4, 0).unwrap();
    assert_eq!(game.state().player().tokens_on_hand, 2);
    assert_eq!(game.rules().conquest_cost(game.state(), 2), 4);

    let events = game.conquer(2, true).unwrap();
    let GameEvent::Conquered { conquest, .. } = &events[0] else {
        panic!("expected a conquest event");
    };
    assert!(!conquest.success);
    assert_eq!(conquest.dice, Some(1));
    assert_eq!(conquest.tokens_spent, 0);

    let state = game.state();
    assert_eq!(state.owner_of(2), None);
    assert!(state.regions()[2].has_lost_tribe);
    assert_eq!(state.player().tokens_on_hand, 2);
    assert_eq!(state.turn_stage(), TurnStage::UsedDice);
    assert_eq!(*rolls.borrow(), vec![(1, false)]);

    assert_eq!(violation(game.conquer(1, false)), RulesViolation::AlreadyUsedDice);
}

#[test]
fn test_redeployment_turn_is_inserted() {
    let regions = vec![
        Region::new(Terrain::Forest).at_border(),
        Region::new(Terrain::Hill).at_border(),
        Region::new(Terrain::Farmland).at_border(),
    ];
    let assets = custom_assets(3, regions, vec![(0, 1), (1, 2)]);

    let redeploys = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&redeploys);
    let hooks = Hooks::new().on_redeploy(move |_| *counter.borrow_mut() += 1);
    let options = GameOptions::default().no_shuffle().with_hooks(hooks);
    let mut game = Game::with_options(assets, BasicRules, options).unwrap();

    // Player 0 holds 0 with 3 tokens and 1 with 6
    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();
    game.conquer(1, false).unwrap();
    game.deploy(3, 1).unwrap();
    game.end_turn().unwrap();

    // Player 1 takes region 0
    game.select_combo(0).unwrap();
    assert_eq!(game.rules().conquest_cost(game.state(), 0), 6);
    let events = game.conquer(0, false).unwrap();
    assert!(matches!(
        events.as_slice(),
        [GameEvent::Conquered { conquest: Conquest { evicted: Some(0), .. }, .. }]
    ));
    assert_eq!(game.state().players()[0].tokens_on_hand, 2);
    game.deploy(3, 0).unwrap();
    let coins_before = game.state().players()[0].coins;

    let events = game.end_turn().unwrap();
    assert_eq!(events.last(), Some(&GameEvent::RedeploymentTurnStarted { player: 0 }));
    let state = game.state();
    assert_eq!(state.player_id(), 0);
    assert_eq!(state.next_player_id(), 2);
    assert_eq!(state.current_turn(), 1);
    assert!(state.is_in_redeployment_turn());
    assert_eq!(*redeploys.borrow(), 1);

    assert_eq!(
        violation(game.conquer(2, false)),
        RulesViolation::ForbiddenDuringRedeployment
    );
    assert_eq!(
        violation(game.end_turn()),
        RulesViolation::UndeployedTokens {
            tokens_on_hand: 2,
            can_decline: false
        }
    );
    game.deploy(2, 1).unwrap();
    game.end_turn().unwrap();

    let state = game.state();
    assert_eq!(state.players()[0].coins, coins_before);
    assert_eq!(state.player_id(), 2);
    assert_eq!(state.current_turn(), 1);
    assert_eq!(state.turn_stage(), TurnStage::SelectCombo);
}

#[test]
fn test_buying_third_combo_pays_two_coins() {
    let mut assets = tiny_assets();
    assets.n_selectable_combos = 3;
    assets.n_coins_on_start = 5;
    let mut game = new_game(assets, BasicRules, &[]);

    let events = game.select_combo(2).unwrap();
    assert!(matches!(
        events.as_slice(),
        [GameEvent::ComboSelected { race: 2, ability: 2, coins_paid: 2, coins_collected: 0, .. }]
    ));
    let combos = game.state().combos().visible().to_vec();
    assert_eq!(coins(&game), vec![3, 5]);
    assert_eq!(combos[0], Combo { race: 0, ability: 0, coins: 1 });
    assert_eq!(combos[1], Combo { race: 1, ability: 1, coins: 1 });
    assert_eq!(combos[2], Combo { race: 3, ability: 3, coins: 0 });

    play_simple_turn(&mut game);
    // player 1 picks up the coin lying on the first combo
    game.select_combo(0).unwrap();
    assert_eq!(game.state().players()[1].coins, 6);
}

#[test]
fn test_deploy_boundaries() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();

    assert_eq!(
        violation(game.deploy(7, 0)),
        RulesViolation::NotEnoughTokensToDeploy { tokens_on_hand: 6 }
    );
    let err = game.deploy(0, 0).unwrap_err();
    assert_eq!(err, GameError::NonPositiveTokens);
    assert!(err.is_invalid_argument());
    assert_eq!(
        game.deploy(1, 42).unwrap_err(),
        GameError::RegionOutOfRange { region: 42, n_regions: 5 }
    );
    assert_eq!(violation(game.deploy(1, 1)), RulesViolation::NonControlledRegion);

    game.deploy(6, 0).unwrap();
    assert_eq!(game.state().player().active_regions[&0], 9);
}

#[test]
fn test_combo_price_boundaries() {
    let mut assets = tiny_assets();
    assets.n_selectable_combos = 3;
    let mut game = new_game(assets, BasicRules, &[]);

    assert_eq!(violation(game.select_combo(2)), RulesViolation::NotEnoughCoins);
    assert_eq!(coins(&game), vec![1, 1]);

    game.select_combo(1).unwrap();
    assert_eq!(coins(&game), vec![0, 1]);
    assert_eq!(game.state().combos().visible()[0].coins, 1);
    game.conquer(0, false).unwrap();
    game.deploy(6, 0).unwrap();
    game.end_turn().unwrap();
    assert_eq!(coins(&game), vec![1, 1]);

    // the coin on combo 0 doesn't make combo 2 any cheaper
    assert_eq!(violation(game.select_combo(2)), RulesViolation::NotEnoughCoins);
    game.select_combo(1).unwrap();
    assert_eq!(coins(&game), vec![1, 0]);
}

#[test]
fn test_conquest_targets() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();

    assert_eq!(violation(game.conquer(0, false)), RulesViolation::ConqueringOwnRegion);
    assert_eq!(violation(game.conquer(4, false)), RulesViolation::NonAdjacentRegion);
    assert_eq!(violation(game.conquer(4, true)), RulesViolation::NonAdjacentRegion);

    // region 0 touches none of the player's other regions
    let rules = game.rules();
    assert_eq!(
        rules.check_conquer(game.state(), 0, false),
        vec![
            RulesViolation::ConqueringOwnRegion,
            RulesViolation::NonAdjacentRegion
        ]
    );
    assert_eq!(
        rules.check_conquer(game.state(), 4, false),
        vec![RulesViolation::NonAdjacentRegion]
    );
    assert!(rules.check_conquer(game.state(), 3, false).is_empty());

    game.conquer(3, false).unwrap();
    assert_eq!(game.state().player().tokens_on_hand, 3);
    game.conquer(4, false).unwrap();
    assert_eq!(violation(game.conquer(3, false)), RulesViolation::ConqueringOwnRegion);
}

// ==================== Turn Flow ====================

#[test]
fn test_successful_dice_conquest_costs_at_least_one_token() {
    let mut game = new_game(tiny_assets(), BasicRules, &[3]);
    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();
    game.deploy(5, 0).unwrap();

    game.conquer(1, true).unwrap();
    let player = game.state().player();
    assert_eq!(player.tokens_on_hand, 0);
    assert_eq!(player.active_regions[&1], 1);
    assert_eq!(game.state().turn_stage(), TurnStage::UsedDice);
    game.end_turn().unwrap();
}

#[test]
fn test_stranded_tokens_after_failed_roll() {
    let mut assets = tiny_assets();
    for race in &mut assets.races {
        race.n_tokens = 1;
    }
    for ability in &mut assets.abilities {
        ability.n_tokens = 0;
    }
    let mut game = new_game(assets, BasicRules, &[0]);
    game.select_combo(0).unwrap();
    assert_eq!(
        violation(game.conquer(0, false)),
        RulesViolation::NotEnoughTokensToConquer { tokens_on_hand: 1, tokens_required: 3 }
    );

    game.conquer(0, true).unwrap();
    assert_eq!(game.state().player().tokens_on_hand, 1);
    assert!(game.state().player().active_regions.is_empty());
    // nowhere to put the token, the turn can still end
    game.end_turn().unwrap();
    assert_eq!(game.state().player_id(), 1);
}

#[test]
fn test_rolling_needs_a_chance() {
    let mut assets = tiny_assets();
    let regions = assets
        .map
        .regions()
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, r)| if i == 1 { r.with_lost_tribe() } else { r })
        .collect();
    assets.map = Map::new(regions, assets.map.borders().to_vec()).unwrap();
    let mut game = new_game(assets, BasicRules, &[]);

    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();
    game.deploy(6, 0).unwrap();
    assert_eq!(violation(game.conquer(1, true)), RulesViolation::RollingWithoutTokens);

    // a second player attacks a 9-token garrison
    game.end_turn().unwrap();
    game.select_combo(0).unwrap();
    game.conquer(3, false).unwrap();
    assert_eq!(
        violation(game.conquer(0, true)),
        RulesViolation::NotEnoughTokensToRoll { tokens_on_hand: 6, minimum_required: 9 }
    );
}

#[test]
fn test_decline_flow() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    play_simple_turn(&mut game);
    play_simple_turn(&mut game);

    // Turn 2: garrisons collapsed to one token each
    let state = game.state();
    assert_eq!(state.current_turn(), 2);
    assert_eq!(state.turn_stage(), TurnStage::CanDecline);
    assert_eq!(state.player().active_regions[&0], 1);
    assert_eq!(state.player().tokens_on_hand, 8);
    assert_eq!(
        violation(game.end_turn()),
        RulesViolation::UndeployedTokens { tokens_on_hand: 8, can_decline: true }
    );

    game.decline().unwrap();
    assert_eq!(
        violation(game.select_combo(0)),
        RulesViolation::SelectingOnDeclineTurn
    );
    assert_eq!(violation(game.conquer(1, false)), RulesViolation::NoActiveRace);
    game.end_turn().unwrap();
    play_simple_turn(&mut game);

    // Turn 3: back to selecting
    assert_eq!(game.state().turn_stage(), TurnStage::SelectCombo);
    assert_eq!(violation(game.end_turn()), RulesViolation::EndBeforeSelect);
    assert_eq!(violation(game.decline()), RulesViolation::NoActiveRace);
}

#[test]
fn test_decline_after_acting_is_forbidden() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    play_simple_turn(&mut game);
    play_simple_turn(&mut game);

    game.deploy(1, 0).unwrap();
    assert_eq!(game.state().turn_stage(), TurnStage::Active);
    assert_eq!(violation(game.decline()), RulesViolation::DecliningWhenActive);
    assert_eq!(violation(game.select_combo(0)), RulesViolation::SelectingWhenActive);
}

#[test]
fn test_abandon_rules() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    play_simple_turn(&mut game);
    play_simple_turn(&mut game);

    assert_eq!(violation(game.abandon(1)), RulesViolation::NonControlledRegion);
    let events = game.abandon(0).unwrap();
    assert_eq!(
        events,
        vec![GameEvent::Abandoned { player: 0, region: 0, tokens_returned: 1 }]
    );
    assert_eq!(game.state().player().tokens_on_hand, 9);
    assert_eq!(game.state().owner_of(0), None);

    game.conquer(0, false).unwrap();
    game.conquer(2, false).unwrap();
    assert_eq!(
        violation(game.abandon(2)),
        RulesViolation::AbandoningAfterConquests
    );
}

#[test]
fn test_start_redeployment() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    assert_eq!(violation(game.start_redeployment()), RulesViolation::NoActiveRace);
    game.select_combo(0).unwrap();
    assert_eq!(violation(game.start_redeployment()), RulesViolation::NoActiveRegions);

    game.conquer(0, false).unwrap();
    game.conquer(1, false).unwrap();
    game.start_redeployment().unwrap();
    let player = game.state().player();
    assert_eq!(player.tokens_on_hand, 3 + 2 + 2);
    assert!(player.active_regions.values().all(|&n| n == 1));
    assert_eq!(game.state().turn_stage(), TurnStage::Redeployment);

    assert_eq!(
        violation(game.conquer(2, false)),
        RulesViolation::ForbiddenDuringRedeployment
    );
    assert_eq!(
        violation(game.start_redeployment()),
        RulesViolation::ForbiddenDuringRedeployment
    );
    game.deploy(7, 1).unwrap();
    game.end_turn().unwrap();
}

#[test]
fn test_declined_region_costs_one_extra_token() {
    let mut game = new_game(tiny_assets(), BasicRules, &[]);
    play_simple_turn(&mut game); // player 0 takes region 0
    play_simple_turn(&mut game); // player 1 takes region 1
    game.decline().unwrap();
    game.end_turn().unwrap();

    game.deploy(8, 1).unwrap();
    assert_eq!(game.rules().conquest_cost(game.state(), 0), 4);
    game.end_turn().unwrap();

    // player 0 takes back its own declined region
    game.select_combo(0).unwrap();
    game.conquer(3, false).unwrap();
    game.conquer(0, false).unwrap();
    let state = game.state();
    assert_eq!(state.owner_of(0), Some(0));
    assert!(state.players()[0].decline_regions.is_empty());
    assert_eq!(state.players()[0].active_regions[&0], 4);
}

#[test]
fn test_declined_banners_resurface_in_order() {
    let assets = Assets {
        name: "solo".into(),
        description: String::new(),
        n_players: 1,
        n_coins_on_start: 0,
        n_selectable_combos: 1,
        n_turns: 10,
        abilities: (0..3).map(|i| Ability::new(format!("Ability{i}"), 4)).collect(),
        races: (0..4).map(|i| Race::new(format!("Race{i}"), 5, 20)).collect(),
        map: Map::new(vec![Region::new(Terrain::Forest).at_border()], vec![]).unwrap(),
    };
    let mut game = new_game(assets, BasicRules, &[]);

    for _ in 0..3 {
        play_simple_turn(&mut game);
        game.decline().unwrap();
        game.end_turn().unwrap();
    }
    let combos = game.state().combos();
    assert_eq!(combos.hidden_races(), &VecDeque::from([0, 1]));
    assert_eq!(combos.hidden_abilities(), &VecDeque::from([1, 2]));

    game.select_combo(0).unwrap();
    assert_eq!(game.state().player().active_race, Some(3));
    assert_eq!(game.state().player().active_ability, Some(0));
    assert_eq!(game.state().combos().visible(), &[Combo::new(0, 1)]);
}

// ==================== Game End ====================

#[test]
fn test_game_end_blocks_everything() {
    let ended = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&ended);
    let hooks = Hooks::new().on_game_end(move |_| *counter.borrow_mut() += 1);
    let options = GameOptions::default().no_shuffle().with_hooks(hooks);
    let mut game = Game::with_options(tiny_assets(), BasicRules, options).unwrap();

    for _ in 0..6 {
        assert!(!game.state().has_ended());
        play_simple_turn(&mut game);
    }
    let state = game.state();
    assert!(state.has_ended());
    assert_eq!(state.current_turn(), 4);
    assert_eq!(*ended.borrow(), 1);

    assert!(game.legal_actions().is_empty());
    for action in [
        Action::Decline,
        Action::SelectCombo(0),
        Action::Abandon(0),
        Action::Conquer(2),
        Action::ConquerWithDice(2),
        Action::StartRedeployment,
        Action::Deploy { n_tokens: 1, region: 0 },
        Action::EndTurn,
    ] {
        assert_eq!(
            game.check(&action),
            Err(GameError::Rules(RulesViolation::GameEnded))
        );
    }
    assert_eq!(violation(game.end_turn()), RulesViolation::GameEnded);
    assert_eq!(*ended.borrow(), 1);
}

#[test]
fn test_hooks_fire_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (a, b, c, d) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
    let hooks = Hooks::new()
        .on_turn_start(move |g| a.borrow_mut().push(format!("start {}", g.player_id())))
        .on_turn_end(move |g| b.borrow_mut().push(format!("end {}", g.player_id())))
        .on_dice_rolled(move |g, roll, ok| {
            c.borrow_mut()
                .push(format!("dice {roll} {ok} {:?}", g.turn_stage()))
        })
        .on_game_end(move |_| d.borrow_mut().push("game over".to_string()));
    let mut assets = tiny_assets();
    assets.n_turns = 1;
    let options = GameOptions::default()
        .no_shuffle()
        .with_dice(dice(&[2]))
        .with_hooks(hooks);
    let mut game = Game::with_options(assets, BasicRules, options).unwrap();

    game.select_combo(0).unwrap();
    game.conquer(0, true).unwrap();
    game.deploy(8, 0).unwrap();
    game.end_turn().unwrap();
    play_simple_turn(&mut game);

    assert_eq!(
        *log.borrow(),
        vec![
            "start 0",
            "dice 2 true UsedDice",
            "end 0",
            "start 1",
            "end 1",
            "game over",
        ]
    );
}

// ==================== Rulesets ====================

fn terrain_assets() -> Assets {
    let regions = vec![
        Region::new(Terrain::Forest).at_border(),
        Region::new(Terrain::Mountain),
        Region::new(Terrain::Mountain).with_lost_tribe(),
        Region::new(Terrain::Mountain),
        Region::new(Terrain::Sea).at_border(),
        Region::new(Terrain::Farmland),
        Region::new(Terrain::Lake),
    ];
    let borders = vec![(0, 1), (1, 2), (2, 3), (4, 5), (5, 0), (5, 6)];
    let mut assets = custom_assets(2, regions, borders);
    for race in &mut assets.races {
        race.n_tokens = 10;
    }
    for ability in &mut assets.abilities {
        ability.n_tokens = 5;
    }
    assets
}

#[test]
fn test_mountains_cost_more_with_default_rules() {
    let mut game = new_game(terrain_assets(), DefaultRules::new(), &[]);
    game.select_combo(0).unwrap();
    assert_eq!(game.state().player().tokens_on_hand, 15);

    let mut costs = Vec::new();
    for region in [0, 1, 2] {
        let events = game.conquer(region, false).unwrap();
        if let GameEvent::Conquered { conquest, .. } = &events[0] {
            costs.push(conquest.cost);
        }
    }
    assert_eq!(costs, vec![3, 4, 5]);
    assert!(!game.state().regions()[2].has_lost_tribe);
    assert_eq!(
        violation(game.conquer(3, false)),
        RulesViolation::NotEnoughTokensToConquer { tokens_on_hand: 3, tokens_required: 4 }
    );
}

#[test]
fn test_mountains_cost_nothing_extra_with_basic_rules() {
    let game = new_game(terrain_assets(), BasicRules, &[]);
    let rules = game.rules();
    let state = game.state();
    assert_eq!(rules.conquest_cost(state, 1), 3);
    assert_eq!(rules.conquest_cost(state, 2), 4);
}

#[test]
fn test_shore_of_border_sea_counts_as_border() {
    let mut basic = new_game(terrain_assets(), BasicRules, &[]);
    basic.select_combo(0).unwrap();
    assert_eq!(violation(basic.conquer(5, false)), RulesViolation::NotAtBorder);

    let mut game = new_game(terrain_assets(), DefaultRules::new(), &[]);
    game.select_combo(0).unwrap();
    assert_eq!(violation(game.conquer(1, false)), RulesViolation::NotAtBorder);
    game.conquer(5, false).unwrap();
    assert_eq!(game.state().owner_of(5), Some(0));
}

#[test]
fn test_water_cannot_be_conquered() {
    let mut game = new_game(terrain_assets(), DefaultRules::new(), &[]);
    game.select_combo(0).unwrap();
    assert_eq!(violation(game.conquer(4, false)), RulesViolation::ConqueringWater);

    game.conquer(5, false).unwrap();
    game.deploy(12, 5).unwrap();
    let rules = game.rules();
    assert_eq!(
        rules.check_conquer(game.state(), 6, false),
        vec![
            RulesViolation::ConqueringWater,
            RulesViolation::NotEnoughTokensToConquer { tokens_on_hand: 0, tokens_required: 3 },
        ]
    );
    assert_eq!(
        rules.check_conquer(game.state(), 4, true),
        vec![RulesViolation::ConqueringWater, RulesViolation::RollingWithoutTokens]
    );
}

/// Rules where nobody may leave their starting region and every turn pays double
struct StayAtHome;

impl Rules for StayAtHome {
    fn check_decline(&self, game: &GameState) -> Vec<RulesViolation> {
        BasicRules.check_decline(game)
    }

    fn check_select_combo(&self, game: &GameState, index: usize) -> Vec<RulesViolation> {
        BasicRules.check_select_combo(game, index)
    }

    fn check_abandon(&self, game: &GameState, region: RegionId) -> Vec<RulesViolation> {
        BasicRules.check_abandon(game, region)
    }

    fn check_conquer(&self, game: &GameState, region: RegionId, use_dice: bool) -> Vec<RulesViolation> {
        let mut violations = BasicRules.check_conquer(game, region, use_dice);
        if !game.player().active_regions.is_empty() {
            violations.push(RulesViolation::custom("Stay at home"));
        }
        violations
    }

    fn check_start_redeployment(&self, game: &GameState) -> Vec<RulesViolation> {
        BasicRules.check_start_redeployment(game)
    }

    fn check_deploy(&self, game: &GameState, n_tokens: u32, region: RegionId) -> Vec<RulesViolation> {
        BasicRules.check_deploy(game, n_tokens, region)
    }

    fn check_end_turn(&self, game: &GameState) -> Vec<RulesViolation> {
        BasicRules.check_end_turn(game)
    }

    fn conquest_cost(&self, game: &GameState, region: RegionId) -> u32 {
        BasicRules.conquest_cost(game, region)
    }

    fn calculate_turn_reward(&self, game: &GameState) -> u32 {
        2 * BasicRules.calculate_turn_reward(game)
    }
}

#[test]
fn test_custom_rules_plug_in() {
    let mut game = new_game(tiny_assets(), StayAtHome, &[]);
    game.select_combo(0).unwrap();
    game.conquer(0, false).unwrap();
    assert_eq!(
        violation(game.conquer(1, false)),
        RulesViolation::Custom { reason: "Stay at home".into() }
    );
    game.deploy(6, 0).unwrap();
    game.end_turn().unwrap();
    assert_eq!(coins(&game), vec![1 + 2, 1]);
}

/// Rules without a single restriction
struct AnythingGoes;

impl Rules for AnythingGoes {
    fn check_decline(&self, _: &GameState) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn check_select_combo(&self, _: &GameState, _: usize) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn check_abandon(&self, _: &GameState, _: RegionId) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn check_conquer(&self, _: &GameState, _: RegionId, _: bool) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn check_start_redeployment(&self, _: &GameState) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn check_deploy(&self, _: &GameState, _: u32, _: RegionId) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn check_end_turn(&self, _: &GameState) -> Vec<RulesViolation> {
        Vec::new()
    }

    fn conquest_cost(&self, _: &GameState, _: RegionId) -> u32 {
        3
    }

    fn calculate_turn_reward(&self, _: &GameState) -> u32 {
        0
    }
}

#[test]
fn test_turn_stages_bind_every_ruleset() {
    let mut game = new_game(tiny_assets(), AnythingGoes, &[]);
    assert_eq!(
        violation(game.end_turn()),
        RulesViolation::ForbiddenInStage { stage: TurnStage::SelectCombo }
    );
    game.select_combo(0).unwrap();
    game.conquer(0, true).unwrap();
    assert_eq!(game.state().turn_stage(), TurnStage::UsedDice);

    let err = game.select_combo(0).unwrap_err();
    assert!(!err.is_invalid_argument());
    assert_eq!(
        err,
        GameError::Rules(RulesViolation::ForbiddenInStage { stage: TurnStage::UsedDice })
    );
    assert_eq!(
        violation(game.conquer(1, false)),
        RulesViolation::ForbiddenInStage { stage: TurnStage::UsedDice }
    );
    assert!(game
        .legal_actions()
        .iter()
        .all(|a| TurnStage::UsedDice.allows(a.kind())));
    assert_eq!(game.state().player().active_race, Some(0));
}

#[test]
fn test_boxed_rules() {
    let rules = rules::by_name("default").unwrap();
    let mut game = new_game(terrain_assets(), rules, &[]);
    game.select_combo(0).unwrap();
    assert_eq!(game.rules().conquest_cost(game.state(), 1), 4);
    assert_eq!(violation(game.conquer(6, false)), RulesViolation::NotAtBorder);
}

#[test]
fn test_invalid_assets_are_rejected() {
    let mut assets = tiny_assets();
    assets.races.truncate(3);
    assert!(matches!(
        Game::new(assets, DefaultRules::new()),
        Err(AssetsError::NotEnoughRaces { .. })
    ));
}

#[test]
fn test_random_game_simulation() {
    let mut game = Game::with_options(
        tiny_assets(),
        DefaultRules::new(),
        GameOptions::default().with_seed(42),
    )
    .unwrap();
    let mut bot = Bot::with_seed(BotStrategy::Greedy, 42);
    let mut turns = 0;
    while !game.state().has_ended() && turns < 50 {
        bot.play_turn(&mut game).unwrap();
        turns += 1;
    }
    assert!(game.state().has_ended());
    assert!(game.state().players().iter().all(|p| p.coins > 0));
}
