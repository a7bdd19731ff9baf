// End-to-end auction runs through the public API, starting from the shipped
// default configuration.

use std::fs;
use std::path::PathBuf;

use gavel_core::auction::command::Command;
use gavel_core::auction::picker::{RandomPicker, ScriptedPicker};
use gavel_core::auction::player::{Player, PlayerStatus, Role};
use gavel_core::auction::rules::AuctionRules;
use gavel_core::auction::state::{Phase, TimerAction, TimerEvent, LOT_TIMER_SECONDS};
use gavel_core::auction::summary;
use gavel_core::auction::team::Team;
use gavel_core::config::{ensure_config_files, load_config_from};
use gavel_core::roster::load_roster;
use gavel_core::{AuctionEngine, AuctionError, ErrorKind};

fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .find(|p| p.join("defaults").join("auction.toml").exists())
        .expect("defaults/auction.toml not found above the crate")
        .to_path_buf()
}

/// Copy the shipped defaults into a scratch dir and load them like a first run.
fn default_engine(name: &str, seed: u64) -> AuctionEngine {
    let base = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&base);
    fs::create_dir_all(base.join("defaults")).unwrap();
    for file in ["auction.toml", "players.csv"] {
        fs::copy(
            project_root().join("defaults").join(file),
            base.join("defaults").join(file),
        )
        .unwrap();
    }
    ensure_config_files(&base).unwrap();
    let config = load_config_from(&base).unwrap();
    let roster = load_roster(&config).unwrap();
    AuctionEngine::new(
        roster.players,
        roster.teams,
        config.rules,
        RandomPicker::with_seed(seed),
    )
}

#[test]
fn default_roster_runs_a_full_initial_round() {
    let mut engine = default_engine("gavel_scenario_full_round", 7);
    assert_eq!(engine.players().len(), 10);
    assert_eq!(engine.teams().len(), 4);

    engine.apply(Command::StartAuction).unwrap();
    let team_ids: Vec<String> = engine.teams().iter().map(|t| t.id.clone()).collect();

    let mut lots = 0;
    loop {
        match engine.apply(Command::NextPlayer) {
            Ok(()) => {}
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::EmptyPool);
                break;
            }
        }
        lots += 1;
        if lots % 3 == 0 {
            engine.apply(Command::Unsold).unwrap();
            continue;
        }
        engine.apply(Command::RaiseBid { increment: 50_000 }).unwrap();
        let team_id = team_ids[lots % team_ids.len()].clone();
        engine
            .apply(Command::Sold {
                team_id,
                amount: None,
            })
            .unwrap();
    }

    assert_eq!(lots, 10);
    let counts = engine.status_counts();
    assert!(counts.initial_round_exhausted());
    assert_eq!(counts.unsold, 3);
    assert_eq!(counts.sold, 7);
    assert_eq!(
        summary::total_spent(engine.teams()),
        summary::total_sold_value(engine.players())
    );
    assert!(engine.can_start_reauction());
}

#[test]
fn reauction_round_sells_off_unsold_players() {
    let mut engine = default_engine("gavel_scenario_reauction", 11);
    engine.start_auction().unwrap();
    while engine.select_next_player().is_ok() {
        engine.settle_unsold().unwrap();
    }
    assert_eq!(engine.status_counts().unsold, 10);

    engine.start_reauction().unwrap();
    assert_eq!(engine.state().phase(), Phase::LiveReauction);

    // Several passes: each pass may only shrink the unsold pool.
    let mut previous = engine.status_counts().unsold;
    for pass in 0..4 {
        let player = engine.select_next_player().unwrap();
        let price = player.base_price;
        if pass % 2 == 0 {
            engine.settle_sold("t1", price).unwrap();
        } else {
            engine.settle_unsold().unwrap();
        }
        let now = engine.status_counts().unsold;
        assert!(now <= previous);
        previous = now;
    }
    assert_eq!(engine.status_counts().sold, 2);
    assert_eq!(summary::squad(engine.players(), "t1").len(), 2);
}

#[test]
fn two_player_sale() {
    let players = vec![
        Player::new("a", "Player A", 100, "B", Role::Batsman, ""),
        Player::new("b", "Player B", 200, "A", Role::Bowler, ""),
    ];
    let teams = vec![Team::new("t1", "Royal Strikers", "", 1_000)];
    let mut engine = AuctionEngine::new(players, teams, AuctionRules::default(), RandomPicker::with_seed(3));

    engine.start_auction().unwrap();
    let picked = engine.select_next_player().unwrap().id.clone();
    assert!(picked == "a" || picked == "b");
    engine.place_bid(150).unwrap();
    engine.settle_sold("t1", 150).unwrap();

    let player = engine.player(&picked).unwrap();
    assert_eq!(player.status, PlayerStatus::Sold);
    assert_eq!(player.sold_price, Some(150));
    assert_eq!(player.team_id.as_deref(), Some("t1"));
    assert_eq!(engine.team("t1").unwrap().spent, 150);
    assert!(engine.state().active_player_id().is_none());
    assert!(engine.state().bid_history().is_empty());
    assert_eq!(engine.last_bid_team().map(|t| t.name.as_str()), Some("Royal Strikers"));
}

#[test]
fn empty_pool_leaves_state_unchanged() {
    let mut engine = AuctionEngine::new(
        vec![Player::new("a", "Player A", 100, "B", Role::Batsman, "")],
        vec![Team::new("t1", "Royal Strikers", "", 1_000)],
        AuctionRules::default(),
        ScriptedPicker::first(),
    );
    engine.start_auction().unwrap();
    engine.select_next_player().unwrap();
    engine.settle_sold("t1", 100).unwrap();
    engine.start_reauction().unwrap();

    let state_before = engine.state().clone();
    let players_before = engine.players().to_vec();
    let err = engine.select_next_player().unwrap_err();
    assert_eq!(
        err,
        AuctionError::EmptyPool {
            phase: Phase::LiveReauction
        }
    );
    assert_eq!(engine.state(), &state_before);
    assert_eq!(engine.players(), players_before.as_slice());
}

#[test]
fn countdown_runs_out_without_resolving_the_lot() {
    let mut engine = default_engine("gavel_scenario_countdown", 5);
    engine.start_auction().unwrap();
    engine.select_next_player().unwrap();
    engine.control_timer(TimerAction::Start).unwrap();

    let mut events = Vec::new();
    for _ in 0..LOT_TIMER_SECONDS + 2 {
        events.push(engine.tick());
    }
    assert_eq!(events[0], TimerEvent::Ticked { remaining: 9 });
    assert_eq!(events[9], TimerEvent::Expired);
    assert_eq!(events[10], TimerEvent::Idle);
    assert_eq!(engine.state().timer(), 0);
    assert!(!engine.state().is_timer_running());
    assert!(engine.state().has_active_lot());

    engine.control_timer(TimerAction::Reset).unwrap();
    assert_eq!(engine.state().timer(), LOT_TIMER_SECONDS);
    engine.settle_unsold().unwrap();
}

#[test]
fn unaffordable_sale_is_rejected_by_default() {
    let mut engine = default_engine("gavel_scenario_budget", 9);
    engine.start_auction().unwrap();
    engine.select_next_player().unwrap();
    engine.place_bid(20_000_000).unwrap();

    let err = engine
        .apply(Command::Sold {
            team_id: "t2".into(),
            amount: None,
        })
        .unwrap_err();
    assert!(matches!(err, AuctionError::InsufficientPurse { .. }));
    assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
    assert_eq!(engine.team("t2").unwrap().spent, 0);
    assert!(summary::affordable_teams(engine.teams(), 20_000_000).is_empty());
}
