// Property tests: every auction invariant holds after every command, for
// arbitrary command sequences, and rejected commands change nothing.

use gavel_core::auction::picker::RandomPicker;
use gavel_core::auction::player::{Player, PlayerStatus, Role};
use gavel_core::auction::rules::{AuctionRules, BidPolicy};
use gavel_core::auction::state::{AuctionState, Phase, TimerAction, LOT_TIMER_SECONDS};
use gavel_core::auction::team::Team;
use gavel_core::AuctionEngine;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Next,
    Reauction,
    Bid(u64),
    Raise(u64),
    Timer(TimerAction),
    Tick,
    Sold { team: usize, amount: u64 },
    SoldAtCurrent { team: usize },
    Unsold,
}

/// Team index 3 does not exist, to exercise unknown references.
const TEAM_IDS: [&str; 4] = ["t1", "t2", "t3", "t_missing"];

fn op_strategy() -> impl Strategy<Value = Op> {
    let timer = prop_oneof![
        Just(TimerAction::Start),
        Just(TimerAction::Pause),
        Just(TimerAction::Reset),
        Just(TimerAction::Add),
    ];
    prop_oneof![
        1 => Just(Op::Start),
        4 => Just(Op::Next),
        1 => Just(Op::Reauction),
        3 => (0u64..3_000).prop_map(Op::Bid),
        2 => (0u64..500).prop_map(Op::Raise),
        2 => timer.prop_map(Op::Timer),
        4 => Just(Op::Tick),
        2 => (0usize..4, 0u64..3_000).prop_map(|(team, amount)| Op::Sold { team, amount }),
        1 => (0usize..4, (u64::MAX - 3_000)..=u64::MAX)
            .prop_map(|(team, amount)| Op::Sold { team, amount }),
        1 => (u64::MAX - 3_000..=u64::MAX).prop_map(Op::Bid),
        2 => (0usize..4).prop_map(|team| Op::SoldAtCurrent { team }),
        2 => Just(Op::Unsold),
    ]
}

fn rules_strategy() -> impl Strategy<Value = AuctionRules> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(budget, exhausted, increasing)| {
        AuctionRules {
            enforce_budget: budget,
            require_exhausted_pool: exhausted,
            bid_policy: if increasing {
                BidPolicy::Increasing
            } else {
                BidPolicy::Any
            },
        }
    })
}

fn build_engine(rules: AuctionRules, seed: u64) -> AuctionEngine {
    let players = (1..=6)
        .map(|i| {
            Player::new(
                format!("p{i}"),
                format!("Player {i}"),
                50 * i as u64,
                "A",
                Role::Batsman,
                "",
            )
        })
        .collect();
    let teams = vec![
        Team::new("t1", "Royal Strikers", "", 2_000),
        Team::new("t2", "Thunder Bolts", "", 1_000),
        Team::new("t3", "Super Kings", "", 500),
    ];
    AuctionEngine::new(players, teams, rules, RandomPicker::with_seed(seed))
}

/// Apply an op; returns whether the engine accepted it.
fn apply(engine: &mut AuctionEngine, op: &Op) -> bool {
    match op {
        Op::Start => engine.start_auction().is_ok(),
        Op::Next => engine.select_next_player().is_ok(),
        Op::Reauction => engine.start_reauction().is_ok(),
        Op::Bid(amount) => engine.place_bid(*amount).is_ok(),
        Op::Raise(increment) => engine.raise_bid(*increment).is_ok(),
        Op::Timer(action) => engine.control_timer(*action).is_ok(),
        Op::Tick => {
            engine.tick();
            true
        }
        Op::Sold { team, amount } => engine.settle_sold(TEAM_IDS[*team], *amount).is_ok(),
        Op::SoldAtCurrent { team } => {
            let amount = engine.state().current_bid();
            engine.settle_sold(TEAM_IDS[*team], amount).is_ok()
        }
        Op::Unsold => engine.settle_unsold().is_ok(),
    }
}

type Snapshot = (AuctionState, Vec<Player>, Vec<Team>);

fn snapshot(engine: &AuctionEngine) -> Snapshot {
    (
        engine.state().clone(),
        engine.players().to_vec(),
        engine.teams().to_vec(),
    )
}

fn check_invariants(engine: &AuctionEngine) -> Result<(), TestCaseError> {
    let state = engine.state();

    if let Some(id) = state.active_player_id() {
        let player = engine.player(id);
        prop_assert!(player.is_some(), "active lot {} is not a known player", id);
        prop_assert!(player.is_some_and(Player::is_open), "active lot {} already resolved", id);
    }

    if state.phase() == Phase::Setup {
        prop_assert!(!state.has_active_lot());
        prop_assert_eq!(state.timer(), LOT_TIMER_SECONDS);
        prop_assert!(!state.is_timer_running());
    }
    prop_assert_ne!(state.phase(), Phase::Completed);

    if state.is_timer_running() {
        prop_assert!(state.phase().is_live());
        prop_assert!(state.timer() > 0);
    }
    prop_assert!(state.timer() <= LOT_TIMER_SECONDS);

    if !state.bid_history().is_empty() {
        prop_assert!(state.has_active_lot());
    }
    if let Some(latest) = state.last_bid() {
        prop_assert_eq!(latest.amount, state.current_bid());
    }

    for p in engine.players() {
        let sold = p.status == PlayerStatus::Sold;
        prop_assert_eq!(sold, p.sold_price.is_some());
        prop_assert_eq!(sold, p.team_id.is_some());
        if let Some(team_id) = &p.team_id {
            prop_assert!(engine.team(team_id).is_some());
        }
    }

    let spent: u64 = engine.teams().iter().map(|t| t.spent).sum();
    let sold: u64 = engine.players().iter().filter_map(|p| p.sold_price).sum();
    prop_assert_eq!(spent, sold, "budget conservation");

    if engine.rules().enforce_budget {
        for t in engine.teams() {
            prop_assert!(t.spent <= t.budget, "team {} overspent", t.id);
        }
    }

    Ok(())
}

proptest! {
    #[test]
    fn invariants_hold_after_every_command(
        rules in rules_strategy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let mut engine = build_engine(rules, seed);
        check_invariants(&engine)?;

        for op in &ops {
            let before = snapshot(&engine);
            let accepted = apply(&mut engine, op);
            if !accepted {
                prop_assert_eq!(&before, &snapshot(&engine), "rejected {:?} mutated state", op);
            }
            check_invariants(&engine)?;
        }
    }

    #[test]
    fn spent_never_decreases(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let mut engine = build_engine(AuctionRules::default(), seed);
        let mut previous: Vec<u64> = engine.teams().iter().map(|t| t.spent).collect();
        for op in &ops {
            apply(&mut engine, op);
            let current: Vec<u64> = engine.teams().iter().map(|t| t.spent).collect();
            for (before, after) in previous.iter().zip(&current) {
                prop_assert!(after >= before);
            }
            previous = current;
        }
    }

    #[test]
    fn resolved_players_never_return_to_available(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let mut engine = build_engine(AuctionRules::default(), seed);
        for op in &ops {
            let before: Vec<PlayerStatus> = engine.players().iter().map(|p| p.status).collect();
            apply(&mut engine, op);
            for (was, p) in before.iter().zip(engine.players()) {
                match was {
                    PlayerStatus::Sold => prop_assert_eq!(p.status, PlayerStatus::Sold),
                    PlayerStatus::Unsold => prop_assert_ne!(p.status, PlayerStatus::Available),
                    PlayerStatus::Available => {}
                }
            }
        }
    }
}
