use arcade_game::games::memory::{FlipResult, MemoryPhase};
use arcade_game::{
    ArcadeConfig, CardFace, Emit, GameError, GameInput, GameKind, GameSession, ManualClock,
    MemoryStorage, Metric, MetricKey, NumberGuessSession, Outcome, Parity, ReactionPhase,
    SessionController, TimerKind,
};

type Controller = SessionController<MemoryStorage, ManualClock>;

fn controller(seed: u64) -> Controller {
    SessionController::with_seed(MemoryStorage::default(), ManualClock::starting_at(10_000), seed)
}

fn recorded(emits: &[Emit]) -> Vec<Outcome> {
    emits
        .iter()
        .filter_map(|emit| match emit {
            Emit::Recorded { outcome } => Some(*outcome),
            _ => None,
        })
        .collect()
}

#[test]
fn number_guess_found_on_fourth_try() {
    let mut ctrl = controller(11);
    let _ = ctrl.start_number_guess(1, 100, 10);
    let target = match ctrl.session() {
        Some(GameSession::NumberGuess(session)) => session.target(),
        other => panic!("expected number guess, got {other:?}"),
    };
    let misses: Vec<i64> = (1..=100).filter(|n| *n != target).take(3).collect();
    for miss in misses {
        let emits = ctrl.apply(GameInput::Guess { value: miss });
        assert!(recorded(&emits).is_empty());
    }
    let emits = ctrl.apply(GameInput::Guess { value: target });
    assert_eq!(
        recorded(&emits),
        [Outcome::won(
            GameKind::NumberGuess,
            Metric::Attempts { attempts: 4 }
        )]
    );
    let stats = &ctrl.state().stats;
    assert_eq!(stats.total_wins, 1);
    assert_eq!(stats.best(GameKind::NumberGuess, MetricKey::Attempts), Some(4));
}

#[test]
fn number_guess_exhausts_attempts_and_reveals_target() {
    let mut session = NumberGuessSession::with_target(1, 100, 10, 73, 0);
    for value in 1..=10 {
        let _ = session.guess(value).unwrap();
    }
    assert!(session.is_terminal());
    assert_eq!(
        session.outcome(),
        Some(Outcome::lost(
            GameKind::NumberGuess,
            Metric::Attempts { attempts: 10 }
        ))
    );
    assert_eq!(session.guess(73), Err(GameError::SessionFinished));
}

#[test]
fn memory_mismatches_never_match_until_a_true_pair() {
    let cfg = ArcadeConfig::default();
    let symbols: Vec<String> = cfg.memory.symbols.clone();
    // Lay both halves of the deck out in the same order: card i pairs with i + n.
    let n = symbols.len();
    let deck: Vec<String> = symbols.iter().chain(symbols.iter()).cloned().collect();
    let mut session = arcade_game::MemorySession::from_deck(deck, 1_000, 0);

    for i in 0..n - 1 {
        let _ = session.flip(i, 0).unwrap();
        assert!(matches!(
            session.flip(i + 1, 0).unwrap(),
            FlipResult::Mismatch { .. }
        ));
        assert_eq!(session.matched_pairs(), 0);
        assert_eq!(session.resolve_pending(), Some((i, i + 1)));
    }

    let mut last = FlipResult::Ignored;
    for i in 0..n {
        let _ = session.flip(i, 60_000).unwrap();
        last = session.flip(i + n, 60_000).unwrap();
    }
    let expected_moves = u32::try_from(2 * n - 1).unwrap();
    assert_eq!(
        last,
        FlipResult::Won {
            moves: expected_moves,
            elapsed_ms: 60_000
        }
    );
    assert_eq!(session.phase(), MemoryPhase::Won);
    assert!(session.cards().iter().all(|c| c.face == CardFace::Matched));
    assert!(session.moves() >= session.pairs());
}

#[test]
fn memory_revert_runs_through_the_clock() {
    let mut ctrl = controller(3);
    let _ = ctrl.start(GameKind::Memory);
    let (first, second) = match ctrl.session() {
        Some(GameSession::Memory(session)) => {
            let cards = session.cards();
            let other = (1..cards.len())
                .find(|&i| cards[i].symbol != cards[0].symbol)
                .unwrap();
            (0, other)
        }
        other => panic!("expected memory, got {other:?}"),
    };
    let _ = ctrl.apply(GameInput::Flip { index: first });
    let _ = ctrl.apply(GameInput::Flip { index: second });
    let token = ctrl.pending_timer().unwrap();
    assert_eq!(token.kind, TimerKind::MemoryRevert);

    // Flips are ignored while the pair is showing.
    let _ = ctrl.apply(GameInput::Flip { index: 2 });
    let locked = matches!(ctrl.session(), Some(GameSession::Memory(s)) if s.locked());
    assert!(locked);

    let emits = ctrl.advance(999);
    assert!(emits.is_empty());
    let emits = ctrl.advance(1);
    assert!(Emit::last_view(&emits).is_some());
    match ctrl.session() {
        Some(GameSession::Memory(session)) => {
            assert!(!session.locked());
            assert_eq!(session.cards()[first].face, CardFace::FaceDown);
            assert_eq!(session.cards()[second].face, CardFace::FaceDown);
        }
        other => panic!("expected memory, got {other:?}"),
    }
}

#[test]
fn stale_timer_after_new_session_is_ignored() {
    let mut ctrl = controller(8);
    let _ = ctrl.start(GameKind::Reaction);
    let _ = ctrl.apply(GameInput::Begin);
    let stale = ctrl.pending_timer().unwrap();

    let _ = ctrl.start(GameKind::Reaction);
    assert!(ctrl.pending_timer().is_none());
    assert!(ctrl.on_timer(stale).is_empty());
    let phase = match ctrl.session() {
        Some(GameSession::Reaction(session)) => session.phase(),
        other => panic!("expected reaction, got {other:?}"),
    };
    assert_eq!(phase, ReactionPhase::Idle);
}

#[test]
fn early_reaction_click_records_nothing() {
    let mut ctrl = controller(21);
    let _ = ctrl.start(GameKind::Reaction);
    let _ = ctrl.apply(GameInput::Begin);
    let _ = ctrl.clock_mut().advance(100);
    let emits = ctrl.apply(GameInput::Click);
    assert!(recorded(&emits).is_empty());
    assert_eq!(ctrl.state().stats.total_games, 0);

    // The pending arm timer still fires but finds nothing to do.
    let deadline = ctrl.clock().next_deadline().unwrap();
    let now = arcade_game::Clock::now_ms(ctrl.clock());
    assert!(ctrl.advance(deadline - now).is_empty());
}

#[test]
fn overshooting_the_arm_deadline_still_measures_from_the_signal() {
    let mut ctrl = controller(21);
    let _ = ctrl.start(GameKind::Reaction);
    let _ = ctrl.apply(GameInput::Begin);
    let deadline = ctrl.clock().next_deadline().unwrap();
    let now = arcade_game::Clock::now_ms(ctrl.clock());

    // One coarse step lands 900 ms past the moment the screen turned green.
    let _ = ctrl.advance(deadline - now + 900);
    assert_eq!(arcade_game::Clock::now_ms(ctrl.clock()), deadline + 900);
    match ctrl.session() {
        Some(GameSession::Reaction(session)) => assert_eq!(session.armed_at(), Some(deadline)),
        other => panic!("expected reaction, got {other:?}"),
    }

    let emits = ctrl.apply(GameInput::Click);
    let outcomes = recorded(&emits);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].metric, Metric::ReactionMs { ms: 900 });
    assert!(!ctrl.state().achievements.contains("lightning"));
}

#[test]
fn blackjack_rounds_never_reach_the_ledger() {
    let mut ctrl = controller(99);
    for _ in 0..20 {
        let _ = ctrl.start(GameKind::Blackjack);
        let _ = ctrl.apply(GameInput::Hit);
        let emits = ctrl.apply(GameInput::Stand);
        assert!(recorded(&emits).is_empty());
    }
    assert_eq!(ctrl.state().stats.total_games, 0);
    assert!(ctrl.state().achievements.is_empty());
}

#[test]
fn wrong_input_for_game_is_rejected() {
    let mut ctrl = controller(4);
    let _ = ctrl.start(GameKind::OddEven);
    let emits = ctrl.apply(GameInput::Hit);
    assert_eq!(
        Emit::rejection(&emits),
        Some(&GameError::UnsupportedInput {
            kind: GameKind::OddEven
        })
    );
}

#[test]
fn streak_spans_games() {
    let mut ctrl = controller(12);
    for _ in 0..3 {
        let _ = ctrl.start_number_guess(1, 2, 2);
        let target = match ctrl.session() {
            Some(GameSession::NumberGuess(session)) => session.target(),
            other => panic!("expected number guess, got {other:?}"),
        };
        let _ = ctrl.apply(GameInput::Guess { value: target });
    }
    let stats = &ctrl.state().stats;
    assert_eq!(stats.current_streak, 3);
    assert!(ctrl.state().achievements.contains("hot_streak"));
}

fn hidden_parity(ctrl: &Controller) -> Parity {
    match ctrl.session() {
        Some(GameSession::OddEven(session)) => Parity::of(session.current_number()),
        other => panic!("expected odd/even, got {other:?}"),
    }
}

#[test]
fn every_odd_even_round_is_its_own_tracked_game() {
    let mut ctrl = controller(8);
    let _ = ctrl.start(GameKind::OddEven);
    for _ in 0..5 {
        let pick = hidden_parity(&ctrl);
        let emits = ctrl.apply(GameInput::Parity { pick });
        assert_eq!(recorded(&emits).len(), 1);
    }
    let miss = match hidden_parity(&ctrl) {
        Parity::Even => Parity::Odd,
        Parity::Odd => Parity::Even,
    };
    let emits = ctrl.apply(GameInput::Parity { pick: miss });
    assert_eq!(
        recorded(&emits),
        [Outcome::lost(GameKind::OddEven, Metric::Streak { streak: 5 })]
    );

    // Five hits and one miss: six games, five wins, and the global streak
    // follows the round streak.
    let stats = &ctrl.state().stats;
    assert_eq!(stats.total_games, 6);
    assert_eq!(stats.total_wins, 5);
    assert_eq!(stats.best_streak, 5);
    assert_eq!(stats.current_streak, 0);
    let record = stats.game(GameKind::OddEven).unwrap();
    assert_eq!((record.played, record.wins), (6, 5));
    assert!(ctrl.state().achievements.contains("parity_pro"));
}
