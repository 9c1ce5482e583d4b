use anyhow::{Result, ensure};
use arcade_game::{ArcadeConfig, GameKind, Metric, MetricKey};

use crate::common::scenario::TestScenario;
use crate::logic::policy::{ODD_EVEN_CALLS, REACTION_TRIES};
use crate::logic::{PlanKind, PlaySummary, SimulationPlan};

/// Bisecting 1..=100 never needs more than this many guesses.
const BISECT_WORST_CASE: u32 = 7;
const DRAW_MIN: i64 = 1;
const DRAW_MAX: i64 = 60;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "Smoke",
            "One tour of every tracked game",
            SimulationPlan::new(PlanKind::Tour, 1)
                .with_expectation(no_rejections)
                .with_expectation(state_restores),
        ),
        TestScenario::simulation(
            "Number Guess",
            "Bisecting player always finds the number",
            SimulationPlan::new(PlanKind::NumberGuess, 5)
                .with_expectation(no_rejections)
                .with_expectation(bisect_always_wins),
        ),
        TestScenario::simulation(
            "Memory",
            "Perfect-recall player clears the board within bounds",
            SimulationPlan::new(PlanKind::Memory, 3)
                .with_expectation(no_rejections)
                .with_expectation(memory_moves_within_bounds),
        ),
        TestScenario::simulation(
            "Odd or Even",
            "Score and streak agree with every round report",
            SimulationPlan::new(PlanKind::OddEven, 3)
                .with_expectation(no_rejections)
                .with_expectation(odd_even_score_matches)
                .with_expectation(odd_even_streaks_consistent),
        ),
        TestScenario::simulation(
            "Reaction",
            "Measured times match the bot's clicks; early clicks record nothing",
            SimulationPlan::new(PlanKind::Reaction, 2).with_expectation(reaction_times_match),
        ),
        TestScenario::simulation(
            "Blackjack",
            "Rounds settle but never touch the ledger",
            SimulationPlan::new(PlanKind::Blackjack, 10).with_expectation(blackjack_untracked),
        ),
        TestScenario::simulation(
            "Tools",
            "Draws stay distinct and in range; bad input is rejected",
            SimulationPlan::new(PlanKind::Tools, 4).with_expectation(draws_are_valid),
        ),
        TestScenario::simulation(
            "Tour",
            "Winning every game unlocks all-rounder and survives a reload",
            SimulationPlan::new(PlanKind::Tour, 2)
                .with_expectation(no_rejections)
                .with_expectation(all_rounder_unlocked)
                .with_expectation(state_restores),
        ),
    ]
}

fn no_rejections(summary: &PlaySummary) -> Result<()> {
    ensure!(
        summary.rejections.is_empty(),
        "unexpected rejections: {:?}",
        summary.rejections
    );
    Ok(())
}

fn state_restores(summary: &PlaySummary) -> Result<()> {
    ensure!(
        summary.restored_state_matches,
        "state reloaded from storage differs from the live state"
    );
    Ok(())
}

fn bisect_always_wins(summary: &PlaySummary) -> Result<()> {
    let outcomes: Vec<_> = summary.outcomes_for(GameKind::NumberGuess).collect();
    ensure!(
        outcomes.len() == summary.rounds,
        "expected {} number guess outcomes, got {}",
        summary.rounds,
        outcomes.len()
    );
    for outcome in outcomes {
        ensure!(outcome.won, "bisecting player lost: {outcome:?}");
        if let Metric::Attempts { attempts } = outcome.metric {
            ensure!(
                (1..=BISECT_WORST_CASE).contains(&attempts),
                "bisect took {attempts} attempts"
            );
        }
    }
    let best = summary
        .stats
        .best(GameKind::NumberGuess, MetricKey::Attempts)
        .unwrap_or(0);
    ensure!(best >= 1, "best attempts not recorded");
    Ok(())
}

fn memory_moves_within_bounds(summary: &PlaySummary) -> Result<()> {
    let pairs = summary.memory_pairs;
    ensure!(pairs > 0, "memory board was never dealt");
    let mut wins = 0;
    for outcome in summary.outcomes_for(GameKind::Memory) {
        ensure!(outcome.won, "memory outcome recorded as a loss");
        let Metric::MovesAndTime { moves, .. } = outcome.metric else {
            anyhow::bail!("memory outcome carries {:?}", outcome.metric);
        };
        ensure!(
            (pairs..=pairs * 2).contains(&moves),
            "{moves} moves for {pairs} pairs"
        );
        wins += 1;
    }
    ensure!(
        wins == summary.rounds,
        "cleared {wins} boards in {} rounds",
        summary.rounds
    );
    Ok(())
}

fn odd_even_score_matches(summary: &PlaySummary) -> Result<()> {
    let per_hit = ArcadeConfig::default().odd_even.points_per_hit;
    let correct = summary.odd_even_rounds.iter().filter(|r| r.correct).count();
    let expected = per_hit * u32::try_from(correct)?;
    ensure!(
        summary.odd_even_score == expected,
        "score {} does not match {correct} correct calls",
        summary.odd_even_score
    );
    let recorded = summary.outcomes_for(GameKind::OddEven).count();
    ensure!(
        recorded == summary.odd_even_rounds.len(),
        "{recorded} outcomes for {} rounds",
        summary.odd_even_rounds.len()
    );
    Ok(())
}

fn odd_even_streaks_consistent(summary: &PlaySummary) -> Result<()> {
    for session in summary.odd_even_rounds.chunks(ODD_EVEN_CALLS) {
        let mut streak = 0;
        for report in session {
            ensure!(
                report.outcome.won == report.correct,
                "round outcome disagrees with the call"
            );
            let Metric::Streak { streak: reported } = report.outcome.metric else {
                anyhow::bail!("odd/even round carries {:?}", report.outcome.metric);
            };
            if report.correct {
                streak += 1;
                ensure!(reported == streak, "streak {reported}, expected {streak}");
            } else {
                ensure!(reported == streak, "broken streak {reported}, expected {streak}");
                streak = 0;
            }
        }
    }
    Ok(())
}

fn reaction_times_match(summary: &PlaySummary) -> Result<()> {
    let measured: Vec<u64> = summary
        .outcomes_for(GameKind::Reaction)
        .filter_map(|outcome| match outcome.metric {
            Metric::ReactionMs { ms } => Some(ms),
            _ => None,
        })
        .collect();
    ensure!(
        measured == summary.intended_reactions,
        "measured {measured:?}, clicked at {:?}",
        summary.intended_reactions
    );
    let tries = summary.early_clicks + measured.len();
    ensure!(
        tries == REACTION_TRIES * summary.rounds,
        "{tries} tries accounted for"
    );
    Ok(())
}

fn blackjack_untracked(summary: &PlaySummary) -> Result<()> {
    ensure!(
        summary.blackjack.len() == summary.rounds,
        "{} of {} hands settled",
        summary.blackjack.len(),
        summary.rounds
    );
    ensure!(summary.outcomes.is_empty(), "blackjack reached the ledger");
    ensure!(summary.stats.total_games == 0, "games counted for blackjack");
    Ok(())
}

fn draws_are_valid(summary: &PlaySummary) -> Result<()> {
    for draw in &summary.draws {
        ensure!(!draw.is_empty(), "empty draw");
        ensure!(
            draw.windows(2).all(|pair| pair[0] < pair[1]),
            "draw not strictly ascending: {draw:?}"
        );
        ensure!(
            draw.iter().all(|n| (DRAW_MIN..=DRAW_MAX).contains(n)),
            "draw out of range: {draw:?}"
        );
    }
    let range_errors = summary
        .rejections
        .iter()
        .filter(|e| e.is_range_error())
        .count();
    ensure!(
        range_errors == summary.rounds,
        "{range_errors} range errors over {} rounds",
        summary.rounds
    );
    let roulette = ArcadeConfig::default().roulette;
    ensure!(
        summary
            .spins
            .iter()
            .all(|s| (roulette.min..=roulette.max).contains(&s.number) && !s.phrase.is_empty()),
        "spin outside the wheel"
    );
    ensure!(summary.outcomes.is_empty(), "tools recorded outcomes");
    Ok(())
}

fn all_rounder_unlocked(summary: &PlaySummary) -> Result<()> {
    for kind in GameKind::tracked() {
        ensure!(summary.stats.has_won(kind), "never won {kind}");
    }
    ensure!(
        summary.unlocked.iter().any(|id| id == "all_rounder"),
        "all_rounder not unlocked (got {:?})",
        summary.unlocked
    );
    Ok(())
}
