//! Scripted players that drive the controller the way a person would, only
//! through inputs and rendered views.
use arcade_game::games::number_guess::GuessStatus;
use arcade_game::view::{BlackjackView, MemoryView, OddEvenView};
use arcade_game::{
    CardFace, Clock, Emit, GameInput, GameKind, GameSession, GuessHint, Parity, ViewModel,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::simulation::{Controller, PlaySummary};

pub const ODD_EVEN_CALLS: usize = 12;
pub const REACTION_TRIES: usize = 6;
const EARLY_CLICK_CHANCE: f64 = 0.2;
const EARLY_CLICK_AFTER_MS: u64 = 100;
const BLACKJACK_STAND_AT: u32 = 17;

fn send(ctrl: &mut Controller, summary: &mut PlaySummary, input: GameInput) -> Option<ViewModel> {
    let emits = ctrl.apply(input);
    summary.absorb(&emits);
    Emit::last_view(&emits).cloned()
}

/// Bisect the range using the too-high/too-low hints.
pub fn play_number_guess(ctrl: &mut Controller, summary: &mut PlaySummary) {
    let emits = ctrl.start(GameKind::NumberGuess);
    summary.absorb(&emits);
    let Some(ViewModel::NumberGuess(view)) = Emit::last_view(&emits) else {
        return;
    };
    let (mut low, mut high) = (view.min, view.max);
    while low <= high {
        let guess = low + (high - low) / 2;
        let Some(ViewModel::NumberGuess(view)) =
            send(ctrl, summary, GameInput::Guess { value: guess })
        else {
            return;
        };
        match (view.status, view.hint) {
            (GuessStatus::Active, Some(GuessHint::TooHigh)) => high = guess - 1,
            (GuessStatus::Active, Some(GuessHint::TooLow)) => low = guess + 1,
            _ => return,
        }
    }
}

/// Remember every revealed symbol and never miss a known pair.
pub fn play_memory(ctrl: &mut Controller, summary: &mut PlaySummary) {
    let emits = ctrl.start(GameKind::Memory);
    summary.absorb(&emits);
    let Some(ViewModel::Memory(view)) = Emit::last_view(&emits).cloned() else {
        return;
    };
    summary.memory_pairs = view.pairs;
    let revert_ms = ctrl.config().memory.revert_delay_ms;
    let mut known: Vec<Option<String>> = vec![None; view.cards.len()];
    let mut view = view;

    for _ in 0..view.cards.len() * 2 {
        if view.matched_pairs == view.pairs {
            return;
        }
        let (first, second) = match known_pair(&known, &view) {
            Some(pair) => pair,
            None => {
                let Some(first) = next_unknown(&known, None) else {
                    return;
                };
                let Some(revealed) = flip(ctrl, summary, first, &mut known) else {
                    return;
                };
                let symbol = known[first].clone();
                let partner = (0..known.len()).find(|&i| {
                    i != first
                        && revealed.cards[i].face == CardFace::FaceDown
                        && known[i].is_some()
                        && known[i] == symbol
                });
                let Some(second) = partner.or_else(|| next_unknown(&known, Some(first))) else {
                    return;
                };
                match flip(ctrl, summary, second, &mut known) {
                    Some(next) => view = next,
                    None => return,
                }
                if view.locked {
                    summary.absorb(&ctrl.advance(revert_ms));
                }
                continue;
            }
        };
        let _ = flip(ctrl, summary, first, &mut known);
        match flip(ctrl, summary, second, &mut known) {
            Some(next) => view = next,
            None => return,
        }
    }
}

fn flip(
    ctrl: &mut Controller,
    summary: &mut PlaySummary,
    index: usize,
    known: &mut [Option<String>],
) -> Option<MemoryView> {
    let Some(ViewModel::Memory(view)) = send(ctrl, summary, GameInput::Flip { index }) else {
        return None;
    };
    if let Some(symbol) = view.cards.get(index).and_then(|card| card.symbol.clone()) {
        known[index] = Some(symbol);
    }
    Some(view)
}

fn known_pair(known: &[Option<String>], view: &MemoryView) -> Option<(usize, usize)> {
    let open = |i: usize| view.cards[i].face == CardFace::FaceDown;
    (0..known.len()).filter(|&i| open(i)).find_map(|i| {
        let symbol = known[i].as_ref()?;
        (i + 1..known.len())
            .find(|&j| open(j) && known[j].as_ref() == Some(symbol))
            .map(|j| (i, j))
    })
}

fn next_unknown(known: &[Option<String>], skip: Option<usize>) -> Option<usize> {
    (0..known.len()).find(|&i| known[i].is_none() && Some(i) != skip)
}

/// Call parities at random, mixing in finger rounds. With `oracle` the first
/// call peeks at the hidden number so at least one round is won.
pub fn play_odd_even(
    ctrl: &mut Controller,
    rng: &mut ChaCha8Rng,
    summary: &mut PlaySummary,
    oracle: bool,
) {
    summary.absorb(&ctrl.start(GameKind::OddEven));
    let mut session_score = 0;
    for call in 0..ODD_EVEN_CALLS {
        let peeked = match ctrl.session() {
            Some(GameSession::OddEven(session)) if oracle && call == 0 => {
                Some(Parity::of(session.current_number()))
            }
            _ => None,
        };
        let pick = peeked.unwrap_or(if rng.gen_bool(0.5) {
            Parity::Even
        } else {
            Parity::Odd
        });
        let input = if peeked.is_none() && rng.gen_bool(0.3) {
            GameInput::Fingers {
                pick,
                fingers: rng.gen_range(0..=10),
            }
        } else {
            GameInput::Parity { pick }
        };
        if let Some(ViewModel::OddEven(OddEvenView {
            last_round: Some(report),
            score,
            ..
        })) = send(ctrl, summary, input)
        {
            summary.odd_even_rounds.push(report);
            session_score = score;
        }
    }
    summary.odd_even_score += session_score;
}

/// Wait for the signal and click after a human-ish delay, sometimes jumping
/// the gun. The first try is always played clean.
pub fn play_reaction(ctrl: &mut Controller, rng: &mut ChaCha8Rng, summary: &mut PlaySummary) {
    summary.absorb(&ctrl.start(GameKind::Reaction));
    for attempt in 0..REACTION_TRIES {
        let _ = send(ctrl, summary, GameInput::Begin);
        if attempt > 0 && rng.gen_bool(EARLY_CLICK_CHANCE) {
            summary.absorb(&ctrl.advance(EARLY_CLICK_AFTER_MS));
            let _ = send(ctrl, summary, GameInput::Click);
            summary.early_clicks += 1;
            continue;
        }
        let Some(deadline) = ctrl.clock().next_deadline() else {
            continue;
        };
        let now = ctrl.clock().now_ms();
        summary.absorb(&ctrl.advance(deadline.saturating_sub(now)));
        let reaction_ms = rng.gen_range(120..=450);
        summary.absorb(&ctrl.advance(reaction_ms));
        let _ = send(ctrl, summary, GameInput::Click);
        summary.intended_reactions.push(reaction_ms);
    }
}

/// Hit below 17, then stand.
pub fn play_blackjack(ctrl: &mut Controller, summary: &mut PlaySummary) {
    let emits = ctrl.start(GameKind::Blackjack);
    summary.absorb(&emits);
    let mut view = match Emit::last_view(&emits) {
        Some(ViewModel::Blackjack(view)) => view.clone(),
        _ => return,
    };
    while view.result.is_none() && view.player_total < BLACKJACK_STAND_AT {
        match send(ctrl, summary, GameInput::Hit) {
            Some(ViewModel::Blackjack(next)) => view = next,
            _ => return,
        }
    }
    if view.result.is_none()
        && let Some(ViewModel::Blackjack(BlackjackView {
            result: Some(result),
            ..
        })) = send(ctrl, summary, GameInput::Stand)
    {
        view.result = Some(result);
    }
    if let Some(result) = view.result {
        summary.blackjack.push(result);
    }
}

/// Exercise the draw and spin tools, including a malformed form submission.
pub fn use_tools(ctrl: &mut Controller, rng: &mut ChaCha8Rng, summary: &mut PlaySummary) {
    let count = rng.gen_range(1..=6);
    summary.absorb(&ctrl.draw_numbers(count, 1, 60));
    summary.draws.push(ctrl.last_draw().to_vec());

    summary.absorb(&ctrl.draw_numbers_text("3", "one", "10"));
    summary.absorb(&ctrl.draw_numbers(61, 1, 60));

    summary.absorb(&ctrl.spin());
    if let Some(spin) = ctrl.last_spin() {
        summary.spins.push(spin.clone());
    }
    summary.absorb(&ctrl.reset_draw());
}
