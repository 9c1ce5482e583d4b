use arcade_game::games::draw::SpinResult;
use arcade_game::games::odd_even::RoundReport;
use arcade_game::{
    AppState, BlackjackResult, Emit, GameError, GameKind, ManualClock, MemoryStorage, Outcome,
    SessionController, StatsLedger,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::policy;

pub type Controller = SessionController<MemoryStorage, ManualClock>;

/// Check run against a finished simulation.
pub type Expectation = fn(&PlaySummary) -> anyhow::Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    NumberGuess,
    Memory,
    OddEven,
    Reaction,
    Blackjack,
    Tools,
    /// One round of every tracked game, then a reload from storage.
    Tour,
}

impl PlanKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NumberGuess => "number-guess",
            Self::Memory => "memory",
            Self::OddEven => "odd-even",
            Self::Reaction => "reaction",
            Self::Blackjack => "blackjack",
            Self::Tools => "tools",
            Self::Tour => "tour",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub kind: PlanKind,
    pub rounds: usize,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(kind: PlanKind, rounds: usize) -> Self {
        Self {
            kind,
            rounds,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// Everything a policy observed while playing one plan.
#[derive(Debug, Clone, Default)]
pub struct PlaySummary {
    pub seed: u64,
    pub rounds: usize,
    pub outcomes: Vec<Outcome>,
    pub rejections: Vec<GameError>,
    pub unlocked: Vec<String>,
    pub stats: StatsLedger,
    pub memory_pairs: u32,
    pub odd_even_rounds: Vec<RoundReport>,
    /// Final odd/even score summed over every session played.
    pub odd_even_score: u32,
    /// Reaction times the bot meant to produce, in order.
    pub intended_reactions: Vec<u64>,
    pub early_clicks: usize,
    pub blackjack: Vec<BlackjackResult>,
    pub draws: Vec<Vec<i64>>,
    pub spins: Vec<SpinResult>,
    pub restored_state_matches: bool,
}

impl PlaySummary {
    pub fn absorb(&mut self, emits: &[Emit]) {
        for emit in emits {
            match emit {
                Emit::Recorded { outcome } => self.outcomes.push(*outcome),
                Emit::Rejected { error } => self.rejections.push(error.clone()),
                Emit::Unlocked { achievement } => self.unlocked.push(achievement.id.clone()),
                Emit::Render { .. } | Emit::Cue { .. } => {}
            }
        }
    }

    pub fn outcomes_for(&self, kind: GameKind) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(move |outcome| outcome.kind == kind)
    }
}

/// Play `plan` headlessly from `seed` and collect what happened.
#[must_use]
pub fn run_plan(plan: &SimulationPlan, seed: u64) -> PlaySummary {
    let storage = MemoryStorage::default();
    let mut ctrl = SessionController::with_seed(storage.clone(), ManualClock::default(), seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut summary = PlaySummary {
        seed,
        ..PlaySummary::default()
    };

    for _ in 0..plan.rounds {
        match plan.kind {
            PlanKind::NumberGuess => policy::play_number_guess(&mut ctrl, &mut summary),
            PlanKind::Memory => policy::play_memory(&mut ctrl, &mut summary),
            PlanKind::OddEven => policy::play_odd_even(&mut ctrl, &mut rng, &mut summary, false),
            PlanKind::Reaction => policy::play_reaction(&mut ctrl, &mut rng, &mut summary),
            PlanKind::Blackjack => policy::play_blackjack(&mut ctrl, &mut summary),
            PlanKind::Tools => policy::use_tools(&mut ctrl, &mut rng, &mut summary),
            PlanKind::Tour => {
                policy::play_number_guess(&mut ctrl, &mut summary);
                policy::play_memory(&mut ctrl, &mut summary);
                policy::play_odd_even(&mut ctrl, &mut rng, &mut summary, true);
                policy::play_reaction(&mut ctrl, &mut rng, &mut summary);
            }
        }
        summary.rounds += 1;
    }

    summary.stats = ctrl.state().stats.clone();
    summary.restored_state_matches = AppState::load(&storage) == *ctrl.state();
    summary
}
