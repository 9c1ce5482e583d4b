//! Session lifecycle orchestration.
//!
//! The controller owns the persisted [`AppState`], the running session and
//! the per-game random streams. Every operation returns the events the host
//! should act on, in order.
use crate::achievements::{AchievementEngine, RuleInput};
use crate::clock::{Clock, ManualClock, TimerKind, TimerToken};
use crate::config::ArcadeConfig;
use crate::error::GameError;
use crate::games::blackjack::{BlackjackResult, HitResult};
use crate::games::draw::{SpinResult, draw_distinct, draw_distinct_text, spin};
use crate::games::memory::FlipResult;
use crate::games::number_guess::{GuessResult, NumberGuessSession, parse_guess};
use crate::games::reaction::ClickResult;
use crate::games::{Feedback, GameInput, GameSession, Step, StepCtx};
use crate::outcome::{GameKind, Outcome};
use crate::rng::RngBundle;
use crate::settings::{Settings, Theme};
use crate::storage::{AppState, GameStorage};
use crate::view::{Cue, DrawView, Emit, Screen, SpinView, ViewModel};

#[derive(Debug, Clone)]
struct ActiveSession {
    session: GameSession,
    /// Set once the terminal outcome reached the ledger.
    recorded: bool,
}

/// Collects emits for one operation; cues are dropped while sound is off.
struct Emits {
    sound: bool,
    out: Vec<Emit>,
}

impl Emits {
    const fn new(settings: &Settings) -> Self {
        Self {
            sound: settings.sound_enabled,
            out: Vec::new(),
        }
    }

    fn cue(&mut self, cue: Cue) {
        if self.sound {
            self.out.push(Emit::Cue { cue });
        }
    }

    fn render(&mut self, screen: Screen, view: ViewModel) {
        self.out.push(Emit::Render { screen, view });
    }

    fn push(&mut self, emit: Emit) {
        self.out.push(emit);
    }

    fn finish(self) -> Vec<Emit> {
        self.out
    }
}

pub struct SessionController<S, C>
where
    S: GameStorage,
    C: Clock,
{
    config: ArcadeConfig,
    state: AppState,
    storage: S,
    clock: C,
    rng: RngBundle,
    active: Option<ActiveSession>,
    generation: u64,
    pending_timer: Option<TimerToken>,
    last_draw: Vec<i64>,
    last_spin: Option<SpinResult>,
}

impl<S, C> SessionController<S, C>
where
    S: GameStorage,
    C: Clock,
{
    /// Build a controller, loading persisted state from `storage`.
    pub fn new(storage: S, clock: C, config: ArcadeConfig, rng: RngBundle) -> Self {
        let state = AppState::load(&storage);
        log::debug!(
            "controller ready: {} games on record, seed {}",
            state.stats.total_games,
            rng.seed()
        );
        Self {
            config,
            state,
            storage,
            clock,
            rng,
            active: None,
            generation: 0,
            pending_timer: None,
            last_draw: Vec::new(),
            last_spin: None,
        }
    }

    /// Controller over the bundled configuration with deterministic streams.
    pub fn with_seed(storage: S, clock: C, seed: u64) -> Self {
        Self::new(
            storage,
            clock,
            ArcadeConfig::load_from_static(),
            RngBundle::from_user_seed(seed),
        )
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn pending_timer(&self) -> Option<TimerToken> {
        self.pending_timer
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn last_draw(&self) -> &[i64] {
        &self.last_draw
    }

    #[must_use]
    pub const fn last_spin(&self) -> Option<&SpinResult> {
        self.last_spin.as_ref()
    }

    /// Open a new session for `kind`, replacing any running one. The one-shot
    /// tools just show their screen.
    pub fn start(&mut self, kind: GameKind) -> Vec<Emit> {
        let mut emits = Emits::new(&self.state.settings);
        if !kind.has_session() {
            if let Some(view) = self.view_for(Screen::Game(kind), None) {
                emits.render(Screen::Game(kind), view);
            }
            return emits.finish();
        }
        let now = self.clock.now_ms();
        let mut ctx = StepCtx {
            rng: self.rng.stream(kind),
            now,
        };
        match GameSession::start(kind, &self.config, &mut ctx) {
            Ok(session) => self.install(session, &mut emits),
            Err(err) => self.reject(&mut emits, Some(Screen::Game(kind)), err),
        }
        emits.finish()
    }

    /// Open a number guess round with custom parameters.
    pub fn start_number_guess(&mut self, min: i64, max: i64, max_attempts: u32) -> Vec<Emit> {
        let mut emits = Emits::new(&self.state.settings);
        let now = self.clock.now_ms();
        let rng = self.rng.stream(GameKind::NumberGuess);
        match NumberGuessSession::start(min, max, max_attempts, rng, now) {
            Ok(session) => self.install(GameSession::NumberGuess(session), &mut emits),
            Err(err) => self.reject(&mut emits, Some(Screen::Game(GameKind::NumberGuess)), err),
        }
        emits.finish()
    }

    fn install(&mut self, session: GameSession, emits: &mut Emits) {
        self.invalidate_timer();
        let kind = session.kind();
        log::debug!("{kind} session started (generation {})", self.generation);
        let view = ViewModel::of_session(&session, None);
        self.active = Some(ActiveSession {
            session,
            recorded: false,
        });
        emits.cue(Cue::Click);
        emits.render(Screen::Game(kind), view);
    }

    /// Start the running game over with the same parameters.
    pub fn reset(&mut self) -> Vec<Emit> {
        let restart = self.session().map(|session| match session {
            GameSession::NumberGuess(guess) => (
                session.kind(),
                Some((guess.min(), guess.max(), guess.max_attempts())),
            ),
            other => (other.kind(), None),
        });
        match restart {
            Some((_, Some((min, max, attempts)))) => self.start_number_guess(min, max, attempts),
            Some((kind, None)) => self.start(kind),
            None => {
                let mut emits = Emits::new(&self.state.settings);
                self.reject(&mut emits, None, GameError::NoActiveSession);
                emits.finish()
            }
        }
    }

    /// Abandon the running session without recording anything.
    pub fn stop(&mut self) -> Vec<Emit> {
        self.invalidate_timer();
        if let Some(active) = self.active.take() {
            log::debug!("{} session stopped", active.session.kind());
        }
        Vec::new()
    }

    /// Route player input to the running session.
    pub fn apply(&mut self, input: GameInput) -> Vec<Emit> {
        let mut emits = Emits::new(&self.state.settings);
        let now = self.clock.now_ms();
        let Some(active) = self.active.as_mut() else {
            self.reject(&mut emits, None, GameError::NoActiveSession);
            return emits.finish();
        };
        let kind = active.session.kind();
        let mut ctx = StepCtx {
            rng: self.rng.stream(kind),
            now,
        };
        match active.session.apply(input, &mut ctx) {
            Ok(step) => self.handle_step(kind, step, &mut emits),
            Err(err) => self.reject(&mut emits, Some(Screen::Game(kind)), err),
        }
        emits.finish()
    }

    /// Parse free-text input as a guess for the running number guess round.
    pub fn guess_text(&mut self, text: &str) -> Vec<Emit> {
        let bounds = match self.session() {
            Some(GameSession::NumberGuess(session)) => Ok((session.min(), session.max())),
            Some(other) => Err(GameError::UnsupportedInput { kind: other.kind() }),
            None => Err(GameError::NoActiveSession),
        };
        match bounds.and_then(|(min, max)| parse_guess(text, min, max)) {
            Ok(value) => self.apply(GameInput::Guess { value }),
            Err(err) => {
                let mut emits = Emits::new(&self.state.settings);
                let screen = self.session().map(|session| Screen::Game(session.kind()));
                self.reject(&mut emits, screen, err);
                emits.finish()
            }
        }
    }

    /// Deliver a fired timer. Tokens from a superseded round are ignored.
    pub fn on_timer(&mut self, token: TimerToken) -> Vec<Emit> {
        if token.generation != self.generation || self.pending_timer != Some(token) {
            log::warn!(
                "ignoring stale {:?} timer from generation {} (current {})",
                token.kind,
                token.generation,
                self.generation
            );
            return Vec::new();
        }
        self.pending_timer = None;
        let now = self.clock.now_ms();
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };
        let kind = active.session.kind();
        let step = active.session.on_timer(token.kind, now);
        let mut emits = Emits::new(&self.state.settings);
        if step.feedback == Feedback::Nothing {
            log::debug!("{kind} timer {:?} fired with nothing to do", token.kind);
            return Vec::new();
        }
        self.handle_step(kind, step, &mut emits);
        emits.finish()
    }

    fn handle_step(&mut self, kind: GameKind, step: Step, emits: &mut Emits) {
        if let Some(cue) = cue_for(&step.feedback) {
            emits.cue(cue);
        }
        if let Some((delay_ms, timer)) = step.schedule {
            self.schedule(delay_ms, timer);
        }
        if let Some(outcome) = step.outcome {
            self.record_once(outcome, emits);
        }
        if let Some(view) = self.view_for(Screen::Game(kind), None) {
            emits.render(Screen::Game(kind), view);
        }
    }

    fn schedule(&mut self, delay_ms: u64, kind: TimerKind) {
        self.invalidate_timer();
        let token = TimerToken {
            generation: self.generation,
            kind,
        };
        self.clock.schedule_after(delay_ms, token);
        self.pending_timer = Some(token);
    }

    /// Cancel the outstanding timer and advance the generation so a late
    /// delivery is recognised as stale.
    fn invalidate_timer(&mut self) {
        if let Some(token) = self.pending_timer.take() {
            self.clock.cancel(token);
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Record a terminal outcome at most once per session; round outcomes of
    /// endless games are recorded every round.
    fn record_once(&mut self, outcome: Outcome, emits: &mut Emits) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.session.is_terminal() {
            if active.recorded {
                log::debug!("{} outcome already recorded", outcome.kind);
                return;
            }
            active.recorded = true;
        }
        let memory_pairs = match &active.session {
            GameSession::Memory(session) => Some(session.pairs()),
            _ => None,
        };
        self.record(outcome, memory_pairs, emits);
    }

    fn record(&mut self, outcome: Outcome, memory_pairs: Option<u32>, emits: &mut Emits) {
        if !outcome.kind.is_tracked() {
            return;
        }
        let _ = self.state.stats.record(&outcome);
        log::info!(
            "{} {}: {:?}",
            outcome.kind,
            if outcome.won { "won" } else { "lost" },
            outcome.metric
        );
        emits.push(Emit::Recorded { outcome });

        let now = self.clock.now_ms();
        let mut input = RuleInput::new(&outcome, &self.state.stats);
        if let Some(pairs) = memory_pairs {
            input = input.with_memory_pairs(pairs);
        }
        let unlocked = AchievementEngine::evaluate(&input, &self.state.achievements, now);
        self.state.save_stats(&self.storage);
        if unlocked.is_empty() {
            return;
        }
        for achievement in unlocked {
            log::info!("achievement unlocked: {}", achievement.id);
            if self.state.achievements.insert(achievement.clone()) {
                emits.push(Emit::Unlocked { achievement });
            }
        }
        self.state.save_achievements(&self.storage);
    }

    /// Draw distinct numbers for the draw tool.
    pub fn draw_numbers(&mut self, count: i64, min: i64, max: i64) -> Vec<Emit> {
        let result = draw_distinct(
            count,
            min,
            max,
            &self.config.number_draw,
            self.rng.stream(GameKind::NumberDraw),
        );
        self.finish_draw(result)
    }

    /// [`Self::draw_numbers`] over raw form text.
    pub fn draw_numbers_text(&mut self, count: &str, min: &str, max: &str) -> Vec<Emit> {
        let result = draw_distinct_text(
            count,
            min,
            max,
            &self.config.number_draw,
            self.rng.stream(GameKind::NumberDraw),
        );
        self.finish_draw(result)
    }

    fn finish_draw(&mut self, result: Result<Vec<i64>, GameError>) -> Vec<Emit> {
        let mut emits = Emits::new(&self.state.settings);
        let screen = Screen::Game(GameKind::NumberDraw);
        match result {
            Ok(numbers) => {
                log::debug!("drew {numbers:?}");
                self.last_draw = numbers;
                emits.cue(Cue::Success);
                if let Some(view) = self.view_for(screen, None) {
                    emits.render(screen, view);
                }
            }
            Err(err) => self.reject(&mut emits, Some(screen), err),
        }
        emits.finish()
    }

    /// Clear the last draw.
    pub fn reset_draw(&mut self) -> Vec<Emit> {
        self.last_draw.clear();
        let mut emits = Emits::new(&self.state.settings);
        emits.cue(Cue::Click);
        emits.render(
            Screen::Game(GameKind::NumberDraw),
            ViewModel::NumberDraw(DrawView {
                numbers: Vec::new(),
                message: None,
            }),
        );
        emits.finish()
    }

    /// Spin the roulette wheel.
    pub fn spin(&mut self) -> Vec<Emit> {
        let result = spin(&self.config.roulette, self.rng.stream(GameKind::Roulette));
        log::debug!("spin landed on {}", result.number);
        self.last_spin = Some(result);
        let mut emits = Emits::new(&self.state.settings);
        emits.cue(Cue::Success);
        let screen = Screen::Game(GameKind::Roulette);
        if let Some(view) = self.view_for(screen, None) {
            emits.render(screen, view);
        }
        emits.finish()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Vec<Emit> {
        self.state.settings.theme = theme;
        self.settings_changed()
    }

    pub fn toggle_theme(&mut self) -> Vec<Emit> {
        self.set_theme(self.state.settings.theme.toggled())
    }

    pub fn toggle_sound(&mut self) -> Vec<Emit> {
        self.state.settings.sound_enabled = !self.state.settings.sound_enabled;
        self.settings_changed()
    }

    fn settings_changed(&mut self) -> Vec<Emit> {
        log::debug!("settings now {:?}", self.state.settings);
        self.state.save_settings(&self.storage);
        let mut emits = Emits::new(&self.state.settings);
        emits.cue(Cue::Click);
        emits.render(Screen::Settings, ViewModel::Settings(self.state.settings));
        emits.finish()
    }

    #[must_use]
    pub fn stats_view(&self) -> Vec<Emit> {
        vec![Emit::Render {
            screen: Screen::Stats,
            view: ViewModel::of_stats(&self.state.stats),
        }]
    }

    #[must_use]
    pub fn achievements_view(&self) -> Vec<Emit> {
        vec![Emit::Render {
            screen: Screen::Achievements,
            view: ViewModel::of_achievements(&self.state.achievements),
        }]
    }

    fn view_for(&self, screen: Screen, message: Option<String>) -> Option<ViewModel> {
        match screen {
            Screen::Game(GameKind::NumberDraw) => Some(ViewModel::NumberDraw(DrawView {
                numbers: self.last_draw.clone(),
                message,
            })),
            Screen::Game(GameKind::Roulette) => Some(ViewModel::Roulette(SpinView {
                spin: self.last_spin.clone(),
                message,
            })),
            Screen::Game(kind) => self
                .session()
                .filter(|session| session.kind() == kind)
                .map(|session| ViewModel::of_session(session, message)),
            Screen::Stats => Some(ViewModel::of_stats(&self.state.stats)),
            Screen::Achievements => Some(ViewModel::of_achievements(&self.state.achievements)),
            Screen::Settings => Some(ViewModel::Settings(self.state.settings)),
        }
    }

    fn reject(&self, emits: &mut Emits, screen: Option<Screen>, err: GameError) {
        log::debug!("rejected: {err}");
        let message = err.to_string();
        emits.push(Emit::Rejected { error: err });
        emits.cue(Cue::Error);
        if let Some(screen) = screen
            && let Some(view) = self.view_for(screen, Some(message))
        {
            emits.render(screen, view);
        }
    }
}

impl<S> SessionController<S, ManualClock>
where
    S: GameStorage,
{
    /// Move the manual clock forward and deliver every timer that came due.
    ///
    /// Each timer is delivered with the clock stopped at its own deadline, so
    /// a step that overshoots an arm deadline still times the signal from
    /// when it lit up.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<Emit> {
        let target = self.clock.now_ms().saturating_add(delta_ms);
        let mut emits = Vec::new();
        while let Some(token) = self.clock.fire_next(target) {
            emits.extend(self.on_timer(token));
        }
        self.clock.set_time(target);
        emits
    }
}

const fn cue_for(feedback: &Feedback) -> Option<Cue> {
    match feedback {
        Feedback::Guess(GuessResult::Hint { .. })
        | Feedback::Waiting { .. }
        | Feedback::Settled(BlackjackResult::Draw) => Some(Cue::Click),
        Feedback::Guess(GuessResult::Won { .. })
        | Feedback::Flip(FlipResult::Won { .. })
        | Feedback::Settled(BlackjackResult::PlayerWins | BlackjackResult::DealerBust) => {
            Some(Cue::Win)
        }
        Feedback::Guess(GuessResult::Lost { .. })
        | Feedback::Flip(FlipResult::Mismatch { .. })
        | Feedback::Reaction(ClickResult::TooEarly)
        | Feedback::Hit(HitResult::Bust { .. })
        | Feedback::Settled(BlackjackResult::PlayerBust | BlackjackResult::DealerWins) => {
            Some(Cue::Error)
        }
        Feedback::Flip(FlipResult::Revealed { .. }) | Feedback::Hit(HitResult::Drew { .. }) => {
            Some(Cue::Flip)
        }
        Feedback::Flip(FlipResult::Matched { .. }) => Some(Cue::Match),
        Feedback::Round(report) => {
            if report.correct {
                Some(Cue::Success)
            } else {
                Some(Cue::Error)
            }
        }
        Feedback::Reaction(ClickResult::Measured { .. }) => Some(Cue::Success),
        Feedback::Flip(FlipResult::Ignored)
        | Feedback::Reaction(ClickResult::Ignored)
        | Feedback::Reverted { .. }
        | Feedback::Armed
        | Feedback::Nothing => None,
    }
}
