//! Slot Session — the game context that owns every piece of round state
//!
//! A session holds the reels, the ledger, the spin gate and the logical
//! clock. Hosts call [`SlotSession::trigger_spin`] on input and
//! [`SlotSession::advance`] once per frame (or in big steps in tests).
//! Everything visible goes out through the [`Presentation`] sink.

use std::collections::VecDeque;

use rf_stage::{Stage, StageEvent, StageTrace};
use serde::{Deserialize, Serialize};

use crate::config::SlotConfig;
use crate::error::SlotResult;
use crate::ledger::{CreditLedger, format_credit, format_delta};
use crate::presentation::{
    Accent, AnimatedProperty, AnimationOptions, AnimationTarget, CreditDisplay, Presentation,
    PropertyTarget,
};
use crate::random::RandomSource;
use crate::reel::{Reel, ReferenceRow};
use crate::resolver::{self, RoundOutcome, RoundResolution};
use crate::spin::{ScheduledTask, SpinState, SpinTrigger};
use crate::symbols::{Symbol, SymbolDeck};
use crate::timing::Scheduler;

/// Session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub rejected_triggers: u64,
    pub total_reward: i64,
    pub max_credit: i64,
    pub min_credit: i64,
}

impl SessionStats {
    fn new(starting_credit: i64) -> Self {
        Self {
            max_credit: starting_credit,
            min_credit: starting_credit,
            ..Self::default()
        }
    }

    /// Calculate hit rate (% of resolved spins that won)
    pub fn hit_rate(&self) -> f64 {
        let resolved = self.wins + self.losses;
        if resolved > 0 {
            (self.wins as f64 / resolved as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record_round(&mut self, outcome: RoundOutcome, reward: i64, credit_after: i64) {
        match outcome {
            RoundOutcome::Win => self.wins += 1,
            RoundOutcome::Loss => self.losses += 1,
        }
        self.total_reward += reward;
        self.max_credit = self.max_credit.max(credit_after);
        self.min_credit = self.min_credit.min(credit_after);
    }
}

fn spin_id(round: u64) -> String {
    format!("spin-{round:06}")
}

/// Three-reel game session
pub struct SlotSession<P: Presentation, R: RandomSource> {
    config: SlotConfig,
    deck: SymbolDeck,
    reels: Vec<Reel>,
    reference_row: ReferenceRow,
    ledger: CreditLedger,
    scheduler: Scheduler<ScheduledTask>,
    /// Logical time reel motion has been integrated up to
    motion_ms: f64,
    spin_state: SpinState,
    game_over: bool,
    win_sound_playing: bool,
    /// Spin whose outcome effects are on display; older reverts are skipped
    effects_round: u64,
    frame_accent: Accent,
    credit_display: CreditDisplay,
    stats: SessionStats,
    last_resolution: Option<RoundResolution>,
    traces: VecDeque<StageTrace>,
    presentation: P,
    rng: R,
}

impl<P: Presentation, R: RandomSource> SlotSession<P, R> {
    /// Validate `config`, build the reels and present the starting state
    pub fn new(config: SlotConfig, presentation: P, mut rng: R) -> SlotResult<Self> {
        config.validate()?;
        let deck = SymbolDeck::new(&config.symbols)?;

        let reels = (0..config.reel_count)
            .map(|index| Reel::new(index, config.slots_per_reel, &config.layout, &deck, &mut rng))
            .collect();
        let ledger = CreditLedger::new(config.starting_credit);

        let mut session = Self {
            deck,
            reels,
            reference_row: ReferenceRow(config.reference_row),
            ledger,
            scheduler: Scheduler::new(),
            motion_ms: 0.0,
            spin_state: SpinState::Idle,
            game_over: false,
            win_sound_playing: false,
            effects_round: 0,
            frame_accent: config.default_accent,
            credit_display: CreditDisplay {
                text: ledger.display_text(),
                color: config.credit_text_color.clone(),
            },
            stats: SessionStats::new(config.starting_credit),
            last_resolution: None,
            traces: VecDeque::new(),
            presentation,
            rng,
            config,
        };
        session.present_initial_state();

        log::info!(
            "Slot session '{}' ready: {} reels × {} slots, {} symbols, credit {}",
            session.config.game_id,
            session.config.reel_count,
            session.config.slots_per_reel,
            session.deck.len(),
            session.ledger.current_value()
        );
        Ok(session)
    }

    fn present_initial_state(&mut self) {
        self.render_all_slots();
        self.presentation.set_frame_accent(self.frame_accent);
        self.presentation.show_credit(&self.credit_display);
        self.presentation
            .set_spin_label(&self.config.spin_control.idle_label);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN COORDINATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// The single external entry point: start a spin unless one is in flight
    pub fn trigger_spin(&mut self) -> SpinTrigger {
        if self.game_over {
            self.stats.rejected_triggers += 1;
            log::debug!("Spin trigger ignored: game over");
            return SpinTrigger::IgnoredGameOver;
        }
        if self.spin_state == SpinState::Spinning {
            self.stats.rejected_triggers += 1;
            self.record(Stage::SpinRejected);
            log::debug!("Spin trigger ignored: spin in progress");
            return SpinTrigger::IgnoredSpinning;
        }

        self.spin_state = SpinState::Spinning;
        self.stats.total_spins += 1;
        self.open_trace();
        self.record(Stage::SpinStart);

        let audio = &self.config.audio.reel_loop;
        self.presentation.play_sound(&audio.name, &audio.options);

        let control = &self.config.spin_control;
        self.presentation.set_spin_label(&control.spinning_label);
        self.presentation.animate(
            AnimationTarget::SpinControl,
            &[
                PropertyTarget::new(AnimatedProperty::ScaleX, control.pulse_scale_x),
                PropertyTarget::new(AnimatedProperty::ScaleY, control.pulse_scale_y),
            ],
            control.pulse_duration_ms,
            &control.pulse_options,
        );

        for reel_index in 0..self.reels.len() {
            let delay = self.config.timing.reel_start_offset(reel_index);
            self.scheduler
                .schedule_after(delay, ScheduledTask::StartReel { reel_index });
        }
        self.scheduler
            .schedule_after(self.config.timing.spin_duration_ms, ScheduledTask::StopPhase);

        log::debug!(
            "Spin {} started at {:.0}ms",
            self.stats.total_spins,
            self.scheduler.now_ms()
        );
        SpinTrigger::Started
    }

    /// Advance the logical clock by `delta_ms`, running reel motion and
    /// every task that falls due, in order
    pub fn advance(&mut self, delta_ms: f64) {
        let target = self.scheduler.now_ms() + delta_ms.max(0.0);
        self.advance_to(target);
    }

    /// Run tasks already due at the current instant
    pub fn run_pending(&mut self) {
        self.advance_to(self.scheduler.now_ms());
    }

    /// Advance until no task is pending (the round and its effects are over)
    pub fn run_until_idle(&mut self) {
        while let Some(fire_at) = self.scheduler.next_fire_at() {
            self.advance_to(fire_at);
        }
    }

    fn advance_to(&mut self, target_ms: f64) {
        while let Some(fire_at) = self.scheduler.next_fire_at().filter(|&t| t <= target_ms) {
            self.run_motion_until(fire_at);
            if let Some((_, task)) = self.scheduler.pop_due(fire_at) {
                self.run_task(task);
            }
        }
        self.run_motion_until(target_ms);
        self.scheduler.advance_to(target_ms);
    }

    fn run_task(&mut self, task: ScheduledTask) {
        log::trace!("{:.0}ms: {}", self.scheduler.now_ms(), task.name());
        match task {
            ScheduledTask::StartReel { reel_index } => self.start_reel(reel_index),
            ScheduledTask::StopPhase => self.stop_phase(),
            ScheduledTask::RevertAccent { round } if round == self.effects_round => {
                self.revert_accent()
            }
            ScheduledTask::RevertCredit { round } if round == self.effects_round => {
                self.revert_credit(round)
            }
            ScheduledTask::RevertAccent { round } | ScheduledTask::RevertCredit { round } => {
                log::debug!(
                    "Skipping {} of spin {round}: spin {} resolved since",
                    task.name(),
                    self.effects_round
                );
            }
        }
    }

    fn start_reel(&mut self, reel_index: usize) {
        let velocity = self.config.layout.spin_velocity;
        let started = self
            .reels
            .get_mut(reel_index)
            .is_some_and(|reel| reel.enter_spinning(velocity));
        if started {
            self.record(Stage::ReelSpinning {
                reel_index: reel_index as u8,
            });
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REEL MOTION
    // ═══════════════════════════════════════════════════════════════════════════

    fn run_motion_until(&mut self, until_ms: f64) {
        if !self.reels.iter().any(Reel::is_spinning) {
            self.motion_ms = self.motion_ms.max(until_ms);
            return;
        }

        let tick = self.config.timing.tick_interval_ms;
        while self.motion_ms < until_ms {
            let remaining = until_ms - self.motion_ms;
            let dt = if remaining <= tick {
                self.motion_ms = until_ms;
                remaining
            } else {
                self.motion_ms += tick;
                tick
            };
            self.step_motion(dt);
        }
    }

    fn step_motion(&mut self, dt_ms: f64) {
        let Self {
            reels,
            config,
            deck,
            rng,
            presentation,
            ..
        } = self;

        for reel in reels.iter_mut().filter(|r| r.is_spinning()) {
            reel.advance(dt_ms, &config.layout, deck, rng);
            for (slot_index, slot) in reel.slots().iter().enumerate() {
                presentation.render_symbol_at(
                    reel.index(),
                    slot_index,
                    &slot.symbol,
                    slot.position,
                );
            }
        }
    }

    fn render_all_slots(&mut self) {
        for reel in &self.reels {
            for (slot_index, slot) in reel.slots().iter().enumerate() {
                self.presentation
                    .render_symbol_at(reel.index(), slot_index, &slot.symbol, slot.position);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STOP PHASE + RESOLUTION
    // ═══════════════════════════════════════════════════════════════════════════

    fn stop_phase(&mut self) {
        {
            let Self {
                reels,
                config,
                deck,
                rng,
                presentation,
                ..
            } = self;
            let layout = &config.layout;
            let bounce = AnimationOptions {
                yoyo: true,
                repeat: 0,
                ease: layout.bounce_ease.clone(),
            };

            for reel in reels.iter_mut() {
                reel.leave_spinning(layout, deck, rng);
                for (slot_index, slot) in reel.slots().iter().enumerate() {
                    presentation.render_symbol_at(
                        reel.index(),
                        slot_index,
                        &slot.symbol,
                        slot.position,
                    );
                    presentation.animate(
                        AnimationTarget::Slot {
                            reel: reel.index(),
                            slot: slot_index,
                        },
                        &[PropertyTarget::new(
                            AnimatedProperty::Y,
                            slot.position - layout.bounce_height,
                        )],
                        layout.bounce_duration_ms,
                        &bounce,
                    );
                }
            }
        }

        let stops: Vec<Stage> = self
            .reels
            .iter()
            .map(|reel| Stage::ReelStop {
                reel_index: reel.index() as u8,
                symbols: reel.symbol_ids(),
            })
            .collect();
        for stage in stops {
            self.record(stage);
        }

        self.presentation
            .stop_sound(&self.config.audio.reel_loop.name);
        self.spin_state = SpinState::Idle;
        self.presentation
            .set_spin_label(&self.config.spin_control.idle_label);
        self.presentation.cancel_animations();

        self.resolve_round();
    }

    fn resolve_round(&mut self) {
        let reference_symbols: Vec<Symbol> = self
            .reels
            .iter()
            .filter_map(|reel| reel.symbol_at(self.reference_row).cloned())
            .collect();
        self.record(Stage::EvaluateWins);

        let outcome = resolver::evaluate(&reference_symbols);
        let style = outcome.style(&self.config.outcomes).clone();

        if outcome.is_win() {
            let audio = &self.config.audio.round_win;
            self.presentation.play_sound(&audio.name, &audio.options);
            self.win_sound_playing = true;
        }

        let round = self.stats.total_spins;
        self.effects_round = round;
        self.set_accent(style.accent);
        self.scheduler
            .schedule_after(style.effect_duration_ms, ScheduledTask::RevertAccent { round });

        let credit_after = self.ledger.apply_delta(style.reward);
        self.show_credit(CreditDisplay {
            text: format_delta(style.reward),
            color: style.credit_color.clone(),
        });
        self.scheduler.schedule_after(
            style.effect_duration_ms,
            ScheduledTask::RevertCredit { round },
        );

        self.stats.record_round(outcome, style.reward, credit_after);
        self.record(match outcome {
            RoundOutcome::Win => Stage::WinPresent {
                reward: style.reward,
            },
            RoundOutcome::Loss => Stage::LossPresent {
                reward: style.reward,
            },
        });
        self.record(Stage::CreditChanged {
            credit: credit_after,
        });

        log::info!(
            "Spin {} {:?}: [{}] reward {:+} → credit {}",
            self.stats.total_spins,
            outcome,
            reference_symbols
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            style.reward,
            credit_after
        );

        let ended_game = self.ledger.is_depleted() && !self.game_over;
        self.record(Stage::SpinEnd);
        if ended_game {
            self.end_game();
        }

        self.last_resolution = Some(RoundResolution {
            spin_index: round,
            outcome,
            reference_symbols,
            reward: style.reward,
            credit_after,
            resolved_at_ms: self.scheduler.now_ms(),
            ended_game,
        });
    }

    fn set_accent(&mut self, accent: Accent) {
        self.frame_accent = accent;
        self.presentation.set_frame_accent(accent);
    }

    fn show_credit(&mut self, display: CreditDisplay) {
        self.presentation.show_credit(&display);
        self.credit_display = display;
    }

    /// Restore the default frame accent; no-op when already default
    pub fn revert_accent(&mut self) {
        if self.frame_accent == self.config.default_accent {
            return;
        }
        self.set_accent(self.config.default_accent);
    }

    fn revert_credit(&mut self, round: u64) {
        self.show_credit(CreditDisplay {
            text: format_credit(self.ledger.current_value()),
            color: self.config.credit_text_color.clone(),
        });
        // A win loop left over from a superseded round stops here too
        if self.win_sound_playing {
            self.presentation
                .stop_sound(&self.config.audio.round_win.name);
            self.win_sound_playing = false;
        }
        self.record_for_spin(round, Stage::EffectRevert);
    }

    fn end_game(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.presentation.end_game();
        self.record(Stage::GameOver);
        log::info!(
            "Game over after {} spins: credit reached 0",
            self.stats.total_spins
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STAGE TRACES
    // ═══════════════════════════════════════════════════════════════════════════

    fn open_trace(&mut self) {
        let spin_id = spin_id(self.stats.total_spins);
        let trace = StageTrace::new(
            format!("{}-{}", self.config.game_id, spin_id),
            self.config.game_id.clone(),
        )
        .with_spin(spin_id);

        self.traces.push_back(trace);
        while self.traces.len() > self.config.trace_history.max(1) {
            self.traces.pop_front();
        }
    }

    fn record(&mut self, stage: Stage) {
        let now = self.scheduler.now_ms();
        if let Some(trace) = self.traces.back_mut() {
            trace.push(StageEvent::new(stage, now));
        }
    }

    /// Record into the trace of spin `round`, which may no longer be the latest
    fn record_for_spin(&mut self, round: u64, stage: Stage) {
        let now = self.scheduler.now_ms();
        let id = spin_id(round);
        if let Some(trace) = self
            .traces
            .iter_mut()
            .rev()
            .find(|t| t.spin_id.as_deref() == Some(id.as_str()))
        {
            trace.push(StageEvent::new(stage, now));
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn deck(&self) -> &SymbolDeck {
        &self.deck
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn reference_row(&self) -> ReferenceRow {
        self.reference_row
    }

    /// Symbols currently in the reference row, one per reel
    pub fn reference_symbols(&self) -> Vec<&Symbol> {
        self.reels
            .iter()
            .filter_map(|reel| reel.symbol_at(self.reference_row))
            .collect()
    }

    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }

    pub fn credit(&self) -> i64 {
        self.ledger.current_value()
    }

    pub fn spin_state(&self) -> SpinState {
        self.spin_state
    }

    pub fn is_spinning(&self) -> bool {
        self.spin_state == SpinState::Spinning
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn frame_accent(&self) -> Accent {
        self.frame_accent
    }

    pub fn credit_display(&self) -> &CreditDisplay {
        &self.credit_display
    }

    pub fn is_win_sound_playing(&self) -> bool {
        self.win_sound_playing
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn last_resolution(&self) -> Option<&RoundResolution> {
        self.last_resolution.as_ref()
    }

    /// Trace of the most recent spin (still growing until the next spin)
    pub fn last_trace(&self) -> Option<&StageTrace> {
        self.traces.back()
    }

    pub fn traces(&self) -> impl Iterator<Item = &StageTrace> {
        self.traces.iter()
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

}
