//! End-to-end spin lifecycle through the public API

use approx::assert_relative_eq;
use rf_slot_game::{
    Accent, PresentationCall, RecordingPresentation, ReelState, RoundOutcome, ScriptedRandom,
    SeededRandom, Slot, SlotConfig, SlotSession, SpinState, SpinTrigger, TimingConfig,
};
use rf_stage::Stage;

type Session = SlotSession<RecordingPresentation, ScriptedRandom<SeededRandom>>;

fn scripted(config: SlotConfig, script: &[usize]) -> Session {
    SlotSession::new(
        config,
        RecordingPresentation::new(),
        ScriptedRandom::new(script.iter().copied(), SeededRandom::from_seed(7)),
    )
    .unwrap()
}

/// Script for an instant round: 9 picks at creation, then one settle pick
/// per slot in reel order with `middle[i]` landing on reel i's middle slot
fn instant_round(middle: [usize; 3]) -> Vec<usize> {
    let mut script = vec![0; 9];
    for m in middle {
        script.extend([0, m, 0]);
    }
    script
}

fn two_symbol_instant() -> SlotConfig {
    SlotConfig::instant().with_symbols(["A", "B"])
}

#[test]
fn test_reels_settle_on_catalog_symbols() {
    let mut session = SlotSession::new(
        SlotConfig::default(),
        RecordingPresentation::new(),
        SeededRandom::from_seed(42),
    )
    .unwrap();

    session.trigger_spin();
    session.run_until_idle();

    let layout = session.config().layout.clone();
    assert_eq!(session.reels().len(), 3);
    for reel in session.reels() {
        assert_eq!(reel.state(), ReelState::Idle);
        assert_eq!(reel.slots().len(), 3);
        for (slot_index, slot) in reel.slots().iter().enumerate() {
            assert!(session.deck().contains(&slot.symbol));
            assert_relative_eq!(slot.position, layout.resting_offset(slot_index));
        }
    }
    assert_eq!(session.reference_symbols().len(), 3);
}

#[test]
fn test_trigger_while_spinning_is_ignored() {
    let mut session = SlotSession::new(
        SlotConfig::default(),
        RecordingPresentation::new(),
        SeededRandom::from_seed(3),
    )
    .unwrap();

    assert_eq!(session.trigger_spin(), SpinTrigger::Started);
    session.advance(1000.0);

    let snapshot = |s: &SlotSession<RecordingPresentation, SeededRandom>| {
        let reels: Vec<(ReelState, Vec<Slot>)> = s
            .reels()
            .iter()
            .map(|r| (r.state(), r.slots().to_vec()))
            .collect();
        (reels, s.credit(), s.spin_state(), s.now_ms(), s.pending_tasks())
    };
    let before = snapshot(&session);
    let calls_before = session.presentation().calls().len();

    assert_eq!(session.trigger_spin(), SpinTrigger::IgnoredSpinning);
    assert_eq!(snapshot(&session), before);
    assert_eq!(session.presentation().calls().len(), calls_before);
    assert_eq!(session.spin_state(), SpinState::Spinning);
    assert_eq!(session.pending_tasks(), 1);

    session.run_until_idle();
    let reel_loops = session
        .presentation()
        .sounds_played()
        .into_iter()
        .filter(|name| *name == "reelsSound")
        .count();
    assert_eq!(reel_loops, 1);
    assert_eq!(session.stats().total_spins, 1);
    assert_eq!(session.stats().rejected_triggers, 1);
    assert!(session.last_trace().unwrap().has_stage("spin_rejected"));
}

#[test]
fn test_reels_start_staggered_and_stop_together() {
    let mut session = SlotSession::new(
        SlotConfig::default().with_timing(TimingConfig::normal()),
        RecordingPresentation::new(),
        SeededRandom::from_seed(11),
    )
    .unwrap();
    let spinning = |s: &SlotSession<RecordingPresentation, SeededRandom>| {
        s.reels().iter().map(|r| r.is_spinning()).collect::<Vec<_>>()
    };

    session.trigger_spin();
    session.run_pending();
    assert_eq!(spinning(&session), vec![true, false, false]);

    session.advance(299.0);
    assert_eq!(spinning(&session), vec![true, false, false]);
    session.advance(1.0);
    assert_eq!(spinning(&session), vec![true, true, false]);
    session.advance(300.0);
    assert_eq!(spinning(&session), vec![true, true, true]);

    session.advance(1899.0);
    assert!(session.is_spinning());
    session.advance(1.0);
    assert!(!session.is_spinning());
    assert_eq!(spinning(&session), vec![false, false, false]);

    let trace = session.last_trace().unwrap();
    let starts: Vec<f64> = trace
        .events_by_type("reel_spinning")
        .iter()
        .map(|e| e.timestamp_ms)
        .collect();
    assert_eq!(starts, vec![0.0, 300.0, 600.0]);
    assert!(trace.reel_stops().iter().all(|e| e.timestamp_ms == 2500.0));
}

#[test]
fn test_reels_move_and_wrap_while_spinning() {
    let mut session = SlotSession::new(
        SlotConfig::default(),
        RecordingPresentation::with_renders(),
        SeededRandom::from_seed(5),
    )
    .unwrap();
    session.trigger_spin();
    session.advance(100.0);

    let first = &session.reels()[0];
    assert_relative_eq!(first.slots()[0].position, 280.0, epsilon = 1e-9);
    assert_relative_eq!(first.slots()[1].position, 430.0, epsilon = 1e-9);
    // Crossed 480 after two 16 ms ticks, re-entered at 110 and kept moving
    assert_relative_eq!(first.slots()[2].position, 110.0 + 81.6, epsilon = 1e-9);
    assert!(session.reels()[1..].iter().all(|r| !r.is_spinning()));

    let renders = session
        .presentation()
        .count(|c| matches!(c, PresentationCall::RenderSymbol { reel: 0, .. }));
    assert!(renders > 3);
}

#[test]
fn test_matching_reference_row_wins() {
    let mut session = scripted(two_symbol_instant(), &instant_round([1, 1, 1]));
    session.trigger_spin();
    session.run_pending();

    let resolution = session.last_resolution().unwrap();
    assert_eq!(resolution.outcome, RoundOutcome::Win);
    assert_eq!(resolution.reward, 100);
    assert_eq!(session.credit(), 200);
    assert!(session.credit_display().text.contains("+100€"));
    assert!(session.presentation().sounds_played().contains(&"roundWinSound"));
}

#[test]
fn test_mismatched_reference_row_loses() {
    // Only the middle row decides: top and bottom rows all match here
    let mut session = scripted(two_symbol_instant(), &instant_round([1, 0, 1]));
    session.trigger_spin();
    session.run_pending();

    assert_eq!(
        session.last_resolution().map(|r| r.outcome),
        Some(RoundOutcome::Loss)
    );
    assert_eq!(session.credit(), 80);
    assert!(session.credit_display().text.contains("-20€"));
    assert!(!session.presentation().sounds_played().contains(&"roundWinSound"));
}

#[test]
fn test_effects_revert_to_plain_credit() {
    let mut session = scripted(two_symbol_instant(), &instant_round([0, 1, 0]));
    session.trigger_spin();
    session.run_pending();
    assert_eq!(session.credit_display().color, "red");

    session.advance(1000.0);
    assert_eq!(session.credit_display().text, "Credit: 80€");
    assert_eq!(session.credit_display().color, "#ffffff");
    assert_eq!(session.frame_accent(), session.config().default_accent);
    assert_eq!(
        session.presentation().credit_texts(),
        vec!["Credit: 100€", "Credit: -20€", "Credit: 80€"]
    );
}

#[test]
fn test_back_to_back_turbo_wins_keep_full_effect() {
    // One symbol: every round wins; the 2000 ms effect outlasts a 1250 ms spin
    let config = SlotConfig::default()
        .with_symbols(["A"])
        .with_timing(TimingConfig::turbo());
    let mut session = SlotSession::new(
        config,
        RecordingPresentation::new(),
        SeededRandom::from_seed(8),
    )
    .unwrap();
    let win_accent = Accent::new(0x008000, 12.0);

    session.trigger_spin();
    session.advance(1250.0);
    assert!(!session.is_spinning());
    assert_eq!(session.credit(), 200);

    assert_eq!(session.trigger_spin(), SpinTrigger::Started);
    session.advance(1250.0);
    assert_eq!(session.credit(), 300);

    // Round 1's reverts fall due at 3250, inside round 2's effect
    session.advance(800.0);
    assert_eq!(session.now_ms(), 3300.0);
    assert_eq!(session.credit_display().text, "Credit: +100€");
    assert_eq!(session.frame_accent(), win_accent);
    assert!(session.is_win_sound_playing());

    session.advance(1199.0);
    assert_eq!(session.credit_display().text, "Credit: +100€");
    session.advance(1.0);
    assert_eq!(session.credit_display().text, "Credit: 300€");
    assert_eq!(session.frame_accent(), session.config().default_accent);
    assert!(!session.is_win_sound_playing());
    assert_eq!(session.pending_tasks(), 0);

    let traces: Vec<_> = session.traces().collect();
    assert!(!traces[0].has_stage("effect_revert"));
    let revert = traces[1].find_event(|e| e.type_name() == "effect_revert");
    assert_eq!(revert.map(|e| e.timestamp_ms), Some(4500.0));
}

#[test]
fn test_game_over_at_zero_credit() {
    let config = two_symbol_instant().with_starting_credit(20);
    let mut session = scripted(config, &instant_round([0, 0, 1]));

    session.trigger_spin();
    session.run_until_idle();
    assert_eq!(session.credit(), 0);
    assert!(session.is_game_over());
    assert!(session.last_resolution().unwrap().ended_game);
    assert_eq!(session.presentation().end_game_count(), 1);

    assert_eq!(session.trigger_spin(), SpinTrigger::IgnoredGameOver);
    session.run_until_idle();
    assert_eq!(session.presentation().end_game_count(), 1);
    assert_eq!(session.stats().total_spins, 1);

    let trace = session.last_trace().unwrap();
    let last = trace.events.last().map(|e| &e.stage);
    assert!(matches!(last, Some(Stage::EffectRevert)));
    assert!(trace.has_stage("game_over"));
}

#[test]
fn test_negative_credit_does_not_end_game() {
    let config = two_symbol_instant().with_starting_credit(10);
    let mut session = scripted(config, &instant_round([0, 1, 1]));

    session.trigger_spin();
    session.run_until_idle();
    assert_eq!(session.credit(), -10);
    assert!(!session.is_game_over());
    assert_eq!(session.trigger_spin(), SpinTrigger::Started);
}

#[test]
fn test_two_symbol_instant_round_is_binary() {
    for seed in 0..20 {
        let mut session = SlotSession::new(
            two_symbol_instant(),
            RecordingPresentation::new(),
            SeededRandom::from_seed(seed),
        )
        .unwrap();
        session.trigger_spin();
        session.run_pending();

        let middle: Vec<_> = session
            .reference_symbols()
            .into_iter()
            .map(|s| s.name.clone())
            .collect();
        let all_equal = middle.iter().all(|name| *name == middle[0]);
        let expected = if all_equal { 200 } else { 80 };
        assert_eq!(session.credit(), expected, "seed {seed}: {middle:?}");
    }
}

#[test]
fn test_same_seed_same_rounds() {
    let run = |seed| {
        let mut session = SlotSession::new(
            SlotConfig::default(),
            RecordingPresentation::new(),
            SeededRandom::from_seed(seed),
        )
        .unwrap();
        for _ in 0..5 {
            session.trigger_spin();
            session.run_until_idle();
        }
        let rewards: Vec<Option<i64>> = session.traces().map(|t| t.reward()).collect();
        (rewards, session.credit())
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn test_stage_trace_is_complete() {
    let mut session = SlotSession::new(
        SlotConfig::default(),
        RecordingPresentation::new(),
        SeededRandom::from_seed(21),
    )
    .unwrap();
    session.trigger_spin();
    session.run_until_idle();

    let trace = session.last_trace().unwrap();
    let validation = trace.validate();
    assert!(validation.is_complete(3), "{:?}", validation.warnings());
    assert!(validation.has_effect_revert);

    let json = trace.to_json().unwrap();
    let parsed = rf_stage::StageTrace::from_json(&json).unwrap();
    assert_eq!(parsed.events.len(), trace.events.len());
}
