use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ladder_core::error::EncoderError;
use ladder_core::mocks::NoopInput;
use ladder_core::runner::{self, EncoderEvent, PollSummary, RunParams};
use ladder_core::{CalibrationProfile, Direction, Encoder, LadderParams, StepMode};
use ladder_hardware::{LadderResistors, ScriptedInput, SimulatedLadder, Spin};
use ladder_traits::{AnalogInput, ManualClock};

fn two_phase() -> CalibrationProfile {
    CalibrationProfile::new(LadderParams::new(10_000, 10_000, 20_000))
}

fn with_button() -> CalibrationProfile {
    CalibrationProfile::new(
        LadderParams::new(10_000, 10_000, 20_000)
            .with_button(40_000)
            .with_tolerance(10),
    )
}

fn params(max_polls: u64) -> RunParams {
    RunParams {
        rate_hz: 1000,
        max_polls: Some(max_polls),
    }
}

#[test]
fn run_stops_after_max_polls_and_paces_with_clock() {
    let sim = SimulatedLadder::new(LadderResistors {
        r2: 10_000,
        encoder_a: 10_000,
        encoder_b: 20_000,
        encoder_button: 0,
    })
    .spinning(Spin::Clockwise, 3);
    let mut enc = Encoder::new(sim, 0, two_phase(), StepMode::Full);
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);

    let mut events = Vec::new();
    let summary = runner::run(&mut enc, &clock, params(49), &stop, |ev| events.push(ev)).unwrap();

    assert_eq!(summary.polls, 49);
    assert_eq!((summary.cw, summary.ccw, summary.position), (4, 0, 4));
    assert_eq!(summary.overruns, 0);
    assert_eq!(events, vec![EncoderEvent::Rotated(Direction::Clockwise); 4]);
    assert_eq!(clock.elapsed(), Duration::from_millis(49));
}

#[test]
fn preset_shutdown_skips_polling() {
    let mut enc = Encoder::new(NoopInput, 0, two_phase(), StepMode::Full);
    let stop = AtomicBool::new(true);
    let summary =
        runner::run(&mut enc, &ManualClock::new(), RunParams::default(), &stop, |_| {}).unwrap();
    assert_eq!(summary, PollSummary::default());
}

#[test]
fn callback_can_request_shutdown() {
    let input = ScriptedInput::new(vec![0, 341, 614, 512, 0, 341, 614, 512, 0]);
    let mut enc = Encoder::new(input, 0, two_phase(), StepMode::Full);
    let stop = AtomicBool::new(false);
    let summary = runner::run(
        &mut enc,
        &ManualClock::new(),
        RunParams::default(),
        &stop,
        |_| stop.store(true, Ordering::Relaxed),
    )
    .unwrap();
    assert_eq!(summary.polls, 5);
    assert_eq!(summary.cw, 1);
    assert_eq!(enc.into_input().remaining(), 4);
}

#[test]
fn exhausted_input_ends_the_run() {
    let input = ScriptedInput::new(vec![0, 512, 614, 341, 0]);
    let mut enc = Encoder::new(input, 0, two_phase(), StepMode::Full);
    let stop = AtomicBool::new(false);
    let summary =
        runner::run(&mut enc, &ManualClock::new(), RunParams::default(), &stop, |_| {}).unwrap();
    assert_eq!(summary.polls, 5);
    assert_eq!((summary.ccw, summary.position), (1, -1));
}

#[test]
fn hardware_fault_aborts_the_run() {
    let input = ScriptedInput::new(vec![0, 5000]);
    let mut enc = Encoder::new(input, 0, two_phase(), StepMode::Full);
    let stop = AtomicBool::new(false);
    let err = runner::run(&mut enc, &ManualClock::new(), params(10), &stop, |_| {}).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EncoderError>(),
        Some(EncoderError::HardwareFault(_))
    ));
}

/// Backend outside this workspace that fails every read.
struct RetriesExhausted;

impl AnalogInput for RetriesExhausted {
    fn read_analog(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other(
            "spi retries exhausted: bus stuck low",
        )))
    }
}

#[test]
fn foreign_read_failure_mentioning_exhausted_aborts_the_run() {
    let mut enc = Encoder::new(RetriesExhausted, 0, two_phase(), StepMode::Full);
    let stop = AtomicBool::new(false);
    let err = runner::run(&mut enc, &ManualClock::new(), params(100), &stop, |_| {}).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EncoderError>(),
        Some(EncoderError::Hardware(msg)) if msg.contains("bus stuck low")
    ));
}

#[test]
fn button_edges_are_reported_when_wired() {
    let mut enc = Encoder::new(NoopInput, 0, with_button(), StepMode::Full);
    let mut events = Vec::new();
    let summary = runner::replay(&mut enc, &[0, 205, 205, 438, 0], |ev| events.push(ev));
    assert_eq!(
        events,
        vec![EncoderEvent::ButtonDown, EncoderEvent::ButtonUp]
    );
    assert_eq!(summary.button_presses, 1);
    assert_eq!(summary.polls, 5);
}

#[test]
fn unwired_button_produces_no_edges() {
    let mut enc = Encoder::new(NoopInput, 0, two_phase(), StepMode::Full);
    let mut events = Vec::new();
    runner::replay(&mut enc, &[0, 0, 300, 0], |ev| events.push(ev));
    assert!(events.is_empty());
    assert!(enc.button_pressed());
}

#[test]
fn replay_matches_half_step_table() {
    let mut enc = Encoder::new(NoopInput, 0, two_phase(), StepMode::Half);
    let mut events = Vec::new();
    let summary = runner::replay(&mut enc, &[0, 341, 614, 512, 0], |ev| events.push(ev));
    assert_eq!(summary.cw, 2);
    assert_eq!(
        events,
        vec![
            EncoderEvent::Rotated(Direction::Clockwise),
            EncoderEvent::Rotated(Direction::Clockwise)
        ]
    );
}
