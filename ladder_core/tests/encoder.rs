use ladder_core::mocks::{ConstInput, NoopInput};
use ladder_core::{
    CalibrationProfile, Direction, Encoder, EncoderError, LadderParams, StepMode,
};
use ladder_hardware::{LadderResistors, ScriptedInput, SimulatedLadder, Spin};
use rstest::rstest;

const TWO_PHASE: LadderResistors = LadderResistors {
    r2: 10_000,
    encoder_a: 10_000,
    encoder_b: 20_000,
    encoder_button: 0,
};

const WITH_BUTTON: LadderResistors = LadderResistors {
    encoder_button: 40_000,
    ..TWO_PHASE
};

fn profile(r: LadderResistors, tol: u16) -> CalibrationProfile {
    CalibrationProfile::new(
        LadderParams::new(r.r2, r.encoder_a, r.encoder_b)
            .with_button(r.encoder_button)
            .with_tolerance(tol),
    )
}

fn count<A: ladder_traits::AnalogInput>(enc: &mut Encoder<A>, polls: usize) -> (usize, usize) {
    let mut cw = 0;
    let mut ccw = 0;
    for _ in 0..polls {
        match enc.process().unwrap() {
            Direction::Clockwise => cw += 1,
            Direction::CounterClockwise => ccw += 1,
            Direction::None => {}
        }
    }
    (cw, ccw)
}

#[rstest]
#[case(Spin::Clockwise, StepMode::Full, (4, 0))]
#[case(Spin::CounterClockwise, StepMode::Full, (0, 4))]
#[case(Spin::Clockwise, StepMode::Half, (8, 0))]
#[case(Spin::CounterClockwise, StepMode::Half, (0, 8))]
fn simulated_spin_counts_detents(
    #[case] spin: Spin,
    #[case] mode: StepMode,
    #[case] want: (usize, usize),
) {
    // 4 quarter steps per detent, 3 reads per quarter, plus the closing rest sample
    let sim = SimulatedLadder::new(TWO_PHASE).spinning(spin, 3);
    let mut enc = Encoder::new(sim, 0, profile(TWO_PHASE, 25), mode);
    assert_eq!(count(&mut enc, 4 * 12 + 1), want);
}

#[test]
fn noisy_spin_still_decodes() {
    let sim = SimulatedLadder::new(TWO_PHASE)
        .spinning(Spin::Clockwise, 5)
        .with_noise(8, 0xC0FFEE);
    let mut enc = Encoder::new(sim, 0, profile(TWO_PHASE, 25), StepMode::Full);
    assert_eq!(count(&mut enc, 10 * 20 + 1), (10, 0));
}

#[test]
fn button_presses_do_not_disturb_rotation() {
    let sim = SimulatedLadder::new(WITH_BUTTON);
    let contacts = sim.handle();
    let mut enc = Encoder::new(sim, 0, profile(WITH_BUTTON, 10), StepMode::Full);

    let steps = [(false, true), (true, true), (true, false), (false, false)];
    let mut got = Vec::new();
    for (i, (a, b)) in steps.into_iter().enumerate() {
        contacts.set_phases(a, b);
        contacts.set_button(i % 2 == 0);
        got.push(enc.process().unwrap());
        assert_eq!(enc.button_pressed(), i % 2 == 0);
    }
    assert_eq!(
        got,
        vec![Direction::None, Direction::None, Direction::None, Direction::Clockwise]
    );
}

#[test]
fn unwired_button_reads_pressed_at_rest() {
    let mut enc = Encoder::new(ConstInput(0), 0, profile(TWO_PHASE, 25), StepMode::Full);
    assert!(!enc.button_pressed());
    assert_eq!(enc.process().unwrap(), Direction::None);
    let s = enc.switches();
    assert!(!s.phase_a && !s.phase_b);
    assert!(enc.button_pressed());
}

#[test]
fn process_sample_skips_the_input() {
    let mut enc = Encoder::new(NoopInput, 0, profile(TWO_PHASE, 25), StepMode::Full);
    let dirs: Vec<Direction> = [0, 341, 614, 512, 0]
        .into_iter()
        .map(|raw| enc.process_sample(raw))
        .collect();
    assert_eq!(dirs.last(), Some(&Direction::Clockwise));
    assert_eq!(enc.last_raw(), Some(0));
}

#[test]
fn exhausted_script_maps_to_typed_error() {
    let mut enc = Encoder::new(
        ScriptedInput::new(vec![0]),
        0,
        profile(TWO_PHASE, 25),
        StepMode::Full,
    );
    assert!(enc.process().is_ok());
    assert!(matches!(enc.process(), Err(EncoderError::Exhausted)));
}

#[test]
fn out_of_range_sample_is_a_hardware_fault() {
    let mut enc = Encoder::new(
        ScriptedInput::new(vec![4000]),
        0,
        profile(TWO_PHASE, 25),
        StepMode::Full,
    );
    assert!(matches!(enc.process(), Err(EncoderError::HardwareFault(_))));
}

#[test]
fn foreign_errors_keep_their_message() {
    let mut enc = Encoder::new(NoopInput, 0, profile(TWO_PHASE, 25), StepMode::Full);
    match enc.process() {
        Err(EncoderError::Hardware(msg)) => assert_eq!(msg, "noop input"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn reset_clears_partial_step_and_button() {
    let mut enc = Encoder::new(NoopInput, 0, profile(TWO_PHASE, 25), StepMode::Full);
    enc.process_sample(341);
    enc.process_sample(614);
    assert_ne!(enc.state_id(), 0);
    enc.reset();
    assert_eq!(enc.state_name(), "START");
    assert!(!enc.button_pressed());
    assert_eq!(enc.last_raw(), None);
}
