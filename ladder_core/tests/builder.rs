use ladder_core::error::{BuildError, CalibrationError};
use ladder_core::mocks::ConstInput;
use ladder_core::{Combination, EncoderBuilder, LadderParams, StepMode};
use rstest::rstest;

#[rstest]
fn builder_missing_ladder_yields_typed_build_error() {
    let err = EncoderBuilder::new()
        .with_input(ConstInput(0))
        // missing with_ladder()
        .try_build()
        .expect_err("should fail with MissingLadder");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingLadder) => {}
        other => panic!("expected MissingLadder, got: {other:?}"),
    }
}

#[test]
fn builder_carries_pin_and_mode() {
    let enc = EncoderBuilder::new()
        .with_pin(3)
        .with_step_mode(StepMode::Half)
        .with_ladder(LadderParams::new(10_000, 10_000, 20_000))
        .with_input(ConstInput(512))
        .build()
        .unwrap();
    assert_eq!(enc.pin(), 3);
    assert_eq!(enc.mode(), StepMode::Half);
    assert_eq!(enc.profile().params().read_tolerance, 25);
}

#[test]
fn overlapping_bands_build_when_not_strict() {
    let mut enc = EncoderBuilder::new()
        .with_input(ConstInput(512))
        .with_ladder(LadderParams::new(10_000, 10_000, 10_000))
        .build()
        .unwrap();
    enc.process().unwrap();
    let s = enc.switches();
    assert!(s.phase_a && s.phase_b);
}

#[test]
fn strict_builder_rejects_overlapping_bands() {
    let err = EncoderBuilder::new()
        .with_input(ConstInput(0))
        .with_ladder(LadderParams::new(10_000, 10_000, 10_000))
        .strict(true)
        .build()
        .unwrap_err();

    match err.downcast_ref::<CalibrationError>() {
        Some(CalibrationError::BandOverlap { first, second, .. }) => {
            assert_eq!((*first, *second), (Combination::A, Combination::B));
        }
        other => panic!("expected BandOverlap, got: {other:?}"),
    }
}

#[rstest]
#[case(LadderParams::new(0, 10_000, 20_000), "r2")]
#[case(LadderParams::new(10_000, 0, 20_000), "encoder_a")]
fn strict_builder_rejects_zero_resistors(
    #[case] ladder: LadderParams,
    #[case] name: &'static str,
) {
    let err = EncoderBuilder::new()
        .with_input(ConstInput(0))
        .with_ladder(ladder)
        .strict(true)
        .try_build()
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<CalibrationError>(),
        Some(&CalibrationError::ZeroResistor(name))
    );
    assert!(err.to_string().contains(name));
}
