#![no_main]
use ladder_core::mocks::NoopInput;
use ladder_core::{CalibrationProfile, Encoder, LadderParams, StepMode};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    r2: u32,
    encoder_a: u32,
    encoder_b: u32,
    encoder_button: u32,
    read_tolerance: u16,
    half: bool,
    samples: Vec<u16>,
}

fuzz_target!(|input: Input| {
    // Any wiring, including zero and overlapping resistors, must decode without panicking.
    let params = LadderParams::new(input.r2, input.encoder_a, input.encoder_b)
        .with_button(input.encoder_button)
        .with_tolerance(input.read_tolerance);
    let profile = CalibrationProfile::new(params);
    let _ = profile.validate();
    let mode = if input.half { StepMode::Half } else { StepMode::Full };
    let mut enc = Encoder::new(NoopInput, 0, profile, mode);
    for raw in input.samples {
        let _ = enc.process_sample(raw);
    }
});
