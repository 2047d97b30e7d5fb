//! Type-state builder for `Encoder` and generic `build_encoder` constructor.
//!
//! The input slot starts as `()` and only becomes an `AnalogInput` through
//! `with_input`, so a builder without an input cannot build at all. The
//! ladder slot is tracked with the `Missing`/`Set` markers: `build()` needs it
//! at compile time, `try_build()` checks it at run time.

use std::marker::PhantomData;

use ladder_traits::AnalogInput;

use crate::calibration::{CalibrationProfile, LadderParams};
use crate::encoder::Encoder;
use crate::error::{BuildError, Result};
use crate::quadrature::StepMode;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Encoder`. Calibration is computed on `build()`.
pub struct EncoderBuilder<A, L> {
    input: A,
    pin: u8,
    ladder: Option<LadderParams>,
    mode: StepMode,
    strict: bool,
    _l: PhantomData<L>,
}

impl Default for EncoderBuilder<(), Missing> {
    fn default() -> Self {
        Self {
            input: (),
            pin: 0,
            ladder: None,
            mode: StepMode::Full,
            strict: false,
            _l: PhantomData,
        }
    }
}

impl EncoderBuilder<(), Missing> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A, L> EncoderBuilder<A, L> {
    /// Provide the analog input (required).
    pub fn with_input<B: AnalogInput>(self, input: B) -> EncoderBuilder<B, L> {
        EncoderBuilder {
            input,
            pin: self.pin,
            ladder: self.ladder,
            mode: self.mode,
            strict: self.strict,
            _l: PhantomData,
        }
    }

    /// Provide the resistor ladder (required).
    pub fn with_ladder(self, ladder: LadderParams) -> EncoderBuilder<A, Set> {
        EncoderBuilder {
            input: self.input,
            pin: self.pin,
            ladder: Some(ladder),
            mode: self.mode,
            strict: self.strict,
            _l: PhantomData,
        }
    }

    /// Pin handed to `AnalogInput::read_analog` (default 0).
    pub fn with_pin(mut self, pin: u8) -> Self {
        self.pin = pin;
        self
    }

    pub fn with_step_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject indistinguishable bands instead of decoding noise.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl<A: AnalogInput, L> EncoderBuilder<A, L> {
    /// Validate and build; usable whether or not the ladder is known statically.
    pub fn try_build(self) -> Result<Encoder<A>> {
        let ladder = self
            .ladder
            .ok_or_else(|| eyre::Report::new(BuildError::MissingLadder))?;
        build_encoder(self.input, self.pin, ladder, self.mode, self.strict)
    }
}

impl<A: AnalogInput> EncoderBuilder<A, Set> {
    pub fn build(self) -> Result<Encoder<A>> {
        self.try_build()
    }
}

/// Generic constructor used by the builder and the CLI.
pub fn build_encoder<A: AnalogInput>(
    input: A,
    pin: u8,
    ladder: LadderParams,
    mode: StepMode,
    strict: bool,
) -> Result<Encoder<A>> {
    let profile = if strict {
        CalibrationProfile::validated(ladder).map_err(eyre::Report::new)?
    } else {
        let profile = CalibrationProfile::new(ladder);
        for (first, second) in profile.overlaps() {
            tracing::warn!(
                %first,
                %second,
                first_band = %profile.band(first),
                second_band = %profile.band(second),
                "calibration bands overlap; decoding may be ambiguous"
            );
        }
        profile
    };
    tracing::info!(
        pin,
        mode = mode.name(),
        r2 = ladder.r2,
        encoder_a = ladder.encoder_a,
        encoder_b = ladder.encoder_b,
        encoder_button = ladder.encoder_button,
        read_tolerance = ladder.read_tolerance,
        "encoder calibrated"
    );
    Ok(Encoder::new(input, pin, profile, mode))
}
