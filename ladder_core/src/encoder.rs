//! The polled encoder instance: classifier and decoder composed over one
//! analog input.

use ladder_traits::AnalogInput;
use tracing::{debug, trace};

use crate::calibration::CalibrationProfile;
use crate::classifier::{SwitchState, classify};
use crate::error::EncoderError;
use crate::hw_error::map_hw_error;
use crate::quadrature::{Direction, QuadratureDecoder, StepMode};

/// Single-pin ladder encoder.
///
/// Owns the decoder state and the last button level. Not meant to be shared:
/// every poll takes `&mut self`.
pub struct Encoder<A> {
    input: A,
    pin: u8,
    profile: CalibrationProfile,
    decoder: Box<dyn QuadratureDecoder + Send>,
    switches: SwitchState,
    last_raw: Option<u16>,
}

impl<A> core::fmt::Debug for Encoder<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Encoder")
            .field("pin", &self.pin)
            .field("mode", &self.decoder.mode())
            .field("state", &self.decoder.state_name())
            .field("button_pressed", &self.switches.button)
            .field("last_raw", &self.last_raw)
            .finish_non_exhaustive()
    }
}

impl<A: AnalogInput> Encoder<A> {
    /// Sample the input once and advance the decoder.
    pub fn process(&mut self) -> Result<Direction, EncoderError> {
        let raw = self
            .input
            .read_analog(self.pin)
            .map_err(|e| map_hw_error(&*e))?;
        Ok(self.process_sample(raw))
    }
}

impl<A> Encoder<A> {
    pub fn new(input: A, pin: u8, profile: CalibrationProfile, mode: StepMode) -> Self {
        Self {
            input,
            pin,
            profile,
            decoder: mode.decoder(),
            switches: SwitchState::default(),
            last_raw: None,
        }
    }

    /// Advance with an already captured sample (replays, external samplers).
    pub fn process_sample(&mut self, raw: u16) -> Direction {
        let switches = classify(&self.profile, raw);
        let dir = self.decoder.advance(switches.phase_code());
        trace!(
            raw,
            a = switches.phase_a,
            b = switches.phase_b,
            button = switches.button,
            state = self.decoder.state_name(),
            "ladder sample"
        );
        if !dir.is_none() {
            debug!(direction = %dir, raw, "rotation");
        }
        self.switches = switches;
        self.last_raw = Some(raw);
        dir
    }

    /// Button level seen by the most recent poll.
    #[inline]
    pub fn button_pressed(&self) -> bool {
        self.switches.button
    }

    pub fn switches(&self) -> SwitchState {
        self.switches
    }

    pub fn last_raw(&self) -> Option<u16> {
        self.last_raw
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    pub fn mode(&self) -> StepMode {
        self.decoder.mode()
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn state_id(&self) -> u8 {
        self.decoder.state_id()
    }

    pub fn state_name(&self) -> &'static str {
        self.decoder.state_name()
    }

    /// Drop any partial step and forget the button level.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.switches = SwitchState::default();
        self.last_raw = None;
    }

    pub fn into_input(self) -> A {
        self.input
    }
}
