#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Single-pin resistor-ladder rotary encoder decoding (hardware-agnostic).
//!
//! Both quadrature contacts and the push button of a rotary encoder share one
//! analog pin through a resistor ladder. Every closed-contact combination puts
//! a distinct voltage on the pin; this crate maps samples back to contact
//! states and turns the phase sequence into rotation events. All hardware
//! access goes through `ladder_traits::AnalogInput`.
//!
//! ## Architecture
//!
//! - **Calibration**: expected reading and acceptance band per combination (`calibration`)
//! - **Classification**: raw sample → `SwitchState` (`classifier`)
//! - **Decoding**: full- and half-step quadrature tables behind `QuadratureDecoder` (`quadrature`)
//! - **Encoder**: one polled instance owning decoder state and button level (`encoder`)
//! - **Polling**: paced loop, replay and event tally (`runner`)

pub mod builder;
pub mod calibration;
pub mod classifier;
pub mod conversions;
pub mod encoder;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod quadrature;
pub mod runner;
pub mod util;

pub use builder::{EncoderBuilder, Missing, Set, build_encoder};
pub use calibration::{
    ADC_FULL_SCALE, Band, CalibrationProfile, Combination, DEFAULT_READ_TOLERANCE, LadderParams,
};
pub use classifier::{PhaseCode, SwitchState, classify};
pub use encoder::Encoder;
pub use error::{BuildError, CalibrationError, EncoderError};
pub use quadrature::{
    Direction, FullStepDecoder, FullStepState, HalfStepDecoder, HalfStepState, QuadratureDecoder,
    StepMode,
};
pub use runner::{EncoderEvent, PollSummary, RunParams};
