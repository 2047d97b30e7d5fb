use thiserror::Error;

use crate::calibration::{Band, Combination};

/// Failure of a single poll. Classification and decoding never fail; only
/// the analog read can.
#[derive(Debug, Error, Clone)]
pub enum EncoderError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("analog input exhausted")]
    Exhausted,
}

/// Rejected ladder wiring. Only raised when strict validation is requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("resistor {0} must be > 0 ohm")]
    ZeroResistor(&'static str),
    #[error("read tolerance must be > 0")]
    ZeroTolerance,
    #[error("bands overlap: {first} {first_band} and {second} {second_band}")]
    BandOverlap {
        first: Combination,
        first_band: Band,
        second: Combination,
        second_band: Band,
    },
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing ladder parameters")]
    MissingLadder,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
