//! Maps `Box<dyn Error>` from the analog seam to typed `EncoderError`.
//!
//! `ladder_traits::AnalogInput` returns `Box<dyn Error + Send + Sync>` so any
//! backend can plug in; this module converts those to our typed error enum,
//! with a feature-gated path for `ladder_hardware::HwError` downcasting.

use crate::error::EncoderError;

/// Map a trait-boundary error to a typed `EncoderError`.
///
/// Only a downcast `HwError::Exhausted` ends input; every other error,
/// whatever its message, is a hardware failure.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> EncoderError {
    #[cfg(feature = "hardware-errors")]
    {
        use ladder_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Exhausted => EncoderError::Exhausted,
                other => EncoderError::HardwareFault(other.to_string()),
            };
        }
    }

    EncoderError::Hardware(e.to_string())
}
