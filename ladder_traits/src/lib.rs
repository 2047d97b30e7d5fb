//! Hardware seams for the resistor-ladder encoder stack.
//!
//! Everything that touches real time or a real converter goes through the
//! traits in this crate so the decoder can be driven from simulations,
//! recorded traces, or an SPI ADC without change.

pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Largest value a 10-bit conversion can produce.
pub const ADC_MAX: u16 = 1023;

/// Single-channel analog sampling primitive.
///
/// Implementations return the divider voltage on `pin` scaled to
/// `0..=ADC_MAX`. A read is expected to be synchronous and short.
pub trait AnalogInput {
    fn read_analog(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn read_analog(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_analog(pin)
    }
}
