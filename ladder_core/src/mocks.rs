//! Small `AnalogInput` stand-ins for tests and replay.

use ladder_traits::AnalogInput;

/// An input that always errors on read; pair it with `Encoder::process_sample`
/// when samples come from somewhere else (trace replay).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInput;

impl AnalogInput for NoopInput {
    fn read_analog(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("noop input")))
    }
}

/// An input stuck at one reading.
#[derive(Debug, Clone, Copy)]
pub struct ConstInput(pub u16);

impl AnalogInput for ConstInput {
    fn read_analog(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }
}
