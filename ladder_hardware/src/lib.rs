//! Analog backends for the ladder encoder.
//!
//! - `SimulatedLadder` models the divider physically and can spin on its own.
//! - `ScriptedInput` replays recorded samples.
//! - `HardwareAdc` reads an MCP3008 over SPI (feature `hardware`, Linux).
pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod mcp3008;
pub mod util;

use std::cell::Cell;
use std::rc::Rc;

use ladder_traits::AnalogInput;
use tracing::trace;

use crate::error::HwError;
use crate::util::{XorShift, clamp_adc, divider_counts};

/// Resistor values wired into the simulated ladder (ohms).
#[derive(Debug, Clone, Copy)]
pub struct LadderResistors {
    pub r2: u32,
    pub encoder_a: u32,
    pub encoder_b: u32,
    /// 0 leaves the button unwired; pressing it then has no electrical effect.
    pub encoder_button: u32,
}

/// Physical contact state of the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub a: bool,
    pub b: bool,
    pub button: bool,
}

/// Direction the simulated shaft keeps turning in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Spin {
    #[default]
    Idle,
    Clockwise,
    CounterClockwise,
}

// (a, b) per quarter step, starting at the detent.
const CW_CYCLE: [(bool, bool); 4] = [(false, false), (false, true), (true, true), (true, false)];
const CCW_CYCLE: [(bool, bool); 4] = [(false, false), (true, false), (true, true), (false, true)];

/// Shared handle for flipping simulated contacts from outside the poll loop.
#[derive(Debug, Clone, Default)]
pub struct ContactHandle(Rc<Cell<Contacts>>);

impl ContactHandle {
    pub fn get(&self) -> Contacts {
        self.0.get()
    }

    pub fn set(&self, contacts: Contacts) {
        self.0.set(contacts);
    }

    pub fn set_phases(&self, a: bool, b: bool) {
        let mut c = self.0.get();
        c.a = a;
        c.b = b;
        self.0.set(c);
    }

    pub fn set_button(&self, pressed: bool) {
        let mut c = self.0.get();
        c.button = pressed;
        self.0.set(c);
    }
}

/// Simulated ladder implementation
pub struct SimulatedLadder {
    resistors: LadderResistors,
    contacts: ContactHandle,
    spin: Spin,
    reads_per_phase: u32,
    reads: u32,
    phase_idx: usize,
    noise: u16,
    rng: XorShift,
    fail_after: Option<u64>,
    total_reads: u64,
}

impl SimulatedLadder {
    pub fn new(resistors: LadderResistors) -> Self {
        SimulatedLadder {
            resistors,
            contacts: ContactHandle::default(),
            spin: Spin::Idle,
            reads_per_phase: 1,
            reads: 0,
            phase_idx: 0,
            noise: 0,
            rng: XorShift::new(0x5eed),
            fail_after: None,
            total_reads: 0,
        }
    }

    /// Keep turning in `spin`, holding each quarter step for `reads_per_phase` reads.
    pub fn spinning(mut self, spin: Spin, reads_per_phase: u32) -> Self {
        self.spin = spin;
        self.reads_per_phase = reads_per_phase.max(1);
        self
    }

    /// Add uniform noise of `±amp` counts to every sample.
    pub fn with_noise(mut self, amp: u16, seed: u32) -> Self {
        self.noise = amp;
        self.rng = XorShift::new(seed);
        self
    }

    /// Fail every read after the first `reads` with a simulated SPI error.
    pub fn with_fault_after(mut self, reads: u64) -> Self {
        self.fail_after = Some(reads);
        self
    }

    pub fn handle(&self) -> ContactHandle {
        self.contacts.clone()
    }

    fn advance(&mut self) {
        let cycle = match self.spin {
            Spin::Idle => return,
            Spin::Clockwise => &CW_CYCLE,
            Spin::CounterClockwise => &CCW_CYCLE,
        };
        let (a, b) = cycle[self.phase_idx];
        self.contacts.set_phases(a, b);
        self.reads += 1;
        if self.reads >= self.reads_per_phase {
            self.reads = 0;
            self.phase_idx = (self.phase_idx + 1) % cycle.len();
        }
    }

    /// Noise-free reading for the current contacts.
    pub fn ideal_sample(&self) -> u16 {
        let c = self.contacts.get();
        let r = &self.resistors;
        let mut closed = Vec::with_capacity(3);
        if c.a {
            closed.push(r.encoder_a);
        }
        if c.b {
            closed.push(r.encoder_b);
        }
        if c.button && r.encoder_button != 0 {
            closed.push(r.encoder_button);
        }
        divider_counts(r.r2, &closed)
    }
}

impl AnalogInput for SimulatedLadder {
    fn read_analog(&mut self, pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_after.is_some_and(|n| self.total_reads >= n) {
            return Err(Box::new(HwError::Spi("simulated bus fault".into())));
        }
        self.total_reads += 1;
        self.advance();
        let ideal = self.ideal_sample();
        let raw = clamp_adc(i64::from(ideal) + self.rng.jitter(self.noise));
        trace!(pin, raw, contacts = ?self.contacts.get(), "simulated ladder sample");
        Ok(raw)
    }
}

/// Replays a fixed list of samples, then reports `HwError::Exhausted`.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    samples: Vec<u16>,
    pos: usize,
}

impl ScriptedInput {
    pub fn new(samples: Vec<u16>) -> Self {
        Self { samples, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.pos
    }
}

impl AnalogInput for ScriptedInput {
    fn read_analog(&mut self, _pin: u8) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let Some(&raw) = self.samples.get(self.pos) else {
            return Err(Box::new(HwError::Exhausted));
        };
        self.pos += 1;
        if raw > ladder_traits::ADC_MAX {
            return Err(Box::new(HwError::SampleOutOfRange(raw)));
        }
        Ok(raw)
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use hardware::HardwareAdc;

#[cfg(all(feature = "hardware", target_os = "linux"))]
mod hardware {
    use crate::error::HwError;
    use crate::mcp3008::Mcp3008;
    use ladder_traits::AnalogInput;

    /// MCP3008-backed sampling primitive.
    pub struct HardwareAdc {
        adc: Mcp3008,
    }

    impl HardwareAdc {
        pub fn new(spi_clock_hz: u32) -> Result<Self, HwError> {
            Ok(Self {
                adc: Mcp3008::new(spi_clock_hz)?,
            })
        }
    }

    impl AnalogInput for HardwareAdc {
        fn read_analog(
            &mut self,
            pin: u8,
        ) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
            let mut attempts = 0;
            let max_attempts = 2;
            loop {
                match self.adc.read_channel(pin) {
                    Ok(raw) => return Ok(raw),
                    Err(HwError::Spi(msg)) if attempts < max_attempts => {
                        attempts += 1;
                        tracing::warn!(retries = attempts, error = %msg, "adc transfer failed, retrying");
                    }
                    Err(e) => {
                        tracing::error!("ADC read error: {}", e);
                        return Err(Box::new(e));
                    }
                }
            }
        }
    }
}
