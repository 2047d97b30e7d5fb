//! Raw sample → logical switch states.

use crate::calibration::{CalibrationProfile, Combination};

/// Two-bit quadrature code `(phase_a << 1) | phase_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PhaseCode {
    /// Both contacts open (detent rest).
    Open = 0b00,
    /// Only B closed.
    B = 0b01,
    /// Only A closed.
    A = 0b10,
    /// Both closed.
    Both = 0b11,
}

impl PhaseCode {
    pub const ALL: [PhaseCode; 4] = [PhaseCode::Open, PhaseCode::B, PhaseCode::A, PhaseCode::Both];

    #[inline]
    pub const fn from_phases(phase_a: bool, phase_b: bool) -> Self {
        match (phase_a, phase_b) {
            (false, false) => PhaseCode::Open,
            (false, true) => PhaseCode::B,
            (true, false) => PhaseCode::A,
            (true, true) => PhaseCode::Both,
        }
    }

    /// Only the low two bits are looked at.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self::from_phases(bits & 0b10 != 0, bits & 0b01 != 0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Logical contact levels decoded from one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchState {
    pub phase_a: bool,
    pub phase_b: bool,
    pub button: bool,
}

impl SwitchState {
    #[inline]
    pub const fn phase_code(&self) -> PhaseCode {
        PhaseCode::from_phases(self.phase_a, self.phase_b)
    }
}

/// Classify `raw` against every band of `profile`.
///
/// Bands are tested independently and OR-ed together; nothing takes
/// priority. Overlapping bands set the union of their contacts. A sample
/// outside every band reports all contacts open.
pub fn classify(profile: &CalibrationProfile, raw: u16) -> SwitchState {
    let hit = |c: Combination| profile.band(c).contains(raw);

    let button_a = hit(Combination::ButtonA);
    let button_b = hit(Combination::ButtonB);
    let button_ab = hit(Combination::ButtonAB);
    let ab = hit(Combination::AB);

    SwitchState {
        phase_a: ab || button_ab || button_a || hit(Combination::A),
        phase_b: ab || button_ab || button_b || hit(Combination::B),
        button: button_a || button_b || button_ab || hit(Combination::Button),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::LadderParams;

    #[test]
    fn phase_code_packs_a_high() {
        assert_eq!(PhaseCode::from_phases(true, false).bits(), 0b10);
        assert_eq!(PhaseCode::from_phases(false, true).bits(), 0b01);
        for code in PhaseCode::ALL {
            assert_eq!(PhaseCode::from_bits(code.bits()), code);
        }
        assert_eq!(PhaseCode::from_bits(0b111), PhaseCode::Both);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let p = CalibrationProfile::new(LadderParams::new(10_000, 10_000, 20_000));
        let a = p.band(Combination::A);
        assert!(classify(&p, a.low).phase_a);
        assert!(classify(&p, a.high).phase_a);
        assert!(!classify(&p, a.high + 1).phase_a);
        assert!(!classify(&p, a.low - 1).phase_a);
    }
}
