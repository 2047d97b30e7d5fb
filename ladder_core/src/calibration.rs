//! Expected ADC readings for every closed-switch combination of the ladder.
//!
//! The sense node sits between `r2` (to ground) and the parallel combination
//! of all closed contacts (to the reference). For a set of closed resistors
//! `{R_i}`:
//!
//! ```text
//! combined = 1 / Σ(1 / R_i)
//! ideal    = r2 / (r2 + combined) * 1023
//! expected = ideal - tolerance          (lower band edge)
//! ```
//!
//! Arithmetic is single precision and truncates into `u16`, so the numbers
//! match firmware built from the same formula.

use std::fmt;

use crate::error::CalibrationError;

/// ADC full-scale count used by the divider formula.
pub const ADC_FULL_SCALE: f32 = 1023.0;

/// Default half-width of each acceptance band.
pub const DEFAULT_READ_TOLERANCE: u16 = 25;

/// Resistor ladder wiring (ohms) plus the band half-width (counts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderParams {
    pub r2: u32,
    pub encoder_a: u32,
    pub encoder_b: u32,
    /// 0 means no button is wired.
    pub encoder_button: u32,
    pub read_tolerance: u16,
}

impl LadderParams {
    /// Two-phase ladder without a button and the default tolerance.
    pub fn new(r2: u32, encoder_a: u32, encoder_b: u32) -> Self {
        Self {
            r2,
            encoder_a,
            encoder_b,
            encoder_button: 0,
            read_tolerance: DEFAULT_READ_TOLERANCE,
        }
    }

    pub fn with_button(mut self, encoder_button: u32) -> Self {
        self.encoder_button = encoder_button;
        self
    }

    pub fn with_tolerance(mut self, read_tolerance: u16) -> Self {
        self.read_tolerance = read_tolerance;
        self
    }

    pub fn button_wired(&self) -> bool {
        self.encoder_button != 0
    }
}

/// A set of simultaneously closed contacts that produces a distinct voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    A,
    B,
    AB,
    Button,
    ButtonA,
    ButtonB,
    ButtonAB,
}

impl Combination {
    pub const ALL: [Combination; 7] = [
        Combination::A,
        Combination::B,
        Combination::AB,
        Combination::Button,
        Combination::ButtonA,
        Combination::ButtonB,
        Combination::ButtonAB,
    ];

    pub const fn closes_a(self) -> bool {
        matches!(
            self,
            Combination::A | Combination::AB | Combination::ButtonA | Combination::ButtonAB
        )
    }

    pub const fn closes_b(self) -> bool {
        matches!(
            self,
            Combination::B | Combination::AB | Combination::ButtonB | Combination::ButtonAB
        )
    }

    pub const fn closes_button(self) -> bool {
        matches!(
            self,
            Combination::Button | Combination::ButtonA | Combination::ButtonB | Combination::ButtonAB
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Combination::A => "A",
            Combination::B => "B",
            Combination::AB => "A+B",
            Combination::Button => "Button",
            Combination::ButtonA => "Button+A",
            Combination::ButtonB => "Button+B",
            Combination::ButtonAB => "Button+A+B",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive acceptance window `[low, high]` in raw counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub low: u16,
    pub high: u16,
}

impl Band {
    #[inline]
    pub fn contains(&self, raw: u16) -> bool {
        raw >= self.low && raw <= self.high
    }

    pub fn overlaps(&self, other: &Band) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Precomputed expected readings. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationProfile {
    params: LadderParams,
    expected: [u16; 7],
    band_width: u16,
}

impl CalibrationProfile {
    /// Compute the profile without any sanity checks.
    ///
    /// Button combinations keep an expected value of 0 when no button is
    /// wired and stay in band testing, so a sample near 0 reads as
    /// "button pressed".
    pub fn new(params: LadderParams) -> Self {
        let tol = f32::from(params.read_tolerance);
        let mut expected = [0u16; 7];
        for c in Combination::ALL {
            if c.closes_button() && !params.button_wired() {
                continue;
            }
            let closed = closed_resistors(&params, c);
            expected[c.index()] = lower_edge(ideal_counts(params.r2, &closed), tol);
        }
        Self {
            params,
            expected,
            band_width: params.read_tolerance.saturating_mul(2),
        }
    }

    /// Compute the profile and reject wiring whose bands cannot be told apart.
    pub fn validated(params: LadderParams) -> Result<Self, CalibrationError> {
        let profile = Self::new(params);
        profile.validate()?;
        Ok(profile)
    }

    pub fn params(&self) -> &LadderParams {
        &self.params
    }

    /// Width of every band (twice the tolerance).
    pub fn band_width(&self) -> u16 {
        self.band_width
    }

    pub fn button_wired(&self) -> bool {
        self.params.button_wired()
    }

    /// Lower band edge for `c` (ideal reading minus tolerance, truncated).
    pub fn expected(&self, c: Combination) -> u16 {
        self.expected[c.index()]
    }

    pub fn band(&self, c: Combination) -> Band {
        let low = self.expected(c);
        Band {
            low,
            high: low.saturating_add(self.band_width),
        }
    }

    /// Unrounded ideal reading; `None` for button combinations when no
    /// button is wired.
    pub fn ideal(&self, c: Combination) -> Option<f32> {
        if c.closes_button() && !self.button_wired() {
            return None;
        }
        Some(ideal_counts(
            self.params.r2,
            &closed_resistors(&self.params, c),
        ))
    }

    /// Combinations that can physically occur with this wiring.
    pub fn wired(&self) -> impl Iterator<Item = Combination> + '_ {
        Combination::ALL
            .into_iter()
            .filter(|c| !c.closes_button() || self.button_wired())
    }

    /// Every pair of wired combinations whose bands intersect.
    pub fn overlaps(&self) -> Vec<(Combination, Combination)> {
        let wired: Vec<Combination> = self.wired().collect();
        let mut out = Vec::new();
        for (i, &first) in wired.iter().enumerate() {
            for &second in &wired[i + 1..] {
                if self.band(first).overlaps(&self.band(second)) {
                    out.push((first, second));
                }
            }
        }
        out
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        let p = &self.params;
        if p.r2 == 0 {
            return Err(CalibrationError::ZeroResistor("r2"));
        }
        if p.encoder_a == 0 {
            return Err(CalibrationError::ZeroResistor("encoder_a"));
        }
        if p.encoder_b == 0 {
            return Err(CalibrationError::ZeroResistor("encoder_b"));
        }
        if p.read_tolerance == 0 {
            return Err(CalibrationError::ZeroTolerance);
        }
        if let Some(&(first, second)) = self.overlaps().first() {
            return Err(CalibrationError::BandOverlap {
                first,
                first_band: self.band(first),
                second,
                second_band: self.band(second),
            });
        }
        Ok(())
    }
}

/// Closed resistors for `c`, button first.
fn closed_resistors(p: &LadderParams, c: Combination) -> Vec<u32> {
    let mut closed = Vec::with_capacity(3);
    if c.closes_button() {
        closed.push(p.encoder_button);
    }
    if c.closes_a() {
        closed.push(p.encoder_a);
    }
    if c.closes_b() {
        closed.push(p.encoder_b);
    }
    closed
}

#[allow(clippy::cast_precision_loss)]
fn ideal_counts(r2: u32, closed: &[u32]) -> f32 {
    let r2 = r2 as f32;
    let combined = match closed {
        [] => return 0.0,
        [single] => *single as f32,
        many => 1.0 / many.iter().map(|&r| 1.0 / r as f32).sum::<f32>(),
    };
    r2 / (r2 + combined) * ADC_FULL_SCALE
}

/// Float-to-int `as` saturates: negative or NaN edges land on 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lower_edge(ideal: f32, tol: f32) -> u16 {
    (ideal - tol) as u16
}
