use ladder_traits::ADC_MAX;

/// Ideal 10-bit reading of a divider whose low side is `r2` and whose high
/// side is the parallel combination of `closed` (ohms).
///
/// No closed contact leaves the sense node pulled to ground (0). A zero-ohm
/// contact shorts the node to the reference (`ADC_MAX`).
pub fn divider_counts(r2: u32, closed: &[u32]) -> u16 {
    if closed.is_empty() {
        return 0;
    }
    if closed.contains(&0) {
        return ADC_MAX;
    }
    let conductance: f64 = closed.iter().map(|&r| 1.0 / f64::from(r)).sum();
    let combined = 1.0 / conductance;
    let r2 = f64::from(r2);
    let counts = (r2 / (r2 + combined) * f64::from(ADC_MAX)).round();
    clamp_adc(counts as i64)
}

/// Clamp an intermediate value into `0..=ADC_MAX`.
#[inline]
pub fn clamp_adc(v: i64) -> u16 {
    v.clamp(0, i64::from(ADC_MAX)) as u16
}

/// Tiny xorshift PRNG for sample noise; deterministic per seed.
#[derive(Debug, Clone)]
pub struct XorShift(u32);

impl XorShift {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform integer in `-amp..=amp`.
    pub fn jitter(&mut self, amp: u16) -> i64 {
        if amp == 0 {
            return 0;
        }
        let span = u32::from(amp) * 2 + 1;
        i64::from(self.next_u32() % span) - i64::from(amp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ladder_reads_zero() {
        assert_eq!(divider_counts(10_000, &[]), 0);
    }

    #[test]
    fn single_contact_is_plain_divider() {
        // 10k over 10k: half scale
        assert_eq!(divider_counts(10_000, &[10_000]), 512);
        // 10k over 20k: a third of full scale
        assert_eq!(divider_counts(10_000, &[20_000]), 341);
    }

    #[test]
    fn parallel_contacts_raise_the_reading() {
        // 10k || 20k = 6667 ohm -> 0.6 * 1023
        assert_eq!(divider_counts(10_000, &[10_000, 20_000]), 614);
    }

    #[test]
    fn shorted_contact_saturates() {
        assert_eq!(divider_counts(10_000, &[0, 20_000]), ADC_MAX);
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let mut rng = XorShift::new(7);
        for _ in 0..1000 {
            let j = rng.jitter(3);
            assert!((-3..=3).contains(&j));
        }
        assert_eq!(rng.jitter(0), 0);
    }
}
