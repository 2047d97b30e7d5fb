//! Poll period helpers.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Poll period in microseconds for a rate in Hz.
/// - `hz` of 0 is treated as 1.
/// - Never shorter than 1 µs.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}
