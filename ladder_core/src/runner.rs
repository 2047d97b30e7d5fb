//! Paced polling loop and trace replay over an `Encoder`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ladder_traits::{AnalogInput, Clock};

use crate::encoder::Encoder;
use crate::error::{EncoderError, Report, Result};
use crate::quadrature::Direction;

/// Something observable happened during one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderEvent {
    Rotated(Direction),
    ButtonDown,
    ButtonUp,
}

impl EncoderEvent {
    pub const fn name(self) -> &'static str {
        match self {
            EncoderEvent::Rotated(d) => d.name(),
            EncoderEvent::ButtonDown => "button_down",
            EncoderEvent::ButtonUp => "button_up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub rate_hz: u32,
    /// Stop after this many polls; `None` runs until shutdown.
    pub max_polls: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            rate_hz: 1000,
            max_polls: None,
        }
    }
}

/// Totals collected over a run or a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub polls: u64,
    pub cw: u64,
    pub ccw: u64,
    /// Net detents: cw minus ccw.
    pub position: i64,
    pub button_presses: u64,
    /// Polls that finished after the next deadline had already passed.
    pub overruns: u64,
}

impl PollSummary {
    /// Fold one event into the totals.
    pub fn record(&mut self, ev: EncoderEvent) {
        match ev {
            EncoderEvent::Rotated(Direction::Clockwise) => self.cw += 1,
            EncoderEvent::Rotated(Direction::CounterClockwise) => self.ccw += 1,
            EncoderEvent::Rotated(Direction::None) => {}
            EncoderEvent::ButtonDown => self.button_presses += 1,
            EncoderEvent::ButtonUp => {}
        }
        if let EncoderEvent::Rotated(d) = ev {
            self.position = self.position.saturating_add(d.delta());
        }
    }
}

/// Poll `encoder` at `params.rate_hz` until `max_polls` or `shutdown`.
///
/// A `EncoderError::Exhausted` input ends the run normally; any other read
/// failure is returned. Button edges are only reported when a button is
/// wired.
pub fn run<A, C, F>(
    encoder: &mut Encoder<A>,
    clock: &C,
    params: RunParams,
    shutdown: &AtomicBool,
    mut on_event: F,
) -> Result<PollSummary>
where
    A: AnalogInput,
    C: Clock,
    F: FnMut(EncoderEvent),
{
    let period = Duration::from_micros(crate::util::period_us(params.rate_hz));
    let mut summary = PollSummary::default();
    tracing::info!(
        rate_hz = params.rate_hz,
        max_polls = ?params.max_polls,
        mode = encoder.mode().name(),
        "poll loop start"
    );

    let mut deadline = clock.now() + period;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            break;
        }
        if params.max_polls.is_some_and(|max| summary.polls >= max) {
            break;
        }

        let was_pressed = encoder.button_pressed();
        let dir = match encoder.process() {
            Ok(dir) => dir,
            Err(EncoderError::Exhausted) => {
                tracing::info!(polls = summary.polls, "analog input exhausted");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, polls = summary.polls, "poll failed");
                return Err(Report::new(e));
            }
        };
        summary.polls += 1;
        emit(encoder, was_pressed, dir, &mut summary, &mut on_event);

        if clock.now() > deadline {
            summary.overruns += 1;
            deadline = clock.now();
        }
        clock.sleep_until(deadline);
        deadline += period;
    }

    tracing::info!(
        polls = summary.polls,
        cw = summary.cw,
        ccw = summary.ccw,
        position = summary.position,
        button_presses = summary.button_presses,
        overruns = summary.overruns,
        "poll loop stop"
    );
    Ok(summary)
}

/// Feed pre-recorded samples through `encoder` without touching its input.
pub fn replay<A, F>(encoder: &mut Encoder<A>, samples: &[u16], mut on_event: F) -> PollSummary
where
    F: FnMut(EncoderEvent),
{
    let mut summary = PollSummary::default();
    for &raw in samples {
        let was_pressed = encoder.button_pressed();
        let dir = encoder.process_sample(raw);
        summary.polls += 1;
        emit(encoder, was_pressed, dir, &mut summary, &mut on_event);
    }
    tracing::info!(
        samples = samples.len(),
        cw = summary.cw,
        ccw = summary.ccw,
        position = summary.position,
        "replay done"
    );
    summary
}

fn emit<A, F>(
    encoder: &Encoder<A>,
    was_pressed: bool,
    dir: Direction,
    summary: &mut PollSummary,
    on_event: &mut F,
) where
    F: FnMut(EncoderEvent),
{
    let mut fire = |ev: EncoderEvent| {
        summary.record(ev);
        on_event(ev);
    };
    if !dir.is_none() {
        fire(EncoderEvent::Rotated(dir));
    }
    if !encoder.profile().button_wired() {
        return;
    }
    match (was_pressed, encoder.button_pressed()) {
        (false, true) => {
            tracing::debug!(raw = ?encoder.last_raw(), "button down");
            fire(EncoderEvent::ButtonDown);
        }
        (true, false) => {
            tracing::debug!(raw = ?encoder.last_raw(), "button up");
            fire(EncoderEvent::ButtonUp);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_tracks_net_position() {
        let mut s = PollSummary::default();
        s.record(EncoderEvent::Rotated(Direction::Clockwise));
        s.record(EncoderEvent::Rotated(Direction::Clockwise));
        s.record(EncoderEvent::Rotated(Direction::CounterClockwise));
        s.record(EncoderEvent::ButtonDown);
        s.record(EncoderEvent::ButtonUp);
        assert_eq!((s.cw, s.ccw, s.position, s.button_presses), (2, 1, 1, 1));
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(EncoderEvent::Rotated(Direction::Clockwise).name(), "cw");
        assert_eq!(EncoderEvent::ButtonDown.name(), "button_down");
        assert_eq!(EncoderEvent::ButtonUp.name(), "button_up");
    }
}
