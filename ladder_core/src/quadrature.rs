//! Table-driven quadrature decoders.
//!
//! Each decoder walks a fixed transition table keyed by `(state, phase code)`.
//! A rotation is only reported when the table reaches the end of a complete
//! Gray-code sub-sequence; a bouncing contact produces a code that does not
//! advance the sub-sequence and snaps the machine back without an event.
//!
//! Phase codes are active-high (closed contact = 1) and the detent rests at
//! `00`. Clockwise is `00 → 01 → 11 → 10 → 00`.

use std::fmt;

use crate::classifier::PhaseCode;

/// Rotation reported by a single transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub const NONE_CODE: u8 = 0x00;
    pub const CW_CODE: u8 = 0x10;
    pub const CCW_CODE: u8 = 0x20;

    /// Legacy byte code: `0x00`, `0x10` or `0x20`.
    pub const fn code(self) -> u8 {
        match self {
            Direction::None => Self::NONE_CODE,
            Direction::Clockwise => Self::CW_CODE,
            Direction::CounterClockwise => Self::CCW_CODE,
        }
    }

    /// Position change: +1 clockwise, -1 counter-clockwise.
    pub const fn delta(self) -> i64 {
        match self {
            Direction::None => 0,
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Direction::None)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Clockwise => "cw",
            Direction::CounterClockwise => "ccw",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoder resolution, chosen at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepMode {
    /// One event per detent, at `00`.
    #[default]
    Full,
    /// Events at `00` and at `11`.
    Half,
}

impl StepMode {
    pub fn decoder(self) -> Box<dyn QuadratureDecoder + Send> {
        match self {
            StepMode::Full => Box::new(FullStepDecoder::new()),
            StepMode::Half => Box::new(HalfStepDecoder::new()),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            StepMode::Full => "full",
            StepMode::Half => "half",
        }
    }
}

/// Shared interface of the full- and half-step machines.
pub trait QuadratureDecoder {
    /// Consume one phase code and return the direction the transition emits.
    fn advance(&mut self, code: PhaseCode) -> Direction;
    /// Return to the start state.
    fn reset(&mut self);
    /// Numeric id of the current state (row of the table).
    fn state_id(&self) -> u8;
    fn state_name(&self) -> &'static str;
    fn mode(&self) -> StepMode;
}

#[derive(Debug, Clone, Copy)]
struct Transition<S> {
    next: S,
    emit: Direction,
}

const fn go<S>(next: S) -> Transition<S> {
    Transition {
        next,
        emit: Direction::None,
    }
}

const fn cw<S>(next: S) -> Transition<S> {
    Transition {
        next,
        emit: Direction::Clockwise,
    }
}

const fn ccw<S>(next: S) -> Transition<S> {
    Transition {
        next,
        emit: Direction::CounterClockwise,
    }
}

// ── Full step ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum FullStepState {
    #[default]
    Start = 0,
    CwFinal = 1,
    CwBegin = 2,
    CwNext = 3,
    CcwBegin = 4,
    CcwFinal = 5,
    CcwNext = 6,
}

impl FullStepState {
    pub const fn name(self) -> &'static str {
        match self {
            FullStepState::Start => "START",
            FullStepState::CwFinal => "CW_FINAL",
            FullStepState::CwBegin => "CW_BEGIN",
            FullStepState::CwNext => "CW_NEXT",
            FullStepState::CcwBegin => "CCW_BEGIN",
            FullStepState::CcwFinal => "CCW_FINAL",
            FullStepState::CcwNext => "CCW_NEXT",
        }
    }
}

// Columns: 00, 01, 10, 11
const FULL_STEP_TABLE: [[Transition<FullStepState>; 4]; 7] = {
    use FullStepState::*;
    [
        // Start
        [go(Start), go(CwBegin), go(CcwBegin), go(Start)],
        // CwFinal
        [cw(Start), go(Start), go(CwFinal), go(CwNext)],
        // CwBegin
        [go(Start), go(CwBegin), go(Start), go(CwNext)],
        // CwNext
        [go(Start), go(CwBegin), go(CwFinal), go(CwNext)],
        // CcwBegin
        [go(Start), go(Start), go(CcwBegin), go(CcwNext)],
        // CcwFinal
        [ccw(Start), go(CcwFinal), go(Start), go(CcwNext)],
        // CcwNext
        [go(Start), go(CcwFinal), go(CcwBegin), go(CcwNext)],
    ]
};

/// One event per detent; the most bounce tolerant mode.
#[derive(Debug, Clone, Default)]
pub struct FullStepDecoder {
    state: FullStepState,
}

impl FullStepDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FullStepState {
        self.state
    }
}

impl QuadratureDecoder for FullStepDecoder {
    fn advance(&mut self, code: PhaseCode) -> Direction {
        let t = FULL_STEP_TABLE[self.state as usize][code.index()];
        self.state = t.next;
        t.emit
    }

    fn reset(&mut self) {
        self.state = FullStepState::Start;
    }

    fn state_id(&self) -> u8 {
        self.state as u8
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }

    fn mode(&self) -> StepMode {
        StepMode::Full
    }
}

// ── Half step ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum HalfStepState {
    #[default]
    Start = 0,
    CcwBegin = 1,
    CwBegin = 2,
    StartMid = 3,
    CwBeginMid = 4,
    CcwBeginMid = 5,
}

impl HalfStepState {
    pub const fn name(self) -> &'static str {
        match self {
            HalfStepState::Start => "START",
            HalfStepState::CcwBegin => "CCW_BEGIN",
            HalfStepState::CwBegin => "CW_BEGIN",
            HalfStepState::StartMid => "START_MID",
            HalfStepState::CwBeginMid => "CW_BEGIN_MID",
            HalfStepState::CcwBeginMid => "CCW_BEGIN_MID",
        }
    }
}

// Columns: 00, 01, 10, 11
const HALF_STEP_TABLE: [[Transition<HalfStepState>; 4]; 6] = {
    use HalfStepState::*;
    [
        // Start (00)
        [go(Start), go(CwBegin), go(CcwBegin), go(StartMid)],
        // CcwBegin
        [go(Start), go(Start), go(CcwBegin), ccw(StartMid)],
        // CwBegin
        [go(Start), go(CwBegin), go(Start), cw(StartMid)],
        // StartMid (11)
        [go(Start), go(CcwBeginMid), go(CwBeginMid), go(StartMid)],
        // CwBeginMid
        [cw(Start), go(StartMid), go(CwBeginMid), go(StartMid)],
        // CcwBeginMid
        [ccw(Start), go(CcwBeginMid), go(StartMid), go(StartMid)],
    ]
};

/// Two events per detent, at the seated and the unseated position.
#[derive(Debug, Clone, Default)]
pub struct HalfStepDecoder {
    state: HalfStepState,
}

impl HalfStepDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HalfStepState {
        self.state
    }
}

impl QuadratureDecoder for HalfStepDecoder {
    fn advance(&mut self, code: PhaseCode) -> Direction {
        let t = HALF_STEP_TABLE[self.state as usize][code.index()];
        self.state = t.next;
        t.emit
    }

    fn reset(&mut self) {
        self.state = HalfStepState::Start;
    }

    fn state_id(&self) -> u8 {
        self.state as u8
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }

    fn mode(&self) -> StepMode {
        StepMode::Half
    }
}
