//! Table-driven quadrature decode engine.
//!
//! [`QuadratureDecoder`] consumes one [`Phase`] sample per edge and reports a
//! [`Rotation`] whenever the selected table completes a step. The work per
//! sample is one masked array lookup, so it is safe to run from an interrupt
//! handler without locking or allocating.

use crate::config::StepMode;
use crate::table::{EMIT_CCW, EMIT_CW, EVENT_MASK, START, STATE_MASK};

/// Direction of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }
}

/// Combined 2-bit sample of both quadrature contacts, `(B << 1) | A`.
///
/// A bit is set when its contact is closed. With the usual wiring (contacts
/// switch to ground against pull-ups) that is when the pin reads low, so the
/// rest position with both pins high is `0b00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    /// Both contacts open.
    pub const REST: Phase = Phase(0b00);

    /// Build a phase from raw bits; anything above bit 1 is ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Phase(bits & 0b11)
    }

    /// Build a phase from the closed state of each contact.
    pub const fn from_contacts(a_closed: bool, b_closed: bool) -> Self {
        Phase(((b_closed as u8) << 1) | a_closed as u8)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Opaque position of the decoder within the step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeState(u8);

impl DecodeState {
    /// No progress towards a step.
    pub const START: DecodeState = DecodeState(START);

    pub const fn is_start(self) -> bool {
        self.0 & STATE_MASK == START
    }
}

/// One decode step: look up `(state, phase)` in the table for `mode`.
///
/// Returns the state to persist and the event, if this transition completed
/// a step. Pure: the same inputs always give the same outputs.
pub fn step(mode: StepMode, state: DecodeState, phase: Phase) -> (DecodeState, Option<Rotation>) {
    lookup(mode.table(), state, phase)
}

#[inline(always)]
fn lookup(table: &[[u8; 4]], state: DecodeState, phase: Phase) -> (DecodeState, Option<Rotation>) {
    let entry = table[(state.0 & STATE_MASK) as usize][phase.bits() as usize];
    let event = match entry & EVENT_MASK {
        EMIT_CW => Some(Rotation::Clockwise),
        EMIT_CCW => Some(Rotation::CounterClockwise),
        _ => None,
    };
    (DecodeState(entry & STATE_MASK), event)
}

/// Stateful wrapper around [`step`] for one encoder.
///
/// Holds the table for its [`StepMode`] directly, so an update is a single
/// lookup with no dispatch on the mode.
///
/// # Example
///
/// ```
/// use quadrature_encoder::{Phase, QuadratureDecoder, Rotation, StepMode};
///
/// let mut decoder = QuadratureDecoder::new(StepMode::FullStep);
/// let events: Vec<_> = [0b10, 0b11, 0b01, 0b00]
///     .into_iter()
///     .filter_map(|bits| decoder.update(Phase::from_bits(bits)))
///     .collect();
/// assert_eq!(events, [Rotation::Clockwise]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuadratureDecoder {
    table: &'static [[u8; 4]],
    mode: StepMode,
    state: DecodeState,
}

impl QuadratureDecoder {
    pub const fn new(mode: StepMode) -> Self {
        Self {
            table: mode.table(),
            mode,
            state: DecodeState::START,
        }
    }

    /// Feed a freshly sampled phase.
    #[inline]
    pub fn update(&mut self, phase: Phase) -> Option<Rotation> {
        let (state, event) = lookup(self.table, self.state, phase);
        self.state = state;
        event
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Drop any partial progress.
    pub fn reset(&mut self) {
        self.state = DecodeState::START;
    }
}
