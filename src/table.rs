//! Quadrature transition tables.
//!
//! Each table has one row per decode state and one column per phase code
//! (`00`, `01`, `10`, `11`, with `(B << 1) | A` and a set bit meaning the
//! contact is closed). Every entry packs two things into one byte:
//!
//! - bits `0..4`: the next decode state (row index)
//! - bits `4..6`: the event emitted by this transition, if any
//!
//! The engine persists the whole byte and masks with [`STATE_MASK`] before
//! the next lookup, so a row index never carries event bits.

// ---------------------------------------------------------------------------
// Packing
// ---------------------------------------------------------------------------

/// Initial decode state, shared by all tables.
pub const START: u8 = 0x00;

/// Mask selecting the next-state bits of a table entry.
pub const STATE_MASK: u8 = 0x0F;

/// Mask selecting the event bits of a table entry.
pub const EVENT_MASK: u8 = 0x30;

/// Event bits for a completed clockwise step.
pub const EMIT_CW: u8 = 0x20;

/// Event bits for a completed counter-clockwise step.
pub const EMIT_CCW: u8 = 0x10;

// ---------------------------------------------------------------------------
// Full-step table
// ---------------------------------------------------------------------------

const FS_CW_FINAL: u8 = 0x1;
const FS_CW_BEGIN: u8 = 0x2;
const FS_CW_NEXT: u8 = 0x3;
const FS_CCW_BEGIN: u8 = 0x4;
const FS_CCW_FINAL: u8 = 0x5;
const FS_CCW_NEXT: u8 = 0x6;

/// Full-step table: emits only when the rest phase `00` is reached after the
/// complete ordered sequence `00 → 10 → 11 → 01 → 00` (or its mirror).
///
/// Clockwise progress is `CW_BEGIN (10) → CW_NEXT (11) → CW_FINAL (01)`.
/// A bounce back to the previous phase steps one state back; anything else
/// drops to [`START`].
pub const FULL_STEP: [[u8; 4]; 7] = [
    // START
    [START, FS_CCW_BEGIN, FS_CW_BEGIN, START],
    // FS_CW_FINAL
    [START | EMIT_CW, FS_CW_FINAL, START, FS_CW_NEXT],
    // FS_CW_BEGIN
    [START, START, FS_CW_BEGIN, FS_CW_NEXT],
    // FS_CW_NEXT
    [START, FS_CW_FINAL, FS_CW_BEGIN, FS_CW_NEXT],
    // FS_CCW_BEGIN
    [START, FS_CCW_BEGIN, START, FS_CCW_NEXT],
    // FS_CCW_FINAL
    [START | EMIT_CCW, START, FS_CCW_FINAL, FS_CCW_NEXT],
    // FS_CCW_NEXT
    [START, FS_CCW_BEGIN, FS_CCW_FINAL, FS_CCW_NEXT],
];

// ---------------------------------------------------------------------------
// Half-step tables
// ---------------------------------------------------------------------------

const HS_CCW_BEGIN: u8 = 0x1;
const HS_CW_BEGIN: u8 = 0x2;
const HS_START_M: u8 = 0x3;
const HS_CW_BEGIN_M: u8 = 0x4;
const HS_CCW_BEGIN_M: u8 = 0x5;

/// Half-step table: tracks progress from both rest phases (`00` and `11`,
/// the latter being `START_M`) but emits only on arrival at `11`.
///
/// The transitions back into `00` from the `*_M` states are where a second
/// event per cycle would go; see [`HALF_STEP_DOUBLE`].
pub const HALF_STEP: [[u8; 4]; 6] = [
    // START
    [START, HS_CCW_BEGIN, HS_CW_BEGIN, HS_START_M],
    // HS_CCW_BEGIN
    [START, HS_CCW_BEGIN, START, HS_START_M | EMIT_CCW],
    // HS_CW_BEGIN
    [START, START, HS_CW_BEGIN, HS_START_M | EMIT_CW],
    // HS_START_M
    [START, HS_CW_BEGIN_M, HS_CCW_BEGIN_M, HS_START_M],
    // HS_CW_BEGIN_M
    [START, HS_CW_BEGIN_M, HS_START_M, HS_START_M],
    // HS_CCW_BEGIN_M
    [START, HS_START_M, HS_CCW_BEGIN_M, HS_START_M],
];

/// Half-step table emitting at both rest phases, two events per cycle.
///
/// Identical to [`HALF_STEP`] apart from the `*_M → START` entries.
pub const HALF_STEP_DOUBLE: [[u8; 4]; 6] = [
    // START
    [START, HS_CCW_BEGIN, HS_CW_BEGIN, HS_START_M],
    // HS_CCW_BEGIN
    [START, HS_CCW_BEGIN, START, HS_START_M | EMIT_CCW],
    // HS_CW_BEGIN
    [START, START, HS_CW_BEGIN, HS_START_M | EMIT_CW],
    // HS_START_M
    [START, HS_CW_BEGIN_M, HS_CCW_BEGIN_M, HS_START_M],
    // HS_CW_BEGIN_M
    [START | EMIT_CW, HS_CW_BEGIN_M, HS_START_M, HS_START_M],
    // HS_CCW_BEGIN_M
    [START | EMIT_CCW, HS_START_M, HS_CCW_BEGIN_M, HS_START_M],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_closed(table: &[[u8; 4]]) {
        for (row, entries) in table.iter().enumerate() {
            for (phase, entry) in entries.iter().enumerate() {
                let next = (entry & STATE_MASK) as usize;
                assert!(
                    next < table.len(),
                    "row {} phase {:02b} leads to undefined state {}",
                    row,
                    phase,
                    next
                );
                assert_eq!(entry & !(STATE_MASK | EVENT_MASK), 0);
                assert_ne!(entry & EVENT_MASK, EVENT_MASK, "both event bits set");
            }
        }
    }

    #[test]
    fn every_entry_has_a_defined_successor() {
        assert_closed(&FULL_STEP);
        assert_closed(&HALF_STEP);
        assert_closed(&HALF_STEP_DOUBLE);
    }

    #[test]
    fn full_step_emits_only_into_rest_phase() {
        for entries in FULL_STEP.iter() {
            for (phase, entry) in entries.iter().enumerate() {
                if entry & EVENT_MASK != 0 {
                    assert_eq!(phase, 0b00);
                    assert_eq!(entry & STATE_MASK, START);
                }
            }
        }
    }

    #[test]
    fn double_resolution_only_adds_events() {
        for (single, double) in HALF_STEP.iter().zip(HALF_STEP_DOUBLE.iter()) {
            for (a, b) in single.iter().zip(double.iter()) {
                assert_eq!(a & STATE_MASK, b & STATE_MASK);
                if a & EVENT_MASK != 0 {
                    assert_eq!(a, b);
                }
            }
        }
    }
}
