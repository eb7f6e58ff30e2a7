//! End-to-end test through the global registry and interrupt trampoline.
//!
//! Everything that touches the process-wide `REGISTRY` lives in a single
//! test so parallel test threads cannot interfere with each other.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use quadrature_encoder::{
    on_pin_change, Button, EncoderConfig, EncoderError, Line, PinSetup, Pull, RotaryEncoder,
    Rotation, REGISTRY,
};
use static_cell::StaticCell;

#[derive(Debug)]
struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Clone)]
struct SharedPin(Arc<AtomicBool>);

impl SharedPin {
    fn high() -> Self {
        SharedPin(Arc::new(AtomicBool::new(true)))
    }

    fn set_high(&self, high: bool) {
        self.0.store(high, Ordering::SeqCst);
    }
}

impl ErrorType for SharedPin {
    type Error = PinFault;
}

impl InputPin for SharedPin {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        Ok(self.0.load(Ordering::SeqCst))
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        Ok(!self.0.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
struct Board {
    pulls: Vec<(Line, Pull)>,
    armed: Vec<Line>,
}

impl Board {
    fn is_untouched(&self) -> bool {
        self.pulls.is_empty() && self.armed.is_empty()
    }
}

impl PinSetup for Board {
    type Error = PinFault;

    fn configure_input(&mut self, line: Line, pull: Pull) -> Result<(), PinFault> {
        self.pulls.push((line, pull));
        Ok(())
    }

    fn listen_any_edge(&mut self, line: Line) -> Result<(), PinFault> {
        self.armed.push(line);
        Ok(())
    }
}

type Encoder = RotaryEncoder<SharedPin, SharedPin, SharedPin>;

static FIRST: StaticCell<Encoder> = StaticCell::new();
static SECOND: StaticCell<Encoder> = StaticCell::new();

static NOTIFICATIONS: AtomicUsize = AtomicUsize::new(0);

fn notify() {
    NOTIFICATIONS.fetch_add(1, Ordering::SeqCst);
}

/// Set A/B for phase `bits` (set bit = contact closed = low) and fire the
/// interrupt trampoline.
fn edge(a: &SharedPin, b: &SharedPin, bits: u8) {
    a.set_high(bits & 0b01 == 0);
    b.set_high(bits & 0b10 == 0);
    on_pin_change();
}

#[test]
fn installed_encoder_decodes_through_interrupt_trampoline() {
    let (a, b, button) = (SharedPin::high(), SharedPin::high(), SharedPin::high());
    let mut board = Board::default();

    let encoder = RotaryEncoder::install(
        &FIRST,
        a.clone(),
        b.clone(),
        button.clone(),
        EncoderConfig::new().with_pull_ups(true),
        &mut board,
    )
    .expect("first install succeeds");

    assert_eq!(
        board.pulls,
        [(Line::Button, Pull::Up), (Line::A, Pull::Up), (Line::B, Pull::Up)]
    );
    assert_eq!(board.armed, [Line::A, Line::B]);
    assert!(REGISTRY.is_occupied());

    // ── A second encoder on the same board is refused untouched ──────

    board = Board::default();
    let result = RotaryEncoder::install(
        &SECOND,
        SharedPin::high(),
        SharedPin::high(),
        SharedPin::high(),
        EncoderConfig::new(),
        &mut board,
    );
    assert!(matches!(result, Err(EncoderError::AlreadyRegistered)));
    assert!(board.is_untouched(), "refused install changed {:?}", board.pulls);

    let stray: &'static Encoder = Box::leak(Box::new(RotaryEncoder::new(
        SharedPin::high(),
        SharedPin::high(),
        SharedPin::high(),
        EncoderConfig::new(),
    )));
    assert_eq!(stray.attach(&mut board), Err(EncoderError::AlreadyRegistered));
    assert!(board.is_untouched());
    assert!(!stray.detach());

    // ── Decoding through the trampoline ──────────────────────────────

    encoder.set_callback(Some(notify));

    // One clockwise detent, starting and ending at rest.
    for bits in [0b00, 0b10, 0b11, 0b01, 0b00] {
        edge(&a, &b, bits);
    }
    assert_eq!(NOTIFICATIONS.load(Ordering::SeqCst), 1);
    assert_eq!(encoder.rotation(), Rotation::Clockwise);
    assert!(encoder.is_update_available());
    assert!(!encoder.is_update_available());

    // A bounce inside a counter-clockwise detent still counts once.
    for bits in [0b01, 0b00, 0b01, 0b11, 0b10, 0b00] {
        edge(&a, &b, bits);
    }
    assert_eq!(NOTIFICATIONS.load(Ordering::SeqCst), 2);
    assert_eq!(encoder.rotation(), Rotation::CounterClockwise);
    assert!(encoder.is_update_available());

    button.set_high(false);
    assert_eq!(encoder.button_state(), Ok(Button::Down));

    // ── Hand-over ────────────────────────────────────────────────────

    assert!(encoder.detach());
    assert!(!REGISTRY.is_occupied());

    // Edges with nobody attached are ignored.
    for bits in [0b01, 0b11, 0b10, 0b00] {
        edge(&a, &b, bits);
    }
    assert_eq!(NOTIFICATIONS.load(Ordering::SeqCst), 2);
    assert!(!encoder.is_update_available());

    // Used storage is refused before any line is touched.
    let result = RotaryEncoder::install(
        &FIRST,
        SharedPin::high(),
        SharedPin::high(),
        SharedPin::high(),
        EncoderConfig::new(),
        &mut board,
    );
    assert!(matches!(result, Err(EncoderError::StorageInUse)));
    assert!(board.is_untouched());
    assert!(!REGISTRY.is_occupied());

    // The earlier refusal did not consume SECOND.
    let (a2, b2) = (SharedPin::high(), SharedPin::high());
    let second = RotaryEncoder::install(
        &SECOND,
        a2.clone(),
        b2.clone(),
        SharedPin::high(),
        EncoderConfig::new(),
        &mut board,
    )
    .expect("second install succeeds after hand-over");
    assert_eq!(
        board.pulls,
        [(Line::Button, Pull::None), (Line::A, Pull::None), (Line::B, Pull::None)]
    );

    for bits in [0b10, 0b11, 0b01, 0b00] {
        edge(&a2, &b2, bits);
    }
    assert_eq!(second.rotation(), Rotation::Clockwise);
    assert!(second.is_update_available());
    assert!(!encoder.is_update_available());
    assert!(second.detach());
}
