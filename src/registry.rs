//! Single-owner registry behind the pin-change interrupt.
//!
//! An interrupt vector is a free function; it cannot carry a reference to
//! the encoder it serves. The registry holds that reference instead. It
//! accepts exactly one handler at a time and refuses a second one, so two
//! encoders can never silently fight over the same interrupt lines.
//!
//! Applications call [`on_pin_change`] from their interrupt vector(s) for
//! the two quadrature lines.

use core::cell::Cell;

use critical_section::Mutex;

use crate::error::EncoderError;

/// Something that reacts to an edge on either quadrature line.
///
/// Called from interrupt context; implementations must finish quickly.
pub trait PinChangeHandler: Sync {
    fn on_pin_change(&self);
}

/// Holder for the one active [`PinChangeHandler`].
///
/// The only instance outside this crate is [`REGISTRY`]; a second registry
/// would let a second encoder arm the same lines.
///
/// ```compile_fail
/// let private = quadrature_encoder::Registry::new();
/// ```
pub struct Registry {
    active: Mutex<Cell<Option<&'static dyn PinChangeHandler>>>,
}

impl Registry {
    pub(crate) const fn new() -> Self {
        Self {
            active: Mutex::new(Cell::new(None)),
        }
    }

    /// Make `handler` the active handler.
    ///
    /// # Errors
    /// [`EncoderError::AlreadyRegistered`] if a handler is already active;
    /// the existing handler is left in place.
    pub fn register(&self, handler: &'static dyn PinChangeHandler) -> Result<(), EncoderError> {
        critical_section::with(|cs| {
            let active = self.active.borrow(cs);
            if active.get().is_some() {
                return Err(EncoderError::AlreadyRegistered);
            }
            active.set(Some(handler));
            Ok(())
        })
    }

    /// Remove the active handler. Returns `false` if there was none.
    ///
    /// Owners give the registry up through
    /// [`RotaryEncoder::detach`](crate::RotaryEncoder::detach).
    pub(crate) fn release(&self) -> bool {
        critical_section::with(|cs| self.active.borrow(cs).take().is_some())
    }

    pub fn is_occupied(&self) -> bool {
        critical_section::with(|cs| self.active.borrow(cs).get().is_some())
    }

    /// Whether `handler` is the active handler.
    pub fn is_active(&self, handler: &dyn PinChangeHandler) -> bool {
        critical_section::with(|cs| match self.active.borrow(cs).get() {
            Some(active) => core::ptr::addr_eq(active, handler),
            None => false,
        })
    }

    /// Forward a pin change to the active handler.
    ///
    /// Returns `false` if no handler is registered. The handler runs outside
    /// the registry's critical section.
    pub fn dispatch(&self) -> bool {
        let active = critical_section::with(|cs| self.active.borrow(cs).get());
        match active {
            Some(handler) => {
                handler.on_pin_change();
                true
            }
            None => false,
        }
    }
}

/// The registry used by [`on_pin_change`] and
/// [`RotaryEncoder::install`](crate::RotaryEncoder::install).
pub static REGISTRY: Registry = Registry::new();

/// Interrupt trampoline: forward an edge on A or B to the installed encoder.
///
/// ```ignore
/// #[interrupt]
/// fn EXTI0() {
///     quadrature_encoder::on_pin_change();
/// }
/// ```
#[inline]
pub fn on_pin_change() {
    REGISTRY.dispatch();
}
