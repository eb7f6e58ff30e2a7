//! Public encoder interface.
//!
//! [`RotaryEncoder`] owns the three input pins and the decode engine, and
//! bridges the pin-change interrupt to normal-priority code:
//!
//! - the interrupt path ([`handle_pin_change`](RotaryEncoder::handle_pin_change))
//!   samples A and B, steps the decoder and, on a completed step, latches the
//!   direction, raises the update flag and calls the user callback;
//! - normal code polls [`is_update_available`](RotaryEncoder::is_update_available)
//!   and [`rotation`](RotaryEncoder::rotation), or reads the button.
//!
//! All state shared between the two sides lives in `critical_section`
//! cells, so the read-and-clear of the update flag is atomic even on
//! targets with nested interrupt priorities or several cores.

use core::cell::{Cell, RefCell};

use critical_section::{CriticalSection, Mutex};
use embedded_hal::digital::InputPin;
use static_cell::StaticCell;

#[cfg(feature = "async")]
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

use crate::config::{Button, EncoderConfig};
use crate::decoder::{Phase, QuadratureDecoder, Rotation};
use crate::error::EncoderError;
use crate::pins::{Line, PinSetup, Pull};
use crate::registry::{PinChangeHandler, Registry, REGISTRY};

/// State touched only by the interrupt path.
struct Quadrature<A, B> {
    pin_a: A,
    pin_b: B,
    decoder: QuadratureDecoder,
}

impl<A, B> Quadrature<A, B>
where
    A: InputPin,
    B: InputPin,
{
    /// Closed contacts pull their pin low.
    fn sample(&mut self) -> Result<Phase, EncoderError> {
        let a_closed = self.pin_a.is_low().map_err(EncoderError::pin)?;
        let b_closed = self.pin_b.is_low().map_err(EncoderError::pin)?;
        Ok(Phase::from_contacts(a_closed, b_closed))
    }
}

/// A completed step, latched and waiting for its callback.
struct Step {
    rotation: Rotation,
    callback: Option<fn()>,
}

/// Rotary encoder with push button, decoded from pin-change interrupts.
///
/// # Lifecycle
///
/// 1. [`RotaryEncoder::new()`] takes the pins without touching hardware.
/// 2. [`attach()`](Self::attach) makes this the single handler in
///    [`REGISTRY`], then sets up inputs and pull-ups and arms the edge
///    interrupts. Nothing is touched if another encoder is attached.
///
/// [`RotaryEncoder::install()`] does both and places the encoder in static
/// storage.
///
/// # Example
///
/// ```ignore
/// use quadrature_encoder::{EncoderConfig, RotaryEncoder, Rotation};
/// use static_cell::StaticCell;
///
/// static ENCODER: StaticCell<RotaryEncoder<PinA, PinB, PinButton>> = StaticCell::new();
///
/// let encoder = RotaryEncoder::install(&ENCODER, a, b, button, EncoderConfig::new(), &mut board)?;
///
/// loop {
///     if encoder.is_update_available() {
///         match encoder.rotation() {
///             Rotation::Clockwise => volume += 1,
///             Rotation::CounterClockwise => volume -= 1,
///         }
///     }
/// }
/// ```
pub struct RotaryEncoder<A, B, BTN> {
    config: EncoderConfig,
    quadrature: Mutex<RefCell<Quadrature<A, B>>>,
    button: Mutex<RefCell<BTN>>,
    update: Mutex<Cell<bool>>,
    rotation: Mutex<Cell<Rotation>>,
    callback: Mutex<Cell<Option<fn()>>>,
    #[cfg(feature = "async")]
    signal: Signal<CriticalSectionRawMutex, Rotation>,
}

impl<A, B, BTN> RotaryEncoder<A, B, BTN>
where
    A: InputPin,
    B: InputPin,
    BTN: InputPin,
{
    /// Create an encoder over quadrature pins `pin_a`, `pin_b` and the
    /// push-button pin.
    ///
    /// The decoder starts at rest, the latched rotation is
    /// [`Rotation::Clockwise`], no update is pending and no callback is set.
    pub fn new(pin_a: A, pin_b: B, button: BTN, config: EncoderConfig) -> Self {
        Self {
            config,
            quadrature: Mutex::new(RefCell::new(Quadrature {
                pin_a,
                pin_b,
                decoder: QuadratureDecoder::new(config.step_mode),
            })),
            button: Mutex::new(RefCell::new(button)),
            update: Mutex::new(Cell::new(false)),
            rotation: Mutex::new(Cell::new(Rotation::Clockwise)),
            callback: Mutex::new(Cell::new(None)),
            #[cfg(feature = "async")]
            signal: Signal::new(),
        }
    }

    pub fn config(&self) -> EncoderConfig {
        self.config
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Configure the button and both quadrature lines as inputs, with
    /// pull-ups when [`EncoderConfig::pull_ups`] is set.
    ///
    /// Only called once this encoder owns the registry: A and B are shared
    /// with whichever encoder is live.
    fn configure<S: PinSetup>(&self, setup: &mut S) -> Result<(), EncoderError> {
        let pull = if self.config.pull_ups { Pull::Up } else { Pull::None };

        for line in [Line::Button, Line::A, Line::B] {
            setup.configure_input(line, pull).map_err(EncoderError::pin)?;
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Interrupt path
    // -----------------------------------------------------------------------

    /// Sample both quadrature pins and run one decode step.
    ///
    /// Returns the reported direction if this edge completed a step. If a
    /// pin read fails the sample is dropped and the decoder is unchanged.
    pub fn handle_pin_change(&self) -> Result<Option<Rotation>, EncoderError> {
        let step = critical_section::with(|cs| {
            let phase = self.quadrature.borrow_ref_mut(cs).sample()?;
            Ok::<_, EncoderError>(self.decode(cs, phase))
        })?;

        Ok(self.notify(step))
    }

    /// Run one decode step on an already sampled phase.
    pub fn handle_phase(&self, phase: Phase) -> Option<Rotation> {
        let step = critical_section::with(|cs| self.decode(cs, phase));
        self.notify(step)
    }

    /// Step the decoder and latch a completed step.
    ///
    /// Decode and latch share the caller's critical section, so rotation and
    /// flag are always written in decode order.
    fn decode(&self, cs: CriticalSection<'_>, phase: Phase) -> Option<Step> {
        let raw = self.quadrature.borrow_ref_mut(cs).decoder.update(phase)?;
        let rotation = self.config.rotation_mode.apply(raw);

        self.rotation.borrow(cs).set(rotation);
        self.update.borrow(cs).set(true);

        #[cfg(feature = "async")]
        self.signal.signal(rotation);

        Some(Step {
            rotation,
            callback: self.callback.borrow(cs).get(),
        })
    }

    /// Called outside the critical section; the callback may re-enter the encoder.
    fn notify(&self, step: Option<Step>) -> Option<Rotation> {
        let step = step?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Encoder step: {}", step.rotation);

        if let Some(callback) = step.callback {
            callback();
        }

        Some(step.rotation)
    }

    // -----------------------------------------------------------------------
    // Update functions
    // -----------------------------------------------------------------------

    /// Register a function to call, from interrupt context, after every
    /// completed step. `None` disables notification; polling keeps working.
    pub fn set_callback(&self, callback: Option<fn()>) {
        critical_section::with(|cs| self.callback.borrow(cs).set(callback));
    }

    /// Raise the update flag as if a step had completed.
    pub fn set_update(&self) {
        critical_section::with(|cs| self.update.borrow(cs).set(true));
    }

    /// Overwrite the latched rotation.
    pub fn set_rotation(&self, rotation: Rotation) {
        critical_section::with(|cs| self.rotation.borrow(cs).set(rotation));
    }

    // -----------------------------------------------------------------------
    // State functions
    // -----------------------------------------------------------------------

    /// Whether a step completed since the previous call. Clears the flag.
    pub fn is_update_available(&self) -> bool {
        critical_section::with(|cs| self.update.borrow(cs).replace(false))
    }

    /// Direction of the most recent step. Does not consume anything.
    pub fn rotation(&self) -> Rotation {
        critical_section::with(|cs| self.rotation.borrow(cs).get())
    }

    /// Read the button through the configured [`ButtonMode`](crate::ButtonMode).
    /// Not debounced.
    pub fn button_state(&self) -> Result<Button, EncoderError> {
        let is_high = critical_section::with(|cs| self.button.borrow_ref_mut(cs).is_high())
            .map_err(EncoderError::pin)?;
        Ok(self.config.button_mode.button(is_high))
    }

    /// Wait for the next completed step.
    ///
    /// Only one task should wait at a time. A step that completed before the
    /// call and has not been awaited yet is returned immediately.
    #[cfg(feature = "async")]
    pub async fn wait_for_rotation(&self) -> Rotation {
        self.signal.wait().await
    }
}

impl<A, B, BTN> RotaryEncoder<A, B, BTN>
where
    A: InputPin + Send + 'static,
    B: InputPin + Send + 'static,
    BTN: InputPin + Send + 'static,
{
    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Take the pin-change interrupt: register as the single handler in
    /// [`REGISTRY`], configure the inputs and arm the any-edge interrupts on
    /// both quadrature lines.
    ///
    /// # Errors
    /// * [`EncoderError::AlreadyRegistered`] if another encoder is attached;
    ///   no line is configured or armed and the owner is untouched.
    /// * [`EncoderError::Pin`] if configuring or arming a line fails; the
    ///   registration is undone.
    pub fn attach<S: PinSetup>(&'static self, setup: &mut S) -> Result<(), EncoderError> {
        self.attach_to(&REGISTRY, setup)
    }

    pub(crate) fn attach_to<S: PinSetup>(
        &'static self,
        registry: &Registry,
        setup: &mut S,
    ) -> Result<(), EncoderError> {
        if let Err(e) = registry.register(self) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Encoder attach rejected: {}", e);
            return Err(e);
        }

        if let Err(e) = self.arm(setup) {
            registry.release();
            return Err(e);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Encoder attached ({})", self.config.step_mode);

        Ok(())
    }

    fn arm<S: PinSetup>(&self, setup: &mut S) -> Result<(), EncoderError> {
        self.configure(setup)?;

        for line in [Line::A, Line::B] {
            setup.listen_any_edge(line).map_err(EncoderError::pin)?;
        }

        Ok(())
    }

    /// Give up the pin-change interrupt if this encoder holds it.
    ///
    /// Returns `false` if another encoder (or none) is attached. Edge
    /// interrupts stay armed; disarming them is up to the board code.
    pub fn detach(&'static self) -> bool {
        self.detach_from(&REGISTRY)
    }

    pub(crate) fn detach_from(&'static self, registry: &Registry) -> bool {
        critical_section::with(|_| registry.is_active(self) && registry.release())
    }

    /// Create an encoder, place it in `cell` and [`attach`](Self::attach) it.
    ///
    /// A refused install leaves `cell`, the registry and every line as they
    /// were.
    ///
    /// # Errors
    /// * [`EncoderError::AlreadyRegistered`] if another encoder is attached.
    /// * [`EncoderError::StorageInUse`] if `cell` was already initialised.
    /// * [`EncoderError::Pin`] if configuring or arming a line fails.
    pub fn install<S: PinSetup>(
        cell: &'static StaticCell<Self>,
        pin_a: A,
        pin_b: B,
        button: BTN,
        config: EncoderConfig,
        setup: &mut S,
    ) -> Result<&'static Self, EncoderError> {
        if REGISTRY.is_occupied() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Encoder install rejected: {}", EncoderError::AlreadyRegistered);
            return Err(EncoderError::AlreadyRegistered);
        }

        let encoder: &'static Self = cell
            .try_init(Self::new(pin_a, pin_b, button, config))
            .ok_or(EncoderError::StorageInUse)?;
        encoder.attach(setup)?;

        Ok(encoder)
    }
}

impl<A, B, BTN> PinChangeHandler for RotaryEncoder<A, B, BTN>
where
    A: InputPin + Send,
    B: InputPin + Send,
    BTN: InputPin + Send,
{
    fn on_pin_change(&self) {
        if let Err(_e) = self.handle_pin_change() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Dropped encoder sample: {}", _e);
        }
    }
}
