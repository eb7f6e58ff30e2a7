//! Construction-time configuration for [`RotaryEncoder`](crate::RotaryEncoder).

use crate::decoder::Rotation;
use crate::table::{FULL_STEP, HALF_STEP, HALF_STEP_DOUBLE};

/// Logical state of the push button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Pressed.
    Down,
    /// Released.
    Up,
}

/// How the raw button level maps onto [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonMode {
    /// Active-low button: low reads as [`Button::Down`].
    #[default]
    Normal,
    /// Active-high button: high reads as [`Button::Down`].
    Inverted,
}

impl ButtonMode {
    /// Interpret a raw pin level.
    pub fn button(self, is_high: bool) -> Button {
        match (self, is_high) {
            (ButtonMode::Normal, false) | (ButtonMode::Inverted, true) => Button::Down,
            (ButtonMode::Normal, true) | (ButtonMode::Inverted, false) => Button::Up,
        }
    }
}

/// Whether reported directions are swapped, for encoders with A/B reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationMode {
    #[default]
    Normal,
    Inverted,
}

impl RotationMode {
    /// Map a decoded direction to the direction reported to callers.
    pub fn apply(self, rotation: Rotation) -> Rotation {
        match self {
            RotationMode::Normal => rotation,
            RotationMode::Inverted => rotation.reversed(),
        }
    }
}

/// Transition table used by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepMode {
    /// One event per full quadrature cycle, emitted on return to rest.
    /// Rejects any sequence that does not visit all four phases in order.
    #[default]
    FullStep,
    /// Tracks half cycles, emits one event per full cycle.
    HalfStep,
    /// Tracks half cycles and emits at both rest phases. Twice the
    /// resolution, more sensitive to bounce.
    HalfStepDouble,
}

impl StepMode {
    /// The constant table backing this mode.
    pub(crate) const fn table(self) -> &'static [[u8; 4]] {
        match self {
            StepMode::FullStep => &FULL_STEP,
            StepMode::HalfStep => &HALF_STEP,
            StepMode::HalfStepDouble => &HALF_STEP_DOUBLE,
        }
    }
}

/// Encoder configuration, fixed for the lifetime of the encoder.
///
/// # Example
///
/// ```
/// use quadrature_encoder::{EncoderConfig, RotationMode, StepMode};
///
/// let config = EncoderConfig::new()
///     .with_rotation_mode(RotationMode::Inverted)
///     .with_step_mode(StepMode::HalfStep)
///     .with_pull_ups(true);
/// assert!(config.pull_ups);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    pub button_mode: ButtonMode,
    pub rotation_mode: RotationMode,
    pub step_mode: StepMode,
    /// Enable the internal pull-ups on all three inputs during
    /// [`attach()`](crate::RotaryEncoder::attach).
    pub pull_ups: bool,
}

impl EncoderConfig {
    /// Normal polarities, full-step table, no pull-ups.
    pub const fn new() -> Self {
        Self {
            button_mode: ButtonMode::Normal,
            rotation_mode: RotationMode::Normal,
            step_mode: StepMode::FullStep,
            pull_ups: false,
        }
    }

    pub const fn with_button_mode(mut self, mode: ButtonMode) -> Self {
        self.button_mode = mode;
        self
    }

    pub const fn with_rotation_mode(mut self, mode: RotationMode) -> Self {
        self.rotation_mode = mode;
        self
    }

    pub const fn with_step_mode(mut self, mode: StepMode) -> Self {
        self.step_mode = mode;
        self
    }

    pub const fn with_pull_ups(mut self, enabled: bool) -> Self {
        self.pull_ups = enabled;
        self
    }
}
