//! Error types for the encoder driver.

use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Errors that can occur while setting up or sampling the encoder.
///
/// Pin errors from the three inputs (which may be different HAL types) are
/// reduced to their [`ErrorKind`], so this enum is non-generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderError {
    /// Reading or configuring a pin failed.
    Pin(ErrorKind),

    /// Another encoder already owns the pin-change interrupt.
    AlreadyRegistered,

    /// The static storage passed to `install` already holds an encoder.
    StorageInUse,
}

impl EncoderError {
    pub(crate) fn pin<E: embedded_hal::digital::Error>(error: E) -> Self {
        EncoderError::Pin(error.kind())
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::Pin(kind) => write!(f, "Pin error: {}", kind),
            EncoderError::AlreadyRegistered => {
                write!(f, "An encoder is already registered for pin-change interrupts")
            }
            EncoderError::StorageInUse => write!(f, "Encoder storage already initialised"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EncoderError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::Pin(kind) => defmt::write!(f, "Pin error: {}", kind),
            EncoderError::AlreadyRegistered => defmt::write!(f, "Encoder already registered"),
            EncoderError::StorageInUse => defmt::write!(f, "Encoder storage in use"),
        }
    }
}
