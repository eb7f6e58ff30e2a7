//! Interrupt-driven driver for mechanical quadrature rotary encoders.
//!
//! This crate turns the bouncy A/B contacts of a detented rotary encoder
//! into clean clockwise / counter-clockwise steps, decoded inside the
//! pin-change interrupt with a constant transition table, plus a push-button
//! read with configurable polarity.
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **[`QuadratureDecoder`]**: a table-driven state machine fed with one
//!   2-bit [`Phase`] per edge. Pure and constant time. The
//!   table variant ([`StepMode`]) trades bounce rejection for resolution.
//! - **[`RotaryEncoder`]**: owns the pins and a decoder, latches the last
//!   [`Rotation`], raises a read-and-clear update flag and calls an optional
//!   callback, all from interrupt context.
//!
//! An interrupt vector cannot carry a reference to the encoder it serves, so
//! the installed encoder is kept in a single-owner [`Registry`]; the
//! application's interrupt handler calls [`on_pin_change`], which forwards
//! to it. A second encoder trying to take the interrupt is refused with
//! [`EncoderError::AlreadyRegistered`].
//!
//! # Quick start
//!
//! ```ignore
//! use quadrature_encoder::{EncoderConfig, RotaryEncoder};
//! use static_cell::StaticCell;
//!
//! static ENCODER: StaticCell<RotaryEncoder<PinA, PinB, PinButton>> = StaticCell::new();
//!
//! // `board` implements `PinSetup` for this MCU.
//! let config = EncoderConfig::new().with_pull_ups(true);
//! let encoder = RotaryEncoder::install(&ENCODER, pin_a, pin_b, button, config, &mut board)?;
//! encoder.set_callback(Some(wake_ui));
//!
//! #[interrupt]
//! fn EXTI0() {
//!     quadrature_encoder::on_pin_change();
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`**: [`defmt::Format`] on public types and on-target logging
//!   of steps and registration.
//! - **`async`**: [`RotaryEncoder::wait_for_rotation`] backed by an
//!   `embassy-sync` signal.

#![cfg_attr(not(test), no_std)]

pub use config::{Button, ButtonMode, EncoderConfig, RotationMode, StepMode};
pub use decoder::{step, DecodeState, Phase, QuadratureDecoder, Rotation};
pub use encoder::RotaryEncoder;
pub use error::EncoderError;
pub use pins::{Line, PinSetup, Pull};
pub use registry::{on_pin_change, PinChangeHandler, Registry, REGISTRY};

mod config;
mod decoder;
mod encoder;
mod error;
mod pins;
mod registry;
mod table;
