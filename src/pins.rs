//! Platform hooks for pin setup.
//!
//! Reading a level goes through [`embedded_hal::digital::InputPin`]. Putting
//! a pin into input mode, enabling its pull-up and arming its edge interrupt
//! have no common `embedded-hal` trait, so board support code implements
//! [`PinSetup`] on a type of its own and hands it to the encoder.

use embedded_hal::digital::Error;

/// The three inputs an encoder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Quadrature channel A.
    A,
    /// Quadrature channel B.
    B,
    /// Push button.
    Button,
}

/// Input bias requested for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
}

/// Board-specific pin configuration.
///
/// # Example
///
/// ```ignore
/// struct Board { a: Pin<PA0>, b: Pin<PA1>, button: Pin<PA2>, exti: EXTI }
///
/// impl PinSetup for Board {
///     type Error = core::convert::Infallible;
///
///     fn configure_input(&mut self, line: Line, pull: Pull) -> Result<(), Self::Error> {
///         let pin = match line { Line::A => &mut self.a, Line::B => &mut self.b, Line::Button => &mut self.button };
///         pin.set_pull(matches!(pull, Pull::Up));
///         Ok(())
///     }
///
///     fn listen_any_edge(&mut self, line: Line) -> Result<(), Self::Error> {
///         self.exti.listen(line as u8, Edge::RisingFalling);
///         Ok(())
///     }
/// }
/// ```
pub trait PinSetup {
    type Error: Error;

    /// Configure `line` as a digital input with the given bias.
    fn configure_input(&mut self, line: Line, pull: Pull) -> Result<(), Self::Error>;

    /// Arm an interrupt on both edges of `line`.
    fn listen_any_edge(&mut self, line: Line) -> Result<(), Self::Error>;
}
