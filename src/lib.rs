//! Interrupt-driven rotary encoder driver on top of `embedded-hal` input pins.
//!
//! ```
//! use embedded_hal_mock::pin::{Mock, State, Transaction};
//! use encoder::{Encoder, EncoderConfig, Line, Position};
//!
//! static KNOB: Position = Position::new();
//!
//! let mut encoder = Encoder::new(
//!     EncoderConfig {
//!         pin_a: Mock::new(&[Transaction::get(State::High)]),
//!         pin_b: Mock::new(&[Transaction::get(State::Low)]),
//!         line_a: Line(0),
//!         line_b: Line(1),
//!     },
//!     &KNOB,
//! )
//! .ok()
//! .unwrap();
//!
//! // From the EXTI0 / EXTI1 handler:
//! encoder.update().ok().unwrap();
//!
//! assert_eq!(KNOB.read(), 1);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod dispatch;
pub mod encoder;
pub mod line;
pub mod position;

pub use dispatch::{DispatchError, Dispatcher, EdgeHandler, PinFault};
pub use encoder::{Encoder, EncoderConfig, Error, Rotation};
pub use line::Line;
pub use position::Position;
