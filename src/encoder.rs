use crate::{line::Line, position::Position};
use core::fmt;
use embedded_hal::digital::v2::InputPin;
use log::debug;

/// Two-pin rotary encoder counting steps into a shared [`Position`].
///
/// The pins are expected to be pulled-up inputs with change interrupts armed
/// on both lines. Call [`Encoder::update`] from the interrupt handler of
/// either line.
pub struct Encoder<'a, A: InputPin, B: InputPin> {
    pin_a: A,
    pin_b: B,
    line_a: Line,
    line_b: Line,
    position: &'a Position,
}

impl<'a, A: InputPin, B: InputPin> Encoder<'a, A, B> {
    pub fn new(config: EncoderConfig<A, B>, position: &'a Position) -> Result<Self, Error<A, B>> {
        let EncoderConfig {
            pin_a,
            pin_b,
            line_a,
            line_b,
        } = config;

        if line_a == line_b {
            return Err(Error::SharedLine(line_a));
        }

        debug!("encoder bound to {} and {}", line_a, line_b);

        Ok(Self {
            pin_a,
            pin_b,
            line_a,
            line_b,
            position,
        })
    }

    pub fn read(&self) -> i32 {
        self.position.read()
    }

    pub fn write(&mut self, position: i32) {
        debug!("encoder on {} set to {}", self.line_a, position);
        self.position.write(position);
    }

    pub fn reset(&mut self) {
        self.write(0);
    }

    /// Samples both pins and moves the position by at most one step.
    ///
    /// Only a high level on A counts: B low means clockwise, B high counter
    /// clockwise. B is not sampled while A is low.
    pub fn update(&mut self) -> Result<Rotation, Error<A, B>> {
        if !self.pin_a.is_high().map_err(|err| Error::PinA(err))? {
            return Ok(Rotation::None);
        }

        if self.pin_b.is_low().map_err(|err| Error::PinB(err))? {
            self.position.increment();
            Ok(Rotation::Clockwise)
        } else {
            self.position.decrement();
            Ok(Rotation::CounterClockwise)
        }
    }

    pub fn lines(&self) -> (Line, Line) {
        (self.line_a, self.line_b)
    }

    pub fn owns(&self, line: Line) -> bool {
        line == self.line_a || line == self.line_b
    }

    pub fn position(&self) -> &'a Position {
        self.position
    }

    pub fn pins_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.pin_a, &mut self.pin_b)
    }

    pub fn release(self) -> (A, B) {
        (self.pin_a, self.pin_b)
    }
}

pub struct EncoderConfig<A, B> {
    pub pin_a: A,
    pub pin_b: B,
    pub line_a: Line,
    pub line_b: Line,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Rotation {
    None,
    Clockwise,
    CounterClockwise,
}

pub enum Error<A: InputPin, B: InputPin> {
    PinA(A::Error),
    PinB(B::Error),
    SharedLine(Line),
}

impl<A, B> fmt::Debug for Error<A, B>
where
    A: InputPin,
    B: InputPin,
    A::Error: fmt::Debug,
    B::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PinA(err) => f.debug_tuple("PinA").field(err).finish(),
            Error::PinB(err) => f.debug_tuple("PinB").field(err).finish(),
            Error::SharedLine(line) => f.debug_tuple("SharedLine").field(line).finish(),
        }
    }
}
