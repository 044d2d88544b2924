//! Routing of interrupt lines to the encoders that own them.
//!
//! Each encoder registers once; an interrupt handler then forwards the line
//! that fired and only the owning encoder is updated, so several encoders can
//! share a board without stepping on each other's counters.

use crate::{
    encoder::{Encoder, Error, Rotation},
    line::Line,
};
use embedded_hal::digital::v2::InputPin;
use heapless::Vec;
use log::warn;

/// Something that reacts to edges on a pair of interrupt lines.
///
/// Handlers are moved into interrupt context and must be `Send`.
pub trait EdgeHandler: Send {
    fn lines(&self) -> (Line, Line);

    fn on_edge(&mut self, line: Line) -> Result<Rotation, PinFault>;

    fn owns(&self, line: Line) -> bool {
        let (a, b) = self.lines();
        line == a || line == b
    }
}

/// A pin on the given line could not be read.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct PinFault(pub Line);

impl<'a, A, B> EdgeHandler for Encoder<'a, A, B>
where
    A: InputPin + Send,
    B: InputPin + Send,
{
    fn lines(&self) -> (Line, Line) {
        Encoder::lines(self)
    }

    fn on_edge(&mut self, _line: Line) -> Result<Rotation, PinFault> {
        let (line_a, line_b) = Encoder::lines(self);
        self.update().map_err(|err| match err {
            Error::PinB(_) => PinFault(line_b),
            _ => PinFault(line_a),
        })
    }
}

pub struct Dispatcher<'a, const N: usize> {
    handlers: Vec<&'a mut dyn EdgeHandler, N>,
}

impl<'a, const N: usize> Dispatcher<'a, N> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn register(&mut self, handler: &'a mut dyn EdgeHandler) -> Result<(), DispatchError> {
        let (a, b) = handler.lines();
        for line in [a, b].iter() {
            if self.owner_of(*line).is_some() {
                return Err(DispatchError::LineTaken(*line));
            }
        }

        self.handlers
            .push(handler)
            .map_err(|_| DispatchError::Full)
    }

    pub fn dispatch(&mut self, line: Line) -> Result<Rotation, DispatchError> {
        let index = match self.owner_of(line) {
            Some(index) => index,
            None => {
                warn!("edge on unowned line {}", line);
                return Err(DispatchError::Unowned(line));
            }
        };

        self.handlers[index]
            .on_edge(line)
            .map_err(|PinFault(line)| DispatchError::Pin(line))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn owner_of(&self, line: Line) -> Option<usize> {
        self.handlers.iter().position(|handler| handler.owns(line))
    }
}

impl<'a, const N: usize> Default for Dispatcher<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum DispatchError {
    Full,
    LineTaken(Line),
    Unowned(Line),
    Pin(Line),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoder::EncoderConfig, position::Position};
    use embedded_hal_mock::pin::{Mock, State, Transaction};
    use embedded_hal_mock::MockError;
    use std::io::ErrorKind;

    fn encoder<'a>(
        position: &'a Position,
        lines: (u8, u8),
        a: &[Transaction],
        b: &[Transaction],
    ) -> Encoder<'a, Mock, Mock> {
        Encoder::new(
            EncoderConfig {
                pin_a: Mock::new(a),
                pin_b: Mock::new(b),
                line_a: Line(lines.0),
                line_b: Line(lines.1),
            },
            position,
        )
        .unwrap()
    }

    #[test]
    fn routes_edges_to_the_owning_encoder() {
        let left_position = Position::new();
        let right_position = Position::new();
        let mut left = encoder(
            &left_position,
            (0, 1),
            &[Transaction::get(State::High), Transaction::get(State::High)],
            &[Transaction::get(State::Low), Transaction::get(State::Low)],
        );
        let mut right = encoder(
            &right_position,
            (2, 3),
            &[Transaction::get(State::High)],
            &[Transaction::get(State::High)],
        );

        {
            let mut dispatcher: Dispatcher<2> = Dispatcher::new();
            dispatcher.register(&mut left).unwrap();
            dispatcher.register(&mut right).unwrap();
            assert_eq!(dispatcher.len(), 2);

            assert_eq!(dispatcher.dispatch(Line(0)), Ok(Rotation::Clockwise));
            assert_eq!(dispatcher.dispatch(Line(3)), Ok(Rotation::CounterClockwise));
            assert_eq!(dispatcher.dispatch(Line(1)), Ok(Rotation::Clockwise));
        }

        assert_eq!(left_position.read(), 2);
        assert_eq!(right_position.read(), -1);

        let (mut a, mut b) = left.release();
        a.done();
        b.done();
        let (mut a, mut b) = right.release();
        a.done();
        b.done();
    }

    #[test]
    fn rejects_overlapping_lines() {
        let first_position = Position::new();
        let second_position = Position::new();
        let mut first = encoder(&first_position, (0, 1), &[], &[]);
        let mut second = encoder(&second_position, (1, 2), &[], &[]);

        let mut dispatcher: Dispatcher<2> = Dispatcher::new();
        dispatcher.register(&mut first).unwrap();

        assert_eq!(
            dispatcher.register(&mut second),
            Err(DispatchError::LineTaken(Line(1)))
        );
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn rejects_when_full() {
        let first_position = Position::new();
        let second_position = Position::new();
        let mut first = encoder(&first_position, (0, 1), &[], &[]);
        let mut second = encoder(&second_position, (2, 3), &[], &[]);

        let mut dispatcher: Dispatcher<1> = Dispatcher::new();
        dispatcher.register(&mut first).unwrap();

        assert_eq!(dispatcher.register(&mut second), Err(DispatchError::Full));
    }

    #[test]
    fn reports_unowned_lines() {
        let position = Position::new();
        let mut only = encoder(&position, (0, 1), &[], &[]);

        let mut dispatcher: Dispatcher<1> = Dispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.dispatch(Line(0)), Err(DispatchError::Unowned(Line(0))));

        dispatcher.register(&mut only).unwrap();
        assert_eq!(dispatcher.dispatch(Line(7)), Err(DispatchError::Unowned(Line(7))));
        assert_eq!(position.read(), 0);
    }

    #[test]
    fn reports_the_failing_pin_line() {
        let position = Position::new();
        let mut faulty = encoder(
            &position,
            (5, 6),
            &[Transaction::get(State::High)],
            &[Transaction::get(State::Low).with_error(MockError::Io(ErrorKind::NotConnected))],
        );

        let mut dispatcher: Dispatcher<1> = Dispatcher::new();
        dispatcher.register(&mut faulty).unwrap();

        assert_eq!(dispatcher.dispatch(Line(5)), Err(DispatchError::Pin(Line(6))));
        assert_eq!(position.read(), 0);
    }
}
