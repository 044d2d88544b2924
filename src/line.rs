use core::fmt;

/// External interrupt line a pin is routed to.
///
/// On STM32 parts this is the EXTI line, which equals the pin number within
/// its port (PB0 -> line 0, PA3 -> line 3).
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Line(pub u8);

impl Line {
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXTI{}", self.0)
    }
}
