use core::cell::Cell;
use critical_section::Mutex;

/// Position counter shared between interrupt context and the main loop.
///
/// Every access runs inside a critical section, so a read from the main loop
/// never observes a half-written value.
pub struct Position {
    value: Mutex<Cell<i32>>,
}

impl Position {
    pub const fn new() -> Self {
        Self {
            value: Mutex::new(Cell::new(0)),
        }
    }

    pub fn read(&self) -> i32 {
        critical_section::with(|cs| self.value.borrow(cs).get())
    }

    pub fn write(&self, position: i32) {
        critical_section::with(|cs| self.value.borrow(cs).set(position));
    }

    pub fn increment(&self) {
        self.step(1);
    }

    pub fn decrement(&self) {
        self.step(-1);
    }

    fn step(&self, delta: i32) {
        critical_section::with(|cs| {
            let cell = self.value.borrow(cs);
            cell.set(cell.get().wrapping_add(delta));
        });
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
