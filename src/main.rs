#![no_std]
#![no_main]

use panic_semihosting as _;

use core::cell::RefCell;
use cortex_m::{
    interrupt::{free as interrupt_free, Mutex},
    singleton,
};
use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;
use embedded_hal::digital::v2::InputPin;
use encoder::{
    DispatchError, Dispatcher, EdgeHandler, Encoder, EncoderConfig, Line, PinFault, Position,
    Rotation,
};
use stm32f4xx_hal::{
    gpio::{
        gpioa::{PA2, PA3},
        gpiob::{PB0, PB1},
        Edge, ExtiPin, Input, PullUp,
    },
    pac::{interrupt, Interrupt, Peripherals, NVIC},
    prelude::*,
};

const JOG_LINES: (Line, Line) = (Line(0), Line(1));
const VOLUME_LINES: (Line, Line) = (Line(2), Line(3));
const VOLUME_MAX: i32 = 100;

static JOG: Position = Position::new();
static VOLUME: Position = Position::new();
static DISPATCHER: Mutex<RefCell<Option<Dispatcher<'static, 2>>>> = Mutex::new(RefCell::new(None));

/// Board-side wrapper that acknowledges the EXTI line after each update.
struct Knob<A, B>
where
    A: InputPin + ExtiPin + Send,
    B: InputPin + ExtiPin + Send,
{
    encoder: Encoder<'static, A, B>,
}

impl<A, B> EdgeHandler for Knob<A, B>
where
    A: InputPin + ExtiPin + Send,
    B: InputPin + ExtiPin + Send,
{
    fn lines(&self) -> (Line, Line) {
        self.encoder.lines()
    }

    fn on_edge(&mut self, line: Line) -> Result<Rotation, PinFault> {
        let rotation = self.encoder.on_edge(line);

        let (line_a, _) = self.encoder.lines();
        let (pin_a, pin_b) = self.encoder.pins_mut();
        if line == line_a {
            pin_a.clear_interrupt_pending_bit();
        } else {
            pin_b.clear_interrupt_pending_bit();
        }

        rotation
    }
}

#[entry]
fn main() -> ! {
    let mut peripherals = Peripherals::take().unwrap();

    let rcc = peripherals.RCC.constrain();
    let _clocks = rcc.cfgr.freeze();
    let mut syscfg = peripherals.SYSCFG.constrain();
    let gpioa = peripherals.GPIOA.split();
    let gpiob = peripherals.GPIOB.split();

    let mut jog_a = gpiob.pb0.into_pull_up_input();
    let mut jog_b = gpiob.pb1.into_pull_up_input();
    let mut volume_a = gpioa.pa2.into_pull_up_input();
    let mut volume_b = gpioa.pa3.into_pull_up_input();

    jog_a.make_interrupt_source(&mut syscfg);
    jog_a.trigger_on_edge(&mut peripherals.EXTI, Edge::RISING_FALLING);
    jog_a.enable_interrupt(&mut peripherals.EXTI);
    jog_b.make_interrupt_source(&mut syscfg);
    jog_b.trigger_on_edge(&mut peripherals.EXTI, Edge::RISING_FALLING);
    jog_b.enable_interrupt(&mut peripherals.EXTI);
    volume_a.make_interrupt_source(&mut syscfg);
    volume_a.trigger_on_edge(&mut peripherals.EXTI, Edge::RISING_FALLING);
    volume_a.enable_interrupt(&mut peripherals.EXTI);
    volume_b.make_interrupt_source(&mut syscfg);
    volume_b.trigger_on_edge(&mut peripherals.EXTI, Edge::RISING_FALLING);
    volume_b.enable_interrupt(&mut peripherals.EXTI);

    let jog = Encoder::new(
        EncoderConfig {
            pin_a: jog_a,
            pin_b: jog_b,
            line_a: JOG_LINES.0,
            line_b: JOG_LINES.1,
        },
        &JOG,
    )
    .ok()
    .unwrap();
    let volume = Encoder::new(
        EncoderConfig {
            pin_a: volume_a,
            pin_b: volume_b,
            line_a: VOLUME_LINES.0,
            line_b: VOLUME_LINES.1,
        },
        &VOLUME,
    )
    .ok()
    .unwrap();

    let jog: &'static mut Knob<PB0<Input<PullUp>>, PB1<Input<PullUp>>> =
        singleton!(: Knob<PB0<Input<PullUp>>, PB1<Input<PullUp>>> = Knob { encoder: jog }).unwrap();
    let volume: &'static mut Knob<PA2<Input<PullUp>>, PA3<Input<PullUp>>> =
        singleton!(: Knob<PA2<Input<PullUp>>, PA3<Input<PullUp>>> = Knob { encoder: volume })
            .unwrap();

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(jog).ok().unwrap();
    dispatcher.register(volume).ok().unwrap();

    interrupt_free(|cs| {
        DISPATCHER.borrow(cs).replace(Some(dispatcher));
    });

    unsafe {
        NVIC::unmask(Interrupt::EXTI0);
        NVIC::unmask(Interrupt::EXTI1);
        NVIC::unmask(Interrupt::EXTI2);
        NVIC::unmask(Interrupt::EXTI3);
    };

    let mut last = (JOG.read(), VOLUME.read());
    loop {
        let volume = VOLUME.read();
        if volume < 0 {
            VOLUME.write(0);
        } else if volume > VOLUME_MAX {
            VOLUME.write(VOLUME_MAX);
        }

        let current = (JOG.read(), VOLUME.read());
        if current != last {
            hprintln!("jog: {} volume: {}", current.0, current.1).ok();
            last = current;
        }
    }
}

fn handle_line(line: Line) {
    interrupt_free(|cs| {
        let mut option = DISPATCHER.borrow(cs).borrow_mut();
        if let Some(dispatcher) = option.as_mut() {
            match dispatcher.dispatch(line) {
                Ok(_) => {}
                Err(DispatchError::Pin(line)) => {
                    hprintln!("Pin read failed on {}", line).ok();
                }
                Err(err) => {
                    hprintln!("Unhandled edge: {:?}", err).ok();
                }
            }
        }
    });
}

#[interrupt]
fn EXTI0() {
    handle_line(Line(0));
}

#[interrupt]
fn EXTI1() {
    handle_line(Line(1));
}

#[interrupt]
fn EXTI2() {
    handle_line(Line(2));
}

#[interrupt]
fn EXTI3() {
    handle_line(Line(3));
}
