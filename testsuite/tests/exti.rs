#![no_std]
#![no_main]

use core::sync::atomic::{AtomicUsize, Ordering};

use testsuite as _;

use stm32f3xx_exti as hal;

use hal::exti::{Exti, Registers};
use hal::gpio::{self, Io};

static EDGES: AtomicUsize = AtomicUsize::new(0);

fn count(context: *mut ()) {
    let counter = unsafe { &*(context as *const AtomicUsize) };
    counter.fetch_add(1, Ordering::SeqCst);
}

fn edges() -> usize {
    EDGES.load(Ordering::SeqCst)
}

struct State {
    exti: Exti<'static, Registers>,
    output: Io<gpio::Registers>,
}

#[defmt_test::tests]
mod tests {
    use super::*;
    use cortex_m::peripheral::NVIC;
    use defmt::{assert, assert_eq, unwrap};
    use hal::exti::{Edge, Error, ExtiExt, LINES};
    use hal::gpio::config::{Config, Mode, Pull};
    use hal::gpio::{Pin, Port};
    use hal::{pac, prelude::*};
    use testsuite::{GENERIC_PAIR, SETTLE};

    fn context() -> *mut () {
        &EDGES as *const AtomicUsize as *mut ()
    }

    #[init]
    fn init() -> super::State {
        let dp = unwrap!(pac::Peripherals::take());

        let mut rcc = dp.RCC.constrain();
        let syscfg = dp.SYSCFG.constrain(&mut rcc.apb2);
        let exti = dp.EXTI.constrain(syscfg);
        let gpio = gpio::Registers::new(rcc.ahb);

        let (input, output) = (GENERIC_PAIR.0, GENERIC_PAIR.1);
        unwrap!(input.configure(&gpio, Config::from(Mode::Input).pull(Pull::Down)));
        unwrap!(output.configure(&gpio, Mode::OutputPushPull.into()));
        let mut output = output.into_io(gpio);
        unwrap!(output.set_low());

        // SAFETY: the handler of the line only touches atomics
        unsafe { NVIC::unmask(unwrap!(input.line()).interrupt()) };

        super::State { exti, output }
    }

    #[test]
    fn rising_edge_is_delivered(state: &mut super::State) {
        let input = GENERIC_PAIR.0;
        unwrap!(state.exti.subscribe(input, Edge::Rising, count, context()));
        let before = edges();

        unwrap!(state.output.set_high());
        cortex_m::asm::delay(SETTLE);
        assert_eq!(edges(), before + 1);

        unwrap!(state.output.set_low());
        cortex_m::asm::delay(SETTLE);
        assert_eq!(edges(), before + 1);

        state.exti.unsubscribe(input);
    }

    #[test]
    fn both_edges_are_delivered(state: &mut super::State) {
        let input = GENERIC_PAIR.0;
        unwrap!(state.exti.subscribe(input, Edge::RisingFalling, count, context()));
        let before = edges();

        for _ in 0..3 {
            unwrap!(state.output.toggle());
            cortex_m::asm::delay(SETTLE);
        }
        assert_eq!(edges(), before + 3);

        unwrap!(state.output.set_low());
        state.exti.unsubscribe(input);
    }

    #[test]
    fn line_is_exclusive_across_ports(state: &mut super::State) {
        let input = GENERIC_PAIR.0;
        let alias = Pin::new(Port::A, input.index());
        let line = unwrap!(input.line());

        unwrap!(state.exti.subscribe(input, Edge::Rising, count, context()));
        assert!(state.exti.subscribe(alias, Edge::Rising, count, context()) == Err(Error::Busy));

        state.exti.unsubscribe(alias);
        assert!(LINES.owner(line) == Some(Port::C));

        state.exti.unsubscribe(input);
        assert!(LINES.owner(line).is_none());

        unwrap!(state.exti.subscribe(alias, Edge::Falling, count, context()));
        state.exti.unsubscribe(alias);
    }

    #[test]
    fn unsubscribed_line_stays_quiet(state: &mut super::State) {
        let input = GENERIC_PAIR.0;
        unwrap!(state.exti.subscribe(input, Edge::RisingFalling, count, context()));
        state.exti.unsubscribe(input);
        let before = edges();

        for _ in 0..10 {
            unwrap!(state.output.toggle());
            cortex_m::asm::delay(SETTLE);
        }
        assert_eq!(edges(), before);
        assert!(!LINES.is_bound(unwrap!(input.line())));
    }
}
