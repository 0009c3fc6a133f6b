#![no_std]
#![no_main]

use testsuite as _;

use stm32f3xx_exti as hal;

use hal::gpio::{Io, Pin, Registers};

struct State {
    gpio: Registers,
    observer: Io<Registers>,
    puller: Pin,
}

#[defmt_test::tests]
mod tests {
    use defmt::{assert, unwrap};
    use stm32f3xx_exti::gpio::config::{Config, Mode, Pull};
    use stm32f3xx_exti::gpio::Registers;
    use stm32f3xx_exti::{pac, prelude::*};
    use testsuite::{GENERIC_PAIR, SETTLE};

    #[init]
    fn init() -> super::State {
        let dp = unwrap!(pac::Peripherals::take());

        let rcc = dp.RCC.constrain();
        let gpio = Registers::new(rcc.ahb);

        let observer = GENERIC_PAIR.0;
        let puller = GENERIC_PAIR.1;
        unwrap!(observer.configure(&gpio, Config::from(Mode::Input).pull(Pull::None)));
        unwrap!(puller.configure(&gpio, Mode::Input.into()));

        super::State {
            gpio,
            observer: observer.into_io(gpio),
            puller,
        }
    }

    #[test]
    fn pulldown_is_low(state: &mut super::State) {
        let config = Config::from(Mode::Input).pull(Pull::Down);
        unwrap!(state.puller.configure(&state.gpio, config));
        cortex_m::asm::delay(SETTLE);
        assert!(unwrap!(state.puller.into_io(state.gpio).is_low()));
        assert!(unwrap!(state.observer.is_low()));
    }

    #[test]
    fn pullup_is_high(state: &mut super::State) {
        let config = Config::from(Mode::Input).pull(Pull::Up);
        unwrap!(state.puller.configure(&state.gpio, config));
        cortex_m::asm::delay(SETTLE);
        assert!(unwrap!(state.puller.into_io(state.gpio).is_high()));
        assert!(unwrap!(state.observer.is_high()));
    }
}
