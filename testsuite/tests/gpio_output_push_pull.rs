#![no_std]
#![no_main]

use testsuite as _;

use stm32f3xx_exti as hal;

use hal::gpio::{Io, Registers};

struct State {
    input_pin: Io<Registers>,
    output_pin: Io<Registers>,
}

#[defmt_test::tests]
mod tests {
    use defmt::{assert, unwrap};
    use stm32f3xx_exti::gpio::{config::Mode, Registers};
    use stm32f3xx_exti::{pac, prelude::*};
    use testsuite::{GENERIC_PAIR, SETTLE};

    #[init]
    fn init() -> super::State {
        let dp = unwrap!(pac::Peripherals::take());

        let rcc = dp.RCC.constrain();
        let gpio = Registers::new(rcc.ahb);

        let pair = GENERIC_PAIR;
        unwrap!(pair.0.configure(&gpio, Mode::Input.into()));
        unwrap!(pair.1.configure(&gpio, Mode::OutputPushPull.into()));

        super::State {
            input_pin: pair.0.into_io(gpio),
            output_pin: pair.1.into_io(gpio),
        }
    }

    #[test]
    fn set_low_is_low(state: &mut super::State) {
        unwrap!(state.output_pin.set_low());
        cortex_m::asm::delay(SETTLE);
        assert!(unwrap!(state.output_pin.is_set_low()));
        assert!(unwrap!(state.input_pin.is_low()));
    }

    #[test]
    fn set_high_is_high(state: &mut super::State) {
        unwrap!(state.output_pin.set_high());
        cortex_m::asm::delay(SETTLE);
        assert!(unwrap!(state.output_pin.is_set_high()));
        assert!(unwrap!(state.input_pin.is_high()));
    }

    #[test]
    fn toggle_flips_the_input(state: &mut super::State) {
        unwrap!(state.output_pin.set_low());
        unwrap!(state.output_pin.toggle());
        cortex_m::asm::delay(SETTLE);
        assert!(unwrap!(state.input_pin.is_high()));
    }
}
