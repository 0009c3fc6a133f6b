#![no_std]
#![no_main]

use testsuite as _;

use stm32f3xx_exti as hal;

use hal::gpio::{Io, Registers};

struct State {
    input_ground: Io<Registers>,
    input_vdd: Io<Registers>,
}

#[defmt_test::tests]
mod tests {
    use defmt::{assert, unwrap};
    use stm32f3xx_exti::gpio::{config::Mode, Registers};
    use stm32f3xx_exti::{pac, prelude::*};
    use testsuite::{GROUND_PIN, VDD_PIN};

    // Test the defaults with no configuration
    #[init]
    fn init() -> super::State {
        let dp = unwrap!(pac::Peripherals::take());

        let rcc = dp.RCC.constrain();
        let gpio = Registers::new(rcc.ahb);

        unwrap!(GROUND_PIN.configure(&gpio, Mode::Input.into()));
        unwrap!(VDD_PIN.configure(&gpio, Mode::Input.into()));

        super::State {
            input_ground: GROUND_PIN.into_io(gpio),
            input_vdd: VDD_PIN.into_io(gpio),
        }
    }

    #[test]
    fn ground_is_low(state: &mut super::State) {
        assert!(unwrap!(state.input_ground.is_low()));
    }

    #[test]
    fn vdd_is_high(state: &mut super::State) {
        assert!(unwrap!(state.input_vdd.is_high()));
    }
}
