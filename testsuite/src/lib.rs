/*!
# Testsuite

This testsuite module defines the test setup via the pin setup.

Because of the ease of use, the tests are written for the STM32F3Discovery board.

To easier run any test on other hardware, only the pin constants below have to
be changed. Each pair is two GPIOs wired to each other, so that one pin can
confirm the correct behavior of the other pin and of the EXTI line it drives.
*/
#![no_std]
#![cfg_attr(test, no_main)]

use defmt_rtt as _;
use panic_probe as _;

use stm32f3xx_exti::gpio::{Pin, Port};

/// Pin connected to Vdd, which should be 3.3 Volts
pub const VDD_PIN: Pin = Pin::new(Port::C, 2);
/// Pin connected to Ground / GND
pub const GROUND_PIN: Pin = Pin::new(Port::C, 3);

/// Pin Pair directly connected to each other.
///
/// Used for basic GPIO and EXTI tests
pub struct GenericPair(pub Pin, pub Pin);

/// The wired pair `PC0` / `PC1`.
pub const GENERIC_PAIR: GenericPair = GenericPair(Pin::new(Port::C, 0), Pin::new(Port::C, 1));

/// Short settle time after changing a pin, in core cycles.
pub const SETTLE: u32 = 10;

#[export_name = "main"]
unsafe extern "C" fn __dummy_entry() -> ! {
    defmt_test::export::exit()
}
