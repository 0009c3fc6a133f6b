/*!
 # GPIO and shared EXTI lines for the STM32F3

 Every STM32F3 has 16 external interrupt (EXTI) lines for GPIOs, and all ports
 share them: `PA3`, `PB3`, `PC3`, ... all land on line 3. This crate hands out
 those lines one subscriber at a time and routes each hardware interrupt to the
 handler registered for it.

 * [`exti`] owns the line table, the subscribe / unsubscribe logic and the
   interrupt dispatcher.
 * [`gpio`] has the [`Pin`](gpio::Pin) handle and the pin configuration
   (mode, pull, speed, alternate function).
 * [`sim`] is an in-memory model of the EXTI, SYSCFG and GPIO registers, used to
   drive the crate on a host.

 # Selecting the right chip

   The register backends need the target chip as a feature.

   (Note: `x` denotes any character in [a-z])
   *   stm32f301x6 stm32f301x8
   *   stm32f318x8
   *   stm32f302x6 stm32f302x8 stm32f302xb stm32f302xc stm32f302xd stm32f302xe
   *   stm32f303x6 stm32f303x8 stm32f303xb stm32f303xc stm32f303xd stm32f303xe
   *   stm32f328x8
   *   stm32f358xc
   *   stm32f398xe
   *   stm32f373x8 stm32f373xb stm32f373xc
   *   stm32f378xc
   *   stm32f334x4 stm32f334x6 stm32f334x8

   Example: The STM32F3Discovery board has a STM32F303VCT6 chip.
   So you want to expand your call to `cargo` with `--features stm32f303xc`.

   Without a chip feature only the device independent core is built.

 # Interrupt entry points

 With the `rt` feature the crate defines the `EXTI0` ... `EXTI15_10` handlers
 itself and dispatches them against [`exti::LINES`]. Unmask the NVIC line of a
 subscribed pin with [`Line::interrupt`](exti::Line::interrupt).

 ```ignore
 use stm32f3xx_exti::{
     exti::{Edge, ExtiExt},
     gpio::{self, config::{Config, Mode, Pull}, Pin, Port},
     pac,
     prelude::*,
 };

 fn pressed(_: *mut ()) {
     // runs in interrupt context
 }

 let dp = pac::Peripherals::take().unwrap();
 let mut rcc = dp.RCC.constrain();
 let syscfg = dp.SYSCFG.constrain(&mut rcc.apb2);
 let exti = dp.EXTI.constrain(syscfg);
 let gpio = gpio::Registers::new(rcc.ahb);

 let button = Pin::new(Port::A, 0);
 button.configure(&gpio, Config::from(Mode::Input).pull(Pull::Down)).unwrap();
 exti.subscribe(button, Edge::Rising, pressed, core::ptr::null_mut()).unwrap();
 unsafe { cortex_m::peripheral::NVIC::unmask(button.line().unwrap().interrupt()) };
 ```
*/
#![cfg_attr(not(test), no_std)]

pub use embedded_hal as hal;

cfg_if::cfg_if! {
    if #[cfg(feature = "svd-f301")] {
        pub use stm32f3::stm32f301 as pac;
    } else if #[cfg(feature = "svd-f302")] {
        pub use stm32f3::stm32f302 as pac;
    } else if #[cfg(feature = "svd-f303")] {
        pub use stm32f3::stm32f303 as pac;
    } else if #[cfg(feature = "svd-f373")] {
        pub use stm32f3::stm32f373 as pac;
    } else if #[cfg(feature = "svd-f3x4")] {
        pub use stm32f3::stm32f3x4 as pac;
    }
}

// Enable use of interrupt macro
#[cfg(all(feature = "rt", feature = "device-selected"))]
pub use crate::pac::interrupt;

mod reg;

pub mod exti;
pub mod gpio;
pub mod prelude;
#[cfg(feature = "device-selected")]
pub mod rcc;
pub mod sim;
#[cfg(feature = "device-selected")]
pub mod syscfg;
