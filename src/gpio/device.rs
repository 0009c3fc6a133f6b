//! GPIO port registers of the device

use super::{Error, GpioRegisters, Port, PortRegister};
use crate::rcc::AHB;
use crate::reg::atomic_modify_at;

/// Runs `$body` with `$gpio` bound to the register block of `$port`.
///
/// Evaluates to `$missing` for ports the device does not have.
macro_rules! with_port {
    ($port:expr, |$gpio:ident| $body:expr, $missing:expr) => {
        match $port {
            Port::A => {
                let $gpio = unsafe { &*crate::pac::GPIOA::ptr() };
                $body
            }
            Port::B => {
                let $gpio = unsafe { &*crate::pac::GPIOB::ptr() };
                $body
            }
            Port::C => {
                let $gpio = unsafe { &*crate::pac::GPIOC::ptr() };
                $body
            }
            Port::D => {
                let $gpio = unsafe { &*crate::pac::GPIOD::ptr() };
                $body
            }
            #[cfg(any(feature = "gpio-f303", feature = "gpio-f303e", feature = "gpio-f373"))]
            Port::E => {
                let $gpio = unsafe { &*crate::pac::GPIOE::ptr() };
                $body
            }
            Port::F => {
                let $gpio = unsafe { &*crate::pac::GPIOF::ptr() };
                $body
            }
            #[cfg(feature = "gpio-f303e")]
            Port::G => {
                let $gpio = unsafe { &*crate::pac::GPIOG::ptr() };
                $body
            }
            #[cfg(feature = "gpio-f303e")]
            Port::H => {
                let $gpio = unsafe { &*crate::pac::GPIOH::ptr() };
                $body
            }
            #[allow(unreachable_patterns)]
            _ => $missing,
        }
    };
}

/// GPIO register access of every port of the device
///
/// Configuration writes are atomic per field and output goes through `BSRR`,
/// so copies may be used for different pins from any context.
#[derive(Debug, Clone, Copy)]
pub struct Registers {
    _0: (),
}

impl Registers {
    /// Takes over the AHB clock gates, which include the ones of the ports.
    pub fn new(_ahb: AHB) -> Self {
        Registers { _0: () }
    }
}

fn raw<REG>(reg: &REG) -> *mut u32 {
    reg as *const REG as *mut u32
}

impl GpioRegisters for Registers {
    fn enable_clock(&self, port: Port) -> Result<(), Error> {
        crate::rcc::enable_port(port)
    }

    fn modify(&self, port: Port, reg: PortRegister, bitwidth: u8, index: u8, value: u32) {
        with_port!(
            port,
            |gpio| {
                let reg = match reg {
                    PortRegister::Moder => raw(&gpio.moder),
                    PortRegister::Otyper => raw(&gpio.otyper),
                    PortRegister::Ospeedr => raw(&gpio.ospeedr),
                    PortRegister::Pupdr => raw(&gpio.pupdr),
                    PortRegister::Afrl => raw(&gpio.afrl),
                    PortRegister::Afrh => raw(&gpio.afrh),
                };
                // SAFETY: PAC register, the field is modified atomically
                unsafe { atomic_modify_at(reg, bitwidth, index, value) }
            },
            {
                #[cfg(feature = "defmt")]
                defmt::warn!("GPIO{} not present", port);
            }
        )
    }

    fn input(&self, port: Port) -> u32 {
        with_port!(port, |gpio| gpio.idr.read().bits(), 0)
    }

    fn output(&self, port: Port) -> u32 {
        with_port!(port, |gpio| gpio.odr.read().bits(), 0)
    }

    fn set_reset(&self, port: Port, bits: u32) {
        // NOTE(unsafe, write) atomic write to a stateless register
        with_port!(port, |gpio| unsafe { gpio.bsrr.write(|w| w.bits(bits)) }, ())
    }
}
