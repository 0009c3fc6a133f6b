//! General Purpose Input / Output
//!
//! Pins are addressed at runtime by a [`Pin`] handle, a port letter plus a bit
//! position. The handle is only an identifier, the registers behind it are
//! reached through a [`GpioRegisters`] implementation: the device backend
//! [`Registers`] when a chip feature is selected, or the in-memory
//! [`Simulator`](crate::sim::Simulator).
//!
//! ```
//! use stm32f3xx_exti::gpio::{config::{Config, Mode, Pull}, Pin, Port};
//! use stm32f3xx_exti::sim::Simulator;
//!
//! let regs = Simulator::new();
//! let button = Pin::new(Port::A, 0);
//!
//! button.configure(&regs, Config::from(Mode::Input).pull(Pull::Down))?;
//! # Ok::<(), stm32f3xx_exti::gpio::Error>(())
//! ```
//!
//! To use a configured pin with the traits of `embedded_hal`, wrap it into an [`Io`].

use crate::exti::Line;
use crate::hal::digital::v2::{toggleable, InputPin, OutputPin, StatefulOutputPin};

pub mod config;
#[cfg(feature = "device-selected")]
mod device;

use config::Config;
#[cfg(feature = "device-selected")]
pub use device::Registers;

/// Number of pins per port.
pub const PINS_PER_PORT: u8 = 16;

/// Error type for GPIO operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The pin handle has no port or its index is not in `0..=15`.
    InvalidPin,
    /// Alternate function index above 15.
    InvalidAlternateFunction,
    /// Raw speed code not supported by the output driver.
    InvalidSpeed,
    /// The port does not exist on this device, its clock can not be enabled.
    ClockUnavailable,
}

/// GPIO port
///
/// The discriminant is the source code of the port in the `SYSCFG_EXTICRx`
/// registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Port {
    /// GPIOA
    A = 0,
    /// GPIOB
    B = 1,
    /// GPIOC
    C = 2,
    /// GPIOD
    D = 3,
    /// GPIOE
    E = 4,
    /// GPIOF
    F = 5,
    /// GPIOG
    G = 6,
    /// GPIOH
    H = 7,
}

impl Port {
    /// All ports in `SYSCFG` source code order.
    pub const ALL: [Port; 8] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
    ];

    /// Port for a `SYSCFG` source code.
    pub const fn from_index(index: u8) -> Option<Port> {
        if (index as usize) < Port::ALL.len() {
            Some(Port::ALL[index as usize])
        } else {
            None
        }
    }

    /// `SYSCFG` source code of this port.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Identifier of a single physical pin
///
/// A `Pin` is a plain value, it does not own the pin. Constructing a handle
/// with an index above 15 is possible, every operation on it then fails with
/// an invalid pin error, the same as for [`Pin::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: Option<Port>,
    index: u8,
}

impl Pin {
    /// The unbound handle.
    pub const NONE: Pin = Pin {
        port: None,
        index: u8::MAX,
    };

    /// Handle of pin `index` of `port`, e.g. `Pin::new(Port::C, 13)` for `PC13`.
    pub const fn new(port: Port, index: u8) -> Pin {
        Pin {
            port: Some(port),
            index,
        }
    }

    /// Port of the pin, `None` for [`Pin::NONE`].
    pub const fn port(&self) -> Option<Port> {
        self.port
    }

    /// Bit position of the pin inside its port.
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// EXTI line the pin is connected to.
    ///
    /// All ports share the same 16 lines, the line number is the bit position.
    pub fn line(&self) -> Option<Line> {
        self.port?;
        Line::new(self.index)
    }

    /// Port and bit position of a valid handle.
    pub fn resolve(&self) -> Result<(Port, u8), Error> {
        match self.port {
            Some(port) if self.index < PINS_PER_PORT => Ok((port, self.index)),
            _ => Err(Error::InvalidPin),
        }
    }

    /// Programs mode, pull, speed and alternate function of the pin.
    ///
    /// Everything that can be rejected is checked before the first register
    /// write, so a failing call leaves the port untouched. The port clock is
    /// enabled on the way.
    pub fn configure<R>(&self, regs: &R, config: Config) -> Result<(), Error>
    where
        R: GpioRegisters + ?Sized,
    {
        let (port, index) = self.resolve()?;
        config.validate()?;
        regs.enable_clock(port)?;

        if config.mode.is_alternate() {
            let (afr, field) = if index < 8 {
                (PortRegister::Afrl, index)
            } else {
                (PortRegister::Afrh, index - 8)
            };
            regs.modify(port, afr, 4, field, u32::from(config.alternate));
        }
        regs.modify(port, PortRegister::Moder, 2, index, config.mode.moder_bits());
        if config.mode.is_driven() {
            regs.modify(port, PortRegister::Ospeedr, 2, index, config.speed as u32);
            regs.modify(
                port,
                PortRegister::Otyper,
                1,
                index,
                u32::from(config.mode.is_open_drain()),
            );
        }
        regs.modify(port, PortRegister::Pupdr, 2, index, config.pull as u32);

        #[cfg(feature = "defmt")]
        defmt::trace!("P{}{} configured: {}", port, index, config);
        Ok(())
    }

    /// Couples the handle with register access for digital I/O.
    pub fn into_io<R: GpioRegisters>(self, regs: R) -> Io<R> {
        Io::new(self, regs)
    }
}

/// Read-write configuration registers of a port, one field per pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortRegister {
    /// `GPIOx_MODER`, 2 bits per pin
    Moder,
    /// `GPIOx_OTYPER`, 1 bit per pin
    Otyper,
    /// `GPIOx_OSPEEDR`, 2 bits per pin
    Ospeedr,
    /// `GPIOx_PUPDR`, 2 bits per pin
    Pupdr,
    /// `GPIOx_AFRL`, 4 bits for pins 0 to 7
    Afrl,
    /// `GPIOx_AFRH`, 4 bits for pins 8 to 15
    Afrh,
}

/// Register access of the GPIO ports and their clocks
///
/// Implementations must make [`modify`](GpioRegisters::modify) a read-modify-write
/// that can not lose a concurrent update of another field of the same register.
pub trait GpioRegisters {
    /// Ensures the clock of `port` runs. Idempotent.
    fn enable_clock(&self, port: Port) -> Result<(), Error>;

    /// Replaces field number `index` of width `bitwidth` in register `reg` of `port`.
    fn modify(&self, port: Port, reg: PortRegister, bitwidth: u8, index: u8, value: u32);

    /// `GPIOx_IDR`
    fn input(&self, port: Port) -> u32;

    /// `GPIOx_ODR`
    fn output(&self, port: Port) -> u32;

    /// Writes `GPIOx_BSRR`: the low half sets pins, the high half resets them.
    fn set_reset(&self, port: Port, bits: u32);
}

impl<T: GpioRegisters + ?Sized> GpioRegisters for &T {
    fn enable_clock(&self, port: Port) -> Result<(), Error> {
        (**self).enable_clock(port)
    }

    fn modify(&self, port: Port, reg: PortRegister, bitwidth: u8, index: u8, value: u32) {
        (**self).modify(port, reg, bitwidth, index, value)
    }

    fn input(&self, port: Port) -> u32 {
        (**self).input(port)
    }

    fn output(&self, port: Port) -> u32 {
        (**self).output(port)
    }

    fn set_reset(&self, port: Port, bits: u32) {
        (**self).set_reset(port, bits)
    }
}

/// A pin used for digital input and output
///
/// The mode of the pin is not tracked, configure it with [`Pin::configure`]
/// first.
#[derive(Debug, Clone, Copy)]
pub struct Io<R> {
    pin: Pin,
    regs: R,
}

impl<R: GpioRegisters> Io<R> {
    /// Couples `pin` with register access.
    pub fn new(pin: Pin, regs: R) -> Self {
        Io { pin, regs }
    }

    /// The pin handle.
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Releases the parts.
    pub fn free(self) -> (Pin, R) {
        (self.pin, self.regs)
    }

    fn port_mask(&self) -> Result<(Port, u32), Error> {
        let (port, index) = self.pin.resolve()?;
        Ok((port, 1 << index))
    }
}

impl<R: GpioRegisters> OutputPin for Io<R> {
    type Error = Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let (port, mask) = self.port_mask()?;
        self.regs.set_reset(port, mask);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        let (port, mask) = self.port_mask()?;
        self.regs.set_reset(port, mask << 16);
        Ok(())
    }
}

impl<R: GpioRegisters> StatefulOutputPin for Io<R> {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        let (port, mask) = self.port_mask()?;
        Ok(self.regs.output(port) & mask != 0)
    }

    fn is_set_low(&self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }
}

impl<R: GpioRegisters> toggleable::Default for Io<R> {}

impl<R: GpioRegisters> InputPin for Io<R> {
    type Error = Error;

    fn is_high(&self) -> Result<bool, Self::Error> {
        let (port, mask) = self.port_mask()?;
        Ok(self.regs.input(port) & mask != 0)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_the_bit_position() {
        assert_eq!(Pin::new(Port::B, 7).line().map(Line::raw), Some(7));
        assert_eq!(Pin::new(Port::F, 15).line().map(Line::raw), Some(15));
        assert_eq!(Pin::new(Port::A, 16).line(), None);
        assert_eq!(Pin::NONE.line(), None);
    }

    #[test]
    fn resolve_rejects_unbound_handles() {
        assert_eq!(Pin::new(Port::H, 1).resolve(), Ok((Port::H, 1)));
        assert_eq!(Pin::NONE.resolve(), Err(Error::InvalidPin));
        assert_eq!(Pin::new(Port::C, 42).resolve(), Err(Error::InvalidPin));
    }

    #[test]
    fn port_source_codes() {
        for (code, port) in Port::ALL.iter().enumerate() {
            assert_eq!(port.index() as usize, code);
            assert_eq!(Port::from_index(code as u8), Some(*port));
        }
        assert_eq!(Port::from_index(8), None);
    }
}
