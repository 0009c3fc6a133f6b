//! Types for configuring a GPIO pin.

use super::Error;

/// Pin direction and function, the `MODER` / `OTYPER` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Digital input
    Input,
    /// Push pull output
    OutputPushPull,
    /// Open drain output
    OutputOpenDrain,
    /// Alternate function, push pull
    AlternatePushPull,
    /// Alternate function, open drain
    AlternateOpenDrain,
    /// Analog
    Analog,
}

impl Mode {
    /// Value of the two `MODER` bits of a pin.
    pub const fn moder_bits(self) -> u32 {
        match self {
            Mode::Input => 0b00,
            Mode::OutputPushPull | Mode::OutputOpenDrain => 0b01,
            Mode::AlternatePushPull | Mode::AlternateOpenDrain => 0b10,
            Mode::Analog => 0b11,
        }
    }

    /// Whether the pin drives its output stage in this mode.
    ///
    /// Only then are `OSPEEDR` and `OTYPER` of any relevance.
    pub const fn is_driven(self) -> bool {
        !matches!(self, Mode::Input | Mode::Analog)
    }

    /// Whether the pin is handed to a peripheral.
    pub const fn is_alternate(self) -> bool {
        matches!(self, Mode::AlternatePushPull | Mode::AlternateOpenDrain)
    }

    /// Whether the output stage is open drain.
    pub const fn is_open_drain(self) -> bool {
        matches!(self, Mode::OutputOpenDrain | Mode::AlternateOpenDrain)
    }
}

/// Internal pull resistor, the `PUPDR` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating
    None = 0b00,
    /// Pulled up
    Up = 0b01,
    /// Pulled down
    Down = 0b10,
}

/// Output slew rate, the `OSPEEDR` field.
///
/// The STM32F3 has three settings, the encoding `0b10` is not used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// Low speed
    Low = 0b00,
    /// Medium speed
    Medium = 0b01,
    /// High speed
    High = 0b11,
}

impl TryFrom<u8> for Speed {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            0b00 => Ok(Speed::Low),
            0b01 => Ok(Speed::Medium),
            0b11 => Ok(Speed::High),
            _ => Err(Error::InvalidSpeed),
        }
    }
}

/// Highest alternate function index of the `AFRL` / `AFRH` registers.
pub const MAX_ALTERNATE: u8 = 15;

/// Configuration struct for [`Pin::configure`](super::Pin::configure).
///
/// Create a configuration by using `default` in combination with the
/// builder methods. The following snippet configures `USART1_TX` on `PA9`:
/// ```
/// # use stm32f3xx_exti::gpio::config::*;
/// let config = Config::default()
///     .mode(Mode::AlternatePushPull)
///     .speed(Speed::High)
///     .alternate(7);
///
/// assert!(config.pull == Pull::None);
/// assert!(config.alternate == 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct Config {
    /// Direction and function
    pub mode: Mode,
    /// Internal pull resistor
    pub pull: Pull,
    /// Output speed, ignored for inputs
    pub speed: Speed,
    /// Alternate function index, ignored unless `mode` is an alternate mode
    pub alternate: u8,
}

impl Config {
    /// Sets the mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the pull resistor.
    pub fn pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    /// Sets the output speed.
    pub fn speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the alternate function index.
    pub fn alternate(mut self, alternate: u8) -> Self {
        self.alternate = alternate;
        self
    }

    /// Checks everything that can be checked without touching the hardware.
    pub fn validate(&self) -> Result<(), Error> {
        if self.mode.is_alternate() && self.alternate > MAX_ALTERNATE {
            return Err(Error::InvalidAlternateFunction);
        }
        Ok(())
    }
}

impl Default for Config {
    /// Floating input, low speed.
    fn default() -> Config {
        Config {
            mode: Mode::Input,
            pull: Pull::None,
            speed: Speed::Low,
            alternate: 0,
        }
    }
}

impl From<Mode> for Config {
    fn from(mode: Mode) -> Config {
        Config {
            mode,
            ..Default::default()
        }
    }
}
