//! Reset and Clock Control
//!
//! Only the clock gates this crate needs: the GPIO ports on the AHB and the
//! system configuration controller on the APB2.

use crate::gpio::{Error, Port};
use crate::pac::RCC;
use crate::reg::atomic_modify_at;

/// Extension trait that constrains the `RCC` peripheral
pub trait RccExt {
    /// Constrains the `RCC` peripheral so it plays nicely with the other abstractions
    fn constrain(self) -> Rcc;
}

impl RccExt for RCC {
    fn constrain(self) -> Rcc {
        Rcc {
            ahb: AHB { _0: () },
            apb2: APB2 { _0: () },
        }
    }
}

/// Constrained RCC peripheral
pub struct Rcc {
    /// AMBA High-performance Bus (AHB) registers
    pub ahb: AHB,
    /// Advanced Peripheral Bus 2 (APB2) registers
    pub apb2: APB2,
}

/// AMBA High-performance Bus (AHB) registers
pub struct AHB {
    _0: (),
}

impl AHB {
    /// Enables the clock of a GPIO port.
    pub fn enable_port(&mut self, port: Port) -> Result<(), Error> {
        enable_port(port)
    }
}

/// Advanced Peripheral Bus 2 (APB2) registers
pub struct APB2 {
    _0: (),
}

impl APB2 {
    /// Enables the clock of the system configuration controller.
    pub fn enable_syscfg(&mut self) {
        enable_syscfg()
    }
}

/// `IOPxEN` bit of `RCC_AHBENR`, `None` if the device has no such port.
const fn iopen(port: Port) -> Option<u8> {
    match port {
        Port::A => Some(17),
        Port::B => Some(18),
        Port::C => Some(19),
        Port::D => Some(20),
        #[cfg(any(feature = "gpio-f303", feature = "gpio-f303e", feature = "gpio-f373"))]
        Port::E => Some(21),
        Port::F => Some(22),
        #[cfg(feature = "gpio-f303e")]
        Port::G => Some(23),
        #[cfg(feature = "gpio-f303e")]
        Port::H => Some(16),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Sets the `IOPxEN` bit of `port`. Idempotent.
pub(crate) fn enable_port(port: Port) -> Result<(), Error> {
    let bit = iopen(port).ok_or(Error::ClockUnavailable)?;
    // SAFETY: the pointer comes from the PAC, the single bit is modified
    // atomically so other enable bits are preserved.
    unsafe {
        let ahbenr = core::ptr::addr_of!((*RCC::ptr()).ahbenr) as *mut u32;
        atomic_modify_at(ahbenr, 1, bit, 1);
    }
    Ok(())
}

/// Sets `SYSCFGEN` in `RCC_APB2ENR`. Idempotent.
pub(crate) fn enable_syscfg() {
    const SYSCFGEN: u8 = 0;
    // SAFETY: see `enable_port`
    unsafe {
        let apb2enr = core::ptr::addr_of!((*RCC::ptr()).apb2enr) as *mut u32;
        atomic_modify_at(apb2enr, 1, SYSCFGEN, 1);
    }
}
