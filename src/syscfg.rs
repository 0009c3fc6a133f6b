//! # System configuration controller

use core::fmt;
use core::ops::Deref;

use crate::exti::Line;
use crate::gpio::Port;
use crate::{pac::SYSCFG, rcc::APB2, reg::atomic_modify_at};

/// Extension trait that constrains the `SYSCFG` peripheral
pub trait SysCfgExt {
    /// Constrains the `SYSCFG` peripheral so it plays nicely with the other abstractions
    fn constrain(self, apb2: &mut APB2) -> SysCfg;
}

impl SysCfgExt for SYSCFG {
    fn constrain(self, apb2: &mut APB2) -> SysCfg {
        apb2.enable_syscfg();

        SysCfg(self)
    }
}

/// Constrained SYSCFG peripheral
///
/// An instance of this struct is acquired by calling the
/// [`constrain`](SysCfgExt::constrain) function on the
/// [`SYSCFG`](crate::pac::SYSCFG) struct.
///
/// ```ignore
/// let dp = pac::Peripherals::take().unwrap();
/// let mut rcc = dp.RCC.constrain();
/// let syscfg = dp.SYSCFG.constrain(&mut rcc.apb2);
/// ```
pub struct SysCfg(SYSCFG);

#[cfg(feature = "defmt")]
impl defmt::Format for SysCfg {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SysCfg(SYSCFG)");
    }
}

impl fmt::Debug for SysCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysCfg").finish()
    }
}

impl Deref for SysCfg {
    type Target = SYSCFG;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SysCfg {
    /// Make EXTI `line` sensitive to the pin of `port` with the same number.
    ///
    /// # Note
    ///
    /// Only **one** port can be selected per line, selecting `PB1` overrides
    /// `PA1`. Use [`Exti::subscribe`](crate::exti::Exti::subscribe) to have
    /// the line arbitrated.
    #[doc(alias = "enable_interrupt")]
    pub fn select_exti_interrupt_source(&mut self, line: Line, port: Port) {
        select_exti_source(line, port)
    }
}

/// Writes the 4 bit source field of `line` in `SYSCFG_EXTICRx`.
pub(crate) fn select_exti_source(line: Line, port: Port) {
    const BITWIDTH: u8 = 4;
    let index = line.raw() % 4;
    // SAFETY: PAC pointer, the field is modified atomically so the three
    // other lines sharing the register keep their source.
    unsafe {
        let syscfg = &*SYSCFG::ptr();
        let exticr = match line.raw() {
            0..=3 => core::ptr::addr_of!(syscfg.exticr1) as *mut u32,
            4..=7 => core::ptr::addr_of!(syscfg.exticr2) as *mut u32,
            8..=11 => core::ptr::addr_of!(syscfg.exticr3) as *mut u32,
            _ => core::ptr::addr_of!(syscfg.exticr4) as *mut u32,
        };
        atomic_modify_at(exticr, BITWIDTH, index, u32::from(port.index()));
    }
}
