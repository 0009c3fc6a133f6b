//! EXTI and SYSCFG registers of the device

use super::{Exti, ExtiRegisters, Line, LINES};
use crate::gpio::Port;
use crate::pac::EXTI;
use crate::reg::atomic_modify_at;
use crate::syscfg::SysCfg;

/// Return an EXTI register for the current CPU
#[cfg(feature = "svd-f373")]
macro_rules! reg_for_cpu {
    ($exti:expr, $xr:ident) => {
        $exti.$xr
    };
}

/// Return an EXTI register for the current CPU
#[cfg(not(feature = "svd-f373"))]
macro_rules! reg_for_cpu {
    ($exti:expr, $xr:ident) => {
        paste::paste! {
            $exti.[<$xr 1>]
        }
    };
}

/// Extension trait that hands the `EXTI` peripheral to the line table
pub trait ExtiExt {
    /// Subscription manager over the device registers and [`LINES`]
    ///
    /// The SYSCFG peripheral is taken as well, as its `EXTICRx` registers
    /// select the port of each line.
    fn constrain(self, syscfg: SysCfg) -> Exti<'static, Registers>;
}

impl ExtiExt for EXTI {
    fn constrain(self, _syscfg: SysCfg) -> Exti<'static, Registers> {
        Exti::new(Registers { _0: () }, &LINES)
    }
}

/// EXTI, SYSCFG and RCC register access of the GPIO lines
///
/// Every write is either a single-field atomic read-modify-write or a write to
/// the write 1 to clear pending register, so copies of it may be used from
/// any context.
#[derive(Debug, Clone, Copy)]
pub struct Registers {
    _0: (),
}

impl Registers {
    /// Register access without the peripherals
    ///
    /// # Safety
    ///
    /// The `EXTI` and `SYSCFG` peripherals must not be used for the GPIO lines
    /// by anything else than an [`Exti`].
    pub(crate) unsafe fn steal() -> Self {
        Registers { _0: () }
    }

    fn block() -> &'static crate::pac::exti::RegisterBlock {
        // SAFETY: PAC address, valid for the whole program
        unsafe { &*EXTI::ptr() }
    }
}

/// Raw pointer of a register for `atomic_modify_at`.
fn raw<REG>(reg: &REG) -> *mut u32 {
    reg as *const REG as *mut u32
}

impl ExtiRegisters for Registers {
    fn route(&self, line: Line, port: Port) {
        crate::rcc::enable_syscfg();
        crate::syscfg::select_exti_source(line, port);
    }

    fn set_triggers(&self, line: Line, rising: bool, falling: bool) {
        const BITWIDTH: u8 = 1;
        let exti = Self::block();
        // SAFETY: single bit of the line, modified atomically
        unsafe {
            atomic_modify_at(raw(&reg_for_cpu!(exti, rtsr)), BITWIDTH, line.raw(), u32::from(rising));
            atomic_modify_at(raw(&reg_for_cpu!(exti, ftsr)), BITWIDTH, line.raw(), u32::from(falling));
        }
    }

    fn unmask(&self, line: Line) {
        const BITWIDTH: u8 = 1;
        let exti = Self::block();
        // SAFETY: single bit of the line, modified atomically
        unsafe {
            atomic_modify_at(raw(&reg_for_cpu!(exti, emr)), BITWIDTH, line.raw(), 0);
            atomic_modify_at(raw(&reg_for_cpu!(exti, imr)), BITWIDTH, line.raw(), 1);
        }
    }

    fn mask(&self, line: Line) {
        const BITWIDTH: u8 = 1;
        let exti = Self::block();
        // SAFETY: single bit of the line, modified atomically
        unsafe { atomic_modify_at(raw(&reg_for_cpu!(exti, imr)), BITWIDTH, line.raw(), 0) };
    }

    fn pending(&self) -> u32 {
        reg_for_cpu!(Self::block(), pr).read().bits()
    }

    fn clear_pending(&self, mask: u32) {
        // SAFETY: Atomic write to register without side-effects on the
        // lines not in `mask`.
        unsafe { reg_for_cpu!(Self::block(), pr).write(|w| w.bits(mask)) };
    }
}
