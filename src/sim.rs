//! In-memory model of the EXTI, SYSCFG and GPIO registers
//!
//! [`Simulator`] implements [`ExtiRegisters`] and [`GpioRegisters`] on plain
//! atomics, so subscriptions, dispatch and pin configuration can be exercised
//! without a device, from several threads at once.
//!
//! Only the behaviour the driver relies on is modelled:
//!
//! * an edge on a pin is seen by the EXTI line only if `SYSCFG_EXTICRx`
//!   selects the port of the pin;
//! * the edge sets the pending flag if the trigger for its direction is
//!   enabled and the line is not masked in `EXTI_IMR`;
//! * the pending register is write 1 to clear;
//! * a pin in output mode drives its own input, so `BSRR` writes generate
//!   edges as well.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::exti::{ExtiRegisters, Line};
use crate::gpio::{Error, GpioRegisters, Pin, Port, PortRegister};
use crate::reg::{extract_at, insert_at};

const ORDER: Ordering = Ordering::SeqCst;

/// `MODER` value of an output pin
const MODE_OUTPUT: u32 = 0b01;

#[derive(Debug, Default)]
struct PortRegisters {
    moder: AtomicU32,
    otyper: AtomicU32,
    ospeedr: AtomicU32,
    pupdr: AtomicU32,
    afrl: AtomicU32,
    afrh: AtomicU32,
    idr: AtomicU32,
    odr: AtomicU32,
}

impl PortRegisters {
    fn get(&self, reg: PortRegister) -> &AtomicU32 {
        match reg {
            PortRegister::Moder => &self.moder,
            PortRegister::Otyper => &self.otyper,
            PortRegister::Ospeedr => &self.ospeedr,
            PortRegister::Pupdr => &self.pupdr,
            PortRegister::Afrl => &self.afrl,
            PortRegister::Afrh => &self.afrh,
        }
    }
}

/// Atomic read-modify-write of a single field.
fn modify_field(reg: &AtomicU32, bitwidth: u8, index: u8, value: u32) {
    let _ = reg.fetch_update(ORDER, ORDER, |bits| {
        Some(insert_at(bits, bitwidth, index, value))
    });
}

/// Register model of one device
#[derive(Debug, Default)]
pub struct Simulator {
    imr: AtomicU32,
    emr: AtomicU32,
    rtsr: AtomicU32,
    ftsr: AtomicU32,
    pr: AtomicU32,
    exticr: [AtomicU32; 4],
    syscfg_clock: AtomicBool,
    ports: [PortRegisters; 8],
    /// Bit `n` set: port with source code `n` exists.
    present: u8,
    /// Bit `n` set: clock of port `n` enabled.
    clocks: AtomicU8,
}

impl Simulator {
    /// A device with all ports `A` to `H`, in reset state.
    pub fn new() -> Self {
        Self::with_ports(&Port::ALL)
    }

    /// A device with the given ports only.
    ///
    /// Enabling the clock of any other port fails.
    pub fn with_ports(ports: &[Port]) -> Self {
        Simulator {
            present: ports.iter().fold(0, |bits, port| bits | 1 << port.index()),
            ..Default::default()
        }
    }

    /// Applies `high` to the pin, generating an edge if the level changes.
    ///
    /// Invalid handles are ignored.
    pub fn drive(&self, pin: Pin, high: bool) {
        let (port, index) = match pin.resolve() {
            Ok(resolved) => resolved,
            Err(_) => return,
        };
        let mask = 1 << index;
        let idr = &self.ports[usize::from(port.index())].idr;
        let before = if high {
            idr.fetch_or(mask, ORDER)
        } else {
            idr.fetch_and(!mask, ORDER)
        };
        if (before & mask != 0) == high {
            return;
        }
        if let Some(line) = pin.line() {
            self.detect(line, port, high);
        }
    }

    /// Level of the pin as seen by `IDR`.
    pub fn level(&self, pin: Pin) -> bool {
        match pin.resolve() {
            Ok((port, index)) => self.input(port) & 1 << index != 0,
            Err(_) => false,
        }
    }

    /// Software trigger, `EXTI_SWIER`: pends `line` unless it is masked.
    pub fn trigger(&self, line: Line) {
        self.raise(line);
    }

    /// Sets pending flags directly, regardless of masks.
    pub fn set_pending(&self, mask: u32) {
        self.pr.fetch_or(mask, ORDER);
    }

    /// Port `line` is connected to.
    pub fn route_of(&self, line: Line) -> Option<Port> {
        let n = line.raw();
        let exticr = self.exticr[usize::from(n / 4)].load(ORDER);
        Port::from_index(extract_at(exticr, 4, n % 4) as u8)
    }

    /// `(rising, falling)` triggers of `line`.
    pub fn triggers(&self, line: Line) -> (bool, bool) {
        (
            self.rtsr.load(ORDER) & line.mask() != 0,
            self.ftsr.load(ORDER) & line.mask() != 0,
        )
    }

    /// Whether `line` may raise an interrupt.
    pub fn is_unmasked(&self, line: Line) -> bool {
        self.imr.load(ORDER) & line.mask() != 0
    }

    /// Whether `line` raises an event, which the driver never wants.
    pub fn is_event(&self, line: Line) -> bool {
        self.emr.load(ORDER) & line.mask() != 0
    }

    /// Field `index` of width `bitwidth` of a port configuration register.
    pub fn field(&self, port: Port, reg: PortRegister, bitwidth: u8, index: u8) -> u32 {
        let bits = self.ports[usize::from(port.index())].get(reg).load(ORDER);
        extract_at(bits, bitwidth, index)
    }

    /// Whether the clock of `port` has been enabled.
    pub fn clock_enabled(&self, port: Port) -> bool {
        self.clocks.load(ORDER) & 1 << port.index() != 0
    }

    /// Whether the SYSCFG clock has been enabled.
    pub fn syscfg_clock_enabled(&self) -> bool {
        self.syscfg_clock.load(ORDER)
    }

    fn detect(&self, line: Line, port: Port, rising: bool) {
        if self.route_of(line) != Some(port) {
            return;
        }
        let (on_rising, on_falling) = self.triggers(line);
        if (rising && on_rising) || (!rising && on_falling) {
            self.raise(line);
        }
    }

    fn raise(&self, line: Line) {
        if self.is_unmasked(line) {
            self.pr.fetch_or(line.mask(), ORDER);
        }
    }

    fn is_present(&self, port: Port) -> bool {
        self.present & 1 << port.index() != 0
    }
}

impl ExtiRegisters for Simulator {
    fn route(&self, line: Line, port: Port) {
        self.syscfg_clock.store(true, ORDER);
        let n = line.raw();
        modify_field(
            &self.exticr[usize::from(n / 4)],
            4,
            n % 4,
            u32::from(port.index()),
        );
    }

    fn set_triggers(&self, line: Line, rising: bool, falling: bool) {
        modify_field(&self.rtsr, 1, line.raw(), u32::from(rising));
        modify_field(&self.ftsr, 1, line.raw(), u32::from(falling));
    }

    fn unmask(&self, line: Line) {
        modify_field(&self.emr, 1, line.raw(), 0);
        modify_field(&self.imr, 1, line.raw(), 1);
    }

    fn mask(&self, line: Line) {
        modify_field(&self.imr, 1, line.raw(), 0);
    }

    fn pending(&self) -> u32 {
        self.pr.load(ORDER)
    }

    fn clear_pending(&self, mask: u32) {
        self.pr.fetch_and(!mask, ORDER);
    }
}

impl GpioRegisters for Simulator {
    fn enable_clock(&self, port: Port) -> Result<(), Error> {
        if !self.is_present(port) {
            return Err(Error::ClockUnavailable);
        }
        self.clocks.fetch_or(1 << port.index(), ORDER);
        Ok(())
    }

    fn modify(&self, port: Port, reg: PortRegister, bitwidth: u8, index: u8, value: u32) {
        if self.is_present(port) {
            let reg = self.ports[usize::from(port.index())].get(reg);
            modify_field(reg, bitwidth, index, value);
        }
    }

    fn input(&self, port: Port) -> u32 {
        self.ports[usize::from(port.index())].idr.load(ORDER)
    }

    fn output(&self, port: Port) -> u32 {
        self.ports[usize::from(port.index())].odr.load(ORDER)
    }

    fn set_reset(&self, port: Port, bits: u32) {
        let set = bits & 0xffff;
        // Set wins over reset for the same pin.
        let reset = (bits >> 16) & !set;
        let odr = &self.ports[usize::from(port.index())].odr;
        let _ = odr.fetch_update(ORDER, ORDER, |odr| Some(odr & !reset | set));

        for index in 0..crate::gpio::PINS_PER_PORT {
            let mask = 1 << index;
            if (set | reset) & mask == 0 {
                continue;
            }
            if self.field(port, PortRegister::Moder, 2, index) == MODE_OUTPUT {
                self.drive(Pin::new(port, index), set & mask != 0);
            }
        }
    }
}
