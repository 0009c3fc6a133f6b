//! External interrupts of the GPIO pins
//!
//! The 16 EXTI lines are shared by all ports: `PA3`, `PB3`, `PC3`, ... all
//! end up on line 3, and the `SYSCFG` multiplexer connects only one of them at
//! a time. [`Exti`] hands out every line to at most one subscriber and routes
//! the interrupts of the line to the [`Handler`] of that subscriber.
//!
//! ```
//! use core::sync::atomic::{AtomicUsize, Ordering};
//! use stm32f3xx_exti::exti::{Edge, Exti, Group, LineTable};
//! use stm32f3xx_exti::gpio::{Pin, Port};
//! use stm32f3xx_exti::sim::Simulator;
//!
//! static PRESSES: AtomicUsize = AtomicUsize::new(0);
//!
//! fn pressed(_: *mut ()) {
//!     PRESSES.fetch_add(1, Ordering::SeqCst);
//! }
//!
//! let regs = Simulator::new();
//! let lines = LineTable::new();
//! let exti = Exti::new(&regs, &lines);
//!
//! let button = Pin::new(Port::A, 0);
//! exti.subscribe(button, Edge::Rising, pressed, core::ptr::null_mut())?;
//!
//! regs.drive(button, true);
//! exti.on_interrupt(Group::Exti0);
//! assert_eq!(PRESSES.load(Ordering::SeqCst), 1);
//! # Ok::<(), stm32f3xx_exti::exti::Error>(())
//! ```
//!
//! On the device the registers come from [`ExtiExt::constrain`] and the table
//! is [`LINES`], which is also what the interrupt entry points of the `rt`
//! feature dispatch against.

use crate::gpio::{Pin, Port};

#[cfg(feature = "device-selected")]
mod device;
mod dispatch;
mod line;
mod table;

#[cfg(feature = "device-selected")]
pub use device::{ExtiExt, Registers};
pub use dispatch::{handle_group, handle_line};
pub use line::{Group, Line, GPIO_LINES};
pub use table::{Handler, LineTable};

/// The line table of the device
///
/// Starts with all lines free.
pub static LINES: LineTable = LineTable::new();

/// Error type for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The pin handle does not map to a GPIO line.
    InvalidPin,
    /// The line is already subscribed, possibly by the same pin of another port.
    Busy,
}

/// Edges a line triggers on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Rising edge of voltage
    Rising,
    /// Falling edge of voltage
    Falling,
    /// Rising and falling edge of voltage
    RisingFalling,
    /// No edge, the line is armed but never fires
    Neither,
}

impl Edge {
    /// Edge from the rising and falling trigger flags.
    pub const fn from_flags(rising: bool, falling: bool) -> Edge {
        match (rising, falling) {
            (true, false) => Edge::Rising,
            (false, true) => Edge::Falling,
            (true, true) => Edge::RisingFalling,
            (false, false) => Edge::Neither,
        }
    }

    /// `(rising, falling)` trigger flags.
    pub const fn triggers(self) -> (bool, bool) {
        match self {
            Edge::Rising => (true, false),
            Edge::Falling => (false, true),
            Edge::RisingFalling => (true, true),
            Edge::Neither => (false, false),
        }
    }
}

/// Register access of the EXTI controller and its input multiplexer
///
/// All methods except `pending` and `clear_pending` touch a single line. As
/// lines are owned by different subscribers that may run in different
/// contexts, implementations must not lose a concurrent update of another
/// line in the same register.
pub trait ExtiRegisters {
    /// Connects `line` to the pin of `port`, `SYSCFG_EXTICRx`.
    fn route(&self, line: Line, port: Port);

    /// Enables or disables the edge detectors, `EXTI_RTSR` and `EXTI_FTSR`.
    fn set_triggers(&self, line: Line, rising: bool, falling: bool);

    /// Lets the line raise an interrupt and no event, `EXTI_IMR` and `EXTI_EMR`.
    fn unmask(&self, line: Line);

    /// Stops the line from raising an interrupt, `EXTI_IMR`.
    fn mask(&self, line: Line);

    /// `EXTI_PR`
    fn pending(&self) -> u32;

    /// Clears the pending flags set in `mask`, `EXTI_PR` is write 1 to clear.
    fn clear_pending(&self, mask: u32);
}

impl<T: ExtiRegisters + ?Sized> ExtiRegisters for &T {
    fn route(&self, line: Line, port: Port) {
        (**self).route(line, port)
    }

    fn set_triggers(&self, line: Line, rising: bool, falling: bool) {
        (**self).set_triggers(line, rising, falling)
    }

    fn unmask(&self, line: Line) {
        (**self).unmask(line)
    }

    fn mask(&self, line: Line) {
        (**self).mask(line)
    }

    fn pending(&self) -> u32 {
        (**self).pending()
    }

    fn clear_pending(&self, mask: u32) {
        (**self).clear_pending(mask)
    }
}

/// Subscription manager of the GPIO lines
///
/// `Exti` is a pair of references and can be copied freely, e.g. into an
/// interrupt handler. Exclusion between subscribers comes from the
/// [`LineTable`], not from `&mut`.
#[derive(Debug, Clone, Copy)]
pub struct Exti<'a, R> {
    regs: R,
    lines: &'a LineTable,
}

impl<'a, R: ExtiRegisters> Exti<'a, R> {
    /// Subscription manager over `regs`, arbitrated by `lines`.
    pub fn new(regs: R, lines: &'a LineTable) -> Self {
        Exti { regs, lines }
    }

    /// Register access.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// The line table.
    pub fn lines(&self) -> &'a LineTable {
        self.lines
    }

    /// Releases the register access.
    pub fn free(self) -> R {
        self.regs
    }

    /// Calls `handler` with `context` on every `edge` of `pin`.
    ///
    /// Fails with [`Error::Busy`] if the line of the pin is already taken,
    /// by this pin or the pin with the same number of another port.
    ///
    /// The handler is installed after the line is configured. An edge while
    /// `subscribe` runs may raise an interrupt that is dropped.
    ///
    /// The NVIC line of the interrupt is left alone, see [`Line::group`].
    pub fn subscribe(
        &self,
        pin: Pin,
        edge: Edge,
        handler: Handler,
        context: *mut (),
    ) -> Result<(), Error> {
        let (line, port) = match (pin.line(), pin.port()) {
            (Some(line), Some(port)) => (line, port),
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("subscribe: {} has no EXTI line", pin);
                return Err(Error::InvalidPin);
            }
        };

        if !self.lines.try_claim(line, port) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "subscribe: EXTI{} busy, owned by {}",
                line.raw(),
                self.lines.owner(line)
            );
            return Err(Error::Busy);
        }

        let (rising, falling) = edge.triggers();
        self.regs.route(line, port);
        self.regs.set_triggers(line, rising, falling);
        self.regs.unmask(line);
        self.regs.clear_pending(line.mask());
        self.lines.bind(line, handler, context);

        #[cfg(feature = "defmt")]
        defmt::debug!("EXTI{} subscribed by P{}{} on {}", line.raw(), port, pin.index(), edge);
        Ok(())
    }

    /// Stops the handler of `pin` from being called.
    ///
    /// Does nothing if the line of `pin` is not subscribed by `pin`, so
    /// calling it twice is fine. After it returns no new handler call starts
    /// for the pin. A call that already runs in another context is not waited
    /// for.
    pub fn unsubscribe(&self, pin: Pin) {
        let (line, port) = match (pin.line(), pin.port()) {
            (Some(line), Some(port)) => (line, port),
            _ => return,
        };
        if !self.lines.is_owned_by(line, port) {
            return;
        }

        self.regs.mask(line);
        self.regs.clear_pending(line.mask());
        self.lines.unbind(line);
        self.lines.release(line, port);

        #[cfg(feature = "defmt")]
        defmt::debug!("EXTI{} released by P{}{}", line.raw(), port, pin.index());
    }

    /// Serves the interrupt vector `group`.
    ///
    /// Call this from the interrupt handler, unless the `rt` feature already
    /// does.
    pub fn on_interrupt(&self, group: Group) {
        handle_group(&self.regs, self.lines, group)
    }

    /// Serves line `n` alone. See [`handle_line`].
    pub fn handle_line(&self, n: u8) {
        handle_line(&self.regs, self.lines, n)
    }
}
