//! Ownership and handler bindings of the GPIO lines.

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

use super::line::{Line, GPIO_LINES};
use crate::gpio::Port;

/// Interrupt handler of a line
///
/// Called in interrupt context with the context pointer given on subscription.
pub type Handler = fn(*mut ());

/// Owner value of a free slot, owned slots hold `port + 1`.
const FREE: u8 = 0;

// Every access below is `SeqCst`: a claim has to be observed either fully or
// not at all by any other context, including a preempting interrupt.
const ORDER: Ordering = Ordering::SeqCst;

const fn encode(owner: Port) -> u8 {
    owner as u8 + 1
}

struct Slot {
    owner: AtomicU8,
    handler: AtomicPtr<()>,
    context: AtomicPtr<()>,
}

impl Slot {
    const fn new() -> Slot {
        Slot {
            owner: AtomicU8::new(FREE),
            handler: AtomicPtr::new(core::ptr::null_mut()),
            context: AtomicPtr::new(core::ptr::null_mut()),
        }
    }
}

/// One slot per GPIO line
///
/// A slot is either free or owned by exactly one port. It only changes owner
/// by going through the free state. The handler binding of a slot is only
/// meaningful while it is owned.
///
/// The table used by the interrupt entry points is [`LINES`](super::LINES).
pub struct LineTable {
    slots: [Slot; GPIO_LINES as usize],
}

impl LineTable {
    /// A table with all lines free.
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const FREE_SLOT: Slot = Slot::new();

        LineTable {
            slots: [FREE_SLOT; GPIO_LINES as usize],
        }
    }

    fn slot(&self, line: Line) -> &Slot {
        &self.slots[usize::from(line.raw())]
    }

    /// Claims `line` for `owner` if it is free.
    ///
    /// Returns `false` if the line is owned by anyone, `owner` included.
    pub fn try_claim(&self, line: Line, owner: Port) -> bool {
        self.slot(line)
            .owner
            .compare_exchange(FREE, encode(owner), ORDER, ORDER)
            .is_ok()
    }

    /// Frees `line` if, and only if, it is owned by `owner`.
    pub fn release(&self, line: Line, owner: Port) {
        let _ = self
            .slot(line)
            .owner
            .compare_exchange(encode(owner), FREE, ORDER, ORDER);
    }

    /// Whether `owner` holds `line` at the moment.
    ///
    /// Only a snapshot, exclusion comes from [`try_claim`](LineTable::try_claim).
    pub fn is_owned_by(&self, line: Line, owner: Port) -> bool {
        self.slot(line).owner.load(ORDER) == encode(owner)
    }

    /// Current owner of `line`.
    pub fn owner(&self, line: Line) -> Option<Port> {
        match self.slot(line).owner.load(ORDER) {
            FREE => None,
            code => Port::from_index(code - 1),
        }
    }

    /// Whether a handler is installed for `line`.
    pub fn is_bound(&self, line: Line) -> bool {
        !self.slot(line).handler.load(ORDER).is_null()
    }

    /// Installs the handler. The context is published first.
    pub(crate) fn bind(&self, line: Line, handler: Handler, context: *mut ()) {
        let slot = self.slot(line);
        slot.context.store(context, ORDER);
        slot.handler.store(handler as *mut (), ORDER);
    }

    /// Removes the handler, before its context.
    pub(crate) fn unbind(&self, line: Line) {
        let slot = self.slot(line);
        slot.handler.store(core::ptr::null_mut(), ORDER);
        slot.context.store(core::ptr::null_mut(), ORDER);
    }

    /// Runs the handler of `line`, if there is one.
    ///
    /// Returns whether a handler ran.
    pub(crate) fn notify(&self, line: Line) -> bool {
        let slot = self.slot(line);
        let handler = slot.handler.load(ORDER);
        if handler.is_null() {
            return false;
        }
        let context = slot.context.load(ORDER);
        // SAFETY: non-null values of `handler` are only ever stored by `bind`,
        // from a `Handler`.
        let handler = unsafe { core::mem::transmute::<*mut (), Handler>(handler) };
        handler(context);
        true
    }
}

impl fmt::Debug for LineTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| slot.owner.load(ORDER)))
            .finish()
    }
}

impl Default for LineTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicUsize;

    fn count(context: *mut ()) {
        let counter = unsafe { &*(context as *const AtomicUsize) };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn line(n: u8) -> Line {
        Line::new(n).unwrap()
    }

    #[test]
    fn starts_free() {
        let table = LineTable::new();
        for n in 0..GPIO_LINES {
            assert_eq!(table.owner(line(n)), None);
            assert!(!table.is_bound(line(n)));
        }
    }

    #[test]
    fn claim_is_exclusive() {
        let table = LineTable::new();
        assert!(table.try_claim(line(3), Port::A));
        assert!(!table.try_claim(line(3), Port::A));
        assert!(!table.try_claim(line(3), Port::B));
        assert!(table.try_claim(line(4), Port::B));
        assert_eq!(table.owner(line(3)), Some(Port::A));
        assert!(table.is_owned_by(line(4), Port::B));
    }

    #[test]
    fn release_needs_the_owner() {
        let table = LineTable::new();
        assert!(table.try_claim(line(9), Port::H));

        table.release(line(9), Port::C);
        assert!(table.is_owned_by(line(9), Port::H));

        table.release(line(9), Port::H);
        table.release(line(9), Port::H);
        assert_eq!(table.owner(line(9)), None);
        assert!(table.try_claim(line(9), Port::C));
    }

    #[test]
    fn notify_passes_the_context() {
        let table = LineTable::new();
        let counter = AtomicUsize::new(0);
        let context = &counter as *const AtomicUsize as *mut ();

        assert!(!table.notify(line(0)));
        table.bind(line(0), count, context);
        assert!(table.is_bound(line(0)));
        assert!(table.notify(line(0)));
        assert!(table.notify(line(0)));
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        table.unbind(line(0));
        assert!(!table.notify(line(0)));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
