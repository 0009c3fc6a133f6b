//! Interrupt dispatch

use super::{ExtiRegisters, Group, Line, LineTable};

/// Serves line `n`: clears its pending flag and calls its handler.
///
/// Does nothing at all if the flag of `n` is not set. The flag is cleared
/// before the handler runs, so an edge during the handler pends again. An
/// event without handler is dropped.
pub fn handle_line<R>(regs: &R, lines: &LineTable, n: u8)
where
    R: ExtiRegisters + ?Sized,
{
    let mask = match 1u32.checked_shl(u32::from(n)) {
        Some(mask) => mask,
        None => return,
    };
    if regs.pending() & mask == 0 {
        return;
    }
    regs.clear_pending(mask);

    let line = match Line::new(n) {
        Some(line) => line,
        None => return,
    };
    if !lines.notify(line) {
        #[cfg(feature = "defmt")]
        defmt::trace!("EXTI{}: no handler, event dropped", n);
    }
}

/// Serves every line of `group` in ascending order.
///
/// The hardware does not tell which line of a shared vector fired, so all
/// of them are polled.
pub fn handle_group<R>(regs: &R, lines: &LineTable, group: Group)
where
    R: ExtiRegisters + ?Sized,
{
    for n in group.lines() {
        handle_line(regs, lines, n);
    }
}

#[cfg(all(feature = "rt", feature = "device-selected"))]
mod vectors {
    use super::handle_group;
    use crate::exti::{Group, Registers, LINES};
    use crate::pac::interrupt;

    fn serve(group: Group) {
        // SAFETY: only the pending register is touched on dispatch
        let regs = unsafe { Registers::steal() };
        handle_group(&regs, &LINES, group);
    }

    #[interrupt]
    fn EXTI0() {
        serve(Group::Exti0);
    }

    #[interrupt]
    fn EXTI1() {
        serve(Group::Exti1);
    }

    #[cfg(not(feature = "svd-f373"))]
    #[interrupt]
    fn EXTI2_TSC() {
        serve(Group::Exti2);
    }

    #[cfg(feature = "svd-f373")]
    #[interrupt]
    fn EXTI2_TS() {
        serve(Group::Exti2);
    }

    #[interrupt]
    fn EXTI3() {
        serve(Group::Exti3);
    }

    #[interrupt]
    fn EXTI4() {
        serve(Group::Exti4);
    }

    #[cfg(not(feature = "svd-f373"))]
    #[interrupt]
    fn EXTI9_5() {
        serve(Group::Exti9_5);
    }

    #[cfg(feature = "svd-f373")]
    #[interrupt]
    fn EXTI5_9() {
        serve(Group::Exti9_5);
    }

    #[interrupt]
    fn EXTI15_10() {
        serve(Group::Exti15_10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::Port;
    use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    /// Pending register only.
    struct Pending(AtomicU32);

    impl ExtiRegisters for Pending {
        fn route(&self, _: Line, _: Port) {}
        fn set_triggers(&self, _: Line, _: bool, _: bool) {}
        fn unmask(&self, _: Line) {}
        fn mask(&self, _: Line) {}

        fn pending(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }

        fn clear_pending(&self, mask: u32) {
            self.0.fetch_and(!mask, Ordering::SeqCst);
        }
    }

    fn count(context: *mut ()) {
        let counter = unsafe { &*(context as *const AtomicUsize) };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn bound_table(counters: &[AtomicUsize; 16]) -> LineTable {
        let table = LineTable::new();
        for (n, counter) in counters.iter().enumerate() {
            let line = Line::new(n as u8).unwrap();
            assert!(table.try_claim(line, Port::D));
            table.bind(line, count, counter as *const AtomicUsize as *mut ());
        }
        table
    }

    #[test]
    fn flag_is_cleared_even_without_handler() {
        let regs = Pending(AtomicU32::new(1 << 4));
        let table = LineTable::new();
        handle_line(&regs, &table, 4);
        assert_eq!(regs.pending(), 0);
    }

    #[test]
    fn lines_beyond_the_gpio_range_only_clear_their_flag() {
        let counters: [AtomicUsize; 16] = Default::default();
        let table = bound_table(&counters);
        let regs = Pending(AtomicU32::new(1 << 16 | 1 << 31));

        handle_line(&regs, &table, 16);
        handle_line(&regs, &table, 32);
        handle_line(&regs, &table, 200);
        assert_eq!(regs.pending(), 1 << 31);
        assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 0));
    }

    #[test]
    fn group_serves_all_pending_lines_of_the_group() {
        let counters: [AtomicUsize; 16] = Default::default();
        let table = bound_table(&counters);
        let regs = Pending(AtomicU32::new(1 << 10 | 1 << 15 | 1 << 3));

        handle_group(&regs, &table, Group::Exti15_10);
        assert_eq!(regs.pending(), 1 << 3);
        let hits: [usize; 16] = core::array::from_fn(|n| counters[n].load(Ordering::SeqCst));
        assert_eq!(hits, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
    }
}
