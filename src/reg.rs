//! Register modifying support

/// Replace the `bitwidth` wide field number `index` of `reg` with `value`
///
/// `value` bits above `bitwidth` are dropped.
#[inline]
pub(crate) const fn insert_at(reg: u32, bitwidth: u8, index: u8, value: u32) -> u32 {
    let field = u32::MAX >> (32 - bitwidth as u32);
    let shift = bitwidth as u32 * index as u32;
    reg & !(field << shift) | (value & field) << shift
}

/// Read the `bitwidth` wide field number `index` of `reg`
#[inline]
pub(crate) const fn extract_at(reg: u32, bitwidth: u8, index: u8) -> u32 {
    let field = u32::MAX >> (32 - bitwidth as u32);
    reg >> (bitwidth as u32 * index as u32) & field
}

/// Modify specific index of array-like register atomically
///
/// Peripheral registers shared between lines (`IMR`, `RTSR`, `EXTICR`, ...)
/// may be modified from thread mode and from interrupt handlers at the same
/// time, so a plain read-modify-write could drop a concurrent update.
///
/// # SAFETY
///
/// Ensure that the pointer points to valid memory address. Usually this is used for
/// peripheral registers.
#[cfg(all(feature = "device-selected", target_arch = "arm"))]
#[inline]
pub(crate) unsafe fn atomic_modify_at(register: *mut u32, bitwidth: u8, index: u8, value: u32) {
    use core::sync::atomic::{compiler_fence, Ordering};

    let mut result: u32;
    // Try the atomic operation until the store was successful.
    loop {
        compiler_fence(Ordering::SeqCst);
        // Exclusive load: the following `strex` fails if any other context
        // touched the monitor in between.
        // See https://developer.arm.com/documentation/dui0489/i/arm-and-thumb-instructions/ldrex
        core::arch::asm!(
            "ldrex {0}, [{1}]",
            out(reg) result,
            in(reg) register,
            options(readonly, preserves_flags, nostack),
        );
        compiler_fence(Ordering::SeqCst);
        result = insert_at(result, bitwidth, index, value);
        compiler_fence(Ordering::SeqCst);
        // `result` becomes the status code: 0 on success.
        core::arch::asm!(
            "strex {0}, {0}, [{1}]",
            inout(reg) result,
            in(reg) register,
            options(preserves_flags, nostack),
        );
        compiler_fence(Ordering::SeqCst);
        if result == 0 {
            break;
        }
    }
}

/// Modify specific index of array-like register atomically
///
/// Fallback for targets without exclusive monitors, e.g. when type checking
/// the device backends on a host.
///
/// # SAFETY
///
/// Ensure that the pointer points to valid memory address.
#[cfg(all(feature = "device-selected", not(target_arch = "arm")))]
#[inline]
pub(crate) unsafe fn atomic_modify_at(register: *mut u32, bitwidth: u8, index: u8, value: u32) {
    cortex_m::interrupt::free(|_| {
        let current = core::ptr::read_volatile(register);
        core::ptr::write_volatile(register, insert_at(current, bitwidth, index, value));
    });
}
