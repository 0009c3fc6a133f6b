//! GPIO lines of the EXTI controller and their interrupt vectors.

/// Number of EXTI lines connected to GPIO pins.
pub const GPIO_LINES: u8 = 16;

/// EXTI line `0..=15`
///
/// Pin `n` of every port is connected to line `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Line(u8);

impl Line {
    /// Line `n`, `None` if `n` is not a GPIO line.
    pub const fn new(n: u8) -> Option<Line> {
        if n < GPIO_LINES {
            Some(Line(n))
        } else {
            None
        }
    }

    /// Line number.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Bit of this line in the `IMR`, `RTSR`, `FTSR` and `PR` registers.
    pub const fn mask(self) -> u32 {
        1 << self.0
    }

    /// Interrupt vector this line is served by.
    pub const fn group(self) -> Group {
        match self.0 {
            0 => Group::Exti0,
            1 => Group::Exti1,
            2 => Group::Exti2,
            3 => Group::Exti3,
            4 => Group::Exti4,
            5..=9 => Group::Exti9_5,
            _ => Group::Exti15_10,
        }
    }

    /// NVIC interrupt number of this line
    ///
    /// Used to unmask / enable the interrupt with [`cortex_m::peripheral::NVIC::unmask()`].
    #[cfg(feature = "device-selected")]
    pub const fn interrupt(self) -> crate::pac::Interrupt {
        self.group().interrupt()
    }
}

/// Interrupt vectors of the GPIO lines
///
/// Lines 0 to 4 have a vector each, lines 5 to 9 and 10 to 15 share one.
/// The hardware does not tell which line of a shared vector fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Group {
    /// Line 0
    Exti0,
    /// Line 1
    Exti1,
    /// Line 2
    Exti2,
    /// Line 3
    Exti3,
    /// Line 4
    Exti4,
    /// Lines 5 to 9
    Exti9_5,
    /// Lines 10 to 15
    Exti15_10,
}

impl Group {
    /// All vectors, in line order.
    pub const ALL: [Group; 7] = [
        Group::Exti0,
        Group::Exti1,
        Group::Exti2,
        Group::Exti3,
        Group::Exti4,
        Group::Exti9_5,
        Group::Exti15_10,
    ];

    /// Line numbers served by this vector.
    pub const fn lines(self) -> core::ops::RangeInclusive<u8> {
        match self {
            Group::Exti0 => 0..=0,
            Group::Exti1 => 1..=1,
            Group::Exti2 => 2..=2,
            Group::Exti3 => 3..=3,
            Group::Exti4 => 4..=4,
            Group::Exti9_5 => 5..=9,
            Group::Exti15_10 => 10..=15,
        }
    }

    /// NVIC interrupt number of this vector.
    #[cfg(feature = "device-selected")]
    pub const fn interrupt(self) -> crate::pac::Interrupt {
        use crate::pac::Interrupt;

        match self {
            Group::Exti0 => Interrupt::EXTI0,
            Group::Exti1 => Interrupt::EXTI1,
            #[cfg(feature = "svd-f373")]
            Group::Exti2 => Interrupt::EXTI2_TS,
            #[cfg(not(feature = "svd-f373"))]
            Group::Exti2 => Interrupt::EXTI2_TSC,
            Group::Exti3 => Interrupt::EXTI3,
            Group::Exti4 => Interrupt::EXTI4,
            #[cfg(feature = "svd-f373")]
            Group::Exti9_5 => Interrupt::EXTI5_9,
            #[cfg(not(feature = "svd-f373"))]
            Group::Exti9_5 => Interrupt::EXTI9_5,
            Group::Exti15_10 => Interrupt::EXTI15_10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gpio_lines_are_valid() {
        assert_eq!(Line::new(0).map(Line::raw), Some(0));
        assert_eq!(Line::new(15).map(Line::mask), Some(0x8000));
        assert_eq!(Line::new(16), None);
        assert_eq!(Line::new(u8::MAX), None);
    }

    #[test]
    fn every_line_belongs_to_exactly_its_group() {
        for n in 0..GPIO_LINES {
            let line = Line::new(n).unwrap();
            let owners: usize = Group::ALL
                .iter()
                .filter(|group| group.lines().contains(&n))
                .count();
            assert_eq!(owners, 1);
            assert!(line.group().lines().contains(&n));
        }
    }

    #[test]
    fn shared_vectors() {
        assert_eq!(Line::new(7).unwrap().group(), Group::Exti9_5);
        assert_eq!(Line::new(10).unwrap().group(), Group::Exti15_10);
        assert_eq!(Group::Exti15_10.lines().count(), 6);
    }
}
