//! Chip variant support
//!
//! The variant is picked at build time with a cargo feature. This module
//! re-exports the memory map, the VIC channel numbers ([`Interrupt`]) and the
//! [`Peripherals`] singleton of the selected part.
//!
//! The peripheral modules themselves build for every variant; a peripheral
//! the part lacks simply has no field in [`Peripherals`].

use core::sync::atomic::{AtomicBool, Ordering};

// ARMv4T has no compare-and-swap, so this is a plain load/store pair. Take
// the peripherals before enabling interrupts.
static TAKEN: AtomicBool = AtomicBool::new(false);

fn claim() -> bool {
    if TAKEN.load(Ordering::Relaxed) {
        false
    } else {
        TAKEN.store(true, Ordering::Relaxed);
        true
    }
}

/// Generates `Peripherals` from `field: RegisterBlock = BASE` entries.
macro_rules! peripherals {
    ($($(#[$meta:meta])* $name:ident: $Regs:ty = $base:expr,)+) => {
        /// All on-chip peripherals, as `'static` register blocks.
        pub struct Peripherals {
            $($(#[$meta])* pub $name: &'static $Regs,)+
        }

        impl Peripherals {
            /// Returns the peripherals once, `None` afterwards.
            pub fn take() -> Option<Self> {
                if $crate::chip::claim() {
                    Some(unsafe { Self::conjure() })
                } else {
                    None
                }
            }

            /// Unchecked version of [`Peripherals::take`].
            ///
            /// # Safety
            ///
            /// Each register block must only be driven from one place.
            pub unsafe fn steal() -> Self {
                $crate::chip::TAKEN.store(true, core::sync::atomic::Ordering::Relaxed);
                Self::conjure()
            }

            unsafe fn conjure() -> Self {
                Peripherals {
                    $($name: &*($base as *const $Regs),)+
                }
            }
        }
    };
}

#[cfg(feature = "lpc2103")]
mod lpc2103;
#[cfg(feature = "lpc2103")]
pub use self::lpc2103::*;

#[cfg(feature = "lpc2106")]
mod lpc2106;
#[cfg(feature = "lpc2106")]
pub use self::lpc2106::*;

#[cfg(feature = "lpc2148")]
mod lpc2148;
#[cfg(feature = "lpc2148")]
pub use self::lpc2148::*;

/// Position of the interrupt in the VIC registers.
impl Interrupt {
    pub const fn nr(self) -> u8 {
        self as u8
    }

    pub const fn mask(self) -> u32 {
        1 << (self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_interrupt_numbers() {
        assert_eq!(Interrupt::Wdt.nr(), 0);
        assert_eq!(Interrupt::Uart0.nr(), 6);
        assert_eq!(Interrupt::Uart1.mask(), 1 << 7);
        assert_eq!(Interrupt::Rtc.nr(), 13);
    }

    #[test]
    fn common_base_addresses() {
        assert_eq!(WDT_BASE, 0xE000_0000);
        assert_eq!(UART0_BASE, 0xE000_C000);
        assert_eq!(PINSEL_BASE, 0xE002_C000);
        assert_eq!(SYSCON_BASE, 0xE01F_C000);
        assert_eq!(VIC_BASE, 0xFFFF_F000);
    }
}
