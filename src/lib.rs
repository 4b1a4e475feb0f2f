//! [Hardware Abstraction Layer](https://crates.io/crates/embedded-hal) (HAL)
//! for NXP LPC2xxx family of µ-controllers (LPC2103, LPC2106, LPC2148).
//!
//! Every on-chip peripheral gets two layers:
//!
//! - a register block (`XxxRegisters`) laid out bit-for-bit like the user
//!   manual, built with [`tock_registers`];
//! - a thin handle (`Xxx<'a>`) borrowing that block, with one method per
//!   hardware operation.
//!
//! On top of those sit the usual HAL pieces: clock configuration
//! ([`clock`]), typed GPIO pins ([`gpio`]) and a [`serial::Serial`] driver.
//!
//! The chip variant is picked with a cargo feature (`lpc2103`, `lpc2106` or
//! `lpc2148`). Exactly one must be enabled.
//!
//! None of the handles lock anything. Each register is assumed to be touched
//! from one context at a time; sharing a peripheral between thread mode and an
//! interrupt handler is the caller's business.
#![cfg_attr(not(test), no_std)]

#[cfg(not(any(feature = "lpc2103", feature = "lpc2106", feature = "lpc2148")))]
compile_error!("No chip variant selected. Enable one of the `lpc2103`, `lpc2106` or `lpc2148` features.");

#[cfg(any(
    all(feature = "lpc2103", feature = "lpc2106"),
    all(feature = "lpc2103", feature = "lpc2148"),
    all(feature = "lpc2106", feature = "lpc2148"),
))]
compile_error!("More than one chip variant selected. Enable exactly one of `lpc2103`, `lpc2106` or `lpc2148`.");

pub use embedded_hal;
pub use tock_registers;

pub mod adc;
pub mod chip;
pub mod clock;
pub mod dac;
pub mod gpio;
pub mod i2c;
pub mod pinconfig;
pub mod pinsel;
pub mod pwm;
pub mod rtc;
pub mod serial;
pub mod spi;
pub mod ssp;
pub mod syscon;
pub mod timer;
pub mod uart;
pub mod vic;
pub mod wdt;

pub use crate::chip::{Interrupt, Peripherals};

/// Backing store for register blocks in unit tests.
#[cfg(test)]
pub(crate) fn zeroed_registers<T>() -> Box<T> {
    // Register cells are plain `UnsafeCell<uN>`s, all-zeroes is a valid value.
    Box::new(unsafe { core::mem::zeroed() })
}
