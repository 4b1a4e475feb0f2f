//! Watchdog timer
//!
//! Counts down from the timeout at PCLK / 4. Enabling (and enabling the
//! reset) only takes effect after a valid feed, and can't be undone short
//! of a reset.

use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub WdtRegisters {
        (0x00 => pub mode: ReadWrite<u32, MOD::Register>),
        (0x04 => pub tc: ReadWrite<u32>),
        (0x08 => pub feed: WriteOnly<u32>),
        (0x0C => pub tv: ReadOnly<u32>),
        (0x10 => @END),
    }
}

register_bitfields![u32,
    pub MOD [
        WDEN OFFSET(0) NUMBITS(1) [],
        WDRESET OFFSET(1) NUMBITS(1) [],
        /// Time-out flag, cleared by software
        WDTOF OFFSET(2) NUMBITS(1) [],
        WDINT OFFSET(3) NUMBITS(1) []
    ]
];

/// Smallest timeout the hardware accepts; smaller values read back as this.
pub const MIN_TIMEOUT: u32 = 0xff;

pub struct Wdt<'a> {
    regs: &'a WdtRegisters,
}

impl<'a> Wdt<'a> {
    pub fn new(regs: &'a WdtRegisters) -> Self {
        Wdt { regs }
    }

    pub fn registers(&self) -> &'a WdtRegisters {
        self.regs
    }

    /// Start the watchdog with the next [`Wdt::feed`]. Sticky until reset.
    pub fn enable(&self) {
        self.regs.mode.modify(MOD::WDEN::SET);
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.mode.is_set(MOD::WDEN)
    }

    /// Reset the chip on timeout instead of only raising the interrupt.
    pub fn enable_reset(&self) {
        self.regs.mode.modify(MOD::WDRESET::SET);
    }

    pub fn reset_is_enabled(&self) -> bool {
        self.regs.mode.is_set(MOD::WDRESET)
    }

    /// The last reset was caused by the watchdog.
    pub fn timed_out(&self) -> bool {
        self.regs.mode.is_set(MOD::WDTOF)
    }

    pub fn clear_timeout(&self) {
        self.regs.mode.modify(MOD::WDTOF::CLEAR);
    }

    pub fn interrupt_is_pending(&self) -> bool {
        self.regs.mode.is_set(MOD::WDINT)
    }

    /// Timeout in watchdog ticks (PCLK / 4), loaded on the next feed.
    pub fn set_timeout(&self, ticks: u32) {
        assert!(ticks >= MIN_TIMEOUT, "watchdog timeout must be at least 0xff");
        self.regs.tc.set(ticks);
    }

    pub fn timeout(&self) -> u32 {
        self.regs.tc.get()
    }

    /// Reload the counter. Must not be interrupted by another access to the
    /// watchdog registers.
    pub fn feed(&self) {
        self.regs.feed.set(0xAA);
        self.regs.feed.set(0x55);
    }

    /// Ticks left before the watchdog fires.
    pub fn value(&self) -> u32 {
        self.regs.tv.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;

    #[test]
    fn mode_bits() {
        let regs = zeroed_registers::<WdtRegisters>();
        let wdt = Wdt::new(&regs);

        wdt.enable();
        wdt.enable_reset();
        assert_eq!(regs.mode.get(), 0b11);
        assert!(wdt.is_enabled() && wdt.reset_is_enabled());

        regs.mode.set(0b111);
        assert!(wdt.timed_out());
        wdt.clear_timeout();
        assert_eq!(regs.mode.get(), 0b11);
    }

    #[test]
    fn feed_ends_with_0x55() {
        let regs = zeroed_registers::<WdtRegisters>();
        let wdt = Wdt::new(&regs);

        wdt.set_timeout(0x1000);
        wdt.feed();
        let feed = unsafe { (&regs.feed as *const WriteOnly<u32> as *const u32).read_volatile() };
        assert_eq!(feed, 0x55);
        assert_eq!(wdt.timeout(), 0x1000);
    }

    #[test]
    #[should_panic]
    fn short_timeout_is_rejected() {
        let regs = zeroed_registers::<WdtRegisters>();
        Wdt::new(&regs).set_timeout(0xfe);
    }
}
