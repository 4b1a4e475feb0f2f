//! SSP, the synchronous serial port (LPC2103, LPC2148)
//!
//! An 8-frame FIFO SPI/SSI/Microwire controller. The LPC2103 documentation
//! sometimes calls it SPI1.
//!
//! Bit rate is `PCLK / (prescaler * (clock_rate + 1))`.

use bitflags::bitflags;
use embedded_hal::blocking;
use embedded_hal::spi::{self, Phase, Polarity};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub SspRegisters {
        (0x00 => pub cr0: ReadWrite<u32, CR0::Register>),
        (0x04 => pub cr1: ReadWrite<u32, CR1::Register>),
        (0x08 => pub dr: ReadWrite<u32>),
        (0x0C => pub sr: ReadOnly<u32, SR::Register>),
        (0x10 => pub cpsr: ReadWrite<u32>),
        (0x14 => pub imsc: ReadWrite<u32>),
        (0x18 => pub ris: ReadOnly<u32>),
        (0x1C => pub mis: ReadOnly<u32>),
        (0x20 => pub icr: WriteOnly<u32>),
        (0x24 => @END),
    }
}

register_bitfields![u32,
    pub CR0 [
        /// Word size minus one.
        DSS OFFSET(0) NUMBITS(4) [],
        FRF OFFSET(4) NUMBITS(2) [
            Spi = 0,
            Ti = 1,
            Microwire = 2
        ],
        CPOL OFFSET(6) NUMBITS(1) [],
        CPHA OFFSET(7) NUMBITS(1) [],
        SCR OFFSET(8) NUMBITS(8) []
    ],
    pub CR1 [
        LBM OFFSET(0) NUMBITS(1) [],
        SSE OFFSET(1) NUMBITS(1) [],
        MODE OFFSET(2) NUMBITS(2) [
            Master = 0b00,
            Slave = 0b01,
            SlaveOutputDisabled = 0b11
        ]
    ],
    pub SR [
        TFE OFFSET(0) NUMBITS(1) [],
        TNF OFFSET(1) NUMBITS(1) [],
        RNE OFFSET(2) NUMBITS(1) [],
        RFF OFFSET(3) NUMBITS(1) [],
        BSY OFFSET(4) NUMBITS(1) []
    ]
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SspMode {
    Master,
    Slave,
    /// Slave that never drives MISO.
    SlaveOutputDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Spi,
    Ti,
    Microwire,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SspInterrupt: u32 {
        const RX_OVERRUN = 1 << 0;
        const RX_TIMEOUT = 1 << 1;
        const RX_HALF_FULL = 1 << 2;
        const TX_HALF_EMPTY = 1 << 3;
    }
}

impl SspInterrupt {
    /// The only interrupts that need clearing, the FIFO ones follow the
    /// FIFO level.
    pub const CLEARABLE: SspInterrupt = SspInterrupt::RX_OVERRUN.union(SspInterrupt::RX_TIMEOUT);
}

#[derive(Clone, Copy, PartialEq)]
pub struct SspConfig {
    pub mode: SspMode,
    pub word_size: u8,
    pub frame_format: FrameFormat,
    pub polarity: Polarity,
    pub phase: Phase,
    pub prescaler: u8,
    pub clock_rate: u8,
}

impl Default for SspConfig {
    /// 8-bit SPI master, mode 0, PCLK / 2.
    fn default() -> SspConfig {
        SspConfig {
            mode: SspMode::Master,
            word_size: 8,
            frame_format: FrameFormat::Spi,
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
            prescaler: 2,
            clock_rate: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Overrun,
}

pub struct Ssp<'a> {
    regs: &'a SspRegisters,
}

impl<'a> Ssp<'a> {
    pub fn new(regs: &'a SspRegisters) -> Self {
        Ssp { regs }
    }

    pub fn registers(&self) -> &'a SspRegisters {
        self.regs
    }

    /// Disable the port, apply `config`, enable it again.
    pub fn init(&self, config: &SspConfig) {
        self.disable();
        self.set_mode(config.mode);
        self.set_word_size(config.word_size);
        self.set_frame_format(config.frame_format);
        self.set_clock_polarity(config.polarity);
        self.set_clock_phase(config.phase);
        self.set_clock_prescaler(config.prescaler);
        self.set_clock_rate(config.clock_rate);
        self.enable();
    }

    pub fn send(&self, word: u16) {
        self.regs.dr.set(word as u32);
    }

    pub fn recv(&self) -> u16 {
        self.regs.dr.get() as u16
    }

    pub fn enable_loopback(&self) {
        self.regs.cr1.modify(CR1::LBM::SET);
    }

    pub fn disable_loopback(&self) {
        self.regs.cr1.modify(CR1::LBM::CLEAR);
    }

    pub fn loopback_is_enabled(&self) -> bool {
        self.regs.cr1.is_set(CR1::LBM)
    }

    pub fn enable(&self) {
        self.regs.cr1.modify(CR1::SSE::SET);
    }

    pub fn disable(&self) {
        self.regs.cr1.modify(CR1::SSE::CLEAR);
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.cr1.is_set(CR1::SSE)
    }

    pub fn tx_fifo_is_empty(&self) -> bool {
        self.regs.sr.is_set(SR::TFE)
    }

    /// TX FIFO not full.
    pub fn tx_is_ready(&self) -> bool {
        self.regs.sr.is_set(SR::TNF)
    }

    pub fn rx_is_available(&self) -> bool {
        self.regs.sr.is_set(SR::RNE)
    }

    pub fn rx_fifo_is_full(&self) -> bool {
        self.regs.sr.is_set(SR::RFF)
    }

    pub fn is_busy(&self) -> bool {
        self.regs.sr.is_set(SR::BSY)
    }

    pub fn enable_interrupts(&self, interrupts: SspInterrupt) {
        debug_assert!(SspInterrupt::all().contains(interrupts));
        self.regs.imsc.set(self.regs.imsc.get() | interrupts.bits());
    }

    pub fn disable_interrupts(&self, interrupts: SspInterrupt) {
        debug_assert!(SspInterrupt::all().contains(interrupts));
        self.regs.imsc.set(self.regs.imsc.get() & !interrupts.bits());
    }

    pub fn enabled_interrupts(&self) -> SspInterrupt {
        SspInterrupt::from_bits_truncate(self.regs.imsc.get())
    }

    /// Enabled and asserted interrupts.
    pub fn pending_interrupts(&self) -> SspInterrupt {
        SspInterrupt::from_bits_truncate(self.regs.mis.get())
    }

    /// Asserted interrupts, enabled or not.
    pub fn raw_interrupts(&self) -> SspInterrupt {
        SspInterrupt::from_bits_truncate(self.regs.ris.get())
    }

    pub fn clear_pending_interrupts(&self, interrupts: SspInterrupt) {
        assert!(
            SspInterrupt::CLEARABLE.contains(interrupts),
            "only RX overrun and RX timeout can be cleared"
        );
        self.regs.icr.set(interrupts.bits());
    }

    pub fn set_mode(&self, mode: SspMode) {
        let value = match mode {
            SspMode::Master => CR1::MODE::Master,
            SspMode::Slave => CR1::MODE::Slave,
            SspMode::SlaveOutputDisabled => CR1::MODE::SlaveOutputDisabled,
        };
        self.regs.cr1.modify(value);
    }

    pub fn mode(&self) -> SspMode {
        match self.regs.cr1.read(CR1::MODE) {
            0b00 | 0b10 => SspMode::Master,
            0b01 => SspMode::Slave,
            _ => SspMode::SlaveOutputDisabled,
        }
    }

    pub fn set_word_size(&self, bits: u8) {
        assert!((4..=16).contains(&bits), "SSP word size must be within 4..=16");
        self.regs.cr0.modify(CR0::DSS.val(bits as u32 - 1));
    }

    pub fn word_size(&self) -> u8 {
        self.regs.cr0.read(CR0::DSS) as u8 + 1
    }

    pub fn set_frame_format(&self, format: FrameFormat) {
        let value = match format {
            FrameFormat::Spi => CR0::FRF::Spi,
            FrameFormat::Ti => CR0::FRF::Ti,
            FrameFormat::Microwire => CR0::FRF::Microwire,
        };
        self.regs.cr0.modify(value);
    }

    pub fn set_clock_polarity(&self, polarity: Polarity) {
        match polarity {
            Polarity::IdleLow => self.regs.cr0.modify(CR0::CPOL::CLEAR),
            Polarity::IdleHigh => self.regs.cr0.modify(CR0::CPOL::SET),
        }
    }

    pub fn set_clock_phase(&self, phase: Phase) {
        match phase {
            Phase::CaptureOnFirstTransition => self.regs.cr0.modify(CR0::CPHA::CLEAR),
            Phase::CaptureOnSecondTransition => self.regs.cr0.modify(CR0::CPHA::SET),
        }
    }

    /// Prescaler output clocks per bit, minus one.
    pub fn set_clock_rate(&self, rate: u8) {
        self.regs.cr0.modify(CR0::SCR.val(rate as u32));
    }

    pub fn set_clock_prescaler(&self, prescaler: u8) {
        assert!(
            prescaler >= 2 && prescaler % 2 == 0,
            "SSP prescaler must be even and within 2..=254"
        );
        self.regs.cpsr.set(prescaler as u32);
    }

    pub fn clock_prescaler(&self) -> u8 {
        self.regs.cpsr.get() as u8
    }

    /// Exchange one word, discarding whatever was left in the RX FIFO.
    pub fn xfer(&self, word: u16) -> u16 {
        while self.is_busy() {}
        while self.rx_is_available() {
            self.recv();
        }
        self.send(word);
        while !self.rx_is_available() {}
        self.recv()
    }
}

macro_rules! full_duplex {
    ($($Word:ty),+) => {
        $(
        impl<'a> spi::FullDuplex<$Word> for Ssp<'a> {
            type Error = Error;

            fn read(&mut self) -> nb::Result<$Word, Error> {
                if self.raw_interrupts().contains(SspInterrupt::RX_OVERRUN) {
                    self.clear_pending_interrupts(SspInterrupt::RX_OVERRUN);
                    return Err(nb::Error::Other(Error::Overrun));
                }

                if self.rx_is_available() {
                    Ok(self.recv() as $Word)
                } else {
                    Err(nb::Error::WouldBlock)
                }
            }

            fn send(&mut self, word: $Word) -> nb::Result<(), Error> {
                if self.tx_is_ready() {
                    Ssp::send(self, word as u16);
                    Ok(())
                } else {
                    Err(nb::Error::WouldBlock)
                }
            }
        }

        impl<'a> blocking::spi::transfer::Default<$Word> for Ssp<'a> {}

        impl<'a> blocking::spi::write::Default<$Word> for Ssp<'a> {}
        )+
    };
}

full_duplex!(u8, u16);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;
    use embedded_hal::spi::FullDuplex;

    // Status registers are read-only through the register API.
    fn poke<T>(reg: &T, value: u32) {
        unsafe { (reg as *const T as *mut u32).write_volatile(value) };
    }

    fn written(reg: &WriteOnly<u32>) -> u32 {
        unsafe { (reg as *const WriteOnly<u32> as *const u32).read_volatile() }
    }

    #[test]
    fn init_applies_the_whole_config() {
        let regs = zeroed_registers::<SspRegisters>();
        let ssp = Ssp::new(&regs);

        ssp.init(&SspConfig {
            mode: SspMode::SlaveOutputDisabled,
            word_size: 16,
            frame_format: FrameFormat::Ti,
            polarity: Polarity::IdleHigh,
            phase: Phase::CaptureOnSecondTransition,
            prescaler: 254,
            clock_rate: 3,
        });

        assert_eq!(regs.cr0.get(), (3 << 8) | (1 << 7) | (1 << 6) | (1 << 4) | 0xf);
        assert_eq!(regs.cr1.get(), (0b11 << 2) | (1 << 1));
        assert_eq!(regs.cpsr.get(), 254);
        assert_eq!(ssp.word_size(), 16);
        assert_eq!(ssp.mode(), SspMode::SlaveOutputDisabled);
    }

    #[test]
    fn word_size_is_stored_minus_one() {
        let regs = zeroed_registers::<SspRegisters>();
        let ssp = Ssp::new(&regs);

        ssp.set_word_size(4);
        assert_eq!(regs.cr0.get(), 3);
        ssp.set_word_size(8);
        assert_eq!(ssp.word_size(), 8);
    }

    #[test]
    fn interrupt_masks() {
        let regs = zeroed_registers::<SspRegisters>();
        let ssp = Ssp::new(&regs);

        ssp.enable_interrupts(SspInterrupt::RX_HALF_FULL | SspInterrupt::RX_TIMEOUT);
        ssp.disable_interrupts(SspInterrupt::RX_TIMEOUT);
        assert_eq!(ssp.enabled_interrupts(), SspInterrupt::RX_HALF_FULL);

        ssp.clear_pending_interrupts(SspInterrupt::CLEARABLE);
        assert_eq!(written(&regs.icr), 0b11);
    }

    #[test]
    #[should_panic]
    fn fifo_interrupts_cannot_be_cleared() {
        let regs = zeroed_registers::<SspRegisters>();
        Ssp::new(&regs).clear_pending_interrupts(SspInterrupt::TX_HALF_EMPTY);
    }

    #[test]
    #[should_panic]
    fn odd_prescaler_is_rejected() {
        let regs = zeroed_registers::<SspRegisters>();
        Ssp::new(&regs).set_clock_prescaler(3);
    }

    #[test]
    fn full_duplex_follows_fifo_flags() {
        let regs = zeroed_registers::<SspRegisters>();
        let mut ssp = Ssp::new(&regs);

        assert!(matches!(FullDuplex::<u8>::send(&mut ssp, 1), Err(nb::Error::WouldBlock)));

        // TNF | RNE
        poke(&regs.sr, 0b0110);
        FullDuplex::<u16>::send(&mut ssp, 0x1234).unwrap();
        let word: nb::Result<u16, Error> = ssp.read();
        assert!(matches!(word, Ok(0x1234)));

        poke(&regs.ris, 1);
        let byte: nb::Result<u8, Error> = ssp.read();
        assert!(matches!(byte, Err(nb::Error::Other(Error::Overrun))));
        assert_eq!(written(&regs.icr), 1);
    }
}
