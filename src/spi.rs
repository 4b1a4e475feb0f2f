//! SPI0, the legacy SPI controller
//!
//! Single data register, no FIFO. A transfer is complete when
//! [`SpiStatus::TRANSFER_COMPLETE`] (SPIF) is set; reading the status and
//! then touching the data register clears it.
//!
//! For the FIFO-based SSP see [`crate::ssp`].

use bitflags::bitflags;
use embedded_hal::blocking;
use embedded_hal::spi::{self, Phase, Polarity};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub SpiRegisters {
        (0x00 => pub cr: ReadWrite<u32, CR::Register>),
        (0x04 => pub sr: ReadOnly<u32, SR::Register>),
        (0x08 => pub dr: ReadWrite<u32>),
        (0x0C => pub ccr: ReadWrite<u32>),
        (0x10 => _reserved0),
        (0x1C => pub int: ReadWrite<u32, INT::Register>),
        (0x20 => @END),
    }
}

register_bitfields![u32,
    pub CR [
        BITENABLE OFFSET(2) NUMBITS(1) [],
        CPHA OFFSET(3) NUMBITS(1) [],
        CPOL OFFSET(4) NUMBITS(1) [],
        MSTR OFFSET(5) NUMBITS(1) [],
        LSBF OFFSET(6) NUMBITS(1) [],
        SPIE OFFSET(7) NUMBITS(1) [],
        /// 8..=15, 0 means 16.
        BITS OFFSET(8) NUMBITS(4) []
    ],
    pub SR [
        ABRT OFFSET(3) NUMBITS(1) [],
        MODF OFFSET(4) NUMBITS(1) [],
        ROVR OFFSET(5) NUMBITS(1) [],
        WCOL OFFSET(6) NUMBITS(1) [],
        SPIF OFFSET(7) NUMBITS(1) []
    ],
    pub INT [
        SPIF OFFSET(0) NUMBITS(1) []
    ]
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    Slave,
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpiStatus: u32 {
        const SLAVE_ABORT = 1 << 3;
        const MODE_FAULT = 1 << 4;
        const READ_OVERRUN = 1 << 5;
        const WRITE_COLLISION = 1 << 6;
        const TRANSFER_COMPLETE = 1 << 7;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    SlaveAbort,
    ModeFault,
    Overrun,
    WriteCollision,
}

pub struct Spi<'a> {
    regs: &'a SpiRegisters,
}

impl<'a> Spi<'a> {
    pub fn new(regs: &'a SpiRegisters) -> Self {
        Spi { regs }
    }

    pub fn registers(&self) -> &'a SpiRegisters {
        self.regs
    }

    pub fn send(&self, word: u16) {
        self.regs.dr.set(word as u32);
    }

    pub fn recv(&self) -> u16 {
        self.regs.dr.get() as u16
    }

    pub fn is_busy(&self) -> bool {
        !self.regs.sr.is_set(SR::SPIF)
    }

    /// Use the word length from [`Spi::set_alt_word_length`] instead of 8 bits.
    pub fn enable_alt_word_length(&self) {
        self.regs.cr.modify(CR::BITENABLE::SET);
    }

    pub fn disable_alt_word_length(&self) {
        self.regs.cr.modify(CR::BITENABLE::CLEAR);
    }

    pub fn alt_word_length_is_enabled(&self) -> bool {
        self.regs.cr.is_set(CR::BITENABLE)
    }

    pub fn set_alt_word_length(&self, bits: u8) {
        assert!((8..=16).contains(&bits), "SPI word length must be within 8..=16");
        self.regs.cr.modify(CR::BITS.val(bits as u32 & 0xf));
    }

    pub fn alt_word_length(&self) -> u8 {
        match self.regs.cr.read(CR::BITS) {
            0 => 16,
            bits => bits as u8,
        }
    }

    pub fn set_clock_phase(&self, phase: Phase) {
        match phase {
            Phase::CaptureOnFirstTransition => self.regs.cr.modify(CR::CPHA::CLEAR),
            Phase::CaptureOnSecondTransition => self.regs.cr.modify(CR::CPHA::SET),
        }
    }

    pub fn clock_phase(&self) -> Phase {
        if self.regs.cr.is_set(CR::CPHA) {
            Phase::CaptureOnSecondTransition
        } else {
            Phase::CaptureOnFirstTransition
        }
    }

    pub fn set_clock_polarity(&self, polarity: Polarity) {
        match polarity {
            Polarity::IdleLow => self.regs.cr.modify(CR::CPOL::CLEAR),
            Polarity::IdleHigh => self.regs.cr.modify(CR::CPOL::SET),
        }
    }

    pub fn clock_polarity(&self) -> Polarity {
        if self.regs.cr.is_set(CR::CPOL) {
            Polarity::IdleHigh
        } else {
            Polarity::IdleLow
        }
    }

    pub fn set_mode(&self, mode: SpiMode) {
        match mode {
            SpiMode::Slave => self.regs.cr.modify(CR::MSTR::CLEAR),
            SpiMode::Master => self.regs.cr.modify(CR::MSTR::SET),
        }
    }

    pub fn mode(&self) -> SpiMode {
        if self.regs.cr.is_set(CR::MSTR) {
            SpiMode::Master
        } else {
            SpiMode::Slave
        }
    }

    pub fn set_bit_order(&self, order: BitOrder) {
        match order {
            BitOrder::MsbFirst => self.regs.cr.modify(CR::LSBF::CLEAR),
            BitOrder::LsbFirst => self.regs.cr.modify(CR::LSBF::SET),
        }
    }

    pub fn bit_order(&self) -> BitOrder {
        if self.regs.cr.is_set(CR::LSBF) {
            BitOrder::LsbFirst
        } else {
            BitOrder::MsbFirst
        }
    }

    pub fn enable_interrupt(&self) {
        self.regs.cr.modify(CR::SPIE::SET);
    }

    pub fn disable_interrupt(&self) {
        self.regs.cr.modify(CR::SPIE::CLEAR);
    }

    pub fn interrupt_is_enabled(&self) -> bool {
        self.regs.cr.is_set(CR::SPIE)
    }

    pub fn interrupt_is_pending(&self) -> bool {
        self.regs.int.is_set(INT::SPIF)
    }

    /// Write-one-to-clear.
    pub fn clear_pending_interrupt(&self) {
        self.regs.int.write(INT::SPIF::SET);
    }

    pub fn status(&self) -> SpiStatus {
        SpiStatus::from_bits_truncate(self.regs.sr.get())
    }

    /// MODF clears on a status read followed by a CR write. Rewrites CR with
    /// its current contents.
    pub fn clear_mode_fault(&self) {
        let _ = self.status();
        self.regs.cr.set(self.regs.cr.get());
    }

    /// SCK = PCLK / `divider`. Master mode needs an even divider of at
    /// least 8.
    pub fn set_clock_divider(&self, divider: u8) {
        assert!(divider >= 8 && divider % 2 == 0, "SPI clock divider must be even and >= 8");
        self.regs.ccr.set(divider as u32);
    }

    pub fn clock_divider(&self) -> u8 {
        self.regs.ccr.get() as u8
    }

    /// Send a word and busy-wait for the word clocked in at the same time.
    pub fn xfer(&self, word: u16) -> u16 {
        self.send(word);
        while self.is_busy() {}
        self.recv()
    }
}

impl<'a> spi::FullDuplex<u8> for Spi<'a> {
    type Error = Error;

    fn read(&mut self) -> nb::Result<u8, Error> {
        let status = self.status();

        if status.contains(SpiStatus::MODE_FAULT) {
            self.clear_mode_fault();
            Err(nb::Error::Other(Error::ModeFault))
        } else if status.contains(SpiStatus::SLAVE_ABORT) {
            Err(nb::Error::Other(Error::SlaveAbort))
        } else if status.contains(SpiStatus::READ_OVERRUN) {
            Err(nb::Error::Other(Error::Overrun))
        } else if status.contains(SpiStatus::WRITE_COLLISION) {
            Err(nb::Error::Other(Error::WriteCollision))
        } else if status.contains(SpiStatus::TRANSFER_COMPLETE) {
            Ok(self.recv() as u8)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn send(&mut self, byte: u8) -> nb::Result<(), Error> {
        Spi::send(self, byte as u16);
        Ok(())
    }
}

impl<'a> blocking::spi::transfer::Default<u8> for Spi<'a> {}

impl<'a> blocking::spi::write::Default<u8> for Spi<'a> {}
