//! UART register access
//!
//! The LPC2xxx UARTs are 16550-alikes with 16-byte FIFOs. Three offsets are
//! shared between registers:
//!
//! | offset | read            | write           | with DLAB set |
//! |--------|-----------------|-----------------|---------------|
//! | 0x00   | RBR             | THR             | DLL           |
//! | 0x04   | IER             | IER             | DLM           |
//! | 0x08   | IIR             | FCR             | IIR / FCR     |
//!
//! [`Uart::set_divisor`] and [`Uart::divisor`] take care of the DLAB dance
//! and put DLAB back the way they found it. Everything else assumes DLAB is
//! clear.
//!
//! For an `embedded-hal` driver on top of this, see [`crate::serial`].

use bitflags::bitflags;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{Aliased, ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

use crate::clock::Hertz;

register_structs! {
    pub UartRegisters {
        /// RBR (read) / THR (write), DLL while DLAB is set.
        (0x00 => pub rbr_thr: Aliased<u32, RBR::Register, THR::Register>),
        /// IER, DLM while DLAB is set.
        (0x04 => pub ier: ReadWrite<u32, IER::Register>),
        (0x08 => pub iir_fcr: Aliased<u32, IIR::Register, FCR::Register>),
        (0x0C => pub lcr: ReadWrite<u32, LCR::Register>),
        (0x10 => pub mcr: ReadWrite<u32, MCR::Register>),
        (0x14 => pub lsr: ReadOnly<u32, LSR::Register>),
        (0x18 => pub msr: ReadOnly<u32, MSR::Register>),
        (0x1C => pub scr: ReadWrite<u32>),
        /// Auto-baud control (LPC2103/LPC2148).
        (0x20 => pub acr: ReadWrite<u32>),
        (0x24 => _reserved0),
        /// Fractional divider (LPC2103/LPC2148).
        (0x28 => pub fdr: ReadWrite<u32, FDR::Register>),
        (0x2C => _reserved1),
        (0x30 => pub ter: ReadWrite<u32, TER::Register>),
        (0x34 => @END),
    }
}

register_bitfields![u32,
    pub RBR [
        DATA OFFSET(0) NUMBITS(8) []
    ],
    pub THR [
        DATA OFFSET(0) NUMBITS(8) []
    ],
    pub IER [
        RBR OFFSET(0) NUMBITS(1) [],
        THRE OFFSET(1) NUMBITS(1) [],
        RLS OFFSET(2) NUMBITS(1) [],
        ABEO OFFSET(8) NUMBITS(1) [],
        ABTO OFFSET(9) NUMBITS(1) []
    ],
    pub IIR [
        INTID OFFSET(0) NUMBITS(4) [],
        FIFOEN OFFSET(6) NUMBITS(2) [],
        ABEO OFFSET(8) NUMBITS(1) [],
        ABTO OFFSET(9) NUMBITS(1) []
    ],
    pub FCR [
        FIFOEN OFFSET(0) NUMBITS(1) [],
        RXRESET OFFSET(1) NUMBITS(1) [],
        TXRESET OFFSET(2) NUMBITS(1) [],
        RXTRIGGER OFFSET(6) NUMBITS(2) []
    ],
    pub LCR [
        WLS OFFSET(0) NUMBITS(2) [],
        SBS OFFSET(2) NUMBITS(1) [],
        /// Parity enable (bit 3) and parity select (bits 4-5)
        PARITY OFFSET(3) NUMBITS(3) [],
        BREAK OFFSET(6) NUMBITS(1) [],
        DLAB OFFSET(7) NUMBITS(1) []
    ],
    pub MCR [
        DTR OFFSET(0) NUMBITS(1) [],
        RTS OFFSET(1) NUMBITS(1) [],
        LOOPBACK OFFSET(4) NUMBITS(1) [],
        RTSEN OFFSET(6) NUMBITS(1) [],
        CTSEN OFFSET(7) NUMBITS(1) []
    ],
    pub LSR [
        RDR OFFSET(0) NUMBITS(1) [],
        OE OFFSET(1) NUMBITS(1) [],
        PE OFFSET(2) NUMBITS(1) [],
        FE OFFSET(3) NUMBITS(1) [],
        BI OFFSET(4) NUMBITS(1) [],
        THRE OFFSET(5) NUMBITS(1) [],
        TEMT OFFSET(6) NUMBITS(1) [],
        RXFE OFFSET(7) NUMBITS(1) []
    ],
    pub MSR [
        DCTS OFFSET(0) NUMBITS(1) [],
        DDSR OFFSET(1) NUMBITS(1) [],
        TERI OFFSET(2) NUMBITS(1) [],
        DDCD OFFSET(3) NUMBITS(1) [],
        CTS OFFSET(4) NUMBITS(1) [],
        DSR OFFSET(5) NUMBITS(1) [],
        RI OFFSET(6) NUMBITS(1) [],
        DCD OFFSET(7) NUMBITS(1) []
    ],
    pub FDR [
        DIVADDVAL OFFSET(0) NUMBITS(4) [],
        MULVAL OFFSET(4) NUMBITS(4) []
    ],
    pub TER [
        TXEN OFFSET(7) NUMBITS(1) []
    ]
];

bitflags! {
    /// Interrupt enables in IER.
    ///
    /// These do not map 1:1 onto [`InterruptId`]: several enables feed the
    /// same identification code and vice versa.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UartInterrupt: u32 {
        /// Receive data available, also enables the character timeout.
        const RX_DATA = 1 << 0;
        const TX_EMPTY = 1 << 1;
        const RX_LINE_STATUS = 1 << 2;
        const AUTOBAUD_END = 1 << 8;
        const AUTOBAUD_TIMEOUT = 1 << 9;
    }
}

/// Highest priority pending interrupt, as encoded in IIR[3:0].
///
/// Bit 0 is the inverted "interrupt pending" flag, so `NotPending` is `0x01`
/// while a modem status change reads as `0x00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InterruptId {
    ModemStatus = 0x00,
    NotPending = 0x01,
    TxEmpty = 0x02,
    RxData = 0x04,
    RxLineStatus = 0x06,
    CharTimeout = 0x0c,
}

impl InterruptId {
    pub fn from_bits(bits: u8) -> Option<InterruptId> {
        match bits {
            0x00 => Some(InterruptId::ModemStatus),
            0x01 => Some(InterruptId::NotPending),
            0x02 => Some(InterruptId::TxEmpty),
            0x04 => Some(InterruptId::RxData),
            0x06 => Some(InterruptId::RxLineStatus),
            0x0c => Some(InterruptId::CharTimeout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum WordLength {
    Bits5 = 0,
    Bits6 = 1,
    Bits7 = 2,
    Bits8 = 3,
}

impl From<u32> for WordLength {
    fn from(bits: u32) -> WordLength {
        match bits & 0x3 {
            0 => WordLength::Bits5,
            1 => WordLength::Bits6,
            2 => WordLength::Bits7,
            _ => WordLength::Bits8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    /// 1.5 stop bits with 5-bit words.
    Two,
}

/// Parity, as the combined PE/PS field of LCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Parity {
    None = 0b000,
    Odd = 0b001,
    Even = 0b011,
    /// Stick parity, always 1.
    ForceOne = 0b101,
    /// Stick parity, always 0.
    ForceZero = 0b111,
}

impl From<u32> for Parity {
    fn from(bits: u32) -> Parity {
        if bits & 0b001 == 0 {
            return Parity::None;
        }
        match bits & 0b111 {
            0b001 => Parity::Odd,
            0b011 => Parity::Even,
            0b101 => Parity::ForceOne,
            _ => Parity::ForceZero,
        }
    }
}

/// Receive FIFO fill level that raises the RX data interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RxFifoTrigger {
    Bytes1 = 0,
    Bytes4 = 1,
    Bytes8 = 2,
    Bytes14 = 3,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u32 {
        const RX_DATA_READY = 1 << 0;
        const OVERRUN_ERROR = 1 << 1;
        const PARITY_ERROR = 1 << 2;
        const FRAMING_ERROR = 1 << 3;
        const BREAK_INTERRUPT = 1 << 4;
        const TX_HOLDING_EMPTY = 1 << 5;
        const TX_EMPTY = 1 << 6;
        /// At least one byte in the RX FIFO has an error.
        const RX_FIFO_ERROR = 1 << 7;
    }
}

impl LineStatus {
    /// Receive errors reported alongside the next byte.
    pub const ERRORS: LineStatus = LineStatus::OVERRUN_ERROR
        .union(LineStatus::PARITY_ERROR)
        .union(LineStatus::FRAMING_ERROR)
        .union(LineStatus::BREAK_INTERRUPT);
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModemStatus: u32 {
        const DELTA_CTS = 1 << 0;
        const DELTA_DSR = 1 << 1;
        const TRAILING_EDGE_RI = 1 << 2;
        const DELTA_DCD = 1 << 3;
        const CTS = 1 << 4;
        const DSR = 1 << 5;
        const RI = 1 << 6;
        const DCD = 1 << 7;
    }
}

/// Divisor latch value for `baudrate` given the UART's peripheral clock,
/// rounded to the nearest integer.
pub const fn divisor_for(pclk: Hertz, baudrate: u32) -> u32 {
    ((pclk.0 / 16) + baudrate / 2) / baudrate
}

pub struct Uart<'a> {
    regs: &'a UartRegisters,
}

impl<'a> Uart<'a> {
    pub fn new(regs: &'a UartRegisters) -> Self {
        Uart { regs }
    }

    pub fn registers(&self) -> &'a UartRegisters {
        self.regs
    }

    /// Pop the next byte from the receive buffer.
    pub fn recv(&self) -> u8 {
        self.regs.rbr_thr.read(RBR::DATA) as u8
    }

    /// Push a byte into the transmit holding register.
    pub fn send(&self, byte: u8) {
        self.regs.rbr_thr.write(THR::DATA.val(byte as u32));
    }

    pub fn enable_interrupts(&self, interrupts: UartInterrupt) {
        debug_assert!(UartInterrupt::all().contains(interrupts));
        self.regs.ier.set(self.regs.ier.get() | interrupts.bits());
    }

    pub fn disable_interrupts(&self, interrupts: UartInterrupt) {
        debug_assert!(UartInterrupt::all().contains(interrupts));
        self.regs.ier.set(self.regs.ier.get() & !interrupts.bits());
    }

    pub fn enabled_interrupts(&self) -> UartInterrupt {
        UartInterrupt::from_bits_truncate(self.regs.ier.get())
    }

    /// Reading IIR acknowledges a pending TX-empty interrupt.
    ///
    /// Reserved codes never show up on real hardware and read as
    /// [`InterruptId::NotPending`].
    pub fn pending_interrupt_id(&self) -> InterruptId {
        let id = self.regs.iir_fcr.read(IIR::INTID) as u8;
        InterruptId::from_bits(id).unwrap_or(InterruptId::NotPending)
    }

    pub fn set_word_length(&self, length: WordLength) {
        self.regs.lcr.modify(LCR::WLS.val(length as u32));
    }

    pub fn word_length(&self) -> WordLength {
        WordLength::from(self.regs.lcr.read(LCR::WLS))
    }

    pub fn set_stop_bits(&self, stop_bits: StopBits) {
        match stop_bits {
            StopBits::One => self.regs.lcr.modify(LCR::SBS::CLEAR),
            StopBits::Two => self.regs.lcr.modify(LCR::SBS::SET),
        }
    }

    pub fn stop_bits(&self) -> StopBits {
        if self.regs.lcr.is_set(LCR::SBS) {
            StopBits::Two
        } else {
            StopBits::One
        }
    }

    pub fn set_parity(&self, parity: Parity) {
        self.regs.lcr.modify(LCR::PARITY.val(parity as u32));
    }

    pub fn parity(&self) -> Parity {
        Parity::from(self.regs.lcr.read(LCR::PARITY))
    }

    /// Reading LSR clears the error bits it reports.
    pub fn line_status(&self) -> LineStatus {
        LineStatus::from_bits_truncate(self.regs.lsr.get())
    }

    /// Reading MSR clears the delta bits it reports.
    pub fn modem_status(&self) -> ModemStatus {
        ModemStatus::from_bits_truncate(self.regs.msr.get())
    }

    pub fn enable_tx(&self) {
        self.regs.ter.modify(TER::TXEN::SET);
    }

    /// Holds bytes in the TX FIFO until re-enabled; used for software flow
    /// control.
    pub fn disable_tx(&self) {
        self.regs.ter.modify(TER::TXEN::CLEAR);
    }

    pub fn tx_is_enabled(&self) -> bool {
        self.regs.ter.is_set(TER::TXEN)
    }

    /// Force TXD low until [`Uart::end_break`].
    pub fn start_break(&self) {
        self.regs.lcr.modify(LCR::BREAK::SET);
    }

    pub fn end_break(&self) {
        self.regs.lcr.modify(LCR::BREAK::CLEAR);
    }

    pub fn is_in_break(&self) -> bool {
        self.regs.lcr.is_set(LCR::BREAK)
    }

    pub fn enable_loopback(&self) {
        self.regs.mcr.modify(MCR::LOOPBACK::SET);
    }

    pub fn disable_loopback(&self) {
        self.regs.mcr.modify(MCR::LOOPBACK::CLEAR);
    }

    pub fn loopback_is_enabled(&self) -> bool {
        self.regs.mcr.is_set(MCR::LOOPBACK)
    }

    /// `true` drives the (active low) DTR line active.
    pub fn set_dtr(&self, active: bool) {
        self.regs.mcr.modify(MCR::DTR.val(active as u32));
    }

    pub fn dtr(&self) -> bool {
        self.regs.mcr.is_set(MCR::DTR)
    }

    pub fn set_rts(&self, active: bool) {
        self.regs.mcr.modify(MCR::RTS.val(active as u32));
    }

    pub fn rts(&self) -> bool {
        self.regs.mcr.is_set(MCR::RTS)
    }

    pub fn enable_auto_rts(&self) {
        self.regs.mcr.modify(MCR::RTSEN::SET);
    }

    pub fn disable_auto_rts(&self) {
        self.regs.mcr.modify(MCR::RTSEN::CLEAR);
    }

    pub fn auto_rts_is_enabled(&self) -> bool {
        self.regs.mcr.is_set(MCR::RTSEN)
    }

    pub fn enable_auto_cts(&self) {
        self.regs.mcr.modify(MCR::CTSEN::SET);
    }

    pub fn disable_auto_cts(&self) {
        self.regs.mcr.modify(MCR::CTSEN::CLEAR);
    }

    pub fn auto_cts_is_enabled(&self) -> bool {
        self.regs.mcr.is_set(MCR::CTSEN)
    }

    /// Also enables the FIFOs, which must stay enabled for the UART to work.
    pub fn set_rx_fifo_trigger(&self, trigger: RxFifoTrigger) {
        self.regs
            .iir_fcr
            .write(FCR::RXTRIGGER.val(trigger as u32) + FCR::FIFOEN::SET);
    }

    /// FCR is write-only, so this also resets the RX trigger level to one
    /// byte.
    pub fn flush_rx_fifo(&self) {
        self.regs.iir_fcr.write(FCR::FIFOEN::SET + FCR::RXRESET::SET);
    }

    /// See [`Uart::flush_rx_fifo`] about the RX trigger level.
    pub fn flush_tx_fifo(&self) {
        self.regs.iir_fcr.write(FCR::FIFOEN::SET + FCR::TXRESET::SET);
    }

    pub fn enable_fifos(&self) {
        self.regs.iir_fcr.write(FCR::FIFOEN::SET);
    }

    pub fn disable_fifos(&self) {
        self.regs.iir_fcr.set(0);
    }

    /// Whether IIR reports the FIFOs as enabled.
    pub fn fifos_are_enabled(&self) -> bool {
        self.regs.iir_fcr.read(IIR::FIFOEN) == 0b11
    }

    /// Runs `f` with DLAB set, then restores DLAB to its previous state.
    fn with_divisor_latch<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&UartRegisters) -> R,
    {
        let dlab = self.regs.lcr.read(LCR::DLAB);
        self.regs.lcr.modify(LCR::DLAB::SET);
        let ret = f(self.regs);
        self.regs.lcr.modify(LCR::DLAB.val(dlab));
        ret
    }

    /// Program the 16-bit baud rate divisor: `baud = PCLK / (16 * divisor)`.
    pub fn set_divisor(&self, divisor: u16) {
        self.with_divisor_latch(|regs| {
            regs.rbr_thr.set((divisor & 0xff) as u32);
            regs.ier.set((divisor >> 8) as u32);
        });
    }

    pub fn divisor(&self) -> u16 {
        self.with_divisor_latch(|regs| {
            let dll = regs.rbr_thr.get() & 0xff;
            let dlm = regs.ier.get() & 0xff;
            ((dlm << 8) | dll) as u16
        })
    }

    /// Fractional divider: `baud = PCLK / (16 * divisor * (1 + divaddval / mulval))`.
    ///
    /// `divaddval = 0` turns it off. Not implemented on the LPC2106.
    pub fn set_fractional_divider(&self, divaddval: u8, mulval: u8) {
        assert!((1..=15).contains(&mulval), "MULVAL must be within 1..=15");
        assert!(divaddval < mulval || divaddval == 0, "DIVADDVAL must be below MULVAL");
        self.regs
            .fdr
            .write(FDR::DIVADDVAL.val(divaddval as u32) + FDR::MULVAL.val(mulval as u32));
    }

    pub fn fractional_divider(&self) -> (u8, u8) {
        (
            self.regs.fdr.read(FDR::DIVADDVAL) as u8,
            self.regs.fdr.read(FDR::MULVAL) as u8,
        )
    }

    pub fn set_scratch(&self, value: u8) {
        self.regs.scr.set(value as u32);
    }

    pub fn scratch(&self) -> u8 {
        self.regs.scr.get() as u8
    }
}
