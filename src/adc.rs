//! Analog to digital converter
//!
//! Eight multiplexed inputs, 10-bit results. The ADC clock, PCLK divided by
//! `CLKDIV + 1`, must not exceed 4.5 MHz.
//!
//! Enable the converter's power line in [`crate::syscon`] and route the input
//! pins through [`crate::pinsel`] before use.

use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub AdcRegisters {
        (0x00 => pub cr: ReadWrite<u32, CR::Register>),
        /// Global data register, result of the most recent conversion.
        (0x04 => pub gdr: ReadWrite<u32, DR::Register>),
        /// Global start, LPC2148 only.
        (0x08 => pub gsr: WriteOnly<u32>),
        (0x0C => pub inten: ReadWrite<u32>),
        (0x10 => pub dr: [ReadOnly<u32, DR::Register>; 8]),
        (0x30 => pub stat: ReadOnly<u32>),
        (0x34 => @END),
    }
}

register_bitfields![u32,
    pub CR [
        SEL OFFSET(0) NUMBITS(8) [],
        CLKDIV OFFSET(8) NUMBITS(8) [],
        BURST OFFSET(16) NUMBITS(1) [],
        CLKS OFFSET(17) NUMBITS(3) [],
        /// Set for normal operation.
        PDN OFFSET(21) NUMBITS(1) [],
        START OFFSET(24) NUMBITS(3) [],
        EDGE OFFSET(27) NUMBITS(1) []
    ],
    pub DR [
        RESULT OFFSET(6) NUMBITS(10) [],
        CHN OFFSET(24) NUMBITS(3) [],
        OVERRUN OFFSET(30) NUMBITS(1) [],
        DONE OFFSET(31) NUMBITS(1) []
    ]
];

pub const CHANNELS: u8 = 8;

/// Result width in burst mode; fewer bits convert faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BurstResolution {
    /// 11 clocks
    Bits10 = 0,
    Bits9 = 1,
    Bits8 = 2,
    Bits7 = 3,
    Bits6 = 4,
    Bits5 = 5,
    Bits4 = 6,
    /// 4 clocks
    Bits3 = 7,
}

impl From<u32> for BurstResolution {
    fn from(bits: u32) -> BurstResolution {
        match bits & 0x7 {
            0 => BurstResolution::Bits10,
            1 => BurstResolution::Bits9,
            2 => BurstResolution::Bits8,
            3 => BurstResolution::Bits7,
            4 => BurstResolution::Bits6,
            5 => BurstResolution::Bits5,
            6 => BurstResolution::Bits4,
            _ => BurstResolution::Bits3,
        }
    }
}

/// When a conversion starts. Packs START and EDGE together; EDGE is ignored
/// by `Stop` and `Now`, so those have a second encoding with EDGE set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StartMode {
    Stop = 0,
    Now = 1,
    Timer0Match2Rising = 2,
    Timer0Match0Rising = 3,
    Timer0Match1Rising = 4,
    Timer0Match3Rising = 5,
    Timer1Match0Rising = 6,
    Timer1Match1Rising = 7,
    StopEdge = 8,
    NowEdge = 9,
    Timer0Match2Falling = 10,
    Timer0Match0Falling = 11,
    Timer0Match1Falling = 12,
    Timer0Match3Falling = 13,
    Timer1Match0Falling = 14,
    Timer1Match1Falling = 15,
}

impl From<u32> for StartMode {
    fn from(bits: u32) -> StartMode {
        match bits & 0xf {
            0 => StartMode::Stop,
            1 => StartMode::Now,
            2 => StartMode::Timer0Match2Rising,
            3 => StartMode::Timer0Match0Rising,
            4 => StartMode::Timer0Match1Rising,
            5 => StartMode::Timer0Match3Rising,
            6 => StartMode::Timer1Match0Rising,
            7 => StartMode::Timer1Match1Rising,
            8 => StartMode::StopEdge,
            9 => StartMode::NowEdge,
            10 => StartMode::Timer0Match2Falling,
            11 => StartMode::Timer0Match0Falling,
            12 => StartMode::Timer0Match1Falling,
            13 => StartMode::Timer0Match3Falling,
            14 => StartMode::Timer1Match0Falling,
            _ => StartMode::Timer1Match1Falling,
        }
    }
}

fn sel(channel: u8) -> Field<u32, CR::Register> {
    assert!(channel < CHANNELS, "ADC channel out of range");
    Field::<u32, CR::Register>::new(1, channel as usize)
}

pub struct Adc<'a> {
    regs: &'a AdcRegisters,
}

impl<'a> Adc<'a> {
    pub fn new(regs: &'a AdcRegisters) -> Self {
        Adc { regs }
    }

    pub fn registers(&self) -> &'a AdcRegisters {
        self.regs
    }

    /// Adds the inputs in `mask` (bit n is ADn) to the selection.
    pub fn enable_channel_mask(&self, mask: u8) {
        let sel = self.regs.cr.read(CR::SEL);
        self.regs.cr.modify(CR::SEL.val(sel | mask as u32));
    }

    pub fn disable_channel_mask(&self, mask: u8) {
        let sel = self.regs.cr.read(CR::SEL);
        self.regs.cr.modify(CR::SEL.val(sel & !(mask as u32)));
    }

    pub fn channel_mask(&self) -> u8 {
        self.regs.cr.read(CR::SEL) as u8
    }

    pub fn enable_channel(&self, channel: u8) {
        self.regs.cr.modify(sel(channel).val(1));
    }

    pub fn disable_channel(&self, channel: u8) {
        self.regs.cr.modify(sel(channel).val(0));
    }

    pub fn channel_is_enabled(&self, channel: u8) -> bool {
        self.regs.cr.read(sel(channel)) != 0
    }

    /// ADC clock = PCLK / (`divisor` + 1).
    pub fn set_clock_divisor(&self, divisor: u8) {
        self.regs.cr.modify(CR::CLKDIV.val(divisor as u32));
    }

    pub fn clock_divisor(&self) -> u8 {
        self.regs.cr.read(CR::CLKDIV) as u8
    }

    /// Convert the selected channels continuously. The start mode must be
    /// [`StartMode::Stop`] while bursting.
    pub fn enable_burst_mode(&self) {
        self.regs.cr.modify(CR::BURST::SET);
    }

    pub fn disable_burst_mode(&self) {
        self.regs.cr.modify(CR::BURST::CLEAR);
    }

    pub fn burst_mode_is_enabled(&self) -> bool {
        self.regs.cr.is_set(CR::BURST)
    }

    pub fn enable_power_down(&self) {
        self.regs.cr.modify(CR::PDN::CLEAR);
    }

    pub fn disable_power_down(&self) {
        self.regs.cr.modify(CR::PDN::SET);
    }

    pub fn power_down_is_enabled(&self) -> bool {
        !self.regs.cr.is_set(CR::PDN)
    }

    pub fn set_burst_resolution(&self, resolution: BurstResolution) {
        self.regs.cr.modify(CR::CLKS.val(resolution as u32));
    }

    pub fn burst_resolution(&self) -> BurstResolution {
        BurstResolution::from(self.regs.cr.read(CR::CLKS))
    }

    pub fn set_start_mode(&self, mode: StartMode) {
        let mode = mode as u32;
        self.regs
            .cr
            .modify(CR::START.val(mode & 0x7) + CR::EDGE.val(mode >> 3));
    }

    pub fn start_mode(&self) -> StartMode {
        StartMode::from(self.regs.cr.read(CR::START) | self.regs.cr.read(CR::EDGE) << 3)
    }

    /// Most recent result. Reading clears DONE.
    pub fn read(&self) -> u16 {
        self.regs.gdr.read(DR::RESULT) as u16
    }

    pub fn is_done(&self) -> bool {
        self.regs.gdr.is_set(DR::DONE)
    }

    /// A result was overwritten before being read.
    pub fn is_overrun(&self) -> bool {
        self.regs.gdr.is_set(DR::OVERRUN)
    }

    pub fn is_busy(&self) -> bool {
        !self.is_done()
    }

    /// Channel the most recent result belongs to.
    pub fn last_channel(&self) -> u8 {
        self.regs.gdr.read(DR::CHN) as u8
    }

    /// Latest result of one channel, from its own data register.
    pub fn read_channel(&self, channel: u8) -> u16 {
        assert!(channel < CHANNELS, "ADC channel out of range");
        self.regs.dr[channel as usize].read(DR::RESULT) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;
    use tock_registers::interfaces::Writeable;

    fn poke<T>(reg: &T, value: u32) {
        unsafe { (reg as *const T as *mut u32).write_volatile(value) };
    }

    #[test]
    fn channel_toggles_touch_one_bit() {
        let regs = zeroed_registers::<AdcRegisters>();
        regs.cr.set(0x0021_0400);
        let adc = Adc::new(&regs);

        adc.enable_channel(3);
        assert_eq!(regs.cr.get(), 0x0021_0408);
        adc.enable_channel_mask(0x81);
        assert_eq!(adc.channel_mask(), 0x89);
        adc.disable_channel(0);
        assert!(!adc.channel_is_enabled(0));
        assert!(adc.channel_is_enabled(7));
        adc.disable_channel_mask(0xff);
        assert_eq!(regs.cr.get(), 0x0021_0400);
    }

    #[test]
    fn power_down_is_pdn_clear() {
        let regs = zeroed_registers::<AdcRegisters>();
        let adc = Adc::new(&regs);

        assert!(adc.power_down_is_enabled());
        adc.disable_power_down();
        assert_eq!(regs.cr.get(), 1 << 21);
        assert!(!adc.power_down_is_enabled());
    }

    #[test]
    fn start_mode_spans_start_and_edge() {
        let regs = zeroed_registers::<AdcRegisters>();
        let adc = Adc::new(&regs);

        adc.set_start_mode(StartMode::Timer0Match3Falling);
        assert_eq!(regs.cr.get(), (5 << 24) | (1 << 27));
        assert_eq!(adc.start_mode(), StartMode::Timer0Match3Falling);

        adc.set_start_mode(StartMode::Now);
        assert_eq!(regs.cr.get(), 1 << 24);
    }

    #[test]
    fn clock_and_resolution_fields() {
        let regs = zeroed_registers::<AdcRegisters>();
        let adc = Adc::new(&regs);

        adc.set_clock_divisor(3);
        adc.set_burst_resolution(BurstResolution::Bits4);
        adc.enable_burst_mode();
        assert_eq!(regs.cr.get(), (3 << 8) | (1 << 16) | (6 << 17));
        assert_eq!(adc.burst_resolution(), BurstResolution::Bits4);
        assert_eq!(adc.clock_divisor(), 3);
    }

    #[test]
    fn results() {
        let regs = zeroed_registers::<AdcRegisters>();
        let adc = Adc::new(&regs);
        assert!(adc.is_busy());

        regs.gdr.set((1 << 31) | (5 << 24) | (0x3ff << 6));
        assert!(adc.is_done());
        assert!(!adc.is_overrun());
        assert_eq!(adc.read(), 0x3ff);
        assert_eq!(adc.last_channel(), 5);

        poke(&regs.dr[2], 0x200 << 6);
        assert_eq!(adc.read_channel(2), 0x200);
    }
}
