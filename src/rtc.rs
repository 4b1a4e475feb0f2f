//! Real-time clock
//!
//! Time counters clocked either by the 32.768 kHz oscillator (LPC2103,
//! LPC2148) or by PCLK through a prescaler that divides it down to
//! 32.768 kHz. The counters are readable one by one or, in one consistent
//! snapshot, through the consolidated CTIME registers.

use bitflags::bitflags;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

use crate::clock::Hertz;

register_structs! {
    pub RtcRegisters {
        /// Interrupt location, write 1 to clear.
        (0x00 => pub ilr: ReadWrite<u32>),
        (0x04 => pub ctc: ReadOnly<u32>),
        (0x08 => pub ccr: ReadWrite<u32, CCR::Register>),
        (0x0C => pub ciir: ReadWrite<u32>),
        (0x10 => pub amr: ReadWrite<u32>),
        (0x14 => pub ctime0: ReadOnly<u32, CTIME0::Register>),
        (0x18 => pub ctime1: ReadOnly<u32, CTIME1::Register>),
        (0x1C => pub ctime2: ReadOnly<u32, CTIME2::Register>),
        (0x20 => pub time: TimeRegisters),
        (0x40 => _reserved0),
        (0x60 => pub alarm: TimeRegisters),
        (0x80 => pub preint: ReadWrite<u32>),
        (0x84 => pub prefrac: ReadWrite<u32>),
        (0x88 => @END),
    }
}

register_structs! {
    /// One set of time counters, either the clock itself or the alarm.
    pub TimeRegisters {
        (0x00 => pub sec: ReadWrite<u32>),
        (0x04 => pub min: ReadWrite<u32>),
        (0x08 => pub hour: ReadWrite<u32>),
        (0x0C => pub dom: ReadWrite<u32>),
        (0x10 => pub dow: ReadWrite<u32>),
        (0x14 => pub doy: ReadWrite<u32>),
        (0x18 => pub month: ReadWrite<u32>),
        (0x1C => pub year: ReadWrite<u32>),
        (0x20 => @END),
    }
}

register_bitfields![u32,
    pub CCR [
        CLKEN OFFSET(0) NUMBITS(1) [],
        /// Holds the clock tick counter in reset while set
        CTCRST OFFSET(1) NUMBITS(1) [],
        /// Must be 0
        CTTEST OFFSET(2) NUMBITS(2) [],
        CLKSRC OFFSET(4) NUMBITS(1) [
            Prescaler = 0,
            Oscillator = 1
        ]
    ],
    pub CTIME0 [
        SEC OFFSET(0) NUMBITS(6) [],
        MIN OFFSET(8) NUMBITS(6) [],
        HOUR OFFSET(16) NUMBITS(5) [],
        DOW OFFSET(24) NUMBITS(3) []
    ],
    pub CTIME1 [
        DOM OFFSET(0) NUMBITS(5) [],
        MONTH OFFSET(8) NUMBITS(4) [],
        YEAR OFFSET(16) NUMBITS(12) []
    ],
    pub CTIME2 [
        DOY OFFSET(0) NUMBITS(12) []
    ]
];

/// Prescaler output frequency.
const TICK_RATE: u32 = 32_768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcClockSource {
    /// PCLK through PREINT/PREFRAC
    Prescaler,
    /// External 32.768 kHz crystal (not on the LPC2106)
    Oscillator,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RtcInterrupt: u32 {
        const COUNTER_INCREMENT = 1 << 0;
        const ALARM = 1 << 1;
    }
}

bitflags! {
    /// Time counters, for increment interrupts (CIIR) and the alarm mask
    /// (AMR).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimeFields: u32 {
        const SECOND = 1 << 0;
        const MINUTE = 1 << 1;
        const HOUR = 1 << 2;
        const DAY_OF_MONTH = 1 << 3;
        const DAY_OF_WEEK = 1 << 4;
        const DAY_OF_YEAR = 1 << 5;
        const MONTH = 1 << 6;
        const YEAR = 1 << 7;
    }
}

/// Calendar time as the RTC counts it. No validation is done; the counters
/// take whatever they're given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    /// 1..=31
    pub day_of_month: u8,
    /// 0..=6
    pub day_of_week: u8,
    /// 1..=366
    pub day_of_year: u16,
    /// 1..=12
    pub month: u8,
    pub year: u16,
}

impl TimeRegisters {
    fn get(&self) -> DateTime {
        DateTime {
            second: self.sec.get() as u8,
            minute: self.min.get() as u8,
            hour: self.hour.get() as u8,
            day_of_month: self.dom.get() as u8,
            day_of_week: self.dow.get() as u8,
            day_of_year: self.doy.get() as u16,
            month: self.month.get() as u8,
            year: self.year.get() as u16,
        }
    }

    fn set(&self, time: &DateTime) {
        self.sec.set(time.second as u32 & 0x3f);
        self.min.set(time.minute as u32 & 0x3f);
        self.hour.set(time.hour as u32 & 0x1f);
        self.dom.set(time.day_of_month as u32 & 0x1f);
        self.dow.set(time.day_of_week as u32 & 0x7);
        self.doy.set(time.day_of_year as u32 & 0x1ff);
        self.month.set(time.month as u32 & 0xf);
        self.year.set(time.year as u32 & 0xfff);
    }
}

pub struct Rtc<'a> {
    regs: &'a RtcRegisters,
}

impl<'a> Rtc<'a> {
    pub fn new(regs: &'a RtcRegisters) -> Self {
        Rtc { regs }
    }

    pub fn registers(&self) -> &'a RtcRegisters {
        self.regs
    }

    pub fn enable(&self) {
        self.regs.ccr.modify(CCR::CLKEN::SET);
    }

    pub fn disable(&self) {
        self.regs.ccr.modify(CCR::CLKEN::CLEAR);
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.ccr.is_set(CCR::CLKEN)
    }

    pub fn assert_reset(&self) {
        self.regs.ccr.modify(CCR::CTCRST::SET);
    }

    pub fn deassert_reset(&self) {
        self.regs.ccr.modify(CCR::CTCRST::CLEAR);
    }

    pub fn set_clock_source(&self, source: RtcClockSource) {
        match source {
            RtcClockSource::Prescaler => self.regs.ccr.modify(CCR::CLKSRC::Prescaler),
            RtcClockSource::Oscillator => self.regs.ccr.modify(CCR::CLKSRC::Oscillator),
        }
    }

    pub fn clock_source(&self) -> RtcClockSource {
        match self.regs.ccr.read_as_enum(CCR::CLKSRC) {
            Some(CCR::CLKSRC::Value::Oscillator) => RtcClockSource::Oscillator,
            _ => RtcClockSource::Prescaler,
        }
    }

    pub fn pending_interrupts(&self) -> RtcInterrupt {
        RtcInterrupt::from_bits_truncate(self.regs.ilr.get())
    }

    pub fn clear_pending_interrupts(&self, interrupts: RtcInterrupt) {
        self.regs.ilr.set(interrupts.bits());
    }

    /// Interrupt whenever one of `fields` increments.
    pub fn set_increment_interrupts(&self, fields: TimeFields) {
        self.regs.ciir.set(fields.bits());
    }

    pub fn increment_interrupts(&self) -> TimeFields {
        TimeFields::from_bits_truncate(self.regs.ciir.get())
    }

    /// Fields left out of the alarm comparison.
    pub fn set_alarm_mask(&self, fields: TimeFields) {
        self.regs.amr.set(fields.bits());
    }

    pub fn alarm_mask(&self) -> TimeFields {
        TimeFields::from_bits_truncate(self.regs.amr.get())
    }

    /// Snapshot of the current time, taken from the consolidated registers.
    pub fn time(&self) -> DateTime {
        let ctime0 = self.regs.ctime0.extract();
        let ctime1 = self.regs.ctime1.extract();

        DateTime {
            second: ctime0.read(CTIME0::SEC) as u8,
            minute: ctime0.read(CTIME0::MIN) as u8,
            hour: ctime0.read(CTIME0::HOUR) as u8,
            day_of_week: ctime0.read(CTIME0::DOW) as u8,
            day_of_month: ctime1.read(CTIME1::DOM) as u8,
            month: ctime1.read(CTIME1::MONTH) as u8,
            year: ctime1.read(CTIME1::YEAR) as u16,
            day_of_year: self.regs.ctime2.read(CTIME2::DOY) as u16,
        }
    }

    /// Best done with the clock disabled, so no counter rolls over midway.
    pub fn set_time(&self, time: &DateTime) {
        self.regs.time.set(time);
    }

    pub fn alarm(&self) -> DateTime {
        self.regs.alarm.get()
    }

    pub fn set_alarm(&self, alarm: &DateTime) {
        self.regs.alarm.set(alarm);
    }

    /// Divide `pclk` down to 32.768 kHz.
    pub fn set_prescaler(&self, pclk: Hertz) {
        assert!(pclk.0 >= 2 * TICK_RATE, "PCLK too slow for the RTC prescaler");
        let preint = pclk.0 / TICK_RATE - 1;
        let prefrac = pclk.0 - (preint + 1) * TICK_RATE;
        self.regs.preint.set(preint & 0x1fff);
        self.regs.prefrac.set(prefrac);
    }

    /// (PREINT, PREFRAC)
    pub fn prescaler(&self) -> (u32, u32) {
        (self.regs.preint.get(), self.regs.prefrac.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;

    fn poke<T>(reg: &T, value: u32) {
        unsafe { (reg as *const T as *mut u32).write_volatile(value) };
    }

    #[test]
    fn layout() {
        let regs = zeroed_registers::<RtcRegisters>();
        let base = &*regs as *const RtcRegisters as usize;

        assert_eq!(&regs.time.year as *const _ as usize - base, 0x3c);
        assert_eq!(&regs.alarm.sec as *const _ as usize - base, 0x60);
        assert_eq!(&regs.prefrac as *const _ as usize - base, 0x84);
    }

    #[test]
    fn prescaler_from_60mhz() {
        let regs = zeroed_registers::<RtcRegisters>();
        let rtc = Rtc::new(&regs);

        rtc.set_prescaler(Hertz(60_000_000));
        assert_eq!(rtc.prescaler(), (1830, 1792));
    }

    #[test]
    fn time_comes_from_consolidated_registers() {
        let regs = zeroed_registers::<RtcRegisters>();
        let rtc = Rtc::new(&regs);

        poke(&regs.ctime0, 30 | (15 << 8) | (12 << 16) | (3 << 24));
        poke(&regs.ctime1, 9 | (10 << 8) | (2024 << 16));
        poke(&regs.ctime2, 283);

        assert_eq!(
            rtc.time(),
            DateTime {
                second: 30,
                minute: 15,
                hour: 12,
                day_of_month: 9,
                day_of_week: 3,
                day_of_year: 283,
                month: 10,
                year: 2024,
            }
        );
    }

    #[test]
    fn set_time_and_alarm_use_separate_counters() {
        let regs = zeroed_registers::<RtcRegisters>();
        let rtc = Rtc::new(&regs);

        let now = DateTime { second: 59, minute: 59, hour: 23, year: 2025, ..DateTime::default() };
        let alarm = DateTime { hour: 7, ..DateTime::default() };
        rtc.set_time(&now);
        rtc.set_alarm(&alarm);

        assert_eq!(regs.time.hour.get(), 23);
        assert_eq!(regs.time.year.get(), 2025);
        assert_eq!(rtc.alarm(), alarm);
    }

    #[test]
    fn control_and_masks() {
        let regs = zeroed_registers::<RtcRegisters>();
        let rtc = Rtc::new(&regs);

        rtc.set_clock_source(RtcClockSource::Oscillator);
        rtc.enable();
        rtc.assert_reset();
        rtc.deassert_reset();
        assert_eq!(regs.ccr.get(), 0x11);
        assert_eq!(rtc.clock_source(), RtcClockSource::Oscillator);

        rtc.set_increment_interrupts(TimeFields::MINUTE | TimeFields::HOUR);
        assert_eq!(regs.ciir.get(), 0b110);
        rtc.set_alarm_mask(TimeFields::all() - TimeFields::HOUR);
        assert_eq!(rtc.alarm_mask(), TimeFields::all() - TimeFields::HOUR);

        rtc.clear_pending_interrupts(RtcInterrupt::ALARM);
        assert_eq!(regs.ilr.get(), 0b10);
        assert_eq!(rtc.pending_interrupts(), RtcInterrupt::ALARM);
    }
}
