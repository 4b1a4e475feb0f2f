//! Counter/Timers
//!
//! The LPC2xxx parts carry up to three flavours of the same counter/timer
//! block:
//!
//! - `CT16B`: 16-bit counter/timers (LPC2103),
//! - `CT32B`: 32-bit counter/timers (LPC2103),
//! - `TIMER`: the older 32-bit timers of the LPC2106/LPC2148, which lack the
//!   PWM control register.
//!
//! They all share one register layout ([`TimerRegisters`]), so the handles
//! [`Ct16b`], [`Ct32b`] and [`Timer`] are generated from a single macro and
//! only differ in count width, the interrupt sources they know about and
//! whether they can drive their match outputs as PWM.
//!
//! Each timer has four match channels. A channel's behaviour on match is a
//! 3-bit [`MatchControl`] packed at `channel * 3` in MCR, its external match
//! output behaviour a 2-bit [`ExtMatchControl`] at `4 + channel * 2` in EMR.
//! Capture inputs are configured the same way in CCR.

use bitflags::bitflags;
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    /// Counter/timer register block (CT16B, CT32B, TIMER).
    pub TimerRegisters {
        /// Interrupt register, write 1 to clear.
        (0x00 => pub ir: ReadWrite<u32, IR::Register>),
        (0x04 => pub tcr: ReadWrite<u32, TCR::Register>),
        (0x08 => pub tc: ReadWrite<u32>),
        (0x0C => pub pr: ReadWrite<u32>),
        (0x10 => pub pc: ReadWrite<u32>),
        (0x14 => pub mcr: ReadWrite<u32, MCR::Register>),
        (0x18 => pub mr: [ReadWrite<u32>; 4]),
        (0x28 => pub ccr: ReadWrite<u32, CCR::Register>),
        (0x2C => pub cr: [ReadOnly<u32>; 4]),
        (0x3C => pub emr: ReadWrite<u32, EMR::Register>),
        (0x40 => _reserved0),
        (0x70 => pub ctcr: ReadWrite<u32, CTCR::Register>),
        /// Only implemented on CT16B/CT32B.
        (0x74 => pub pwmc: ReadWrite<u32, PWMC::Register>),
        (0x78 => @END),
    }
}

register_bitfields![u32,
    pub IR [
        MR0 OFFSET(0) NUMBITS(1) [],
        MR1 OFFSET(1) NUMBITS(1) [],
        MR2 OFFSET(2) NUMBITS(1) [],
        MR3 OFFSET(3) NUMBITS(1) [],
        CR0 OFFSET(4) NUMBITS(1) [],
        CR1 OFFSET(5) NUMBITS(1) [],
        CR2 OFFSET(6) NUMBITS(1) [],
        CR3 OFFSET(7) NUMBITS(1) []
    ],
    pub TCR [
        /// Counter enable
        CE OFFSET(0) NUMBITS(1) [],
        /// Counter reset, holds TC and PC at zero while set
        CR OFFSET(1) NUMBITS(1) []
    ],
    pub MCR [
        MR0I OFFSET(0) NUMBITS(1) [],
        MR0R OFFSET(1) NUMBITS(1) [],
        MR0S OFFSET(2) NUMBITS(1) [],
        MR1I OFFSET(3) NUMBITS(1) [],
        MR1R OFFSET(4) NUMBITS(1) [],
        MR1S OFFSET(5) NUMBITS(1) [],
        MR2I OFFSET(6) NUMBITS(1) [],
        MR2R OFFSET(7) NUMBITS(1) [],
        MR2S OFFSET(8) NUMBITS(1) [],
        MR3I OFFSET(9) NUMBITS(1) [],
        MR3R OFFSET(10) NUMBITS(1) [],
        MR3S OFFSET(11) NUMBITS(1) []
    ],
    pub CCR [
        CAP0RE OFFSET(0) NUMBITS(1) [],
        CAP0FE OFFSET(1) NUMBITS(1) [],
        CAP0I OFFSET(2) NUMBITS(1) [],
        CAP1RE OFFSET(3) NUMBITS(1) [],
        CAP1FE OFFSET(4) NUMBITS(1) [],
        CAP1I OFFSET(5) NUMBITS(1) [],
        CAP2RE OFFSET(6) NUMBITS(1) [],
        CAP2FE OFFSET(7) NUMBITS(1) [],
        CAP2I OFFSET(8) NUMBITS(1) [],
        CAP3RE OFFSET(9) NUMBITS(1) [],
        CAP3FE OFFSET(10) NUMBITS(1) [],
        CAP3I OFFSET(11) NUMBITS(1) []
    ],
    pub EMR [
        EM0 OFFSET(0) NUMBITS(1) [],
        EM1 OFFSET(1) NUMBITS(1) [],
        EM2 OFFSET(2) NUMBITS(1) [],
        EM3 OFFSET(3) NUMBITS(1) [],
        EMC0 OFFSET(4) NUMBITS(2) [],
        EMC1 OFFSET(6) NUMBITS(2) [],
        EMC2 OFFSET(8) NUMBITS(2) [],
        EMC3 OFFSET(10) NUMBITS(2) []
    ],
    pub CTCR [
        MODE OFFSET(0) NUMBITS(2) [
            Timer = 0,
            Rising = 1,
            Falling = 2,
            Both = 3
        ],
        INPUT OFFSET(2) NUMBITS(2) []
    ],
    pub PWMC [
        PWM0 OFFSET(0) NUMBITS(1) [],
        PWM1 OFFSET(1) NUMBITS(1) [],
        PWM2 OFFSET(2) NUMBITS(1) [],
        PWM3 OFFSET(3) NUMBITS(1) []
    ]
];

/// Number of match (and capture) channels per timer.
pub const CHANNELS: u8 = 4;

/// What drives the timer counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Mode {
    /// Count every rising edge of PCLK (after the prescaler).
    Timer = 0,
    CountRisingEdges = 1,
    CountFallingEdges = 2,
    CountAllEdges = 3,
}

impl From<u32> for Mode {
    fn from(bits: u32) -> Mode {
        match bits & 0x3 {
            0 => Mode::Timer,
            1 => Mode::CountRisingEdges,
            2 => Mode::CountFallingEdges,
            _ => Mode::CountAllEdges,
        }
    }
}

/// Capture input counted in one of the counter modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CaptureInput {
    Cap0 = 0,
    Cap1 = 1,
    Cap2 = 2,
    Cap3 = 3,
}

impl From<u32> for CaptureInput {
    fn from(bits: u32) -> CaptureInput {
        match bits & 0x3 {
            0 => CaptureInput::Cap0,
            1 => CaptureInput::Cap1,
            2 => CaptureInput::Cap2,
            _ => CaptureInput::Cap3,
        }
    }
}

bitflags! {
    /// Actions taken when the counter reaches a channel's match value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MatchControl: u32 {
        const INTERRUPT = 1 << 0;
        const RESET = 1 << 1;
        const STOP = 1 << 2;
    }
}

/// External match output behaviour on match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ExtMatchControl {
    None = 0,
    Clear = 1,
    Set = 2,
    Toggle = 3,
}

impl From<u32> for ExtMatchControl {
    fn from(bits: u32) -> ExtMatchControl {
        match bits & 0x3 {
            0 => ExtMatchControl::None,
            1 => ExtMatchControl::Clear,
            2 => ExtMatchControl::Set,
            _ => ExtMatchControl::Toggle,
        }
    }
}

bitflags! {
    /// Capture input configuration.
    ///
    /// Must be empty for a channel whose input is being counted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CaptureControl: u32 {
        const RISING_EDGE = 1 << 0;
        const FALLING_EDGE = 1 << 1;
        const BOTH_EDGES = Self::RISING_EDGE.bits() | Self::FALLING_EDGE.bits();
        const INTERRUPT = 1 << 2;
    }
}

bitflags! {
    /// Timer interrupt sources, as found in IR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerInterrupt: u32 {
        const MR0 = 1 << 0;
        const MR1 = 1 << 1;
        const MR2 = 1 << 2;
        const MR3 = 1 << 3;
        const CR0 = 1 << 4;
        const CR1 = 1 << 5;
        const CR2 = 1 << 6;
        const CR3 = 1 << 7;
    }
}

fn match_control_field(channel: u8) -> Field<u32, MCR::Register> {
    Field::new(0b111, channel as usize * 3)
}

fn capture_control_field(channel: u8) -> Field<u32, CCR::Register> {
    Field::new(0b111, channel as usize * 3)
}

fn ext_match_control_field(channel: u8) -> Field<u32, EMR::Register> {
    Field::new(0b11, 4 + channel as usize * 2)
}

fn ext_match_bit_field(channel: u8) -> Field<u32, EMR::Register> {
    Field::new(0b1, channel as usize)
}

fn pwm_field(channel: u8) -> Field<u32, PWMC::Register> {
    Field::new(0b1, channel as usize)
}

macro_rules! counter_timer {
    ($(#[$attr:meta])* $Timer:ident: $Count:ty, [$($IT:ident)|+]) => {
        $(#[$attr])*
        pub struct $Timer<'a> {
            regs: &'a TimerRegisters,
        }

        impl<'a> $Timer<'a> {
            /// Interrupt sources this timer implements.
            pub const INTERRUPTS: TimerInterrupt = TimerInterrupt::empty()$(.union(TimerInterrupt::$IT))+;

            pub fn new(regs: &'a TimerRegisters) -> Self {
                $Timer { regs }
            }

            pub fn registers(&self) -> &'a TimerRegisters {
                self.regs
            }

            pub fn enable(&self) {
                self.regs.tcr.modify(TCR::CE::SET);
            }

            pub fn disable(&self) {
                self.regs.tcr.modify(TCR::CE::CLEAR);
            }

            pub fn is_enabled(&self) -> bool {
                self.regs.tcr.is_set(TCR::CE)
            }

            pub fn set_mode(&self, mode: Mode) {
                self.regs.ctcr.modify(CTCR::MODE.val(mode as u32));
            }

            pub fn mode(&self) -> Mode {
                Mode::from(self.regs.ctcr.read(CTCR::MODE))
            }

            /// Select the capture input counted in the counter modes.
            pub fn set_count_input(&self, input: CaptureInput) {
                self.regs.ctcr.modify(CTCR::INPUT.val(input as u32));
            }

            pub fn count_input(&self) -> CaptureInput {
                CaptureInput::from(self.regs.ctcr.read(CTCR::INPUT))
            }

            /// Hold the counter and prescale counter at zero.
            pub fn assert_reset(&self) {
                self.regs.tcr.modify(TCR::CR::SET);
            }

            pub fn deassert_reset(&self) {
                self.regs.tcr.modify(TCR::CR::CLEAR);
            }

            pub fn reset_is_asserted(&self) -> bool {
                self.regs.tcr.is_set(TCR::CR)
            }

            pub fn pending_interrupts(&self) -> TimerInterrupt {
                TimerInterrupt::from_bits_truncate(self.regs.ir.get()) & Self::INTERRUPTS
            }

            pub fn clear_pending_interrupts(&self, interrupts: TimerInterrupt) {
                debug_assert!(
                    Self::INTERRUPTS.contains(interrupts),
                    "interrupt source not implemented by this timer"
                );
                // Write-one-to-clear, zeroes are ignored.
                self.regs.ir.set(interrupts.bits());
            }

            pub fn set_count(&self, count: $Count) {
                self.regs.tc.set(count as u32);
            }

            pub fn count(&self) -> $Count {
                self.regs.tc.get() as $Count
            }

            /// The counter advances every `prescaler + 1` PCLK cycles.
            pub fn set_prescaler(&self, prescaler: $Count) {
                self.regs.pr.set(prescaler as u32);
            }

            pub fn prescaler(&self) -> $Count {
                self.regs.pr.get() as $Count
            }

            pub fn set_prescaler_count(&self, count: $Count) {
                self.regs.pc.set(count as u32);
            }

            pub fn prescaler_count(&self) -> $Count {
                self.regs.pc.get() as $Count
            }

            pub fn set_channel_match_control(&self, channel: u8, control: MatchControl) {
                assert!(channel < CHANNELS, "match channel out of range");
                debug_assert!(MatchControl::all().contains(control));
                self.regs.mcr.modify(match_control_field(channel).val(control.bits()));
            }

            pub fn channel_match_control(&self, channel: u8) -> MatchControl {
                assert!(channel < CHANNELS, "match channel out of range");
                MatchControl::from_bits_truncate(self.regs.mcr.read(match_control_field(channel)))
            }

            pub fn set_channel_match_value(&self, channel: u8, value: $Count) {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.mr[channel as usize].set(value as u32);
            }

            pub fn channel_match_value(&self, channel: u8) -> $Count {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.mr[channel as usize].get() as $Count
            }

            pub fn set_channel_ext_match_control(&self, channel: u8, control: ExtMatchControl) {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.emr.modify(ext_match_control_field(channel).val(control as u32));
            }

            pub fn channel_ext_match_control(&self, channel: u8) -> ExtMatchControl {
                assert!(channel < CHANNELS, "match channel out of range");
                ExtMatchControl::from(self.regs.emr.read(ext_match_control_field(channel)))
            }

            /// Drive the external match output directly.
            pub fn set_channel_ext_match_bit(&self, channel: u8, high: bool) {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.emr.modify(ext_match_bit_field(channel).val(high as u32));
            }

            pub fn channel_ext_match_bit(&self, channel: u8) -> bool {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.emr.read(ext_match_bit_field(channel)) != 0
            }

            pub fn set_capture_control(&self, channel: u8, control: CaptureControl) {
                assert!(channel < CHANNELS, "capture channel out of range");
                debug_assert!(CaptureControl::all().contains(control));
                self.regs.ccr.modify(capture_control_field(channel).val(control.bits()));
            }

            pub fn capture_control(&self, channel: u8) -> CaptureControl {
                assert!(channel < CHANNELS, "capture channel out of range");
                CaptureControl::from_bits_truncate(self.regs.ccr.read(capture_control_field(channel)))
            }

            /// Counter value latched by the last capture event on `channel`.
            pub fn capture_value(&self, channel: u8) -> $Count {
                assert!(channel < CHANNELS, "capture channel out of range");
                self.regs.cr[channel as usize].get() as $Count
            }
        }
    };
}

// PWMC only exists on the CT16B/CT32B variants.
macro_rules! counter_timer_pwm {
    ($Timer:ident) => {
        impl<'a> $Timer<'a> {
            /// Drive the channel's match output as PWM instead of through EMR.
            pub fn enable_channel_pwm(&self, channel: u8) {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.pwmc.modify(pwm_field(channel).val(1));
            }

            pub fn disable_channel_pwm(&self, channel: u8) {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.pwmc.modify(pwm_field(channel).val(0));
            }

            pub fn channel_pwm_is_enabled(&self, channel: u8) -> bool {
                assert!(channel < CHANNELS, "match channel out of range");
                self.regs.pwmc.read(pwm_field(channel)) != 0
            }
        }
    };
}

counter_timer! {
    /// 16-bit counter/timer (CT16B0, CT16B1).
    Ct16b: u16, [MR0 | MR1 | MR2 | MR3 | CR0]
}
counter_timer_pwm!(Ct16b);

counter_timer! {
    /// 32-bit counter/timer (CT32B0, CT32B1).
    Ct32b: u32, [MR0 | MR1 | MR2 | MR3 | CR0 | CR1 | CR2 | CR3]
}
counter_timer_pwm!(Ct32b);

counter_timer! {
    /// Legacy 32-bit timer (TIMER0, TIMER1).
    Timer: u32, [MR0 | MR1 | MR2 | MR3 | CR0 | CR1 | CR2 | CR3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;

    #[test]
    fn match_control_round_trips_without_touching_other_channels() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Ct32b::new(&regs);

        for channel in 0..CHANNELS {
            for bits in 0..8 {
                let control = MatchControl::from_bits_truncate(bits);
                let before: Vec<_> = (0..CHANNELS)
                    .map(|c| timer.channel_match_control(c))
                    .collect();

                timer.set_channel_match_control(channel, control);

                assert_eq!(timer.channel_match_control(channel), control);
                for other in (0..CHANNELS).filter(|c| *c != channel) {
                    assert_eq!(timer.channel_match_control(other), before[other as usize]);
                }
            }
        }
    }

    #[test]
    fn match_control_packs_three_bits_per_channel() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Ct16b::new(&regs);

        timer.set_channel_match_control(0, MatchControl::INTERRUPT);
        timer.set_channel_match_control(1, MatchControl::INTERRUPT | MatchControl::RESET);
        timer.set_channel_match_control(3, MatchControl::STOP);

        assert_eq!(regs.mcr.get(), 0b100_000_011_001);
        assert!(regs.mcr.is_set(MCR::MR1R));
        assert!(!regs.mcr.is_set(MCR::MR2I));
    }

    #[test]
    fn ext_match_control_lives_above_the_match_bits() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Timer::new(&regs);

        timer.set_channel_ext_match_bit(2, true);
        timer.set_channel_ext_match_control(2, ExtMatchControl::Toggle);
        timer.set_channel_ext_match_control(0, ExtMatchControl::Clear);

        assert_eq!(regs.emr.get(), (0b11 << 8) | (0b01 << 4) | (1 << 2));
        assert_eq!(timer.channel_ext_match_control(2), ExtMatchControl::Toggle);
        assert_eq!(timer.channel_ext_match_control(1), ExtMatchControl::None);
        assert!(timer.channel_ext_match_bit(2));
        assert!(!timer.channel_ext_match_bit(0));

        timer.set_channel_ext_match_bit(2, false);
        assert_eq!(timer.channel_ext_match_control(2), ExtMatchControl::Toggle);
        assert!(!timer.channel_ext_match_bit(2));
    }

    #[test]
    fn capture_control_is_per_channel() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Timer::new(&regs);

        timer.set_capture_control(1, CaptureControl::BOTH_EDGES | CaptureControl::INTERRUPT);
        timer.set_capture_control(3, CaptureControl::RISING_EDGE);

        assert_eq!(regs.ccr.get(), (0b001 << 9) | (0b111 << 3));
        assert_eq!(timer.capture_control(0), CaptureControl::empty());
        assert_eq!(timer.capture_control(3), CaptureControl::RISING_EDGE);
    }

    #[test]
    fn enable_and_reset_are_independent_bits() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Ct16b::new(&regs);

        timer.assert_reset();
        timer.enable();
        assert!(timer.is_enabled());
        assert!(timer.reset_is_asserted());

        timer.deassert_reset();
        assert!(timer.is_enabled());
        assert!(!timer.reset_is_asserted());
        assert_eq!(regs.tcr.get(), 0b01);
    }

    #[test]
    fn mode_and_count_input_share_ctcr() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Ct32b::new(&regs);

        timer.set_count_input(CaptureInput::Cap2);
        timer.set_mode(Mode::CountFallingEdges);

        assert_eq!(timer.mode(), Mode::CountFallingEdges);
        assert_eq!(timer.count_input(), CaptureInput::Cap2);
        assert_eq!(regs.ctcr.get(), 0b10_10);
    }

    #[test]
    fn ct16b_only_reports_its_own_interrupts() {
        let regs = zeroed_registers::<TimerRegisters>();
        regs.ir.set(0xff);

        assert_eq!(Ct16b::new(&regs).pending_interrupts().bits(), 0x1f);
        assert_eq!(Ct32b::new(&regs).pending_interrupts().bits(), 0xff);
    }

    #[test]
    fn match_values_index_the_match_registers() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Ct16b::new(&regs);

        timer.set_channel_match_value(0, 1000);
        timer.set_channel_match_value(3, 0xffff);

        assert_eq!(regs.mr[0].get(), 1000);
        assert_eq!(regs.mr[1].get(), 0);
        assert_eq!(timer.channel_match_value(3), 0xffff);
    }

    #[test]
    fn pwm_channels_are_single_bits() {
        let regs = zeroed_registers::<TimerRegisters>();
        let timer = Ct32b::new(&regs);

        timer.enable_channel_pwm(0);
        timer.enable_channel_pwm(3);
        timer.disable_channel_pwm(0);

        assert_eq!(regs.pwmc.get(), 0b1000);
        assert!(timer.channel_pwm_is_enabled(3));
        assert!(!timer.channel_pwm_is_enabled(0));
    }

    #[test]
    #[should_panic]
    fn match_channel_four_is_rejected() {
        let regs = zeroed_registers::<TimerRegisters>();
        Ct32b::new(&regs).set_channel_match_control(4, MatchControl::RESET);
    }
}
