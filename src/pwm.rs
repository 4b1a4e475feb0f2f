//! Pulse Width Modulator (LPC2106, LPC2148)
//!
//! A counter/timer with seven match channels. MR0 sets the period, MR1-MR6
//! drive PWM1-PWM6. New match values only take effect after they have been
//! [latched](Pwm::latch).

use bitflags::bitflags;
use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub PwmRegisters {
        (0x00 => pub ir: ReadWrite<u32, IR::Register>),
        (0x04 => pub tcr: ReadWrite<u32, TCR::Register>),
        (0x08 => pub tc: ReadWrite<u32>),
        (0x0C => pub pr: ReadWrite<u32>),
        (0x10 => pub pc: ReadWrite<u32>),
        (0x14 => pub mcr: ReadWrite<u32>),
        (0x18 => pub mr0_3: [ReadWrite<u32>; 4]),
        (0x28 => _reserved0),
        (0x40 => pub mr4_6: [ReadWrite<u32>; 3]),
        (0x4C => pub pcr: ReadWrite<u32, PCR::Register>),
        (0x50 => pub ler: ReadWrite<u32>),
        (0x54 => @END),
    }
}

register_bitfields![u32,
    pub IR [
        MR0 OFFSET(0) NUMBITS(1) [],
        MR1 OFFSET(1) NUMBITS(1) [],
        MR2 OFFSET(2) NUMBITS(1) [],
        MR3 OFFSET(3) NUMBITS(1) [],
        MR4 OFFSET(8) NUMBITS(1) [],
        MR5 OFFSET(9) NUMBITS(1) [],
        MR6 OFFSET(10) NUMBITS(1) []
    ],
    pub TCR [
        CE OFFSET(0) NUMBITS(1) [],
        CR OFFSET(1) NUMBITS(1) [],
        PWMEN OFFSET(3) NUMBITS(1) [
            Timer = 0,
            Pwm = 1
        ]
    ],
    pub PCR [
        /// Double edge select for PWM2..PWM6
        PWMSEL OFFSET(2) NUMBITS(5) [],
        /// Output enable for PWM1..PWM6
        PWMENA OFFSET(9) NUMBITS(6) []
    ]
];

/// Highest match channel.
pub const MAX_CHANNEL: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmMode {
    /// Plain counter/timer.
    Timer,
    /// Match channels drive the PWM outputs and need latching.
    Pwm,
}

/// How a PWM output is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Set at period start, cleared at the channel's match.
    Single,
    /// Set at MR(n-1), cleared at MRn.
    Double,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PwmInterrupt: u32 {
        const MR0 = 1 << 0;
        const MR1 = 1 << 1;
        const MR2 = 1 << 2;
        const MR3 = 1 << 3;
        const MR4 = 1 << 8;
        const MR5 = 1 << 9;
        const MR6 = 1 << 10;
    }
}

bitflags! {
    /// Match registers to latch, bit n for MRn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LatchChannels: u32 {
        const MR0 = 1 << 0;
        const MR1 = 1 << 1;
        const MR2 = 1 << 2;
        const MR3 = 1 << 3;
        const MR4 = 1 << 4;
        const MR5 = 1 << 5;
        const MR6 = 1 << 6;
    }
}

pub use crate::timer::MatchControl;

pub struct Pwm<'a> {
    regs: &'a PwmRegisters,
}

impl<'a> Pwm<'a> {
    pub fn new(regs: &'a PwmRegisters) -> Self {
        Pwm { regs }
    }

    pub fn registers(&self) -> &'a PwmRegisters {
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

    pub fn set_mode(&self, mode: PwmMode) {
        match mode {
            PwmMode::Timer => self.regs.tcr.modify(TCR::PWMEN::Timer),
            PwmMode::Pwm => self.regs.tcr.modify(TCR::PWMEN::Pwm),
        }
    }

    pub fn mode(&self) -> PwmMode {
        if self.regs.tcr.is_set(TCR::PWMEN) {
            PwmMode::Pwm
        } else {
            PwmMode::Timer
        }
    }

    pub fn assert_reset(&self) {
        self.regs.tcr.modify(TCR::CR::SET);
    }

    pub fn deassert_reset(&self) {
        self.regs.tcr.modify(TCR::CR::CLEAR);
    }

    pub fn reset_is_asserted(&self) -> bool {
        self.regs.tcr.is_set(TCR::CR)
    }

    pub fn pending_interrupts(&self) -> PwmInterrupt {
        PwmInterrupt::from_bits_truncate(self.regs.ir.get())
    }

    pub fn clear_pending_interrupts(&self, interrupts: PwmInterrupt) {
        debug_assert!(PwmInterrupt::all().contains(interrupts));
        self.regs.ir.set(interrupts.bits());
    }

    pub fn set_count(&self, count: u32) {
        self.regs.tc.set(count);
    }

    pub fn count(&self) -> u32 {
        self.regs.tc.get()
    }

    pub fn set_prescaler(&self, prescaler: u32) {
        self.regs.pr.set(prescaler);
    }

    pub fn prescaler(&self) -> u32 {
        self.regs.pr.get()
    }

    pub fn set_prescaler_count(&self, count: u32) {
        self.regs.pc.set(count);
    }

    pub fn prescaler_count(&self) -> u32 {
        self.regs.pc.get()
    }

    pub fn set_channel_match_control(&self, channel: u8, control: MatchControl) {
        assert!(channel <= MAX_CHANNEL, "match channel out of range");
        let field = Field::<u32, ()>::new(0b111, channel as usize * 3);
        self.regs.mcr.modify(field.val(control.bits()));
    }

    pub fn channel_match_control(&self, channel: u8) -> MatchControl {
        assert!(channel <= MAX_CHANNEL, "match channel out of range");
        let field = Field::<u32, ()>::new(0b111, channel as usize * 3);
        MatchControl::from_bits_truncate(self.regs.mcr.read(field))
    }

    fn match_register(&self, channel: u8) -> &ReadWrite<u32> {
        assert!(channel <= MAX_CHANNEL, "match channel out of range");
        match channel {
            0..=3 => &self.regs.mr0_3[channel as usize],
            _ => &self.regs.mr4_6[channel as usize - 4],
        }
    }

    /// Takes effect at the next period once [latched](Pwm::latch) in PWM mode.
    pub fn set_channel_match_value(&self, channel: u8, value: u32) {
        self.match_register(channel).set(value);
    }

    pub fn channel_match_value(&self, channel: u8) -> u32 {
        self.match_register(channel).get()
    }

    fn output_field(channel: u8) -> Field<u32, PCR::Register> {
        assert!((1..=MAX_CHANNEL).contains(&channel), "PWM output out of range");
        Field::new(0b1, 9 + channel as usize - 1)
    }

    pub fn enable_output(&self, channel: u8) {
        self.regs.pcr.modify(Self::output_field(channel).val(1));
    }

    pub fn disable_output(&self, channel: u8) {
        self.regs.pcr.modify(Self::output_field(channel).val(0));
    }

    pub fn output_is_enabled(&self, channel: u8) -> bool {
        self.regs.pcr.read(Self::output_field(channel)) != 0
    }

    /// PWM1 is always single edge.
    pub fn set_edge_mode(&self, channel: u8, mode: EdgeMode) {
        assert!((2..=MAX_CHANNEL).contains(&channel), "no edge select for this channel");
        let field = Field::<u32, PCR::Register>::new(0b1, channel as usize);
        self.regs.pcr.modify(field.val((mode == EdgeMode::Double) as u32));
    }

    pub fn edge_mode(&self, channel: u8) -> EdgeMode {
        assert!((1..=MAX_CHANNEL).contains(&channel), "PWM output out of range");
        if channel == 1 {
            return EdgeMode::Single;
        }
        let field = Field::<u32, PCR::Register>::new(0b1, channel as usize);
        if self.regs.pcr.read(field) != 0 {
            EdgeMode::Double
        } else {
            EdgeMode::Single
        }
    }

    /// Mark match registers to be reloaded at the start of the next period.
    pub fn latch(&self, channels: LatchChannels) {
        debug_assert!(LatchChannels::all().contains(channels));
        self.regs.ler.set(self.regs.ler.get() | channels.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;

    #[test]
    fn upper_match_channels_skip_the_gap() {
        let regs = zeroed_registers::<PwmRegisters>();
        let pwm = Pwm::new(&regs);

        pwm.set_channel_match_value(3, 33);
        pwm.set_channel_match_value(4, 44);
        pwm.set_channel_match_value(6, 66);

        assert_eq!(regs.mr0_3[3].get(), 33);
        assert_eq!(regs.mr4_6[0].get(), 44);
        assert_eq!(regs.mr4_6[2].get(), 66);
        assert_eq!(pwm.channel_match_value(4), 44);
    }

    #[test]
    fn outputs_start_at_pcr_bit_nine() {
        let regs = zeroed_registers::<PwmRegisters>();
        let pwm = Pwm::new(&regs);

        pwm.enable_output(1);
        pwm.enable_output(6);
        assert_eq!(regs.pcr.get(), (1 << 9) | (1 << 14));

        pwm.disable_output(1);
        assert!(!pwm.output_is_enabled(1));
        assert!(pwm.output_is_enabled(6));
    }

    #[test]
    fn edge_mode_uses_pwmsel() {
        let regs = zeroed_registers::<PwmRegisters>();
        let pwm = Pwm::new(&regs);

        pwm.set_edge_mode(2, EdgeMode::Double);
        assert_eq!(regs.pcr.get(), 1 << 2);
        assert_eq!(pwm.edge_mode(2), EdgeMode::Double);
        assert_eq!(pwm.edge_mode(3), EdgeMode::Single);
    }

    #[test]
    fn mode_is_tcr_bit_three() {
        let regs = zeroed_registers::<PwmRegisters>();
        let pwm = Pwm::new(&regs);

        pwm.enable();
        pwm.set_mode(PwmMode::Pwm);
        assert_eq!(regs.tcr.get(), 0b1001);
        assert_eq!(pwm.mode(), PwmMode::Pwm);
    }

    #[test]
    fn match_control_reaches_channel_six() {
        let regs = zeroed_registers::<PwmRegisters>();
        let pwm = Pwm::new(&regs);

        pwm.set_channel_match_control(0, MatchControl::RESET);
        pwm.set_channel_match_control(6, MatchControl::INTERRUPT | MatchControl::STOP);

        assert_eq!(regs.mcr.get(), (0b101 << 18) | 0b010);
        assert_eq!(pwm.channel_match_control(6), MatchControl::INTERRUPT | MatchControl::STOP);
    }

    #[test]
    fn latch_accumulates() {
        let regs = zeroed_registers::<PwmRegisters>();
        let pwm = Pwm::new(&regs);

        pwm.latch(LatchChannels::MR0);
        pwm.latch(LatchChannels::MR2 | LatchChannels::MR6);
        assert_eq!(regs.ler.get(), 0b100_0101);
    }

    #[test]
    #[should_panic]
    fn pwm_output_zero_does_not_exist() {
        let regs = zeroed_registers::<PwmRegisters>();
        Pwm::new(&regs).enable_output(0);
    }
}
