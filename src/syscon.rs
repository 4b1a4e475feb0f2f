//! System control block
//!
//! Memory accelerator, memory mapping, PLL, power control, APB divider,
//! external interrupt configuration and reset source identification.
//!
//! The PLL registers only take new values after a [feed
//! sequence](Syscon::feed_pll). An interrupt landing between the two feed
//! writes aborts the sequence, so IRQs should be masked around it.
//!
//! Most users want [`crate::clock`] instead of poking the PLL by hand.

use bitflags::bitflags;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub SysconRegisters {
        (0x000 => pub mamcr: ReadWrite<u32, MAMCR::Register>),
        (0x004 => pub mamtim: ReadWrite<u32, MAMTIM::Register>),
        (0x008 => _reserved0),
        (0x040 => pub memmap: ReadWrite<u32, MEMMAP::Register>),
        (0x044 => _reserved1),
        (0x080 => pub pllcon: ReadWrite<u32, PLLCON::Register>),
        (0x084 => pub pllcfg: ReadWrite<u32, PLLCFG::Register>),
        (0x088 => pub pllstat: ReadOnly<u32, PLLSTAT::Register>),
        (0x08C => pub pllfeed: WriteOnly<u32>),
        (0x090 => _reserved2),
        (0x0C0 => pub pcon: ReadWrite<u32, PCON::Register>),
        (0x0C4 => pub pconp: ReadWrite<u32>),
        (0x0C8 => _reserved3),
        (0x100 => pub apbdiv: ReadWrite<u32, APBDIV::Register>),
        (0x104 => _reserved4),
        (0x140 => pub extint: ReadWrite<u32>),
        (0x144 => pub intwake: ReadWrite<u32>),
        (0x148 => pub extmode: ReadWrite<u32>),
        (0x14C => pub extpolar: ReadWrite<u32>),
        (0x150 => _reserved5),
        (0x180 => pub rsid: ReadWrite<u32>),
        (0x184 => pub cspr: ReadOnly<u32>),
        (0x188 => _reserved6),
        (0x1A0 => pub scs: ReadWrite<u32, SCS::Register>),
        (0x1A4 => @END),
    }
}

register_bitfields![u32,
    pub MAMCR [
        MODE OFFSET(0) NUMBITS(2) [
            Disabled = 0,
            PartiallyEnabled = 1,
            FullyEnabled = 2
        ]
    ],
    pub MAMTIM [
        CYCLES OFFSET(0) NUMBITS(3) []
    ],
    pub MEMMAP [
        MAP OFFSET(0) NUMBITS(2) [
            BootLoader = 0,
            UserFlash = 1,
            UserRam = 2
        ]
    ],
    pub PLLCON [
        PLLE OFFSET(0) NUMBITS(1) [],
        PLLC OFFSET(1) NUMBITS(1) []
    ],
    pub PLLCFG [
        MSEL OFFSET(0) NUMBITS(5) [],
        PSEL OFFSET(5) NUMBITS(2) []
    ],
    pub PLLSTAT [
        MSEL OFFSET(0) NUMBITS(5) [],
        PSEL OFFSET(5) NUMBITS(2) [],
        PLLE OFFSET(8) NUMBITS(1) [],
        PLLC OFFSET(9) NUMBITS(1) [],
        PLOCK OFFSET(10) NUMBITS(1) []
    ],
    pub PCON [
        IDL OFFSET(0) NUMBITS(1) [],
        PD OFFSET(1) NUMBITS(1) []
    ],
    pub APBDIV [
        DIV OFFSET(0) NUMBITS(2) []
    ],
    pub SCS [
        GPIO0M OFFSET(0) NUMBITS(1) [],
        GPIO1M OFFSET(1) NUMBITS(1) []
    ]
];

const PLL_FEED_1: u32 = 0xAA;
const PLL_FEED_2: u32 = 0x55;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MamMode {
    Disabled,
    PartiallyEnabled,
    FullyEnabled,
}

/// What is mapped at the interrupt vectors (0x0000_0000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMap {
    BootLoader,
    UserFlash,
    UserRam,
}

/// PLL post divider `P`. The CCO runs at `CCLK * 2 * P`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PllDivider {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
}

impl PllDivider {
    pub const fn value(self) -> u32 {
        1 << (self as u32)
    }

    fn from_bits(bits: u32) -> PllDivider {
        match bits & 0x3 {
            0 => PllDivider::Div1,
            1 => PllDivider::Div2,
            2 => PllDivider::Div4,
            _ => PllDivider::Div8,
        }
    }
}

/// APB (peripheral) clock divider relative to CCLK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ApbDivider {
    Div4 = 0,
    Div1 = 1,
    Div2 = 2,
}

impl ApbDivider {
    pub const fn value(self) -> u32 {
        match self {
            ApbDivider::Div1 => 1,
            ApbDivider::Div2 => 2,
            ApbDivider::Div4 => 4,
        }
    }
}

bitflags! {
    /// Peripheral power lines in PCONP.
    ///
    /// On the LPC2103 `TIMER0`/`TIMER1` gate CT32B0/CT32B1, `TIMER2`/`TIMER3`
    /// gate CT16B0/CT16B1, and `SSP0` is called SPI1 in some documents.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PowerLines: u32 {
        const TIMER0 = 1 << 1;
        const TIMER1 = 1 << 2;
        const UART0 = 1 << 3;
        const UART1 = 1 << 4;
        const PWM0 = 1 << 5;
        const I2C0 = 1 << 7;
        const SPI0 = 1 << 8;
        const RTC = 1 << 9;
        const SSP0 = 1 << 10;
        const ADC0 = 1 << 12;
        const I2C1 = 1 << 19;
        const ADC1 = 1 << 20;
        const TIMER2 = 1 << 22;
        const TIMER3 = 1 << 23;
    }
}

bitflags! {
    /// Causes of the last reset, as accumulated in RSID.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResetSource: u32 {
        const POWER_ON = 1 << 0;
        const EXTERNAL = 1 << 1;
        const WATCHDOG = 1 << 2;
        const BROWN_OUT = 1 << 3;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExternalInterrupts: u32 {
        const EINT0 = 1 << 0;
        const EINT1 = 1 << 1;
        const EINT2 = 1 << 2;
        const EINT3 = 1 << 3;
    }
}

bitflags! {
    /// Sources allowed to wake the chip from power-down (INTWAKE).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WakeupSources: u32 {
        const EINT0 = 1 << 0;
        const EINT1 = 1 << 1;
        const EINT2 = 1 << 2;
        const EINT3 = 1 << 3;
        const BROWN_OUT = 1 << 14;
        const RTC = 1 << 15;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalInterruptMode {
    Level,
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalInterruptPolarity {
    /// Low level or falling edge.
    ActiveLow,
    /// High level or rising edge.
    ActiveHigh,
}

pub struct Syscon<'a> {
    regs: &'a SysconRegisters,
}

impl<'a> Syscon<'a> {
    pub fn new(regs: &'a SysconRegisters) -> Self {
        Syscon { regs }
    }

    pub fn registers(&self) -> &'a SysconRegisters {
        self.regs
    }

    pub fn set_mam_mode(&self, mode: MamMode) {
        let value = match mode {
            MamMode::Disabled => MAMCR::MODE::Disabled,
            MamMode::PartiallyEnabled => MAMCR::MODE::PartiallyEnabled,
            MamMode::FullyEnabled => MAMCR::MODE::FullyEnabled,
        };
        self.regs.mamcr.write(value);
    }

    pub fn mam_mode(&self) -> MamMode {
        match self.regs.mamcr.read(MAMCR::MODE) {
            0 => MamMode::Disabled,
            1 => MamMode::PartiallyEnabled,
            _ => MamMode::FullyEnabled,
        }
    }

    /// Flash fetch cycles. Change it only with the MAM disabled.
    pub fn set_mam_fetch_cycles(&self, cycles: u8) {
        assert!((1..=7).contains(&cycles), "MAM fetch cycles must be within 1..=7");
        self.regs.mamtim.write(MAMTIM::CYCLES.val(cycles as u32));
    }

    pub fn mam_fetch_cycles(&self) -> u8 {
        self.regs.mamtim.read(MAMTIM::CYCLES) as u8
    }

    pub fn set_memory_map(&self, map: MemoryMap) {
        let value = match map {
            MemoryMap::BootLoader => MEMMAP::MAP::BootLoader,
            MemoryMap::UserFlash => MEMMAP::MAP::UserFlash,
            MemoryMap::UserRam => MEMMAP::MAP::UserRam,
        };
        self.regs.memmap.write(value);
    }

    pub fn memory_map(&self) -> MemoryMap {
        match self.regs.memmap.read(MEMMAP::MAP) {
            0 => MemoryMap::BootLoader,
            1 => MemoryMap::UserFlash,
            _ => MemoryMap::UserRam,
        }
    }

    /// Set the PLL multiplier `m` (1..=32) and post divider.
    ///
    /// Takes effect after [`Syscon::feed_pll`].
    pub fn set_pll_dividers(&self, m: u8, p: PllDivider) {
        assert!((1..=32).contains(&m), "PLL multiplier must be within 1..=32");
        self.regs
            .pllcfg
            .write(PLLCFG::MSEL.val(m as u32 - 1) + PLLCFG::PSEL.val(p as u32));
    }

    /// Multiplier and post divider currently in effect.
    pub fn pll_dividers(&self) -> (u8, PllDivider) {
        let m = self.regs.pllstat.read(PLLSTAT::MSEL) as u8 + 1;
        let p = PllDivider::from_bits(self.regs.pllstat.read(PLLSTAT::PSEL));
        (m, p)
    }

    pub fn enable_pll(&self) {
        self.regs.pllcon.modify(PLLCON::PLLE::SET);
    }

    pub fn disable_pll(&self) {
        self.regs.pllcon.modify(PLLCON::PLLE::CLEAR + PLLCON::PLLC::CLEAR);
    }

    /// Only valid once the PLL is enabled and locked.
    pub fn connect_pll(&self) {
        self.regs.pllcon.modify(PLLCON::PLLE::SET + PLLCON::PLLC::SET);
    }

    pub fn disconnect_pll(&self) {
        self.regs.pllcon.modify(PLLCON::PLLC::CLEAR);
    }

    pub fn pll_is_locked(&self) -> bool {
        self.regs.pllstat.is_set(PLLSTAT::PLOCK)
    }

    pub fn pll_is_enabled(&self) -> bool {
        self.regs.pllstat.is_set(PLLSTAT::PLLE)
    }

    pub fn pll_is_connected(&self) -> bool {
        self.regs.pllstat.is_set(PLLSTAT::PLLE) && self.regs.pllstat.is_set(PLLSTAT::PLLC)
    }

    /// Commit PLLCON/PLLCFG changes.
    pub fn feed_pll(&self) {
        self.regs.pllfeed.set(PLL_FEED_1);
        self.regs.pllfeed.set(PLL_FEED_2);
    }

    /// Stop the CPU clock until an interrupt arrives.
    pub fn enter_idle(&self) {
        self.regs.pcon.modify(PCON::IDL::SET);
    }

    /// Stop the oscillator until an enabled wake-up source fires.
    pub fn enter_power_down(&self) {
        self.regs.pcon.modify(PCON::PD::SET);
    }

    pub fn enable_periph_power_lines(&self, lines: PowerLines) {
        debug_assert!(PowerLines::all().contains(lines));
        self.regs.pconp.set(self.regs.pconp.get() | lines.bits());
    }

    pub fn disable_periph_power_lines(&self, lines: PowerLines) {
        debug_assert!(PowerLines::all().contains(lines));
        self.regs.pconp.set(self.regs.pconp.get() & !lines.bits());
    }

    pub fn periph_power_lines(&self) -> PowerLines {
        PowerLines::from_bits_truncate(self.regs.pconp.get())
    }

    pub fn set_apb_divider(&self, divider: ApbDivider) {
        self.regs.apbdiv.modify(APBDIV::DIV.val(divider as u32));
    }

    /// The reserved encoding behaves like the reset default, /4.
    pub fn apb_divider(&self) -> ApbDivider {
        match self.regs.apbdiv.read(APBDIV::DIV) {
            1 => ApbDivider::Div1,
            2 => ApbDivider::Div2,
            _ => ApbDivider::Div4,
        }
    }

    pub fn external_interrupt_flags(&self) -> ExternalInterrupts {
        ExternalInterrupts::from_bits_truncate(self.regs.extint.get())
    }

    /// Write-one-to-clear. Level-sensitive lines stay set while asserted.
    pub fn clear_external_interrupts(&self, lines: ExternalInterrupts) {
        self.regs.extint.set(lines.bits());
    }

    pub fn set_external_interrupt_mode(&self, lines: ExternalInterrupts, mode: ExternalInterruptMode) {
        let current = self.regs.extmode.get();
        let value = match mode {
            ExternalInterruptMode::Level => current & !lines.bits(),
            ExternalInterruptMode::Edge => current | lines.bits(),
        };
        self.regs.extmode.set(value);
    }

    pub fn external_interrupt_mode(&self, line: ExternalInterrupts) -> ExternalInterruptMode {
        if self.regs.extmode.get() & line.bits() != 0 {
            ExternalInterruptMode::Edge
        } else {
            ExternalInterruptMode::Level
        }
    }

    pub fn set_external_interrupt_polarity(
        &self,
        lines: ExternalInterrupts,
        polarity: ExternalInterruptPolarity,
    ) {
        let current = self.regs.extpolar.get();
        let value = match polarity {
            ExternalInterruptPolarity::ActiveLow => current & !lines.bits(),
            ExternalInterruptPolarity::ActiveHigh => current | lines.bits(),
        };
        self.regs.extpolar.set(value);
    }

    pub fn external_interrupt_polarity(&self, line: ExternalInterrupts) -> ExternalInterruptPolarity {
        if self.regs.extpolar.get() & line.bits() != 0 {
            ExternalInterruptPolarity::ActiveHigh
        } else {
            ExternalInterruptPolarity::ActiveLow
        }
    }

    pub fn enable_wakeup(&self, sources: WakeupSources) {
        self.regs.intwake.set(self.regs.intwake.get() | sources.bits());
    }

    pub fn disable_wakeup(&self, sources: WakeupSources) {
        self.regs.intwake.set(self.regs.intwake.get() & !sources.bits());
    }

    pub fn wakeup_sources(&self) -> WakeupSources {
        WakeupSources::from_bits_truncate(self.regs.intwake.get())
    }

    pub fn reset_source(&self) -> ResetSource {
        ResetSource::from_bits_truncate(self.regs.rsid.get())
    }

    /// RSID bits are write-one-to-clear.
    pub fn clear_reset_source(&self, sources: ResetSource) {
        self.regs.rsid.set(sources.bits());
    }

    /// Route port 0 through the fast (local bus) GPIO registers.
    pub fn enable_fast_gpio(&self) {
        self.regs.scs.modify(SCS::GPIO0M::SET);
    }

    pub fn disable_fast_gpio(&self) {
        self.regs.scs.modify(SCS::GPIO0M::CLEAR);
    }

    pub fn fast_gpio_is_enabled(&self) -> bool {
        self.regs.scs.is_set(SCS::GPIO0M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;

    #[test]
    fn power_lines_are_read_modify_write() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        regs.pconp.set(PowerLines::RTC.bits());
        syscon.enable_periph_power_lines(PowerLines::UART0 | PowerLines::SPI0);
        syscon.disable_periph_power_lines(PowerLines::RTC);

        assert_eq!(regs.pconp.get(), (1 << 3) | (1 << 8));
        assert_eq!(syscon.periph_power_lines(), PowerLines::UART0 | PowerLines::SPI0);
    }

    #[test]
    fn sixteen_bit_timer_lines() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        syscon.enable_periph_power_lines(PowerLines::TIMER2 | PowerLines::TIMER3);
        assert_eq!(regs.pconp.get(), (1 << 22) | (1 << 23));
        assert_eq!(syscon.periph_power_lines(), PowerLines::TIMER2 | PowerLines::TIMER3);

        syscon.disable_periph_power_lines(PowerLines::TIMER2);
        assert_eq!(syscon.periph_power_lines(), PowerLines::TIMER3);
    }

    #[test]
    fn pll_config_stores_m_minus_one() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        syscon.set_pll_dividers(5, PllDivider::Div2);
        assert_eq!(regs.pllcfg.get(), (1 << 5) | 4);

        syscon.set_pll_dividers(32, PllDivider::Div8);
        assert_eq!(regs.pllcfg.get(), (3 << 5) | 31);
    }

    #[test]
    fn connecting_keeps_the_pll_enabled() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        syscon.enable_pll();
        assert_eq!(regs.pllcon.get(), 0b01);
        syscon.connect_pll();
        assert_eq!(regs.pllcon.get(), 0b11);
        syscon.disconnect_pll();
        assert_eq!(regs.pllcon.get(), 0b01);
        syscon.disable_pll();
        assert_eq!(regs.pllcon.get(), 0b00);
    }

    #[test]
    fn apb_divider_encoding() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        assert_eq!(syscon.apb_divider(), ApbDivider::Div4);
        syscon.set_apb_divider(ApbDivider::Div2);
        assert_eq!(regs.apbdiv.get(), 2);
        assert_eq!(syscon.apb_divider(), ApbDivider::Div2);
        assert_eq!(ApbDivider::Div4.value(), 4);
    }

    #[test]
    fn mam_and_memory_map() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        syscon.set_mam_fetch_cycles(3);
        syscon.set_mam_mode(MamMode::FullyEnabled);
        syscon.set_memory_map(MemoryMap::UserRam);

        assert_eq!(regs.mamtim.get(), 3);
        assert_eq!(regs.mamcr.get(), 2);
        assert_eq!(syscon.mam_mode(), MamMode::FullyEnabled);
        assert_eq!(syscon.memory_map(), MemoryMap::UserRam);
    }

    #[test]
    fn external_interrupt_mode_and_polarity_per_line() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        syscon.set_external_interrupt_mode(
            ExternalInterrupts::EINT0 | ExternalInterrupts::EINT2,
            ExternalInterruptMode::Edge,
        );
        syscon.set_external_interrupt_polarity(
            ExternalInterrupts::EINT2,
            ExternalInterruptPolarity::ActiveHigh,
        );
        syscon.set_external_interrupt_mode(ExternalInterrupts::EINT0, ExternalInterruptMode::Level);

        assert_eq!(regs.extmode.get(), 0b0100);
        assert_eq!(regs.extpolar.get(), 0b0100);
        assert_eq!(
            syscon.external_interrupt_mode(ExternalInterrupts::EINT2),
            ExternalInterruptMode::Edge
        );
        assert_eq!(
            syscon.external_interrupt_polarity(ExternalInterrupts::EINT1),
            ExternalInterruptPolarity::ActiveLow
        );
    }

    #[test]
    fn reset_source_and_fast_gpio() {
        let regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&regs);

        regs.rsid.set(0b101);
        assert_eq!(syscon.reset_source(), ResetSource::POWER_ON | ResetSource::WATCHDOG);

        syscon.enable_fast_gpio();
        assert!(syscon.fast_gpio_is_enabled());
        assert_eq!(regs.scs.get(), 1);
    }

    #[test]
    #[should_panic]
    fn pll_multiplier_zero_is_rejected() {
        let regs = zeroed_registers::<SysconRegisters>();
        Syscon::new(&regs).set_pll_dividers(0, PllDivider::Div1);
    }
}
