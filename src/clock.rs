//! LPC2xxx Clock Configuration
//!
//! The LPC2xxx clock tree is refreshingly small compared to its Cortex-M
//! successors. We'll give a quick overview of the clocks, and how we
//! configure them.
//!
//! # LPC2xxx clocks primer
//!
//! See the "System control" chapter of the user manual of your part
//! (UM10161 for the LPC2103, UM10139 for the LPC2148) for the full picture.
//!
//! - Main Oscillator (FOSC), external crystal provided by the user, 10 to
//!   25 MHz when the PLL is in use.
//! - PLL, multiplies FOSC by `M` (1 to 32). Its current-controlled
//!   oscillator runs at `CCLK * 2 * P` and must stay within 156 to 320 MHz,
//!   `P` being 1, 2, 4 or 8.
//! - CPU Clock (CCLK), either FOSC or the PLL output.
//! - Peripheral Clock (PCLK), CCLK divided by 1, 2 or 4 (APBDIV). Every
//!   peripheral (UART, timers, SPI, ...) runs off PCLK.
//!
//! The flash sits behind the Memory Accelerator Module, whose fetch timing
//! depends on CCLK.
//!
//! # HAL
//!
//! As on the other LPC HALs, the user configures all clocks at the start of
//! the program, and freezes their values. Peripherals then take a [`Clocks`]
//! to compute their dividers from PCLK.
//!
//! Peripheral power is gated per peripheral in PCONP. [`PeriphClocks`] hands
//! out one [`PeriphClock`] per power line so a driver can own its gate.

use core::ops::{Div, Mul};

use crate::syscon::{ApbDivider, MamMode, PllDivider, PowerLines, Syscon, SysconRegisters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hertz(pub u32);

impl Hertz {
    pub const fn mhz(mhz: u32) -> Hertz {
        Hertz(mhz * 1_000_000)
    }
}

impl Mul<u32> for Hertz {
    type Output = Hertz;
    fn mul(self, rhs: u32) -> Hertz {
        Hertz(self.0 * rhs)
    }
}

impl Div<u32> for Hertz {
    type Output = Hertz;
    fn div(self, rhs: u32) -> Hertz {
        Hertz(self.0 / rhs)
    }
}

const CCO_MIN: u32 = 156_000_000;
const CCO_MAX: u32 = 320_000_000;

const PLL_INPUT_MIN: u32 = 10_000_000;
const PLL_INPUT_MAX: u32 = 25_000_000;

const fn calculate_m_p(freq: Hertz, oscillator: Hertz) -> (u8, PllDivider) {
    assert!(
        freq.0 % oscillator.0 == 0,
        "CPU clock is not a multiple of the oscillator frequency"
    );
    let m = freq.0 / oscillator.0;
    assert!(m >= 1 && m <= 32, "CPU clock too high for the PLL multiplier");

    let p = if CCO_MIN <= freq.0 * 2 && freq.0 * 2 <= CCO_MAX {
        PllDivider::Div1
    } else if CCO_MIN <= freq.0 * 4 && freq.0 * 4 <= CCO_MAX {
        PllDivider::Div2
    } else if CCO_MIN <= freq.0 * 8 && freq.0 * 8 <= CCO_MAX {
        PllDivider::Div4
    } else if CCO_MIN <= freq.0 * 16 && freq.0 * 16 <= CCO_MAX {
        PllDivider::Div8
    } else {
        panic!("No PLL post divider keeps the CCO within 156-320 MHz")
    };
    (m as u8, p)
}

/// Flash fetch cycles for a given CCLK.
const fn mam_fetch_cycles(cpu_clock: Hertz) -> u8 {
    if cpu_clock.0 < 20_000_000 {
        1
    } else if cpu_clock.0 < 40_000_000 {
        2
    } else {
        3
    }
}

/// A simple builder for the clocks of the LPC2xxx. In order to catch clock
/// misconfigurations at compile time, it provides a `validate` method that
/// will turn the `ClocksBuilder` into a `ClocksDescriptor`, and panic if the
/// clocks can't be configured. Evaluated in a `const`, that panic is a
/// compile-time error.
///
/// # Usage
///
/// ```ignore
/// const CLOCKS: ClocksDescriptor = ClocksBuilder::new(Hertz(12_000_000))
///     .cpu_clock(Hertz(60_000_000))
///     .apb_divider(ApbDivider::Div1)
///     .validate();
///
/// let (clocks, periph_clocks) = CLOCKS.build(&syscon);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClocksBuilder {
    oscillator: Hertz,
    // Defaults to the oscillator frequency, PLL off.
    cpu_clock: Option<Hertz>,
    apb_divider: ApbDivider,
    mam_mode: MamMode,
}

impl ClocksBuilder {
    pub const fn new(oscillator: Hertz) -> ClocksBuilder {
        ClocksBuilder {
            oscillator,
            cpu_clock: None,
            apb_divider: ApbDivider::Div4,
            mam_mode: MamMode::FullyEnabled,
        }
    }

    /// Run the CPU off the PLL at `freq`.
    pub const fn cpu_clock(mut self, freq: Hertz) -> Self {
        self.cpu_clock = Some(freq);
        self
    }

    pub const fn apb_divider(mut self, divider: ApbDivider) -> Self {
        self.apb_divider = divider;
        self
    }

    pub const fn mam_mode(mut self, mode: MamMode) -> Self {
        self.mam_mode = mode;
        self
    }

    pub const fn validate(self) -> ClocksDescriptor {
        assert!(self.oscillator.0 > 0, "Oscillator frequency must not be zero");
        // The CCO products in `calculate_m_p` must fit in a u32.
        if let Some(freq) = self.cpu_clock {
            assert!(
                freq.0 > 0 && freq.0 <= crate::chip::MAX_CPU_CLOCK.0,
                "CPU clock above the chip's maximum"
            );
        }

        let pll = match self.cpu_clock {
            Some(freq) if freq.0 != self.oscillator.0 => {
                assert!(
                    self.oscillator.0 >= PLL_INPUT_MIN && self.oscillator.0 <= PLL_INPUT_MAX,
                    "The PLL needs a 10-25 MHz oscillator"
                );
                Some(calculate_m_p(freq, self.oscillator))
            }
            _ => None,
        };

        let cpu_clock = match pll {
            Some((m, _)) => Hertz(self.oscillator.0 * m as u32),
            None => self.oscillator,
        };
        assert!(
            cpu_clock.0 <= crate::chip::MAX_CPU_CLOCK.0,
            "CPU clock above the chip's maximum"
        );

        ClocksDescriptor {
            oscillator: self.oscillator,
            pll,
            apb_divider: self.apb_divider,
            mam_mode: self.mam_mode,
            mam_fetch_cycles: mam_fetch_cycles(cpu_clock),
            cpu_clock,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClocksDescriptor {
    oscillator: Hertz,
    pll: Option<(u8, PllDivider)>,
    apb_divider: ApbDivider,
    mam_mode: MamMode,
    mam_fetch_cycles: u8,
    cpu_clock: Hertz,
}

impl ClocksDescriptor {
    pub fn pll(&self) -> Option<(u8, PllDivider)> {
        self.pll
    }

    /// Program the PLL, MAM and APB divider and freeze the result.
    ///
    /// The PLL feed sequences must not be interrupted; call this before
    /// enabling interrupts.
    pub fn build<'a>(self, syscon: &Syscon<'a>) -> (Clocks, PeriphClocks<'a>) {
        // Run from the oscillator while reconfiguring.
        syscon.disconnect_pll();
        syscon.feed_pll();

        match self.pll {
            Some((m, p)) => {
                syscon.set_pll_dividers(m, p);
                syscon.enable_pll();
                syscon.feed_pll();

                while !syscon.pll_is_locked() {}

                syscon.connect_pll();
                syscon.feed_pll();
            }
            None => {
                syscon.disable_pll();
                syscon.feed_pll();
            }
        }

        // MAMTIM may only change with the MAM off.
        syscon.set_mam_mode(MamMode::Disabled);
        syscon.set_mam_fetch_cycles(self.mam_fetch_cycles);
        syscon.set_mam_mode(self.mam_mode);

        syscon.set_apb_divider(self.apb_divider);

        let clocks = Clocks {
            oscillator: self.oscillator,
            cpu_clock: self.cpu_clock,
            apb_divider: self.apb_divider,
        };
        log::debug!(
            "clocks frozen: pll {:?}, cclk {} Hz, pclk {} Hz, mam {} cycles",
            self.pll,
            clocks.cpu_clock().0,
            clocks.apb_clock().0,
            self.mam_fetch_cycles
        );

        (clocks, PeriphClocks::new(syscon.registers()))
    }
}

/// Struct proving that the system clocks are configured and frozen. Once this
/// struct exists, it is no longer possible to safely reconfigure:
///
/// - the PLL
/// - the CPU clock
/// - the APB divider
#[derive(Debug, Clone, Copy)]
pub struct Clocks {
    oscillator: Hertz,
    cpu_clock: Hertz,
    apb_divider: ApbDivider,
}

impl Clocks {
    pub fn oscillator(&self) -> Hertz {
        self.oscillator
    }

    pub fn cpu_clock(&self) -> Hertz {
        self.cpu_clock
    }

    /// PCLK, the clock every peripheral runs from.
    pub fn apb_clock(&self) -> Hertz {
        self.cpu_clock / self.apb_divider.value()
    }
}

/// CCLK as currently programmed in the PLL, for code that didn't freeze the
/// clocks itself (e.g. running after a bootloader).
pub fn cpu_clock_rate(syscon: &Syscon, oscillator: Hertz) -> Hertz {
    if syscon.pll_is_connected() {
        let (m, _) = syscon.pll_dividers();
        oscillator * m as u32
    } else {
        oscillator
    }
}

pub fn apb_clock_rate(syscon: &Syscon, oscillator: Hertz) -> Hertz {
    cpu_clock_rate(syscon, oscillator) / syscon.apb_divider().value()
}

/// Power gate of a single peripheral.
pub struct PeriphClock<'a> {
    line: PowerLines,
    regs: &'a SysconRegisters,
}

impl<'a> PeriphClock<'a> {
    pub(crate) fn new(line: PowerLines, regs: &'a SysconRegisters) -> Self {
        PeriphClock { line, regs }
    }

    pub fn power_line(&self) -> PowerLines {
        self.line
    }

    #[inline]
    pub fn enable(&mut self) {
        Syscon::new(self.regs).enable_periph_power_lines(self.line);
    }

    #[inline]
    pub fn disable(&mut self) {
        Syscon::new(self.regs).disable_periph_power_lines(self.line);
    }

    pub fn is_enabled(&self) -> bool {
        Syscon::new(self.regs).periph_power_lines().contains(self.line)
    }
}

pub struct PeriphClocks<'a> {
    pub timer0: PeriphClock<'a>,
    pub timer1: PeriphClock<'a>,
    /// CT16B0
    #[cfg(feature = "lpc2103")]
    pub timer2: PeriphClock<'a>,
    /// CT16B1
    #[cfg(feature = "lpc2103")]
    pub timer3: PeriphClock<'a>,
    pub uart0: PeriphClock<'a>,
    pub uart1: PeriphClock<'a>,
    #[cfg(any(feature = "lpc2106", feature = "lpc2148"))]
    pub pwm0: PeriphClock<'a>,
    pub i2c0: PeriphClock<'a>,
    pub spi0: PeriphClock<'a>,
    pub rtc: PeriphClock<'a>,
    #[cfg(any(feature = "lpc2103", feature = "lpc2148"))]
    pub ssp0: PeriphClock<'a>,
    #[cfg(any(feature = "lpc2103", feature = "lpc2148"))]
    pub adc0: PeriphClock<'a>,
    #[cfg(any(feature = "lpc2103", feature = "lpc2148"))]
    pub i2c1: PeriphClock<'a>,
    #[cfg(feature = "lpc2148")]
    pub adc1: PeriphClock<'a>,
}

impl<'a> PeriphClocks<'a> {
    fn new(regs: &'a SysconRegisters) -> Self {
        let gate = |line| PeriphClock::new(line, regs);
        PeriphClocks {
            timer0: gate(PowerLines::TIMER0),
            timer1: gate(PowerLines::TIMER1),
            #[cfg(feature = "lpc2103")]
            timer2: gate(PowerLines::TIMER2),
            #[cfg(feature = "lpc2103")]
            timer3: gate(PowerLines::TIMER3),
            uart0: gate(PowerLines::UART0),
            uart1: gate(PowerLines::UART1),
            #[cfg(any(feature = "lpc2106", feature = "lpc2148"))]
            pwm0: gate(PowerLines::PWM0),
            i2c0: gate(PowerLines::I2C0),
            spi0: gate(PowerLines::SPI0),
            rtc: gate(PowerLines::RTC),
            #[cfg(any(feature = "lpc2103", feature = "lpc2148"))]
            ssp0: gate(PowerLines::SSP0),
            #[cfg(any(feature = "lpc2103", feature = "lpc2148"))]
            adc0: gate(PowerLines::ADC0),
            #[cfg(any(feature = "lpc2103", feature = "lpc2148"))]
            i2c1: gate(PowerLines::I2C1),
            #[cfg(feature = "lpc2148")]
            adc1: gate(PowerLines::ADC1),
        }
    }
}
