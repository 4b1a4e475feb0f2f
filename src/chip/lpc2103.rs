//! LPC2101/2/3

use crate::adc::AdcRegisters;
use crate::clock::Hertz;
use crate::gpio::{FioRegisters, GpioRegisters};
use crate::i2c::I2cRegisters;
use crate::pinsel::PinselRegisters;
use crate::rtc::RtcRegisters;
use crate::spi::SpiRegisters;
use crate::ssp::SspRegisters;
use crate::syscon::SysconRegisters;
use crate::timer::TimerRegisters;
use crate::uart::UartRegisters;
use crate::vic::VicRegisters;
use crate::wdt::WdtRegisters;

pub const MAX_CPU_CLOCK: Hertz = Hertz(70_000_000);

pub const FIO0_BASE: usize = 0x3FFF_C000;

pub const WDT_BASE: usize = 0xE000_0000;
pub const CT32B0_BASE: usize = 0xE000_4000;
pub const CT32B1_BASE: usize = 0xE000_8000;
pub const UART0_BASE: usize = 0xE000_C000;
pub const UART1_BASE: usize = 0xE001_0000;
pub const I2C0_BASE: usize = 0xE001_C000;
pub const SPI0_BASE: usize = 0xE002_0000;
pub const RTC_BASE: usize = 0xE002_4000;
pub const GPIO0_BASE: usize = 0xE002_8000;
pub const PINSEL_BASE: usize = 0xE002_C000;
pub const ADC0_BASE: usize = 0xE003_4000;
pub const I2C1_BASE: usize = 0xE005_C000;
/// Called SPI1 in parts of the documentation.
pub const SSP0_BASE: usize = 0xE006_8000;
pub const CT16B0_BASE: usize = 0xE007_0000;
pub const CT16B1_BASE: usize = 0xE007_4000;
pub const SYSCON_BASE: usize = 0xE01F_C000;
pub const VIC_BASE: usize = 0xFFFF_F000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Interrupt {
    Wdt = 0,
    /// Reserved for software interrupts.
    Swi = 1,
    ArmCore0 = 2,
    ArmCore1 = 3,
    Ct32b0 = 4,
    Ct32b1 = 5,
    Uart0 = 6,
    Uart1 = 7,
    I2c0 = 9,
    Spi0 = 10,
    Ssp0 = 11,
    Pll = 12,
    Rtc = 13,
    Eint0 = 14,
    Eint1 = 15,
    Eint2 = 16,
    Adc0 = 18,
    I2c1 = 19,
    Ct16b0 = 26,
    Ct16b1 = 27,
}

peripherals! {
    wdt: WdtRegisters = WDT_BASE,
    ct32b0: TimerRegisters = CT32B0_BASE,
    ct32b1: TimerRegisters = CT32B1_BASE,
    ct16b0: TimerRegisters = CT16B0_BASE,
    ct16b1: TimerRegisters = CT16B1_BASE,
    uart0: UartRegisters = UART0_BASE,
    uart1: UartRegisters = UART1_BASE,
    i2c0: I2cRegisters = I2C0_BASE,
    i2c1: I2cRegisters = I2C1_BASE,
    spi0: SpiRegisters = SPI0_BASE,
    ssp0: SspRegisters = SSP0_BASE,
    rtc: RtcRegisters = RTC_BASE,
    gpio0: GpioRegisters = GPIO0_BASE,
    fio0: FioRegisters = FIO0_BASE,
    pinsel: PinselRegisters = PINSEL_BASE,
    adc0: AdcRegisters = ADC0_BASE,
    syscon: SysconRegisters = SYSCON_BASE,
    vic: VicRegisters = VIC_BASE,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_timers() {
        assert_eq!(Interrupt::Ct32b0.nr(), 4);
        assert_eq!(Interrupt::Ct16b0.nr(), 26);
        assert_eq!(Interrupt::Ct16b1.nr(), 27);
        assert_eq!(CT16B1_BASE, 0xE007_4000);
    }
}
