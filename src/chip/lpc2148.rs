//! LPC2141/2/4/6/8
//!
//! The USB device controller is not covered.

use crate::adc::AdcRegisters;
use crate::clock::Hertz;
use crate::dac::DacRegisters;
use crate::gpio::{FioRegisters, GpioRegisters};
use crate::i2c::I2cRegisters;
use crate::pinsel::PinselRegisters;
use crate::pwm::PwmRegisters;
use crate::rtc::RtcRegisters;
use crate::spi::SpiRegisters;
use crate::ssp::SspRegisters;
use crate::syscon::SysconRegisters;
use crate::timer::TimerRegisters;
use crate::uart::UartRegisters;
use crate::vic::VicRegisters;
use crate::wdt::WdtRegisters;

pub const MAX_CPU_CLOCK: Hertz = Hertz(60_000_000);

pub const FIO0_BASE: usize = 0x3FFF_C000;
pub const FIO1_BASE: usize = 0x3FFF_C020;

pub const WDT_BASE: usize = 0xE000_0000;
pub const TIMER0_BASE: usize = 0xE000_4000;
pub const TIMER1_BASE: usize = 0xE000_8000;
pub const UART0_BASE: usize = 0xE000_C000;
pub const UART1_BASE: usize = 0xE001_0000;
pub const PWM0_BASE: usize = 0xE001_4000;
pub const I2C0_BASE: usize = 0xE001_C000;
pub const SPI0_BASE: usize = 0xE002_0000;
pub const RTC_BASE: usize = 0xE002_4000;
pub const GPIO0_BASE: usize = 0xE002_8000;
pub const GPIO1_BASE: usize = 0xE002_8010;
pub const PINSEL_BASE: usize = 0xE002_C000;
pub const ADC0_BASE: usize = 0xE003_4000;
pub const I2C1_BASE: usize = 0xE005_C000;
pub const ADC1_BASE: usize = 0xE006_0000;
pub const SSP0_BASE: usize = 0xE006_8000;
pub const DAC_BASE: usize = 0xE006_C000;
pub const SYSCON_BASE: usize = 0xE01F_C000;
pub const VIC_BASE: usize = 0xFFFF_F000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Interrupt {
    Wdt = 0,
    Swi = 1,
    ArmCore0 = 2,
    ArmCore1 = 3,
    Timer0 = 4,
    Timer1 = 5,
    Uart0 = 6,
    Uart1 = 7,
    Pwm0 = 8,
    I2c0 = 9,
    Spi0 = 10,
    Ssp0 = 11,
    Pll = 12,
    Rtc = 13,
    Eint0 = 14,
    Eint1 = 15,
    Eint2 = 16,
    Eint3 = 17,
    Adc0 = 18,
    I2c1 = 19,
    Bod = 20,
    Adc1 = 21,
    Usb = 22,
}

peripherals! {
    wdt: WdtRegisters = WDT_BASE,
    timer0: TimerRegisters = TIMER0_BASE,
    timer1: TimerRegisters = TIMER1_BASE,
    uart0: UartRegisters = UART0_BASE,
    uart1: UartRegisters = UART1_BASE,
    pwm0: PwmRegisters = PWM0_BASE,
    i2c0: I2cRegisters = I2C0_BASE,
    i2c1: I2cRegisters = I2C1_BASE,
    spi0: SpiRegisters = SPI0_BASE,
    ssp0: SspRegisters = SSP0_BASE,
    rtc: RtcRegisters = RTC_BASE,
    gpio0: GpioRegisters = GPIO0_BASE,
    gpio1: GpioRegisters = GPIO1_BASE,
    fio0: FioRegisters = FIO0_BASE,
    fio1: FioRegisters = FIO1_BASE,
    pinsel: PinselRegisters = PINSEL_BASE,
    adc0: AdcRegisters = ADC0_BASE,
    adc1: AdcRegisters = ADC1_BASE,
    dac: DacRegisters = DAC_BASE,
    syscon: SysconRegisters = SYSCON_BASE,
    vic: VicRegisters = VIC_BASE,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analog_and_usb() {
        assert_eq!(Interrupt::Adc1.nr(), 21);
        assert_eq!(Interrupt::Usb.mask(), 1 << 22);
        assert_eq!(DAC_BASE, 0xE006_C000);
        assert_eq!(GPIO1_BASE - GPIO0_BASE, 0x10);
    }
}
