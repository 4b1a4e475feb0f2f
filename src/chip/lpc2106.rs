//! LPC2104/5/6

use crate::clock::Hertz;
use crate::gpio::GpioRegisters;
use crate::i2c::I2cRegisters;
use crate::pinsel::PinselRegisters;
use crate::pwm::PwmRegisters;
use crate::rtc::RtcRegisters;
use crate::spi::SpiRegisters;
use crate::syscon::SysconRegisters;
use crate::timer::TimerRegisters;
use crate::uart::UartRegisters;
use crate::vic::VicRegisters;
use crate::wdt::WdtRegisters;

pub const MAX_CPU_CLOCK: Hertz = Hertz(60_000_000);

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
pub const PINSEL_BASE: usize = 0xE002_C000;
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
    Pll = 12,
    Rtc = 13,
    Eint0 = 14,
    Eint1 = 15,
    Eint2 = 16,
}

peripherals! {
    wdt: WdtRegisters = WDT_BASE,
    timer0: TimerRegisters = TIMER0_BASE,
    timer1: TimerRegisters = TIMER1_BASE,
    uart0: UartRegisters = UART0_BASE,
    uart1: UartRegisters = UART1_BASE,
    pwm0: PwmRegisters = PWM0_BASE,
    i2c0: I2cRegisters = I2C0_BASE,
    spi0: SpiRegisters = SPI0_BASE,
    rtc: RtcRegisters = RTC_BASE,
    gpio0: GpioRegisters = GPIO0_BASE,
    pinsel: PinselRegisters = PINSEL_BASE,
    syscon: SysconRegisters = SYSCON_BASE,
    vic: VicRegisters = VIC_BASE,
}
