//! Serial port on top of a [`Uart`].
//!
//! ```ignore
//! let (clocks, periph_clocks) = CLOCKS.build(&syscon);
//! let gpio = p.gpio0.split();
//! let pins = (
//!     gpio.p0_1.into_alternate::<Alt1>(&pinsel),
//!     gpio.p0_0.into_alternate::<Alt1>(&pinsel),
//! );
//! let mut serial = Serial::new(p.uart0, pins, clocks, periph_clocks.uart0, Config::default());
//! ```

use embedded_hal::blocking;
use embedded_hal::serial;

use crate::clock::{Clocks, PeriphClock};
use crate::gpio::{Alt1, Alternate, Pin};
use crate::uart::{self, LineStatus, Parity, StopBits, Uart, UartInterrupt, UartRegisters, WordLength};

pub trait PinRxd {}
pub trait PinTxd {}

// Same pins and functions on every supported chip.
impl PinRxd for Pin<1, Alternate<Alt1>> {}
impl PinRxd for Pin<9, Alternate<Alt1>> {}

impl PinTxd for Pin<0, Alternate<Alt1>> {}
impl PinTxd for Pin<8, Alternate<Alt1>> {}

pub trait Pins {}

impl<RXD, TXD> Pins for (RXD, TXD)
where
    RXD: PinRxd,
    TXD: PinTxd,
{}

/// Line settings, 115200 8N1 by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub baudrate: u32,
    pub word_length: WordLength,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Config {
    pub fn baudrate(mut self, baudrate: u32) -> Self {
        self.baudrate = baudrate;
        self
    }

    pub fn word_length(mut self, word_length: WordLength) -> Self {
        self.word_length = word_length;
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            baudrate: 115_200,
            word_length: WordLength::Bits8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

pub struct Serial<'a, PINS> {
    uart: Uart<'a>,
    clock: PeriphClock<'a>,
    pins: PINS,
}

impl<'a, PINS: Pins> Serial<'a, PINS> {
    pub fn new(
        regs: &'a UartRegisters,
        pins: PINS,
        clocks: Clocks,
        mut clock: PeriphClock<'a>,
        config: Config,
    ) -> Serial<'a, PINS> {
        clock.enable();

        let uart = Uart::new(regs);
        uart.disable_interrupts(UartInterrupt::all());

        let divisor = uart::divisor_for(clocks.apb_clock(), config.baudrate);
        assert!(divisor > 0, "Baudrate is too damn high!");
        assert!(divisor < (1 << 16), "Baudrate is too low for this PCLK");

        // The fractional divider resets to 0/1 (off), but a bootloader may
        // have left it on. The LPC2106 doesn't have one.
        #[cfg(not(feature = "lpc2106"))]
        uart.set_fractional_divider(0, 1);
        uart.set_divisor(divisor as u16);

        uart.set_word_length(config.word_length);
        uart.set_parity(config.parity);
        uart.set_stop_bits(config.stop_bits);

        uart.enable_fifos();
        uart.flush_rx_fifo();
        uart.flush_tx_fifo();
        uart.enable_tx();

        log::debug!(
            "serial: {} baud from {} Hz, divisor {}",
            config.baudrate,
            clocks.apb_clock().0,
            divisor
        );

        Serial { uart, clock, pins }
    }

    /// Stop the UART clock and give back the pins and the clock gate.
    pub fn free(mut self) -> (PINS, PeriphClock<'a>) {
        self.clock.disable();
        (self.pins, self.clock)
    }

    pub fn uart(&self) -> &Uart<'a> {
        &self.uart
    }
}

/// Receive error, with the line status that reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    lsr: LineStatus,
}

impl Error {
    pub fn line_status(&self) -> LineStatus {
        self.lsr
    }

    pub fn is_overrun(&self) -> bool {
        self.lsr.contains(LineStatus::OVERRUN_ERROR)
    }

    pub fn is_parity(&self) -> bool {
        self.lsr.contains(LineStatus::PARITY_ERROR)
    }

    pub fn is_framing(&self) -> bool {
        self.lsr.contains(LineStatus::FRAMING_ERROR)
    }

    pub fn is_break(&self) -> bool {
        self.lsr.contains(LineStatus::BREAK_INTERRUPT)
    }
}

impl<'a, PINS: Pins> serial::Read<u8> for Serial<'a, PINS> {
    type Error = Error;

    fn read(&mut self) -> nb::Result<u8, Error> {
        // Reading LSR clears the error bits.
        let lsr = self.uart.line_status();

        if lsr.intersects(LineStatus::ERRORS) {
            return Err(nb::Error::Other(Error { lsr }));
        }

        if !lsr.contains(LineStatus::RX_DATA_READY) {
            return Err(nb::Error::WouldBlock);
        }

        Ok(self.uart.recv())
    }
}

impl<'a, PINS: Pins> serial::Write<u8> for Serial<'a, PINS> {
    type Error = Error;

    fn write(&mut self, data: u8) -> nb::Result<(), Error> {
        if !self.uart.line_status().contains(LineStatus::TX_HOLDING_EMPTY) {
            return Err(nb::Error::WouldBlock);
        }

        self.uart.send(data);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Error> {
        if self.uart.line_status().contains(LineStatus::TX_EMPTY) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<'a, PINS: Pins> blocking::serial::write::Default<u8> for Serial<'a, PINS> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClocksBuilder, Hertz};
    use crate::gpio::GpioExt;
    use crate::gpio::GpioRegisters;
    use crate::pinsel::{PinselRegisters, Pinsel};
    use crate::syscon::{ApbDivider, PowerLines, Syscon, SysconRegisters};
    use crate::zeroed_registers;
    use embedded_hal::serial::{Read, Write};
    use tock_registers::interfaces::Readable;

    fn set_lsr(regs: &UartRegisters, lsr: LineStatus) {
        let reg = &regs.lsr as *const _ as *mut u32;
        unsafe { reg.write_volatile(lsr.bits()) };
    }

    #[test]
    fn config_builder_defaults_to_8n1() {
        let config = Config::default().baudrate(9600).stop_bits(StopBits::Two);
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.word_length, WordLength::Bits8);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::Two);
    }

    #[test]
    fn new_configures_the_uart() {
        let syscon_regs = zeroed_registers::<SysconRegisters>();
        let syscon = Syscon::new(&syscon_regs);
        let (clocks, periph) = ClocksBuilder::new(Hertz(14_745_600))
            .apb_divider(ApbDivider::Div1)
            .validate()
            .build(&syscon);

        let gpio_regs: &'static GpioRegisters = Box::leak(zeroed_registers::<GpioRegisters>());
        let pinsel_regs = zeroed_registers::<PinselRegisters>();
        let pinsel = Pinsel::new(&pinsel_regs);
        let gpio = gpio_regs.split();
        let pins = (
            gpio.p0_1.into_alternate::<Alt1>(&pinsel),
            gpio.p0_0.into_alternate::<Alt1>(&pinsel),
        );

        let regs = zeroed_registers::<UartRegisters>();
        let mut serial = Serial::new(&regs, pins, clocks, periph.uart0, Config::default());

        assert_eq!(serial.uart().divisor(), 8);
        assert_eq!(serial.uart().word_length(), WordLength::Bits8);
        assert_eq!(serial.uart().parity(), Parity::None);
        assert!(serial.uart().tx_is_enabled());
        assert_eq!(syscon.periph_power_lines(), PowerLines::UART0);

        // Transmitter busy
        assert!(matches!(serial.write(b'x'), Err(nb::Error::WouldBlock)));
        set_lsr(&regs, LineStatus::TX_HOLDING_EMPTY);
        assert!(serial.write(b'x').is_ok());
        assert_eq!(regs.rbr_thr.get(), b'x' as u32);
        assert!(matches!(serial.flush(), Err(nb::Error::WouldBlock)));

        set_lsr(&regs, LineStatus::RX_DATA_READY | LineStatus::FRAMING_ERROR);
        match serial.read() {
            Err(nb::Error::Other(e)) => {
                assert!(e.is_framing());
                assert!(!e.is_overrun());
            }
            _ => panic!("expected a framing error"),
        }

        set_lsr(&regs, LineStatus::RX_DATA_READY);
        assert!(matches!(serial.read(), Ok(b'x')));

        let (_pins, clock) = serial.free();
        assert!(!clock.is_enabled());
    }
}
