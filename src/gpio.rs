//! GPIO Configuration
//!
//! Each port (P0, plus P1 on the LPC2148) is reachable through two register
//! sets:
//!
//! - the legacy APB block ([`GpioRegisters`]), always present;
//! - the fast local-bus block ([`FioRegisters`], LPC2103 and LPC2148), which
//!   adds a write mask and must be switched on with
//!   [`Syscon::enable_fast_gpio`](crate::syscon::Syscon::enable_fast_gpio).
//!
//! On top of the register handles, [`GpioExt::split`] hands out one typed
//! [`Pin`] per port 0 pin. A pin's mode lives in its type; switching modes
//! programs the pin connect block and the direction register:
//!
//! ```ignore
//! let pinsel = Pinsel::new(p.pinsel);
//! let gpio = p.gpio0.split();
//! let mut led = gpio.p0_7.into_output(&pinsel);
//! led.set_high().ok();
//! let txd = gpio.p0_0.into_alternate::<Alt1>(&pinsel);
//! ```

use core::convert::Infallible;
use core::marker::PhantomData;

use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadWrite, WriteOnly};
use tock_registers::register_structs;

use crate::pinsel::{PinFunction, Pinsel};

register_structs! {
    pub GpioRegisters {
        (0x00 => pub pin: ReadWrite<u32>),
        (0x04 => pub set: ReadWrite<u32>),
        (0x08 => pub dir: ReadWrite<u32>),
        (0x0C => pub clr: WriteOnly<u32>),
        (0x10 => @END),
    }
}

register_structs! {
    pub FioRegisters {
        (0x00 => pub dir: ReadWrite<u32>),
        (0x04 => _reserved0),
        (0x10 => pub mask: ReadWrite<u32>),
        (0x14 => pub pin: ReadWrite<u32>),
        (0x18 => pub set: ReadWrite<u32>),
        (0x1C => pub clr: WriteOnly<u32>),
        (0x20 => @END),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

fn write_pins(set: &ReadWrite<u32>, clr: &WriteOnly<u32>, pins: u32, bits: u32) {
    set.set(pins & bits);
    clr.set(pins & !bits);
}

fn set_pin_directions(dir: &ReadWrite<u32>, pins: u32, direction: Direction) {
    match direction {
        Direction::Out => dir.set(dir.get() | pins),
        Direction::In => dir.set(dir.get() & !pins),
    }
}

fn pin_direction(dir: &ReadWrite<u32>, pin: u8) -> Direction {
    assert!(pin <= 31, "pin out of range");
    if dir.get() & (1 << pin) != 0 {
        Direction::Out
    } else {
        Direction::In
    }
}

/// One 32-pin port through the legacy APB registers (`gpio0`, and `gpio1` on
/// the LPC2148).
pub struct Gpio<'a> {
    regs: &'a GpioRegisters,
}

impl<'a> Gpio<'a> {
    pub fn new(regs: &'a GpioRegisters) -> Self {
        Gpio { regs }
    }

    pub fn registers(&self) -> &'a GpioRegisters {
        self.regs
    }

    /// Drive the pins in `pins` to the matching bits of `bits`, leaving the
    /// others alone.
    pub fn write_pins(&self, pins: u32, bits: u32) {
        write_pins(&self.regs.set, &self.regs.clr, pins, bits);
    }

    pub fn read_pins(&self, pins: u32) -> u32 {
        self.regs.pin.get() & pins
    }

    pub fn set_pins(&self, pins: u32) {
        self.regs.set.set(pins);
    }

    pub fn clear_pins(&self, pins: u32) {
        self.regs.clr.set(pins);
    }

    pub fn set_pin_directions(&self, pins: u32, direction: Direction) {
        set_pin_directions(&self.regs.dir, pins, direction);
    }

    pub fn pin_direction(&self, pin: u8) -> Direction {
        pin_direction(&self.regs.dir, pin)
    }
}

/// One 32-pin port through the fast GPIO registers (`fio0`, and `fio1` on the
/// LPC2148).
///
/// Pins whose bit is set in the mask ignore writes and read back as zero.
pub struct Fio<'a> {
    regs: &'a FioRegisters,
}

impl<'a> Fio<'a> {
    pub fn new(regs: &'a FioRegisters) -> Self {
        Fio { regs }
    }

    pub fn registers(&self) -> &'a FioRegisters {
        self.regs
    }

    pub fn write_pins(&self, pins: u32, bits: u32) {
        write_pins(&self.regs.set, &self.regs.clr, pins, bits);
    }

    pub fn read_pins(&self, pins: u32) -> u32 {
        self.regs.pin.get() & pins
    }

    pub fn set_pins(&self, pins: u32) {
        self.regs.set.set(pins);
    }

    pub fn clear_pins(&self, pins: u32) {
        self.regs.clr.set(pins);
    }

    pub fn set_pin_directions(&self, pins: u32, direction: Direction) {
        set_pin_directions(&self.regs.dir, pins, direction);
    }

    pub fn pin_direction(&self, pin: u8) -> Direction {
        pin_direction(&self.regs.dir, pin)
    }

    pub fn set_mask(&self, mask: u32) {
        self.regs.mask.set(mask);
    }

    pub fn mask(&self) -> u32 {
        self.regs.mask.get()
    }
}

pub trait GpioExt {
    type Parts;
    fn split(self) -> Self::Parts;
}

pub struct Input;
pub struct Output;

pub struct Alternate<A> {
    _function: PhantomData<A>,
}

pub struct Alt1;
pub struct Alt2;
pub struct Alt3;

/// Pin connect block selector of an alternate function.
pub trait AltFunction {
    const FUNCTION: PinFunction;
}

impl AltFunction for Alt1 {
    const FUNCTION: PinFunction = PinFunction::Alt1;
}

impl AltFunction for Alt2 {
    const FUNCTION: PinFunction = PinFunction::Alt2;
}

impl AltFunction for Alt3 {
    const FUNCTION: PinFunction = PinFunction::Alt3;
}

/// Port 0 pin `N` in mode `MODE`.
pub struct Pin<const N: u8, MODE> {
    regs: &'static GpioRegisters,
    _mode: PhantomData<MODE>,
}

impl<const N: u8, MODE> Pin<N, MODE> {
    const MASK: u32 = 1 << N;

    fn into_mode<NEW>(self) -> Pin<N, NEW> {
        Pin { regs: self.regs, _mode: PhantomData }
    }

    pub fn into_input(self, pinsel: &Pinsel) -> Pin<N, Input> {
        pinsel.set_pin_function(N, PinFunction::Gpio);
        set_pin_directions(&self.regs.dir, Self::MASK, Direction::In);
        self.into_mode()
    }

    pub fn into_output(self, pinsel: &Pinsel) -> Pin<N, Output> {
        pinsel.set_pin_function(N, PinFunction::Gpio);
        set_pin_directions(&self.regs.dir, Self::MASK, Direction::Out);
        self.into_mode()
    }

    /// Hand the pin to a peripheral. Which peripheral depends on the chip;
    /// see [`crate::pinconfig`].
    pub fn into_alternate<A: AltFunction>(self, pinsel: &Pinsel) -> Pin<N, Alternate<A>> {
        pinsel.set_pin_function(N, A::FUNCTION);
        self.into_mode()
    }
}

impl<const N: u8> InputPin for Pin<N, Input> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.regs.pin.get() & Self::MASK != 0)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(self.regs.pin.get() & Self::MASK == 0)
    }
}

impl<const N: u8> OutputPin for Pin<N, Output> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.regs.set.set(Self::MASK);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.regs.clr.set(Self::MASK);
        Ok(())
    }
}

impl<const N: u8> StatefulOutputPin for Pin<N, Output> {
    // IOSET reads back the output latch, IOPIN the pad.
    fn is_set_high(&self) -> Result<bool, Infallible> {
        Ok(self.regs.set.get() & Self::MASK != 0)
    }

    fn is_set_low(&self) -> Result<bool, Infallible> {
        Ok(self.regs.set.get() & Self::MASK == 0)
    }
}

impl<const N: u8> ToggleableOutputPin for Pin<N, Output> {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Infallible> {
        if self.is_set_high()? {
            self.set_low()
        } else {
            self.set_high()
        }
    }
}

macro_rules! gpio {
    ($($pxi:ident: $i:literal,)+) => {
        pub struct Parts {
            $(pub $pxi: Pin<$i, Input>,)+
        }

        /// All pins come out as inputs, the reset state of every port 0 pin.
        impl GpioExt for &'static GpioRegisters {
            type Parts = Parts;

            fn split(self) -> Parts {
                Parts {
                    $($pxi: Pin { regs: self, _mode: PhantomData },)+
                }
            }
        }
    }
}

gpio! {
    p0_0: 0,
    p0_1: 1,
    p0_2: 2,
    p0_3: 3,
    p0_4: 4,
    p0_5: 5,
    p0_6: 6,
    p0_7: 7,
    p0_8: 8,
    p0_9: 9,
    p0_10: 10,
    p0_11: 11,
    p0_12: 12,
    p0_13: 13,
    p0_14: 14,
    p0_15: 15,
    p0_16: 16,
    p0_17: 17,
    p0_18: 18,
    p0_19: 19,
    p0_20: 20,
    p0_21: 21,
    p0_22: 22,
    p0_23: 23,
    p0_24: 24,
    p0_25: 25,
    p0_26: 26,
    p0_27: 27,
    p0_28: 28,
    p0_29: 29,
    p0_30: 30,
    p0_31: 31,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinsel::PinselRegisters;
    use crate::zeroed_registers;

    fn written(reg: &WriteOnly<u32>) -> u32 {
        unsafe { (reg as *const WriteOnly<u32> as *const u32).read_volatile() }
    }

    #[test]
    fn write_pins_sets_and_clears_only_selected() {
        let regs = zeroed_registers::<GpioRegisters>();
        let gpio = Gpio::new(&regs);

        gpio.write_pins(0b1111, 0b1010_0101);
        assert_eq!(regs.set.get(), 0b0101);
        assert_eq!(written(&regs.clr), 0b1010);
    }

    #[test]
    fn set_bit_in_dir_means_output() {
        let regs = zeroed_registers::<GpioRegisters>();
        let gpio = Gpio::new(&regs);

        gpio.set_pin_directions((1 << 3) | (1 << 30), Direction::Out);
        gpio.set_pin_directions(1 << 30, Direction::In);

        assert_eq!(regs.dir.get(), 1 << 3);
        assert_eq!(gpio.pin_direction(3), Direction::Out);
        assert_eq!(gpio.pin_direction(30), Direction::In);
    }

    #[test]
    fn read_pins_masks() {
        let regs = zeroed_registers::<GpioRegisters>();
        regs.pin.set(0xf0f0);
        assert_eq!(Gpio::new(&regs).read_pins(0x0ff0), 0x00f0);
    }

    #[test]
    fn port_handles_only_touch_their_own_block() {
        let port0 = zeroed_registers::<GpioRegisters>();
        let port1 = zeroed_registers::<GpioRegisters>();
        let gpio0 = Gpio::new(&port0);
        let gpio1 = Gpio::new(&port1);

        gpio1.set_pin_directions(1 << 16, Direction::Out);
        gpio1.set_pins(1 << 16);
        assert_eq!(port1.dir.get(), 1 << 16);
        assert_eq!(port1.set.get(), 1 << 16);
        assert_eq!(port0.dir.get(), 0);
        assert_eq!(port0.set.get(), 0);

        port1.pin.set(1 << 24);
        assert_eq!(gpio1.read_pins(!0), 1 << 24);
        assert_eq!(gpio0.read_pins(!0), 0);
        assert_eq!(gpio0.pin_direction(16), Direction::In);
    }

    #[test]
    fn fio_mask_and_write() {
        let regs = zeroed_registers::<FioRegisters>();
        let fio = Fio::new(&regs);

        fio.set_mask(!0xff);
        fio.write_pins(0xff, 0x0f);
        assert_eq!(fio.mask(), 0xffff_ff00);
        assert_eq!(regs.set.get(), 0x0f);
        assert_eq!(written(&regs.clr), 0xf0);
    }

    #[test]
    fn typed_pins_program_pinsel_and_dir() {
        let gpio_regs: &'static GpioRegisters = Box::leak(zeroed_registers::<GpioRegisters>());
        let pinsel_regs = zeroed_registers::<PinselRegisters>();
        let pinsel = Pinsel::new(&pinsel_regs);
        let parts = gpio_regs.split();

        let mut led = parts.p0_17.into_output(&pinsel);
        assert_eq!(gpio_regs.dir.get(), 1 << 17);

        led.set_high().unwrap();
        assert_eq!(gpio_regs.set.get(), 1 << 17);
        assert!(led.is_set_high().unwrap());

        led.toggle().unwrap();
        assert_eq!(written(&gpio_regs.clr), 1 << 17);

        let _txd = parts.p0_0.into_alternate::<Alt1>(&pinsel);
        assert_eq!(pinsel.pin_function(0), PinFunction::Alt1);

        gpio_regs.pin.set(1 << 4);
        let button = parts.p0_4.into_input(&pinsel);
        assert!(button.is_high().unwrap());
        assert_eq!(gpio_regs.dir.get(), 1 << 17);
    }
}
