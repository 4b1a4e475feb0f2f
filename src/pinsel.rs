//! Pin connect block
//!
//! Every port 0 pin has a 2-bit function selector: pins 0-15 in PINSEL0,
//! pins 16-31 in PINSEL1. PINSEL2 switches the port 1 debug and trace pins
//! (LPC2106, LPC2148; absent on the LPC2103).

use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub PinselRegisters {
        (0x00 => pub pinsel0: ReadWrite<u32>),
        (0x04 => pub pinsel1: ReadWrite<u32>),
        (0x08 => _reserved0),
        (0x14 => pub pinsel2: ReadWrite<u32, PINSEL2::Register>),
        (0x18 => @END),
    }
}

register_bitfields![u32,
    pub PINSEL2 [
        /// P1.26-P1.31 used as the JTAG debug port.
        DEBUG OFFSET(2) NUMBITS(1) [],
        /// P1.16-P1.25 used as the trace port.
        TRACE OFFSET(3) NUMBITS(1) []
    ]
];

pub const MAX_PIN: u8 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PinFunction {
    Gpio = 0,
    Alt1 = 1,
    Alt2 = 2,
    Alt3 = 3,
}

impl From<u32> for PinFunction {
    fn from(bits: u32) -> PinFunction {
        match bits & 0x3 {
            0 => PinFunction::Gpio,
            1 => PinFunction::Alt1,
            2 => PinFunction::Alt2,
            _ => PinFunction::Alt3,
        }
    }
}

/// A pin number and its function packed as `(function << 5) | pin`.
///
/// See [`crate::pinconfig`] for the named values of each chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig(u16);

impl PinConfig {
    pub const fn new(pin: u8, function: PinFunction) -> PinConfig {
        PinConfig(((function as u16) << 5) | (pin as u16 & 0x1f))
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn pin(self) -> u8 {
        (self.0 & 0x1f) as u8
    }

    pub fn function(self) -> PinFunction {
        PinFunction::from((self.0 >> 5) as u32)
    }
}

pub struct Pinsel<'a> {
    regs: &'a PinselRegisters,
}

impl<'a> Pinsel<'a> {
    pub fn new(regs: &'a PinselRegisters) -> Self {
        Pinsel { regs }
    }

    pub fn registers(&self) -> &'a PinselRegisters {
        self.regs
    }

    fn selector(&self, pin: u8) -> (&ReadWrite<u32>, Field<u32, ()>) {
        assert!(pin <= MAX_PIN, "pin out of range");
        let field = Field::new(0b11, (pin as usize & 0xf) * 2);
        if pin > 0xf {
            (&self.regs.pinsel1, field)
        } else {
            (&self.regs.pinsel0, field)
        }
    }

    pub fn set_pin_function(&self, pin: u8, function: PinFunction) {
        let (reg, field) = self.selector(pin);
        reg.modify(field.val(function as u32));
    }

    pub fn pin_function(&self, pin: u8) -> PinFunction {
        let (reg, field) = self.selector(pin);
        PinFunction::from(reg.read(field))
    }

    pub fn set_pin_config(&self, config: PinConfig) {
        self.set_pin_function(config.pin(), config.function());
    }

    pub fn enable_debug_port(&self) {
        self.regs.pinsel2.modify(PINSEL2::DEBUG::SET);
    }

    pub fn disable_debug_port(&self) {
        self.regs.pinsel2.modify(PINSEL2::DEBUG::CLEAR);
    }

    pub fn debug_port_is_enabled(&self) -> bool {
        self.regs.pinsel2.is_set(PINSEL2::DEBUG)
    }

    pub fn enable_trace_port(&self) {
        self.regs.pinsel2.modify(PINSEL2::TRACE::SET);
    }

    pub fn disable_trace_port(&self) {
        self.regs.pinsel2.modify(PINSEL2::TRACE::CLEAR);
    }

    pub fn trace_port_is_enabled(&self) -> bool {
        self.regs.pinsel2.is_set(PINSEL2::TRACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;
    use tock_registers::interfaces::Writeable;

    #[test]
    fn high_pins_live_in_pinsel1() {
        let regs = zeroed_registers::<PinselRegisters>();
        let pinsel = Pinsel::new(&regs);

        pinsel.set_pin_function(17, PinFunction::Alt1);
        assert_eq!(regs.pinsel1.get(), 0b01 << 2);
        assert_eq!(regs.pinsel0.get(), 0);

        pinsel.set_pin_function(5, PinFunction::Alt2);
        assert_eq!(regs.pinsel0.get(), 0b10 << 10);
        assert_eq!(regs.pinsel1.get(), 0b01 << 2);

        assert_eq!(pinsel.pin_function(17), PinFunction::Alt1);
        assert_eq!(pinsel.pin_function(5), PinFunction::Alt2);
    }

    #[test]
    fn neighbours_are_preserved() {
        let regs = zeroed_registers::<PinselRegisters>();
        regs.pinsel0.set(0xffff_ffff);
        let pinsel = Pinsel::new(&regs);

        pinsel.set_pin_function(15, PinFunction::Gpio);
        assert_eq!(regs.pinsel0.get(), 0x3fff_ffff);
    }

    #[test]
    fn pin_config_splits_pin_and_function() {
        let regs = zeroed_registers::<PinselRegisters>();
        let pinsel = Pinsel::new(&regs);

        pinsel.set_pin_config(PinConfig::new(31, PinFunction::Alt1));
        assert_eq!(regs.pinsel1.get(), 0b01 << 30);
    }

    #[test]
    fn debug_and_trace_ports() {
        let regs = zeroed_registers::<PinselRegisters>();
        let pinsel = Pinsel::new(&regs);

        pinsel.enable_trace_port();
        assert_eq!(regs.pinsel2.get(), 1 << 3);
        assert!(!pinsel.debug_port_is_enabled());
        pinsel.enable_debug_port();
        pinsel.disable_trace_port();
        assert_eq!(regs.pinsel2.get(), 1 << 2);
    }

    #[test]
    #[should_panic]
    fn pin_32_is_rejected() {
        let regs = zeroed_registers::<PinselRegisters>();
        Pinsel::new(&regs).set_pin_function(32, PinFunction::Gpio);
    }
}
