//! I2C controller
//!
//! The controller is a state machine: each bus event sets SI and leaves a
//! status code in STAT. Software reacts by loading DAT and setting or
//! clearing STA/STO/AA, then clears SI to let the next event happen. The
//! codes are listed in [`status`].
//!
//! Control bits are set through CONSET and cleared through CONCLR; writing a
//! zero to either has no effect.
//!
//! [`I2c`] implements the `embedded-hal` blocking master traits by polling
//! SI. For interrupt-driven use, drive the state machine with the
//! register-level methods from the VIC handler.

use embedded_hal::blocking::i2c::{Read, Write, WriteRead};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

use crate::clock::Hertz;

register_structs! {
    pub I2cRegisters {
        (0x00 => pub conset: ReadWrite<u32, CONSET::Register>),
        (0x04 => pub stat: ReadOnly<u32, STAT::Register>),
        (0x08 => pub dat: ReadWrite<u32>),
        (0x0C => pub adr: ReadWrite<u32, ADR::Register>),
        (0x10 => pub sclh: ReadWrite<u32>),
        (0x14 => pub scll: ReadWrite<u32>),
        (0x18 => pub conclr: WriteOnly<u32, CONCLR::Register>),
        (0x1C => @END),
    }
}

register_bitfields![u32,
    pub CONSET [
        AA OFFSET(2) NUMBITS(1) [],
        SI OFFSET(3) NUMBITS(1) [],
        STO OFFSET(4) NUMBITS(1) [],
        STA OFFSET(5) NUMBITS(1) [],
        I2EN OFFSET(6) NUMBITS(1) []
    ],
    pub STAT [
        STATUS OFFSET(3) NUMBITS(5) []
    ],
    pub ADR [
        GC OFFSET(0) NUMBITS(1) [],
        ADDRESS OFFSET(1) NUMBITS(7) []
    ],
    pub CONCLR [
        AAC OFFSET(2) NUMBITS(1) [],
        SIC OFFSET(3) NUMBITS(1) [],
        STAC OFFSET(5) NUMBITS(1) [],
        I2ENC OFFSET(6) NUMBITS(1) []
    ]
];

/// Master mode status codes.
pub mod status {
    pub const BUS_ERROR: u8 = 0x00;
    pub const START: u8 = 0x08;
    pub const REPEATED_START: u8 = 0x10;
    pub const ADDRESS_WRITE_ACK: u8 = 0x18;
    pub const ADDRESS_WRITE_NACK: u8 = 0x20;
    pub const DATA_WRITE_ACK: u8 = 0x28;
    pub const DATA_WRITE_NACK: u8 = 0x30;
    pub const ARBITRATION_LOST: u8 = 0x38;
    pub const ADDRESS_READ_ACK: u8 = 0x40;
    pub const ADDRESS_READ_NACK: u8 = 0x48;
    pub const DATA_READ_ACK: u8 = 0x50;
    pub const DATA_READ_NACK: u8 = 0x58;
    /// No SI, nothing to do.
    pub const IDLE: u8 = 0xf8;
}

/// SCLH and SCLL must each be at least this.
const MIN_SCL_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The addressed device or the data byte was not acknowledged.
    Nack,
    ArbitrationLost,
    /// Illegal START/STOP on the bus, or any status the master didn't expect.
    Bus,
}

impl Error {
    fn from_status(status: u8) -> Error {
        match status {
            status::ADDRESS_WRITE_NACK | status::DATA_WRITE_NACK | status::ADDRESS_READ_NACK => {
                Error::Nack
            }
            status::ARBITRATION_LOST => Error::ArbitrationLost,
            _ => Error::Bus,
        }
    }
}

pub struct I2c<'a> {
    regs: &'a I2cRegisters,
}

impl<'a> I2c<'a> {
    pub fn new(regs: &'a I2cRegisters) -> Self {
        I2c { regs }
    }

    pub fn registers(&self) -> &'a I2cRegisters {
        self.regs
    }

    pub fn enable(&self) {
        self.regs.conset.write(CONSET::I2EN::SET);
    }

    pub fn disable(&self) {
        self.regs.conclr.write(CONCLR::I2ENC::SET);
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.conset.is_set(CONSET::I2EN)
    }

    /// Request a (repeated) START once the bus is free.
    pub fn set_start(&self) {
        self.regs.conset.write(CONSET::STA::SET);
    }

    pub fn clear_start(&self) {
        self.regs.conclr.write(CONCLR::STAC::SET);
    }

    /// Cleared by hardware once the STOP is on the bus.
    pub fn set_stop(&self) {
        self.regs.conset.write(CONSET::STO::SET);
    }

    /// ACK received bytes (and our own address in slave mode).
    pub fn set_assert_ack(&self) {
        self.regs.conset.write(CONSET::AA::SET);
    }

    pub fn clear_assert_ack(&self) {
        self.regs.conclr.write(CONCLR::AAC::SET);
    }

    pub fn interrupt_is_pending(&self) -> bool {
        self.regs.conset.is_set(CONSET::SI)
    }

    /// Lets the state machine move on.
    pub fn clear_interrupt(&self) {
        self.regs.conclr.write(CONCLR::SIC::SET);
    }

    /// Current status code, see [`status`].
    pub fn status(&self) -> u8 {
        (self.regs.stat.get() & 0xf8) as u8
    }

    pub fn write_data(&self, byte: u8) {
        self.regs.dat.set(byte as u32);
    }

    pub fn read_data(&self) -> u8 {
        self.regs.dat.get() as u8
    }

    /// 7-bit slave address, and whether to answer the general call.
    pub fn set_own_address(&self, address: u8, general_call: bool) {
        assert!(address < 0x80, "I2C addresses are 7 bits");
        self.regs
            .adr
            .write(ADR::ADDRESS.val(address as u32) + ADR::GC.val(general_call as u32));
    }

    pub fn own_address(&self) -> (u8, bool) {
        (self.regs.adr.read(ADR::ADDRESS) as u8, self.regs.adr.is_set(ADR::GC))
    }

    /// SCL high and low times in PCLK cycles.
    pub fn set_duty_cycle(&self, high: u16, low: u16) {
        assert!(
            high as u32 >= MIN_SCL_COUNT && low as u32 >= MIN_SCL_COUNT,
            "SCL high and low counts must be at least 4"
        );
        self.regs.sclh.set(high as u32);
        self.regs.scll.set(low as u32);
    }

    pub fn duty_cycle(&self) -> (u16, u16) {
        (self.regs.sclh.get() as u16, self.regs.scll.get() as u16)
    }

    /// Symmetric SCL at `frequency` (at most 400 kHz).
    pub fn set_bus_frequency(&self, pclk: Hertz, frequency: Hertz) {
        assert!(frequency.0 > 0 && frequency.0 <= 400_000, "I2C bus frequency out of range");
        let half = pclk.0 / frequency.0 / 2;
        assert!(half >= MIN_SCL_COUNT && half <= 0xffff, "PCLK can't produce this I2C frequency");
        self.set_duty_cycle(half as u16, half as u16);
    }

    fn wait(&self) -> u8 {
        #[cfg(test)]
        tests::controller_step(self.regs);

        while !self.interrupt_is_pending() {}
        self.status()
    }

    fn expect_status(&self, expected: &[u8]) -> Result<(), Error> {
        let status = self.wait();
        if expected.contains(&status) {
            return Ok(());
        }

        let error = Error::from_status(status);
        // After losing arbitration the bus belongs to someone else.
        if error != Error::ArbitrationLost {
            self.set_stop();
        }
        self.clear_interrupt();
        Err(error)
    }

    fn start(&self, address: u8, read: bool) -> Result<(), Error> {
        self.set_start();
        self.clear_interrupt();
        self.expect_status(&[status::START, status::REPEATED_START])?;

        self.write_data((address << 1) | read as u8);
        self.regs.conclr.write(CONCLR::STAC::SET + CONCLR::SIC::SET);
        if read {
            self.expect_status(&[status::ADDRESS_READ_ACK])
        } else {
            self.expect_status(&[status::ADDRESS_WRITE_ACK])
        }
    }

    fn stop(&self) {
        self.set_stop();
        self.clear_interrupt();
    }

    fn write_bytes(&self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        self.start(address, false)?;
        for &byte in bytes {
            self.write_data(byte);
            self.clear_interrupt();
            self.expect_status(&[status::DATA_WRITE_ACK])?;
        }
        Ok(())
    }

    /// Nothing goes on the bus for an empty `buffer`.
    fn read_bytes(&self, address: u8, buffer: &mut [u8]) -> Result<(), Error> {
        if buffer.is_empty() {
            return Ok(());
        }

        self.start(address, true)?;
        let last = buffer.len() - 1;
        for (i, byte) in buffer.iter_mut().enumerate() {
            // NACK the last byte so the slave lets go of SDA.
            if i == last {
                self.regs.conclr.write(CONCLR::AAC::SET + CONCLR::SIC::SET);
                self.expect_status(&[status::DATA_READ_NACK])?;
            } else {
                self.set_assert_ack();
                self.clear_interrupt();
                self.expect_status(&[status::DATA_READ_ACK])?;
            }
            *byte = self.read_data();
        }
        Ok(())
    }
}

impl<'a> Write for I2c<'a> {
    type Error = Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Error> {
        self.write_bytes(address, bytes)?;
        self.stop();
        Ok(())
    }
}

impl<'a> Read for I2c<'a> {
    type Error = Error;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.read_bytes(address, buffer)?;
        self.stop();
        Ok(())
    }
}

impl<'a> WriteRead for I2c<'a> {
    type Error = Error;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Error> {
        self.write_bytes(address, bytes)?;
        // Repeated START
        self.read_bytes(address, buffer)?;
        self.stop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    thread_local! {
        /// Events the controller raises next, as (STAT, DAT).
        static EVENTS: RefCell<VecDeque<(u8, u8)>> = RefCell::new(VecDeque::new());
        /// (CONSET, CONCLR, DAT) as written by the master before each event.
        static WRITES: RefCell<Vec<(u32, u32, u32)>> = RefCell::new(Vec::new());
    }

    const SI: u32 = 1 << 3;

    /// Plays the controller while the master waits for SI: records what was
    /// written since the last event, then raises the next scripted one.
    /// Without a script the registers are left alone.
    pub(super) fn controller_step(regs: &I2cRegisters) {
        let (stat, data) = match EVENTS.with(|events| events.borrow_mut().pop_front()) {
            Some(event) => event,
            None => return,
        };

        let writes = (regs.conset.get() & !SI, peek(&regs.conclr), regs.dat.get());
        WRITES.with(|w| w.borrow_mut().push(writes));

        poke(&regs.conset, SI);
        poke(&regs.conclr, 0);
        poke(&regs.stat, stat as u32);
        regs.dat.set(data as u32);
    }

    fn script(events: &[(u8, u8)]) {
        EVENTS.with(|e| e.borrow_mut().extend(events.iter().copied()));
        WRITES.with(|w| w.borrow_mut().clear());
    }

    fn writes() -> Vec<(u32, u32, u32)> {
        WRITES.with(|w| w.borrow().clone())
    }

    fn events_left() -> usize {
        EVENTS.with(|e| e.borrow().len())
    }

    fn poke<T>(reg: &T, value: u32) {
        unsafe { (reg as *const T as *mut u32).write_volatile(value) };
    }

    fn peek<T>(reg: &T) -> u32 {
        unsafe { (reg as *const T as *const u32).read_volatile() }
    }

    #[test]
    fn control_bits_go_through_set_and_clear_registers() {
        let regs = zeroed_registers::<I2cRegisters>();
        let i2c = I2c::new(&regs);

        i2c.set_start();
        assert_eq!(regs.conset.get(), 1 << 5);
        i2c.clear_interrupt();
        assert_eq!(peek(&regs.conclr), 1 << 3);
        i2c.disable();
        assert_eq!(peek(&regs.conclr), 1 << 6);
    }

    #[test]
    fn own_address_is_shifted_past_gc() {
        let regs = zeroed_registers::<I2cRegisters>();
        let i2c = I2c::new(&regs);

        i2c.set_own_address(0x50, true);
        assert_eq!(regs.adr.get(), 0xa1);
        assert_eq!(i2c.own_address(), (0x50, true));
    }

    #[test]
    fn bus_frequency_splits_evenly() {
        let regs = zeroed_registers::<I2cRegisters>();
        let i2c = I2c::new(&regs);

        i2c.set_bus_frequency(Hertz(15_000_000), Hertz(100_000));
        assert_eq!(i2c.duty_cycle(), (75, 75));
    }

    #[test]
    fn status_masks_low_bits() {
        let regs = zeroed_registers::<I2cRegisters>();
        poke(&regs.stat, 0x1f);
        assert_eq!(I2c::new(&regs).status(), 0x18);
    }

    #[test]
    fn status_to_error() {
        assert_eq!(Error::from_status(status::ADDRESS_WRITE_NACK), Error::Nack);
        assert_eq!(Error::from_status(status::DATA_WRITE_NACK), Error::Nack);
        assert_eq!(Error::from_status(status::ARBITRATION_LOST), Error::ArbitrationLost);
        assert_eq!(Error::from_status(status::BUS_ERROR), Error::Bus);
    }

    #[test]
    fn unexpected_status_sends_stop() {
        let regs = zeroed_registers::<I2cRegisters>();
        // SI pending, slave didn't ACK its address
        poke(&regs.conset, 1 << 3);
        poke(&regs.stat, status::ADDRESS_WRITE_NACK as u32);
        let i2c = I2c::new(&regs);

        assert_eq!(i2c.expect_status(&[status::ADDRESS_WRITE_ACK]), Err(Error::Nack));
        assert_eq!(regs.conset.get(), 1 << 4);
        assert_eq!(peek(&regs.conclr), 1 << 3);
    }

    #[test]
    fn lost_arbitration_leaves_the_bus_alone() {
        let regs = zeroed_registers::<I2cRegisters>();
        poke(&regs.conset, 1 << 3);
        poke(&regs.stat, status::ARBITRATION_LOST as u32);
        let i2c = I2c::new(&regs);

        assert_eq!(i2c.expect_status(&[status::DATA_WRITE_ACK]), Err(Error::ArbitrationLost));
        assert_eq!(regs.conset.get(), 1 << 3);
        assert_eq!(peek(&regs.conclr), 1 << 3);
    }

    #[test]
    fn expected_status_passes_through() {
        let regs = zeroed_registers::<I2cRegisters>();
        poke(&regs.conset, 1 << 3);
        poke(&regs.stat, status::DATA_READ_ACK as u32);
        let i2c = I2c::new(&regs);

        assert_eq!(i2c.expect_status(&[status::DATA_READ_ACK]), Ok(()));
        assert_eq!(peek(&regs.conclr), 0);
    }

    const STA: u32 = 1 << 5;
    const STO: u32 = 1 << 4;
    const AA: u32 = 1 << 2;
    const STAC: u32 = 1 << 5;
    const AAC: u32 = 1 << 2;

    #[test]
    fn write_read_uses_repeated_start_and_nacks_the_last_byte() {
        let regs = zeroed_registers::<I2cRegisters>();
        let mut i2c = I2c::new(&regs);
        script(&[
            (status::START, 0),
            (status::ADDRESS_WRITE_ACK, 0),
            (status::DATA_WRITE_ACK, 0),
            (status::REPEATED_START, 0),
            (status::ADDRESS_READ_ACK, 0),
            (status::DATA_READ_ACK, 0xde),
            (status::DATA_READ_NACK, 0xad),
        ]);

        let mut buffer = [0; 2];
        assert_eq!(i2c.write_read(0x50, &[0x10], &mut buffer), Ok(()));
        assert_eq!(buffer, [0xde, 0xad]);
        assert_eq!(events_left(), 0);

        let writes = writes();
        let control: Vec<(u32, u32)> = writes.iter().map(|&(set, clr, _)| (set, clr)).collect();
        assert_eq!(
            control,
            [
                (STA, SI),
                (0, STAC | SI),
                (0, SI),
                (STA, SI),
                (0, STAC | SI),
                (AA, SI),
                (0, AAC | SI),
            ]
        );
        // SLA+W, register, SLA+R
        assert_eq!(writes[1].2, 0xa0);
        assert_eq!(writes[2].2, 0x10);
        assert_eq!(writes[4].2, 0xa1);

        // STOP once the last byte is in
        assert_eq!(regs.conset.get(), STO);
        assert_eq!(peek(&regs.conclr), SI);
    }

    #[test]
    fn write_stops_on_data_nack() {
        let regs = zeroed_registers::<I2cRegisters>();
        let mut i2c = I2c::new(&regs);
        script(&[
            (status::START, 0),
            (status::ADDRESS_WRITE_ACK, 0),
            (status::DATA_WRITE_NACK, 0),
        ]);

        assert_eq!(i2c.write(0x50, &[1, 2]), Err(Error::Nack));
        let writes = writes();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[2].2, 1);
        assert_eq!(regs.conset.get(), STO);
    }

    #[test]
    fn write_sends_every_byte_then_stops() {
        let regs = zeroed_registers::<I2cRegisters>();
        let mut i2c = I2c::new(&regs);
        script(&[
            (status::START, 0),
            (status::ADDRESS_WRITE_ACK, 0),
            (status::DATA_WRITE_ACK, 0),
            (status::DATA_WRITE_ACK, 0),
        ]);

        assert_eq!(i2c.write(0x3c, &[0x00, 0xaf]), Ok(()));
        let data: Vec<u32> = writes().iter().map(|&(_, _, dat)| dat).collect();
        assert_eq!(&data[1..], [0x78, 0x00, 0xaf]);
        assert_eq!(regs.conset.get(), STO);
    }

    #[test]
    fn empty_read_leaves_the_bus_alone() {
        let regs = zeroed_registers::<I2cRegisters>();
        let mut i2c = I2c::new(&regs);
        script(&[]);

        assert_eq!(i2c.read(0x50, &mut []), Ok(()));
        assert!(writes().is_empty());
        assert_eq!(regs.conset.get(), 0);
        assert_eq!(peek(&regs.conclr), 0);
    }
}
