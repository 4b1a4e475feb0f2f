//! Digital to analog converter (LPC2148)

use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

register_structs! {
    pub DacRegisters {
        (0x00 => pub cr: ReadWrite<u32, CR::Register>),
        (0x04 => @END),
    }
}

register_bitfields![u32,
    pub CR [
        VALUE OFFSET(6) NUMBITS(10) [],
        BIAS OFFSET(16) NUMBITS(1) []
    ]
];

/// Output drive; less current settles slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// 1 µs settling time
    Max700uA,
    /// 2.5 µs settling time
    Max350uA,
}

pub struct Dac<'a> {
    regs: &'a DacRegisters,
}

impl<'a> Dac<'a> {
    pub fn new(regs: &'a DacRegisters) -> Self {
        Dac { regs }
    }

    pub fn registers(&self) -> &'a DacRegisters {
        self.regs
    }

    pub fn set_bias(&self, bias: Bias) {
        match bias {
            Bias::Max700uA => self.regs.cr.modify(CR::BIAS::CLEAR),
            Bias::Max350uA => self.regs.cr.modify(CR::BIAS::SET),
        }
    }

    pub fn bias(&self) -> Bias {
        if self.regs.cr.is_set(CR::BIAS) {
            Bias::Max350uA
        } else {
            Bias::Max700uA
        }
    }

    /// Output VREF * `value` / 1024.
    pub fn set_value(&self, value: u16) {
        assert!(value <= 0x3ff, "DAC values are 10 bits");
        self.regs.cr.modify(CR::VALUE.val(value as u32));
    }

    pub fn value(&self) -> u16 {
        self.regs.cr.read(CR::VALUE) as u16
    }
}
