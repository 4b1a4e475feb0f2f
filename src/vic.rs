//! Vectored interrupt controller
//!
//! 32 interrupt channels, numbered by [`Interrupt`]. Each one is either an
//! FIQ or an IRQ. IRQs can be given one of 16 prioritized vector slots (slot
//! 0 is highest); the handler address of the highest-priority pending slot
//! then shows up in VECTADDR, and unslotted IRQs get the default handler.
//!
//! The IRQ exception vector is expected to jump through VECTADDR, and every
//! handler must end with [`Vic::acknowledge`].

use tock_registers::fields::Field;
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

use crate::chip::Interrupt;

register_structs! {
    pub VicRegisters {
        (0x000 => pub irqstatus: ReadOnly<u32>),
        (0x004 => pub fiqstatus: ReadOnly<u32>),
        (0x008 => pub rawintr: ReadOnly<u32>),
        /// Set for FIQ.
        (0x00C => pub intselect: ReadWrite<u32>),
        /// Writing 1 enables, 0 has no effect.
        (0x010 => pub intenable: ReadWrite<u32>),
        (0x014 => pub intenclear: WriteOnly<u32>),
        (0x018 => pub softint: ReadWrite<u32>),
        (0x01C => pub softintclear: WriteOnly<u32>),
        (0x020 => pub protection: ReadWrite<u32, PROTECTION::Register>),
        (0x024 => _reserved0),
        (0x030 => pub vectaddr: ReadWrite<u32>),
        (0x034 => pub defvectaddr: ReadWrite<u32>),
        (0x038 => _reserved1),
        (0x100 => pub vectaddrs: [ReadWrite<u32>; 16]),
        (0x140 => _reserved2),
        (0x200 => pub vectcntl: [ReadWrite<u32, VECTCNTL::Register>; 16]),
        (0x240 => @END),
    }
}

register_bitfields![u32,
    pub PROTECTION [
        /// VIC registers only writable in privileged mode
        PROTECT OFFSET(0) NUMBITS(1) []
    ],
    pub VECTCNTL [
        IRQNUM OFFSET(0) NUMBITS(5) [],
        IRQEN OFFSET(5) NUMBITS(1) []
    ]
];

pub const SLOTS: u8 = 16;

/// Interrupt handler entry point.
pub type Handler = unsafe extern "C" fn();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptType {
    Irq,
    Fiq,
}

fn channel(interrupt: Interrupt) -> Field<u32, ()> {
    Field::<u32, ()>::new(1, interrupt.nr() as usize)
}

fn address(handler: Handler) -> u32 {
    handler as usize as u32
}

pub struct Vic<'a> {
    regs: &'a VicRegisters,
}

impl<'a> Vic<'a> {
    pub fn new(regs: &'a VicRegisters) -> Self {
        Vic { regs }
    }

    pub fn registers(&self) -> &'a VicRegisters {
        self.regs
    }

    pub fn enable_irq(&self, interrupt: Interrupt) {
        self.regs.intenable.set(interrupt.mask());
    }

    pub fn disable_irq(&self, interrupt: Interrupt) {
        self.regs.intenclear.set(interrupt.mask());
    }

    pub fn irq_is_enabled(&self, interrupt: Interrupt) -> bool {
        self.regs.intenable.get() & interrupt.mask() != 0
    }

    pub fn set_interrupt_type(&self, interrupt: Interrupt, ty: InterruptType) {
        let fiq = match ty {
            InterruptType::Irq => 0,
            InterruptType::Fiq => 1,
        };
        self.regs.intselect.modify(channel(interrupt).val(fiq));
    }

    pub fn interrupt_type(&self, interrupt: Interrupt) -> InterruptType {
        if self.regs.intselect.read(channel(interrupt)) != 0 {
            InterruptType::Fiq
        } else {
            InterruptType::Irq
        }
    }

    /// Pending and enabled IRQs, one bit per [`Interrupt::mask`].
    pub fn irq_status(&self) -> u32 {
        self.regs.irqstatus.get()
    }

    pub fn fiq_status(&self) -> u32 {
        self.regs.fiqstatus.get()
    }

    /// Pending interrupts, enabled or not.
    pub fn raw_status(&self) -> u32 {
        self.regs.rawintr.get()
    }

    /// Route `interrupt` to `handler` through vector `slot` and enable the
    /// slot. The channel itself still has to be enabled with
    /// [`Vic::enable_irq`].
    pub fn set_slot(&self, slot: u8, interrupt: Interrupt, handler: Handler) {
        assert!(slot < SLOTS, "VIC slot out of range");
        let slot = slot as usize;
        self.regs.vectaddrs[slot].set(address(handler));
        self.regs.vectcntl[slot]
            .write(VECTCNTL::IRQNUM.val(interrupt.nr() as u32) + VECTCNTL::IRQEN::SET);

        log::debug!(
            "vic: slot {} -> {:?} at {:#010x}",
            slot,
            interrupt,
            address(handler)
        );
    }

    pub fn enable_slot(&self, slot: u8) {
        assert!(slot < SLOTS, "VIC slot out of range");
        self.regs.vectcntl[slot as usize].modify(VECTCNTL::IRQEN::SET);
    }

    pub fn disable_slot(&self, slot: u8) {
        assert!(slot < SLOTS, "VIC slot out of range");
        self.regs.vectcntl[slot as usize].modify(VECTCNTL::IRQEN::CLEAR);
    }

    pub fn slot_is_enabled(&self, slot: u8) -> bool {
        assert!(slot < SLOTS, "VIC slot out of range");
        self.regs.vectcntl[slot as usize].is_set(VECTCNTL::IRQEN)
    }

    /// VIC channel number assigned to `slot`.
    pub fn slot_interrupt(&self, slot: u8) -> u8 {
        assert!(slot < SLOTS, "VIC slot out of range");
        self.regs.vectcntl[slot as usize].read(VECTCNTL::IRQNUM) as u8
    }

    /// Handler for IRQs without a vector slot.
    pub fn set_default_handler(&self, handler: Handler) {
        self.regs.defvectaddr.set(address(handler));
    }

    /// Address of the handler for the IRQ being serviced.
    pub fn current_handler(&self) -> u32 {
        self.regs.vectaddr.get()
    }

    /// Signal the end of the current IRQ so lower-priority ones can be
    /// serviced.
    pub fn acknowledge(&self) {
        self.regs.vectaddr.set(0);
    }

    pub fn trigger_software_interrupt(&self, interrupt: Interrupt) {
        self.regs.softint.set(interrupt.mask());
    }

    pub fn clear_software_interrupt(&self, interrupt: Interrupt) {
        self.regs.softintclear.set(interrupt.mask());
    }

    pub fn enable_protection(&self) {
        self.regs.protection.write(PROTECTION::PROTECT::SET);
    }

    pub fn disable_protection(&self) {
        self.regs.protection.write(PROTECTION::PROTECT::CLEAR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeroed_registers;

    unsafe extern "C" fn uart0_handler() {}

    fn written(reg: &WriteOnly<u32>) -> u32 {
        unsafe { (reg as *const WriteOnly<u32> as *const u32).read_volatile() }
    }

    #[test]
    fn layout() {
        let regs = zeroed_registers::<VicRegisters>();
        let base = &*regs as *const VicRegisters as usize;

        assert_eq!(&regs.protection as *const _ as usize - base, 0x020);
        assert_eq!(&regs.defvectaddr as *const _ as usize - base, 0x034);
        assert_eq!(&regs.vectaddrs[15] as *const _ as usize - base, 0x13c);
        assert_eq!(&regs.vectcntl[0] as *const _ as usize - base, 0x200);
    }

    #[test]
    fn enable_and_disable_go_through_separate_registers() {
        let regs = zeroed_registers::<VicRegisters>();
        let vic = Vic::new(&regs);

        vic.enable_irq(Interrupt::Uart0);
        assert_eq!(regs.intenable.get(), 1 << 6);
        assert!(vic.irq_is_enabled(Interrupt::Uart0));
        assert!(!vic.irq_is_enabled(Interrupt::Wdt));

        vic.disable_irq(Interrupt::Uart0);
        assert_eq!(written(&regs.intenclear), 1 << 6);
    }

    #[test]
    fn interrupt_type_is_one_bit() {
        let regs = zeroed_registers::<VicRegisters>();
        let vic = Vic::new(&regs);

        vic.set_interrupt_type(Interrupt::Wdt, InterruptType::Fiq);
        vic.set_interrupt_type(Interrupt::Uart0, InterruptType::Fiq);
        vic.set_interrupt_type(Interrupt::Wdt, InterruptType::Irq);
        assert_eq!(regs.intselect.get(), 1 << 6);
        assert_eq!(vic.interrupt_type(Interrupt::Uart0), InterruptType::Fiq);
    }

    #[test]
    fn slots() {
        let regs = zeroed_registers::<VicRegisters>();
        let vic = Vic::new(&regs);

        vic.set_slot(3, Interrupt::Uart0, uart0_handler);
        assert_eq!(regs.vectcntl[3].get(), 0x20 | 6);
        assert_eq!(regs.vectaddrs[3].get(), uart0_handler as usize as u32);
        assert_eq!(vic.slot_interrupt(3), Interrupt::Uart0.nr());

        vic.disable_slot(3);
        assert!(!vic.slot_is_enabled(3));
        assert_eq!(vic.slot_interrupt(3), 6);
        vic.enable_slot(3);
        assert!(vic.slot_is_enabled(3));
    }

    #[test]
    fn acknowledge_clears_vectaddr() {
        let regs = zeroed_registers::<VicRegisters>();
        let vic = Vic::new(&regs);

        regs.vectaddr.set(0x1234);
        assert_eq!(vic.current_handler(), 0x1234);
        vic.acknowledge();
        assert_eq!(regs.vectaddr.get(), 0);
    }

    #[test]
    #[should_panic]
    fn slot_16_does_not_exist() {
        let regs = zeroed_registers::<VicRegisters>();
        Vic::new(&regs).set_slot(16, Interrupt::Wdt, uart0_handler);
    }
}
