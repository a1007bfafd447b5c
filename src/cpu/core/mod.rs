/*!
core::Cpu - The 6502 CPU facade: registers plus the interrupt state machine.

Design
======
- `Cpu` owns a `CpuState` (registers and flags), the single-slot interrupt latch and
  the OAM DMA progress. It never holds the bus; `execute_next` borrows it for one step.
- `execute_next` services whatever is latched before fetching an opcode:

  ```text
    RESET  -> 7 cycles, PC from $FFFC, I set, halt cleared
    halted -> the recorded `CpuError` again, until a RESET
    DMA    -> copy one OAM byte (2 cycles) or finish the transfer (1 cycle)
    NMI    -> 7 cycles, push PC and P (B clear), vector $FFFA
    IRQ    -> 7 cycles, push PC and P (B set), vector $FFFE
    none   -> one instruction via `dispatch::step`
  ```

  Servicing returns only the entry cycles; the handler's first instruction runs on the
  next call.
- Other components reach the latch through `PostInterrupt` only.
*/

use std::fmt;

use log::debug;

use crate::bus::{Bus, PostInterrupt};
use crate::cpu::dispatch;
use crate::cpu::flags::Flags;
use crate::cpu::interrupt::{
    DMA_FINAL_CYCLES, DMA_STEP_CYCLES, DmaTransfer, INTERRUPT_CYCLES, Interrupt, VECTOR_IRQ,
    VECTOR_NMI, VECTOR_RESET,
};
use crate::cpu::state::CpuState;
use crate::error::CpuError;

/// Snapshot of the programmer-visible registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    pub pc: u16,
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={:02X} X={:02X} Y={:02X} P={:02X} SP={:02X} PC={:04X}",
            self.a, self.x, self.y, self.p, self.sp, self.pc
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
    pending: Interrupt,
    dma: DmaTransfer,
    /// NMI posted while a DMA transfer owned the latch.
    nmi_held: bool,
    fault: Option<CpuError>,
}

impl Cpu {
    /// Construct a new CPU with power-up defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on reset: registers to defaults, latch cleared, PC from the reset vector.
    pub fn total_reset(&mut self, bus: &Bus) {
        self.state.reset(bus);
        self.pending = Interrupt::None;
        self.dma = DmaTransfer::default();
        self.nmi_held = false;
        self.fault = None;
    }

    /// Run one step: service the latched interrupt or DMA byte, or execute one instruction.
    /// Returns the CPU cycles consumed.
    pub fn execute_next(&mut self, bus: &mut Bus) -> Result<u32, CpuError> {
        if self.pending == Interrupt::Reset {
            return Ok(self.service_reset(bus));
        }
        if let Some(err) = self.fault {
            return Err(err);
        }
        match self.pending {
            Interrupt::Dma => return Ok(self.dma_step(bus)),
            Interrupt::Nmi => {
                self.pending = Interrupt::None;
                self.service_interrupt(bus, VECTOR_NMI, false);
                return Ok(INTERRUPT_CYCLES);
            }
            Interrupt::Irq => {
                self.pending = Interrupt::None;
                self.service_interrupt(bus, VECTOR_IRQ, true);
                return Ok(INTERRUPT_CYCLES);
            }
            Interrupt::None | Interrupt::Reset => {}
        }

        dispatch::step(&mut self.state, bus).inspect_err(|&err| self.fault = Some(err))
    }

    /// Push PC and P, set I and jump through `vector`.
    fn service_interrupt(&mut self, bus: &mut Bus, vector: u16, set_break: bool) {
        let pc = self.state.pc;
        self.state.push_u16(bus, pc);
        let p = self.state.status_for_push(set_break);
        self.state.push_u8(bus, p);
        self.state.flags.irq_disable = true;
        self.state.pc = bus.peek_word(vector);
    }

    /// Warm reset: registers survive, SP drops by three as if PC and P were pushed.
    fn service_reset(&mut self, bus: &Bus) -> u32 {
        self.pending = Interrupt::None;
        self.dma = DmaTransfer::default();
        self.nmi_held = false;
        self.fault = None;
        self.state.halted = false;
        self.state.sp = self.state.sp.wrapping_sub(3);
        self.state.flags.irq_disable = true;
        self.state.pc = bus.peek_word(VECTOR_RESET);
        debug!("RESET serviced, PC=${:04X}", self.state.pc);
        INTERRUPT_CYCLES
    }

    fn dma_step(&mut self, bus: &mut Bus) -> u32 {
        if self.dma.is_complete() {
            self.pending = if self.nmi_held {
                Interrupt::Nmi
            } else {
                Interrupt::None
            };
            self.nmi_held = false;
            debug!("OAM DMA from ${:04X} complete", self.dma.source);
            return DMA_FINAL_CYCLES;
        }
        let byte = bus.peek(self.dma.source.wrapping_add(self.dma.copied));
        bus.oam_mut()[self.dma.copied as usize] = byte;
        self.dma.copied += 1;
        DMA_STEP_CYCLES
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn pending_interrupt(&self) -> Interrupt {
        self.pending
    }

    /// True once an undefined opcode stopped the instruction loop.
    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn flags(&self) -> Flags {
        self.state.flags
    }
    pub fn status(&self) -> u8 {
        self.state.status()
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.state.a,
            x: self.state.x,
            y: self.state.y,
            p: self.state.status(),
            sp: self.state.sp,
            pc: self.state.pc,
        }
    }
}

impl PostInterrupt for Cpu {
    fn post_interrupt(&mut self, kind: Interrupt) {
        match kind {
            Interrupt::None => {}
            Interrupt::Irq => {
                // Masked or preempted requests are dropped, not queued.
                if !self.state.flags.irq_disable && self.pending == Interrupt::None {
                    self.pending = Interrupt::Irq;
                }
            }
            Interrupt::Nmi => match self.pending {
                Interrupt::Reset => {}
                Interrupt::Dma => self.nmi_held = true,
                _ => self.pending = Interrupt::Nmi,
            },
            Interrupt::Reset => {
                self.pending = Interrupt::Reset;
            }
            // A transfer needs its source page; only `start_dma` begins one.
            Interrupt::Dma => {}
        }
    }

    fn start_dma(&mut self, source: u16) {
        match self.pending {
            Interrupt::Reset => return,
            Interrupt::Nmi => self.nmi_held = true,
            _ => {}
        }
        debug!("OAM DMA from ${:04X} started", source);
        self.dma = DmaTransfer::new(source);
        self.pending = Interrupt::Dma;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::flags::BREAK;
    use crate::test_utils::{PRG_START, setup_cpu, setup_cpu_with_vectors};

    const NMI_HANDLER: u16 = 0x8100;
    const IRQ_HANDLER: u16 = 0x8200;

    fn setup(prg: &[u8]) -> (Cpu, Bus) {
        setup_cpu_with_vectors(prg, Some(NMI_HANDLER), Some(IRQ_HANDLER))
    }

    #[test]
    fn construction_and_reset() {
        let (cpu, _bus) = setup_cpu(&[0xEA]);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.pc(), PRG_START);
        assert!(cpu.flags().irq_disable);
        assert!(cpu.flags().unused);
        assert_eq!(cpu.pending_interrupt(), Interrupt::None);
    }

    #[test]
    fn irq_dropped_while_masked() {
        let (mut cpu, mut bus) = setup(&[0xEA]);
        assert!(cpu.flags().irq_disable);
        cpu.post_interrupt(Interrupt::Irq);
        assert_eq!(cpu.pending_interrupt(), Interrupt::None);
        // Nothing queued: the next step is the NOP
        assert_eq!(cpu.execute_next(&mut bus), Ok(2));
        assert_eq!(cpu.pc(), PRG_START + 1);
    }

    #[test]
    fn irq_serviced_when_unmasked_pushes_break_set() {
        // CLI
        let (mut cpu, mut bus) = setup(&[0x58, 0xEA]);
        cpu.execute_next(&mut bus).expect("cli");
        cpu.post_interrupt(Interrupt::Irq);
        assert_eq!(cpu.pending_interrupt(), Interrupt::Irq);
        assert_eq!(cpu.execute_next(&mut bus), Ok(7));
        assert_eq!(cpu.pc(), IRQ_HANDLER);
        assert!(cpu.flags().irq_disable);
        assert_eq!(cpu.pending_interrupt(), Interrupt::None);
        assert_ne!(bus.peek(0x01FB) & BREAK, 0);
        // Return address is the instruction that was about to run
        assert_eq!(bus.peek_word(0x01FC), PRG_START + 1);
    }

    #[test]
    fn nmi_posts_regardless_of_mask_and_clears_break() {
        let (mut cpu, mut bus) = setup(&[0xEA]);
        assert!(cpu.flags().irq_disable);
        cpu.post_interrupt(Interrupt::Nmi);
        assert_eq!(cpu.pending_interrupt(), Interrupt::Nmi);
        assert_eq!(cpu.execute_next(&mut bus), Ok(7));
        assert_eq!(cpu.pc(), NMI_HANDLER);
        assert_eq!(cpu.sp(), 0xFA);
        assert_eq!(bus.peek(0x01FB) & BREAK, 0);
        assert_eq!(bus.peek_word(0x01FC), PRG_START);
    }

    #[test]
    fn irq_does_not_displace_pending_nmi() {
        let (mut cpu, mut bus) = setup(&[0x58, 0xEA]);
        cpu.execute_next(&mut bus).expect("cli");
        cpu.post_interrupt(Interrupt::Nmi);
        cpu.post_interrupt(Interrupt::Irq);
        assert_eq!(cpu.pending_interrupt(), Interrupt::Nmi);
    }

    #[test]
    fn dma_copies_page_into_oam() {
        let (mut cpu, mut bus) = setup(&[0xEA]);
        for i in 0..256u16 {
            bus.poke(0x0200 + i, (i as u8).wrapping_mul(3));
        }
        cpu.start_dma(0x0200);
        assert_eq!(cpu.pending_interrupt(), Interrupt::Dma);

        let mut total = 0;
        let mut steps = 0;
        while cpu.pending_interrupt() == Interrupt::Dma {
            let c = cpu.execute_next(&mut bus).expect("dma step");
            assert!(c <= 2);
            total += c;
            steps += 1;
        }
        assert_eq!(total, 513);
        assert_eq!(steps, 257);
        assert!((512..=514).contains(&total));
        for i in 0..256usize {
            assert_eq!(bus.oam()[i], (i as u8).wrapping_mul(3));
        }
        // PC untouched by the transfer
        assert_eq!(cpu.pc(), PRG_START);
    }

    #[test]
    fn posted_dma_without_source_is_ignored() {
        let (mut cpu, mut bus) = setup(&[0xEA]);
        cpu.start_dma(0x0200);
        while cpu.pending_interrupt() == Interrupt::Dma {
            cpu.execute_next(&mut bus).expect("dma");
        }
        cpu.post_interrupt(Interrupt::Dma);
        assert_eq!(cpu.pending_interrupt(), Interrupt::None);
        assert_eq!(cpu.execute_next(&mut bus), Ok(2));
        assert_eq!(cpu.pc(), PRG_START + 1);
    }

    #[test]
    fn nmi_during_dma_is_latched_after_transfer() {
        let (mut cpu, mut bus) = setup(&[0xEA]);
        cpu.start_dma(0x0300);
        cpu.execute_next(&mut bus).expect("dma");
        cpu.post_interrupt(Interrupt::Nmi);
        assert_eq!(cpu.pending_interrupt(), Interrupt::Dma);
        while cpu.pending_interrupt() == Interrupt::Dma {
            cpu.execute_next(&mut bus).expect("dma");
        }
        assert_eq!(cpu.pending_interrupt(), Interrupt::Nmi);
        assert_eq!(cpu.execute_next(&mut bus), Ok(7));
        assert_eq!(cpu.pc(), NMI_HANDLER);
    }

    #[test]
    fn reset_clears_halt_and_reloads_vector() {
        let (mut cpu, mut bus) = setup(&[0xEA, 0xFF]);
        cpu.execute_next(&mut bus).expect("nop");
        assert!(cpu.execute_next(&mut bus).is_err());
        assert!(cpu.is_halted());

        cpu.post_interrupt(Interrupt::Reset);
        assert_eq!(cpu.execute_next(&mut bus), Ok(7));
        assert!(!cpu.is_halted());
        assert_eq!(cpu.pc(), PRG_START);
        assert!(cpu.flags().irq_disable);
        assert_eq!(cpu.execute_next(&mut bus), Ok(2));
    }

    #[test]
    fn registers_snapshot() {
        // LDA #$12; LDX #$34; LDY #$56
        let (mut cpu, mut bus) = setup(&[0xA9, 0x12, 0xA2, 0x34, 0xA0, 0x56]);
        for _ in 0..3 {
            cpu.execute_next(&mut bus).expect("load");
        }
        let r = cpu.registers();
        assert_eq!((r.a, r.x, r.y, r.sp), (0x12, 0x34, 0x56, 0xFD));
        assert_eq!(r.pc, PRG_START + 6);
        assert_eq!(r.p, cpu.status());
        assert_eq!(
            r.to_string(),
            format!("A=12 X=34 Y=56 P={:02X} SP=FD PC=8006", r.p)
        );
    }
}
