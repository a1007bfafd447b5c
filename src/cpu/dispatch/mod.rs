/*!
dispatch - Fetch / decode / execute of one instruction

Overview
========
`step(cpu, bus)` runs a single instruction:
1. Fetch the opcode at PC and decode it through `table::decode`. An undocumented slot
   halts the CPU and reports `CpuError::UnknownOpcode`.
2. Look up base cycles for the (mnemonic, mode) pair.
3. Resolve the addressing mode (advances PC) and add +1 when an eligible indexed read
   crossed a page.
4. Hand the resolved operand to the family handlers in turn until one claims the mnemonic.
   Branches add their own taken / page-cross cycles.

Interrupts and DMA are serviced before this point by `core::Cpu::execute_next`.
*/

use log::{error, trace};

use crate::bus::Bus;
use crate::cpu::addressing::{Resolved, resolve};
use crate::cpu::state::CpuState;
use crate::cpu::table::{Mnemonic, decode, page_cross_penalty};
use crate::error::CpuError;

mod arithmetic;
mod branches;
mod compare;
mod control_flow;
mod load_store;
mod logical;
mod misc;
mod rmw;

type FamilyHandler = fn(Mnemonic, &mut CpuState, &mut Bus, Resolved, &mut u32) -> bool;

const FAMILIES: [FamilyHandler; 8] = [
    load_store::handle,
    arithmetic::handle,
    logical::handle,
    compare::handle,
    branches::handle,
    rmw::handle,
    control_flow::handle,
    misc::handle,
];

/// Execute one instruction and return the cycles it consumed.
pub(crate) fn step(cpu: &mut CpuState, bus: &mut Bus) -> Result<u32, CpuError> {
    let pc = cpu.pc;
    let opcode = cpu.fetch_u8(bus);
    let Some(op) = decode(opcode) else {
        return Err(halt(cpu, opcode, pc));
    };

    let mut cycles = op.base_cycles();
    let operand = resolve(cpu, bus, op.mode);
    if operand.page_crossed && page_cross_penalty(opcode) {
        cycles += 1;
    }

    let handled = FAMILIES
        .iter()
        .any(|handle| handle(op.mnemonic, cpu, bus, operand, &mut cycles));
    if !handled {
        return Err(halt(cpu, opcode, pc));
    }

    trace!(
        "{:04X}  {:02X}  {:?} {:?}  cycles={}  A={:02X} X={:02X} Y={:02X} P={:02X} SP={:02X}",
        pc,
        opcode,
        op.mnemonic,
        op.mode,
        cycles,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status(),
        cpu.sp
    );
    Ok(cycles)
}

fn halt(cpu: &mut CpuState, opcode: u8, pc: u16) -> CpuError {
    cpu.halted = true;
    cpu.pc = pc;
    error!("CPU halted: undefined opcode ${:02X} at ${:04X}", opcode, pc);
    CpuError::UnknownOpcode { opcode, pc }
}

#[cfg(test)]
mod tests {
    use crate::error::CpuError;
    use crate::test_utils::{PRG_START, setup_cpu};

    #[test]
    fn step_executes_nop() {
        let (mut cpu, mut bus) = setup_cpu(&[0xEA, 0xEA]);
        let cycles = cpu.execute_next(&mut bus).expect("nop");
        assert_eq!(cycles, 2);
        assert_eq!(cpu.pc(), PRG_START + 1);
    }

    #[test]
    fn undefined_opcode_is_fatal_and_sticky() {
        let (mut cpu, mut bus) = setup_cpu(&[0xEA, 0x02, 0xEA]);
        assert_eq!(cpu.execute_next(&mut bus), Ok(2));
        let expected = CpuError::UnknownOpcode {
            opcode: 0x02,
            pc: PRG_START + 1,
        };
        assert_eq!(cpu.execute_next(&mut bus), Err(expected));
        assert!(cpu.is_halted());
        // PC stays on the offending opcode; the error repeats
        assert_eq!(cpu.pc(), PRG_START + 1);
        assert_eq!(cpu.execute_next(&mut bus), Err(expected));
    }
}
