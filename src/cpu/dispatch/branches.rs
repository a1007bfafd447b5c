/*!
branches.rs - Relative branch opcode handler (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ)

Cycle Rules
===========
Base cost: 2 cycles.
If branch is taken: +1 cycle.
If branch is taken and the target is on another page than the instruction that
follows the branch: +2 total (vs base).

Relative resolution already computed the target and the page-cross bit.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::branch;
use crate::cpu::state::CpuState;
use crate::cpu::table::Mnemonic;

pub(super) fn handle(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    _bus: &mut Bus,
    operand: Resolved,
    cycles: &mut u32,
) -> bool {
    let f = cpu.flags;
    let take = match mnemonic {
        Mnemonic::Bpl => !f.negative,
        Mnemonic::Bmi => f.negative,
        Mnemonic::Bvc => !f.overflow,
        Mnemonic::Bvs => f.overflow,
        Mnemonic::Bcc => !f.carry,
        Mnemonic::Bcs => f.carry,
        Mnemonic::Bne => !f.zero,
        Mnemonic::Beq => f.zero,
        _ => return false,
    };
    let Some(target) = operand.address() else {
        return false;
    };
    *cycles += branch(cpu, take, target, operand.page_crossed);
    true
}
