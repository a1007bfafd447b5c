/*!
compare.rs - Compare opcode family handler (CMP / CPX / CPY)

CMP: 0xC9 (imm), 0xC5 (zp), 0xD5 (zp,X), 0xCD (abs),
     0xDD (abs,X*), 0xD9 (abs,Y*), 0xC1 ((ind,X)), 0xD1 ((ind),Y*)
CPX: 0xE0 (imm), 0xE4 (zp), 0xEC (abs)
CPY: 0xC0 (imm), 0xC4 (zp), 0xCC (abs)

C = register >= operand; N/Z from register - operand.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Resolved, read_operand};
use crate::cpu::execute::compare;
use crate::cpu::state::CpuState;
use crate::cpu::table::Mnemonic;

pub(super) fn handle(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    bus: &mut Bus,
    operand: Resolved,
    _cycles: &mut u32,
) -> bool {
    let reg = match mnemonic {
        Mnemonic::Cmp => cpu.a,
        Mnemonic::Cpx => cpu.x,
        Mnemonic::Cpy => cpu.y,
        _ => return false,
    };
    let v = read_operand(cpu, bus, operand.target);
    compare(cpu, reg, v);
    true
}
