/*!
load_store.rs - Load / Store opcode family handler

Loads (set Z/N flags; abs,X / abs,Y / (ind),Y forms may pay the page-cross penalty):
    LDA: A9, A5, B5, AD, BD*, B9*, A1, B1*
    LDX: A2, A6, B6, AE, BE*
    LDY: A0, A4, B4, AC, BC*

Stores (no flags changed, fixed cycles, never read their target):
    STA: 85, 95, 8D, 9D, 99, 81, 91
    STX: 86, 96, 8E
    STY: 84, 94, 8C
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Resolved, read_operand};
use crate::cpu::execute::{lda, ldx, ldy};
use crate::cpu::state::CpuState;
use crate::cpu::table::Mnemonic;

pub(super) fn handle(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    bus: &mut Bus,
    operand: Resolved,
    _cycles: &mut u32,
) -> bool {
    match mnemonic {
        Mnemonic::Lda => {
            let v = read_operand(cpu, bus, operand.target);
            lda(cpu, v);
        }
        Mnemonic::Ldx => {
            let v = read_operand(cpu, bus, operand.target);
            ldx(cpu, v);
        }
        Mnemonic::Ldy => {
            let v = read_operand(cpu, bus, operand.target);
            ldy(cpu, v);
        }
        Mnemonic::Sta | Mnemonic::Stx | Mnemonic::Sty => {
            let Some(addr) = operand.address() else {
                return false;
            };
            let v = match mnemonic {
                Mnemonic::Sta => cpu.a,
                Mnemonic::Stx => cpu.x,
                _ => cpu.y,
            };
            bus.write(addr, v);
        }
        _ => return false,
    }
    true
}
