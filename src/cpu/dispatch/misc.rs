/*!
misc.rs - Transfers / Stack / Flag opcode family handler

Transfers:
  TAX (0xAA), TAY (0xA8), TXA (0x8A), TYA (0x98), TSX (0xBA), TXS (0x9A)

Stack:
  PHA (0x48), PLA (0x68), PHP (0x08), PLP (0x28)

Flag operations:
  CLC (0x18), SEC (0x38),
  CLI (0x58), SEI (0x78),
  CLD (0xD8), SED (0xF8),
  CLV (0xB8)

NOP (0xEA) lands here as well. All of these have fixed cycles.

PHP pushes P with B set; PLP drops B, since B only exists on the stack.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::{lda, ldx, ldy};
use crate::cpu::state::CpuState;
use crate::cpu::table::Mnemonic;

pub(super) fn handle(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    bus: &mut Bus,
    _operand: Resolved,
    _cycles: &mut u32,
) -> bool {
    match mnemonic {
        // Transfers
        Mnemonic::Tax => {
            let a = cpu.a;
            ldx(cpu, a);
        }
        Mnemonic::Tay => {
            let a = cpu.a;
            ldy(cpu, a);
        }
        Mnemonic::Txa => {
            let x = cpu.x;
            lda(cpu, x);
        }
        Mnemonic::Tya => {
            let y = cpu.y;
            lda(cpu, y);
        }
        Mnemonic::Tsx => {
            let sp = cpu.sp;
            ldx(cpu, sp);
        }
        Mnemonic::Txs => cpu.sp = cpu.x, // no flags

        // Stack
        Mnemonic::Pha => {
            let a = cpu.a;
            cpu.push_u8(bus, a);
        }
        Mnemonic::Pla => {
            let v = cpu.pop_u8(bus);
            lda(cpu, v);
        }
        Mnemonic::Php => {
            let p = cpu.status_for_push(true);
            cpu.push_u8(bus, p);
        }
        Mnemonic::Plp => {
            let v = cpu.pop_u8(bus);
            cpu.restore_status(v);
        }

        // Flags
        Mnemonic::Clc => cpu.flags.carry = false,
        Mnemonic::Sec => cpu.flags.carry = true,
        Mnemonic::Cli => cpu.flags.irq_disable = false,
        Mnemonic::Sei => cpu.flags.irq_disable = true,
        Mnemonic::Cld => cpu.flags.decimal = false,
        Mnemonic::Sed => cpu.flags.decimal = true,
        Mnemonic::Clv => cpu.flags.overflow = false,

        Mnemonic::Nop => {}
        _ => return false,
    }
    true
}
