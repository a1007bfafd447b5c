/*!
rmw.rs - Read-Modify-Write / shift / INC / DEC opcode family handler

Memory / accumulator forms (read once, write once):
  ASL: 0A (A), 06, 16, 0E, 1E
  LSR: 4A (A), 46, 56, 4E, 5E
  ROL: 2A (A), 26, 36, 2E, 3E
  ROR: 6A (A), 66, 76, 6E, 7E
  INC: E6, F6, EE, FE
  DEC: C6, D6, CE, DE

Register forms:
  INX (E8), INY (C8), DEX (CA), DEY (88)

Indexed RMW forms always pay the worst-case cycle in their base count; there is no
page-cross adjustment here.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::{asl, ldx, ldy, lsr, read_modify_write, rol, ror};
use crate::cpu::state::CpuState;
use crate::cpu::table::Mnemonic;

pub(super) fn handle(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    bus: &mut Bus,
    operand: Resolved,
    _cycles: &mut u32,
) -> bool {
    let target = operand.target;
    match mnemonic {
        Mnemonic::Asl => {
            read_modify_write(cpu, bus, target, asl);
        }
        Mnemonic::Lsr => {
            read_modify_write(cpu, bus, target, lsr);
        }
        Mnemonic::Rol => {
            read_modify_write(cpu, bus, target, rol);
        }
        Mnemonic::Ror => {
            read_modify_write(cpu, bus, target, ror);
        }
        Mnemonic::Inc => {
            read_modify_write(cpu, bus, target, |_, v| v.wrapping_add(1));
        }
        Mnemonic::Dec => {
            read_modify_write(cpu, bus, target, |_, v| v.wrapping_sub(1));
        }
        Mnemonic::Inx => {
            let x = cpu.x.wrapping_add(1);
            ldx(cpu, x);
        }
        Mnemonic::Iny => {
            let y = cpu.y.wrapping_add(1);
            ldy(cpu, y);
        }
        Mnemonic::Dex => {
            let x = cpu.x.wrapping_sub(1);
            ldx(cpu, x);
        }
        Mnemonic::Dey => {
            let y = cpu.y.wrapping_sub(1);
            ldy(cpu, y);
        }
        _ => return false,
    }
    true
}
