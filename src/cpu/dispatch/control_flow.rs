/*!
control_flow.rs - Control-flow / system opcode family handler

Overview
========
  JMP abs        (0x4C)
  JMP (ind)      (0x6C)  (indirect page-wrap quirk applied during resolution)
  JSR abs        (0x20)
  RTS            (0x60)
  RTI            (0x40)
  BRK            (0x00)

Stack conventions
=================
- JSR pushes the address of its last operand byte (return address - 1); RTS adds 1.
- BRK pushes PC + 1 (skipping the padding byte), then P with B set, sets I and
  jumps through $FFFE.
- RTI pulls P, then PC (low, high). I is restored from the stack like any other flag.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::interrupt::VECTOR_IRQ;
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
        Mnemonic::Jmp => match operand.address() {
            Some(target) => cpu.pc = target,
            None => return false,
        },
        Mnemonic::Jsr => {
            let Some(target) = operand.address() else {
                return false;
            };
            let ret = cpu.pc.wrapping_sub(1);
            cpu.push_u16(bus, ret);
            cpu.pc = target;
        }
        Mnemonic::Rts => {
            cpu.pc = cpu.pop_u16(bus).wrapping_add(1);
        }
        Mnemonic::Rti => {
            let p = cpu.pop_u8(bus);
            cpu.restore_status(p);
            cpu.pc = cpu.pop_u16(bus);
        }
        Mnemonic::Brk => {
            let ret = cpu.pc.wrapping_add(1);
            cpu.push_u16(bus, ret);
            let p = cpu.status_for_push(true);
            cpu.push_u8(bus, p);
            cpu.flags.irq_disable = true;
            cpu.pc = bus.peek_word(VECTOR_IRQ);
        }
        _ => return false,
    }
    true
}
