/*!
logical.rs - Logical and bit-test opcode family handler

AND: 0x29, 0x25, 0x35, 0x2D, 0x3D*, 0x39*, 0x21, 0x31*
ORA: 0x09, 0x05, 0x15, 0x0D, 0x1D*, 0x19*, 0x01, 0x11*
EOR: 0x49, 0x45, 0x55, 0x4D, 0x5D*, 0x59*, 0x41, 0x51*
BIT: 0x24, 0x2C
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Resolved, read_operand};
use crate::cpu::execute::{and, bit, eor, ora};
use crate::cpu::state::CpuState;
use crate::cpu::table::Mnemonic;

pub(super) fn handle(
    mnemonic: Mnemonic,
    cpu: &mut CpuState,
    bus: &mut Bus,
    operand: Resolved,
    _cycles: &mut u32,
) -> bool {
    let op: fn(&mut CpuState, u8) = match mnemonic {
        Mnemonic::And => and,
        Mnemonic::Ora => ora,
        Mnemonic::Eor => eor,
        Mnemonic::Bit => bit,
        _ => return false,
    };
    let v = read_operand(cpu, bus, operand.target);
    op(cpu, v);
    true
}

#[cfg(test)]
mod tests {
    use crate::test_utils::run_program;

    #[test]
    fn and_ora_eor_chain() {
        // LDA #$F0; AND #$3C; ORA #$01; EOR #$FF
        let (cpu, _bus, _) = run_program(&[0xA9, 0xF0, 0x29, 0x3C, 0x09, 0x01, 0x49, 0xFF], 4);
        assert_eq!(cpu.a(), !0x31);
        assert!(cpu.flags().negative);
    }

    #[test]
    fn bit_zero_page_copies_high_bits() {
        // LDA #$C0; STA $10; LDA #$01; BIT $10
        let (cpu, _bus, cycles) = run_program(&[0xA9, 0xC0, 0x85, 0x10, 0xA9, 0x01, 0x24, 0x10], 4);
        assert!(cpu.flags().zero);
        assert!(cpu.flags().negative);
        assert!(cpu.flags().overflow);
        assert_eq!(cpu.a(), 0x01);
        assert_eq!(cycles[3], 3);
    }

    #[test]
    fn ora_indirect_y_page_cross() {
        // LDA #$FF; STA $20; LDA #$02; STA $21; LDY #$01; ORA ($20),Y
        let prg = [
            0xA9, 0xFF, 0x85, 0x20, 0xA9, 0x02, 0x85, 0x21, 0xA0, 0x01, 0x11, 0x20,
        ];
        let (_cpu, _bus, cycles) = run_program(&prg, 6);
        assert_eq!(cycles[5], 6);
    }
}
