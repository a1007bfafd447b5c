/*!
arithmetic.rs - ADC / SBC opcode family handler

Overview
========
Implements 6502 add / subtract with carry:

ADC: 0x69, 0x65, 0x75, 0x6D, 0x7D*, 0x79*, 0x61, 0x71
SBC: 0xE9, 0xE5, 0xF5, 0xED, 0xFD*, 0xF9*, 0xE1, 0xF1

(*) The dispatcher has already added the +1 page-cross penalty when it applies.

Return Contract
===============
`handle` returns true if the mnemonic was recognized and executed,
false otherwise so the dispatcher can continue down the chain.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Resolved, read_operand};
use crate::cpu::execute::{adc, sbc};
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
        Mnemonic::Adc => {
            let v = read_operand(cpu, bus, operand.target);
            adc(cpu, v);
        }
        Mnemonic::Sbc => {
            let v = read_operand(cpu, bus, operand.target);
            sbc(cpu, v);
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::test_utils::run_program;

    #[test]
    fn adc_immediate_overflow_scenario() {
        // CLC; LDA #$7E; ADC #$7E
        let (cpu, _bus, cycles) = run_program(&[0x18, 0xA9, 0x7E, 0x69, 0x7E], 3);
        assert_eq!(cpu.a(), 0xFC);
        assert!(!cpu.flags().carry);
        assert!(cpu.flags().overflow);
        assert_eq!(cycles, vec![2, 2, 2]);
    }

    #[test]
    fn sbc_zero_page_with_borrow() {
        // LDA #$05; STA $10; SEC; LDA #$03; SBC $10
        let (cpu, _bus, _) = run_program(&[0xA9, 0x05, 0x85, 0x10, 0x38, 0xA9, 0x03, 0xE5, 0x10], 5);
        assert_eq!(cpu.a(), 0xFE);
        assert!(!cpu.flags().carry);
        assert!(cpu.flags().negative);
    }

    #[test]
    fn adc_abs_y_page_cross_penalty() {
        // LDY #$01; ADC $02FF,Y
        let (_cpu, _bus, cycles) = run_program(&[0xA0, 0x01, 0x79, 0xFF, 0x02], 2);
        assert_eq!(cycles, vec![2, 5]);
    }
}
