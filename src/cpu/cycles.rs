/*!
cycles.rs - Base cycle counts per (mnemonic, addressing mode).

Purpose
=======
Provides `base_cycles(mnemonic, mode)`: the baseline cycle count for one instruction,
not including the conditional penalties added by the dispatcher:
  - +1 when an eligible indexed read crosses a page (`table::PAGE_CROSS`)
  - +1 for a taken branch, +1 more when the target is on another page

Operation bodies never compute cycles themselves.

Groups
======
Instructions fall into a handful of timing groups:
  read        ADC AND BIT CMP CPX CPY EOR LDA LDX LDY ORA SBC
  store       STA STX STY (indexed forms always pay the extra cycle)
  rmw         ASL LSR ROL ROR INC DEC
  stack       PHA PHP (3), PLA PLP (4)
  control     JMP JSR RTS RTI BRK
  implied     everything else, including branches (2)
*/

use crate::cpu::table::{AddrMode, Mnemonic};

/// Return the base cycle count for an opcode's (mnemonic, mode) pair.
pub const fn base_cycles(mnemonic: Mnemonic, mode: AddrMode) -> u32 {
    use AddrMode::*;
    use Mnemonic::*;

    if mnemonic.reads_operand() {
        return match mode {
            Immediate => 2,
            ZeroPage => 3,
            ZeroPageX | ZeroPageY => 4,
            Absolute | AbsoluteX | AbsoluteY => 4,
            IndirectX => 6,
            IndirectY => 5,
            _ => 2,
        };
    }

    if mnemonic.is_store() {
        return match mode {
            ZeroPage => 3,
            ZeroPageX | ZeroPageY | Absolute => 4,
            AbsoluteX | AbsoluteY => 5,
            IndirectX | IndirectY => 6,
            _ => 2,
        };
    }

    if mnemonic.is_rmw() {
        return match mode {
            Accumulator => 2,
            ZeroPage => 5,
            ZeroPageX | Absolute => 6,
            AbsoluteX => 7,
            _ => 2,
        };
    }

    match (mnemonic, mode) {
        (Jmp, Absolute) => 3,
        (Jmp, Indirect) => 5,
        (Jsr, _) => 6,
        (Rts, _) | (Rti, _) => 6,
        (Brk, _) => 7,
        (Pha, _) | (Php, _) => 3,
        (Pla, _) | (Plp, _) => 4,
        _ => 2,
    }
}
