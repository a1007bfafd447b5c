/*!
table.rs - Opcode decode table (opcode byte -> mnemonic + addressing mode).

Design
======
- `OPCODES: [Option<Opcode>; 256]` is built at compile time from the `DOCUMENTED` list.
  Undocumented slots stay `None`; the dispatcher reports them as `UnknownOpcode`.
- `PAGE_CROSS: [bool; 256]` marks the opcodes that pay +1 cycle when their indexed
  address computation crosses a 256-byte page (read-only ops using abs,X / abs,Y /
  (ind),Y). Stores and read-modify-write ops always pay the worst case in their base
  cycles instead.
- Cycle counts are not stored here; they are looked up per (mnemonic, mode) in `cycles`.
*/

use crate::cpu::cycles::base_cycles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Mnemonic {
    /// Operations that only consume a value (the operand is dereferenced before the body runs).
    pub const fn reads_operand(self) -> bool {
        use Mnemonic::*;
        matches!(
            self,
            Adc | And | Bit | Cmp | Cpx | Cpy | Eor | Lda | Ldx | Ldy | Ora | Sbc
        )
    }

    pub const fn is_store(self) -> bool {
        matches!(self, Mnemonic::Sta | Mnemonic::Stx | Mnemonic::Sty)
    }

    /// Read-modify-write operations (memory or accumulator form).
    pub const fn is_rmw(self) -> bool {
        use Mnemonic::*;
        matches!(self, Asl | Lsr | Rol | Ror | Inc | Dec)
    }

    pub const fn is_branch(self) -> bool {
        use Mnemonic::*;
        matches!(self, Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddrMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        use AddrMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndirectX | IndirectY | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }

    /// Modes whose index addition can cross a page.
    pub const fn can_cross_page(self) -> bool {
        matches!(
            self,
            AddrMode::AbsoluteX | AddrMode::AbsoluteY | AddrMode::IndirectY
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
}

impl Opcode {
    #[inline]
    pub const fn base_cycles(self) -> u32 {
        base_cycles(self.mnemonic, self.mode)
    }
}

use AddrMode::*;
use Mnemonic::*;

/// Every documented 6502 opcode.
const DOCUMENTED: [(u8, Mnemonic, AddrMode); 151] = [
    // Loads
    (0xA9, Lda, Immediate),
    (0xA5, Lda, ZeroPage),
    (0xB5, Lda, ZeroPageX),
    (0xAD, Lda, Absolute),
    (0xBD, Lda, AbsoluteX),
    (0xB9, Lda, AbsoluteY),
    (0xA1, Lda, IndirectX),
    (0xB1, Lda, IndirectY),
    (0xA2, Ldx, Immediate),
    (0xA6, Ldx, ZeroPage),
    (0xB6, Ldx, ZeroPageY),
    (0xAE, Ldx, Absolute),
    (0xBE, Ldx, AbsoluteY),
    (0xA0, Ldy, Immediate),
    (0xA4, Ldy, ZeroPage),
    (0xB4, Ldy, ZeroPageX),
    (0xAC, Ldy, Absolute),
    (0xBC, Ldy, AbsoluteX),
    // Stores
    (0x85, Sta, ZeroPage),
    (0x95, Sta, ZeroPageX),
    (0x8D, Sta, Absolute),
    (0x9D, Sta, AbsoluteX),
    (0x99, Sta, AbsoluteY),
    (0x81, Sta, IndirectX),
    (0x91, Sta, IndirectY),
    (0x86, Stx, ZeroPage),
    (0x96, Stx, ZeroPageY),
    (0x8E, Stx, Absolute),
    (0x84, Sty, ZeroPage),
    (0x94, Sty, ZeroPageX),
    (0x8C, Sty, Absolute),
    // Transfers
    (0xAA, Tax, Implied),
    (0xA8, Tay, Implied),
    (0xBA, Tsx, Implied),
    (0x8A, Txa, Implied),
    (0x9A, Txs, Implied),
    (0x98, Tya, Implied),
    // Stack
    (0x48, Pha, Implied),
    (0x08, Php, Implied),
    (0x68, Pla, Implied),
    (0x28, Plp, Implied),
    // Logical
    (0x29, And, Immediate),
    (0x25, And, ZeroPage),
    (0x35, And, ZeroPageX),
    (0x2D, And, Absolute),
    (0x3D, And, AbsoluteX),
    (0x39, And, AbsoluteY),
    (0x21, And, IndirectX),
    (0x31, And, IndirectY),
    (0x49, Eor, Immediate),
    (0x45, Eor, ZeroPage),
    (0x55, Eor, ZeroPageX),
    (0x4D, Eor, Absolute),
    (0x5D, Eor, AbsoluteX),
    (0x59, Eor, AbsoluteY),
    (0x41, Eor, IndirectX),
    (0x51, Eor, IndirectY),
    (0x09, Ora, Immediate),
    (0x05, Ora, ZeroPage),
    (0x15, Ora, ZeroPageX),
    (0x0D, Ora, Absolute),
    (0x1D, Ora, AbsoluteX),
    (0x19, Ora, AbsoluteY),
    (0x01, Ora, IndirectX),
    (0x11, Ora, IndirectY),
    (0x24, Bit, ZeroPage),
    (0x2C, Bit, Absolute),
    // Arithmetic
    (0x69, Adc, Immediate),
    (0x65, Adc, ZeroPage),
    (0x75, Adc, ZeroPageX),
    (0x6D, Adc, Absolute),
    (0x7D, Adc, AbsoluteX),
    (0x79, Adc, AbsoluteY),
    (0x61, Adc, IndirectX),
    (0x71, Adc, IndirectY),
    (0xE9, Sbc, Immediate),
    (0xE5, Sbc, ZeroPage),
    (0xF5, Sbc, ZeroPageX),
    (0xED, Sbc, Absolute),
    (0xFD, Sbc, AbsoluteX),
    (0xF9, Sbc, AbsoluteY),
    (0xE1, Sbc, IndirectX),
    (0xF1, Sbc, IndirectY),
    // Compare
    (0xC9, Cmp, Immediate),
    (0xC5, Cmp, ZeroPage),
    (0xD5, Cmp, ZeroPageX),
    (0xCD, Cmp, Absolute),
    (0xDD, Cmp, AbsoluteX),
    (0xD9, Cmp, AbsoluteY),
    (0xC1, Cmp, IndirectX),
    (0xD1, Cmp, IndirectY),
    (0xE0, Cpx, Immediate),
    (0xE4, Cpx, ZeroPage),
    (0xEC, Cpx, Absolute),
    (0xC0, Cpy, Immediate),
    (0xC4, Cpy, ZeroPage),
    (0xCC, Cpy, Absolute),
    // Increment / decrement
    (0xE6, Inc, ZeroPage),
    (0xF6, Inc, ZeroPageX),
    (0xEE, Inc, Absolute),
    (0xFE, Inc, AbsoluteX),
    (0xC6, Dec, ZeroPage),
    (0xD6, Dec, ZeroPageX),
    (0xCE, Dec, Absolute),
    (0xDE, Dec, AbsoluteX),
    (0xE8, Inx, Implied),
    (0xC8, Iny, Implied),
    (0xCA, Dex, Implied),
    (0x88, Dey, Implied),
    // Shifts / rotates
    (0x0A, Asl, Accumulator),
    (0x06, Asl, ZeroPage),
    (0x16, Asl, ZeroPageX),
    (0x0E, Asl, Absolute),
    (0x1E, Asl, AbsoluteX),
    (0x4A, Lsr, Accumulator),
    (0x46, Lsr, ZeroPage),
    (0x56, Lsr, ZeroPageX),
    (0x4E, Lsr, Absolute),
    (0x5E, Lsr, AbsoluteX),
    (0x2A, Rol, Accumulator),
    (0x26, Rol, ZeroPage),
    (0x36, Rol, ZeroPageX),
    (0x2E, Rol, Absolute),
    (0x3E, Rol, AbsoluteX),
    (0x6A, Ror, Accumulator),
    (0x66, Ror, ZeroPage),
    (0x76, Ror, ZeroPageX),
    (0x6E, Ror, Absolute),
    (0x7E, Ror, AbsoluteX),
    // Jumps / calls
    (0x4C, Jmp, Absolute),
    (0x6C, Jmp, Indirect),
    (0x20, Jsr, Absolute),
    (0x60, Rts, Implied),
    (0x00, Brk, Implied),
    (0x40, Rti, Implied),
    // Branches
    (0x90, Bcc, Relative),
    (0xB0, Bcs, Relative),
    (0xF0, Beq, Relative),
    (0x30, Bmi, Relative),
    (0xD0, Bne, Relative),
    (0x10, Bpl, Relative),
    (0x50, Bvc, Relative),
    (0x70, Bvs, Relative),
    // Flags
    (0x18, Clc, Implied),
    (0xD8, Cld, Implied),
    (0x58, Cli, Implied),
    (0xB8, Clv, Implied),
    (0x38, Sec, Implied),
    (0xF8, Sed, Implied),
    (0x78, Sei, Implied),
    (0xEA, Nop, Implied),
];

const fn build_opcodes() -> [Option<Opcode>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < DOCUMENTED.len() {
        let (byte, mnemonic, mode) = DOCUMENTED[i];
        table[byte as usize] = Some(Opcode { mnemonic, mode });
        i += 1;
    }
    table
}

const fn build_page_cross() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < DOCUMENTED.len() {
        let (byte, mnemonic, mode) = DOCUMENTED[i];
        table[byte as usize] = mnemonic.reads_operand() && mode.can_cross_page();
        i += 1;
    }
    table
}

pub static OPCODES: [Option<Opcode>; 256] = build_opcodes();
pub static PAGE_CROSS: [bool; 256] = build_page_cross();

/// Decode an opcode byte. `None` for undocumented slots.
#[inline]
pub fn decode(opcode: u8) -> Option<Opcode> {
    OPCODES[opcode as usize]
}

/// True if `opcode` pays +1 cycle when its indexed address crosses a page.
#[inline]
pub fn page_cross_penalty(opcode: u8) -> bool {
    PAGE_CROSS[opcode as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_count() {
        assert_eq!(OPCODES.iter().filter(|o| o.is_some()).count(), 151);
    }

    #[test]
    fn no_duplicate_opcode_bytes() {
        let mut seen = [false; 256];
        for (byte, _, _) in DOCUMENTED {
            assert!(!seen[byte as usize], "duplicate opcode {byte:02X}");
            seen[byte as usize] = true;
        }
    }

    #[test]
    fn every_mnemonic_present() {
        let mut mnemonics: Vec<Mnemonic> = DOCUMENTED.iter().map(|&(_, m, _)| m).collect();
        mnemonics.sort_by_key(|m| *m as u8);
        mnemonics.dedup();
        assert_eq!(mnemonics.len(), 56);
    }

    #[test]
    fn decode_examples() {
        assert_eq!(
            decode(0xA9),
            Some(Opcode {
                mnemonic: Mnemonic::Lda,
                mode: AddrMode::Immediate
            })
        );
        assert_eq!(decode(0x6C).map(|o| o.mode), Some(AddrMode::Indirect));
        assert_eq!(decode(0x02), None);
        assert_eq!(decode(0xFF), None);
    }

    #[test]
    fn page_cross_side_table() {
        // Read-only indexed forms
        for op in [0xBD, 0xB9, 0xB1, 0x7D, 0xF1, 0xDD, 0xBE, 0xBC, 0x3D, 0x5D, 0x19] {
            assert!(page_cross_penalty(op), "{op:02X}");
        }
        // Stores and RMW pay the fixed worst case instead
        for op in [0x9D, 0x99, 0x91, 0x1E, 0xFE, 0xDE] {
            assert!(!page_cross_penalty(op), "{op:02X}");
        }
        // Non-indexed forms
        assert!(!page_cross_penalty(0xAD));
        assert!(!page_cross_penalty(0xA1));
    }
}
