/*!
flags.rs - The 6502 status register, stored as eight independent booleans.

Instructions test and assign single flags far more often than they move the whole
register, so the flags are kept unpacked and only packed at the stack boundary
(PHP/PLP, BRK/RTI and interrupt entry) via `flags_to_byte` / `byte_to_flags`.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C

The unused bit (5) always reads back as 1.
*/

/// Processor status flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000; // Not used by NES hardware, still part of 6502.
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000; // Always set when read.
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub negative: bool,
    pub overflow: bool,
    pub unused: bool,
    pub brk: bool,
    pub decimal: bool,
    pub irq_disable: bool,
    pub zero: bool,
    pub carry: bool,
}

impl Default for Flags {
    /// Power-up: interrupts disabled, unused bit set.
    fn default() -> Self {
        byte_to_flags(IRQ_DISABLE | UNUSED)
    }
}

/// Pack the flags into the P register layout. Bit 5 is always set.
pub fn flags_to_byte(f: &Flags) -> u8 {
    (f.carry as u8)
        | (f.zero as u8) << 1
        | (f.irq_disable as u8) << 2
        | (f.decimal as u8) << 3
        | (f.brk as u8) << 4
        | UNUSED
        | (f.overflow as u8) << 6
        | (f.negative as u8) << 7
}

/// Unpack a P register byte. The unused flag is forced on regardless of bit 5.
pub fn byte_to_flags(v: u8) -> Flags {
    Flags {
        negative: v & NEGATIVE != 0,
        overflow: v & OVERFLOW != 0,
        unused: true,
        brk: v & BREAK != 0,
        decimal: v & DECIMAL != 0,
        irq_disable: v & IRQ_DISABLE != 0,
        zero: v & ZERO != 0,
        carry: v & CARRY != 0,
    }
}

impl Flags {
    #[inline]
    pub fn to_byte(&self) -> u8 {
        flags_to_byte(self)
    }

    #[inline]
    pub fn from_byte(v: u8) -> Self {
        byte_to_flags(v)
    }

    /// Set Z and N from a result byte.
    #[inline]
    pub fn update_zn(&mut self, v: u8) {
        self.zero = v == 0;
        self.negative = v & 0x80 != 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip_for_every_value() {
        for v in 0..=255u8 {
            let f = byte_to_flags(v);
            assert_eq!(flags_to_byte(&f), v | UNUSED);
            assert_eq!(byte_to_flags(flags_to_byte(&f)), f);
            assert!(f.unused);
        }
    }

    #[test]
    fn unused_bit_reads_back_set_even_if_cleared() {
        let mut f = Flags::default();
        f.unused = false;
        assert_ne!(f.to_byte() & UNUSED, 0);
    }

    #[test]
    fn bit_positions() {
        let f = byte_to_flags(NEGATIVE | CARRY);
        assert!(f.negative && f.carry);
        assert!(!f.zero && !f.overflow && !f.brk && !f.decimal && !f.irq_disable);
    }

    #[test]
    fn update_zn_behavior() {
        let mut f = Flags::default();
        f.update_zn(0x00);
        assert!(f.zero);
        assert!(!f.negative);
        f.update_zn(0x80);
        assert!(!f.zero);
        assert!(f.negative);
        f.update_zn(0x7F);
        assert!(!f.zero && !f.negative);
    }
}
