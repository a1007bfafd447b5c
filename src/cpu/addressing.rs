/*!
addressing.rs - 6502 addressing-mode resolution (shared by dispatch)

Overview
========
`resolve(state, bus, mode)` runs before every operation body. It:
- advances PC past the instruction's operand bytes,
- returns a `Target`: nothing (implied), the accumulator, or a resolved 16-bit address,
- reports whether an indexed computation (abs,X / abs,Y / (ind),Y) crossed a page,
  and, for relative mode, whether the branch target lies on another page than the
  instruction that follows the branch.

Address vs. operand
===================
Resolution never dereferences the effective address. Read-only operations fetch the
operand through `read_operand`; stores and read-modify-write operations use the address
directly. A store must never read its target, since reading $2002, $2007 or $4016 has
side effects on the devices that watch the bus.

Immediate mode resolves to the address of the operand byte itself, and relative mode to
the branch target.

Quirks
======
- Zero-page indexed and zero-page indirect pointers wrap within page zero.
- JMP (indirect) does not carry into the high byte when the pointer sits at $xxFF.
*/

use crate::bus::Bus;
use crate::cpu::state::CpuState;
use crate::cpu::table::AddrMode;

/// Where an instruction's operand lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Implied,
    Accumulator,
    Address(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub target: Target,
    pub page_crossed: bool,
}

impl Resolved {
    #[inline]
    fn at(addr: u16) -> Self {
        Self {
            target: Target::Address(addr),
            page_crossed: false,
        }
    }

    #[inline]
    fn indexed(base: u16, addr: u16) -> Self {
        Self {
            target: Target::Address(addr),
            page_crossed: crosses_page(base, addr),
        }
    }

    /// The resolved address; implied and accumulator targets have none.
    #[inline]
    pub fn address(&self) -> Option<u16> {
        match self.target {
            Target::Address(a) => Some(a),
            _ => None,
        }
    }
}

#[inline]
pub fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Resolve `mode` for the instruction whose opcode byte has just been fetched.
pub fn resolve(state: &mut CpuState, bus: &mut Bus, mode: AddrMode) -> Resolved {
    match mode {
        AddrMode::Implied => Resolved {
            target: Target::Implied,
            page_crossed: false,
        },
        AddrMode::Accumulator => Resolved {
            target: Target::Accumulator,
            page_crossed: false,
        },
        AddrMode::Immediate => {
            let addr = state.pc;
            state.pc = state.pc.wrapping_add(1);
            Resolved::at(addr)
        }
        AddrMode::ZeroPage => Resolved::at(addr_zp(state, bus)),
        AddrMode::ZeroPageX => Resolved::at(addr_zp_x(state, bus)),
        AddrMode::ZeroPageY => Resolved::at(addr_zp_y(state, bus)),
        AddrMode::Absolute => Resolved::at(state.fetch_u16(bus)),
        AddrMode::AbsoluteX => {
            let base = state.fetch_u16(bus);
            Resolved::indexed(base, base.wrapping_add(state.x as u16))
        }
        AddrMode::AbsoluteY => {
            let base = state.fetch_u16(bus);
            Resolved::indexed(base, base.wrapping_add(state.y as u16))
        }
        AddrMode::Indirect => {
            let ptr = state.fetch_u16(bus);
            Resolved::at(read_word_indirect_bug(bus, ptr))
        }
        AddrMode::IndirectX => {
            let zp = state.fetch_u8(bus).wrapping_add(state.x);
            Resolved::at(read_word_zp(bus, zp))
        }
        AddrMode::IndirectY => {
            let zp = state.fetch_u8(bus);
            let base = read_word_zp(bus, zp);
            Resolved::indexed(base, base.wrapping_add(state.y as u16))
        }
        AddrMode::Relative => {
            let offset = state.fetch_u8(bus) as i8;
            // PC now points at the instruction following the branch.
            let next = state.pc;
            Resolved::indexed(next, next.wrapping_add(offset as i16 as u16))
        }
    }
}

/// Fetch the value a read-only operation consumes.
#[inline]
pub fn read_operand(state: &CpuState, bus: &mut Bus, target: Target) -> u8 {
    match target {
        Target::Address(addr) => bus.read(addr),
        Target::Accumulator => state.a,
        Target::Implied => 0,
    }
}

// -------------------------
// Basic addressing helpers
// -------------------------

#[inline]
fn addr_zp(state: &mut CpuState, bus: &mut Bus) -> u16 {
    state.fetch_u8(bus) as u16
}

#[inline]
fn addr_zp_x(state: &mut CpuState, bus: &mut Bus) -> u16 {
    state.fetch_u8(bus).wrapping_add(state.x) as u16
}

#[inline]
fn addr_zp_y(state: &mut CpuState, bus: &mut Bus) -> u16 {
    state.fetch_u8(bus).wrapping_add(state.y) as u16
}

// -------------------------
// Low-level word helpers
// -------------------------

/// Read a 16-bit little endian pointer from zero page; the high byte wraps to $00.
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) hardware bug: when the pointer's low byte is $FF the high byte
/// is fetched from the start of the same page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
