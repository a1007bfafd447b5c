/*!
state.rs - 6502 architectural state (registers + flags) and stack/fetch helpers.

`CpuState` owns every architecturally visible register. It excludes:
  - memory (owned by the bus, borrowed per step)
  - decode / dispatch logic
  - cycle accounting and the interrupt latch
Those live in the table, dispatch and core modules.

Stack
=====
The stack lives in page $01. SP is an unsigned 8-bit index that wraps silently:
push writes at $0100|SP then decrements, pop increments then reads.
*/

use crate::bus::Bus;
use crate::cpu::flags::{BREAK, Flags, byte_to_flags, flags_to_byte};

/// Base of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;
/// Reset vector location.
pub const VECTOR_RESET: u16 = 0xFFFC;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub flags: Flags,
    pub halted: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        // Common 6502 reset defaults: SP=0xFD, IRQ disabled, UNUSED bit set.
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0x0000,
            flags: Flags::default(),
            halted: false,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset registers and load PC from the reset vector at $FFFC/$FFFD.
    pub fn reset(&mut self, bus: &Bus) {
        *self = Self::default();
        self.pc = bus.peek_word(VECTOR_RESET);
    }

    /// Packed P register as seen by software.
    #[inline]
    pub fn status(&self) -> u8 {
        flags_to_byte(&self.flags)
    }

    // ---------------------------------------------------------------------
    // Fetch helpers (advance PC)
    // ---------------------------------------------------------------------

    #[inline]
    pub fn fetch_u8(&mut self, bus: &mut Bus) -> u8 {
        let v = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        v
    }

    #[inline]
    pub fn fetch_u16(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.fetch_u8(bus) as u16;
        let hi = self.fetch_u8(bus) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------

    #[inline]
    pub fn push_u8(&mut self, bus: &mut Bus, v: u8) {
        bus.write(STACK_BASE | self.sp as u16, v);
        self.sp = self.sp.wrapping_sub(1);
    }

    #[inline]
    pub fn pop_u8(&mut self, bus: &mut Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.sp as u16)
    }

    /// Push high byte first so the word sits little-endian in memory.
    #[inline]
    pub fn push_u16(&mut self, bus: &mut Bus, v: u16) {
        self.push_u8(bus, (v >> 8) as u8);
        self.push_u8(bus, (v & 0xFF) as u8);
    }

    #[inline]
    pub fn pop_u16(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.pop_u8(bus) as u16;
        let hi = self.pop_u8(bus) as u16;
        (hi << 8) | lo
    }

    /// Status byte as pushed by PHP/BRK (`set_break`) or by a hardware interrupt.
    #[inline]
    pub fn status_for_push(&self, set_break: bool) -> u8 {
        let p = flags_to_byte(&self.flags);
        if set_break { p | BREAK } else { p & !BREAK }
    }

    /// Restore flags from a pulled status byte (PLP/RTI). B only exists on the stack.
    #[inline]
    pub fn restore_status(&mut self, v: u8) {
        self.flags = byte_to_flags(v & !BREAK);
    }
}
