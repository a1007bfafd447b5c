/*!
execute.rs - 6502 instruction semantic helpers (ALU, flags, RMW, branch)

Purpose
=======
Side-effect logic shared by the dispatch family handlers. Every helper is a pure
transformation of `CpuState` (and, for read-modify-write, one memory location) given an
already resolved operand; none of them fetch from PC or count cycles.

Arithmetic is binary only. The D flag is stored and pushed but never consulted.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Target;
use crate::cpu::state::CpuState;

// ---------------------------------------------------------------------------
// Loads / Transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda(cpu: &mut CpuState, v: u8) {
    cpu.a = v;
    cpu.flags.update_zn(v);
}

#[inline]
pub(crate) fn ldx(cpu: &mut CpuState, v: u8) {
    cpu.x = v;
    cpu.flags.update_zn(v);
}

#[inline]
pub(crate) fn ldy(cpu: &mut CpuState, v: u8) {
    cpu.y = v;
    cpu.flags.update_zn(v);
}

// ---------------------------------------------------------------------------
// Logical / Bit
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and(cpu: &mut CpuState, v: u8) {
    let r = cpu.a & v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn ora(cpu: &mut CpuState, v: u8) {
    let r = cpu.a | v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn eor(cpu: &mut CpuState, v: u8) {
    let r = cpu.a ^ v;
    lda(cpu, r);
}

/// Z from A & M; N and V copied from bits 7 and 6 of the operand.
#[inline]
pub(crate) fn bit(cpu: &mut CpuState, v: u8) {
    cpu.flags.zero = cpu.a & v == 0;
    cpu.flags.negative = v & 0x80 != 0;
    cpu.flags.overflow = v & 0x40 != 0;
}

// ---------------------------------------------------------------------------
// ADC / SBC
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn adc(cpu: &mut CpuState, v: u8) {
    let a = cpu.a;
    let sum16 = a as u16 + v as u16 + cpu.flags.carry as u16;
    let result = sum16 as u8;

    cpu.flags.carry = sum16 > 0xFF;
    // Overflow: ( !(A ^ M) & (A ^ R) & 0x80 ) != 0
    cpu.flags.overflow = (!(a ^ v)) & (a ^ result) & 0x80 != 0;
    lda(cpu, result);
}

/// A - M - !C, i.e. A + !M + C.
#[inline]
pub(crate) fn sbc(cpu: &mut CpuState, v: u8) {
    adc(cpu, v ^ 0xFF);
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn compare(cpu: &mut CpuState, reg: u8, v: u8) {
    cpu.flags.carry = reg >= v;
    cpu.flags.update_zn(reg.wrapping_sub(v));
}

// ---------------------------------------------------------------------------
// Shifts / Rotates (value level; C receives the bit shifted out)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl(cpu: &mut CpuState, v: u8) -> u8 {
    cpu.flags.carry = v & 0x80 != 0;
    v << 1
}

#[inline]
pub(crate) fn lsr(cpu: &mut CpuState, v: u8) -> u8 {
    cpu.flags.carry = v & 0x01 != 0;
    v >> 1
}

#[inline]
pub(crate) fn rol(cpu: &mut CpuState, v: u8) -> u8 {
    let carry_in = cpu.flags.carry as u8;
    cpu.flags.carry = v & 0x80 != 0;
    (v << 1) | carry_in
}

#[inline]
pub(crate) fn ror(cpu: &mut CpuState, v: u8) -> u8 {
    let carry_in = (cpu.flags.carry as u8) << 7;
    cpu.flags.carry = v & 0x01 != 0;
    (v >> 1) | carry_in
}

// ---------------------------------------------------------------------------
// Read-Modify-Write
// ---------------------------------------------------------------------------

/// Read the target (memory or A), transform it, write it back and set N/Z from the result.
/// Memory targets are read and written once each through the latched bus path.
pub(crate) fn read_modify_write<F>(cpu: &mut CpuState, bus: &mut Bus, target: Target, f: F) -> u8
where
    F: FnOnce(&mut CpuState, u8) -> u8,
{
    let result = match target {
        Target::Accumulator => {
            let old = cpu.a;
            let r = f(cpu, old);
            cpu.a = r;
            r
        }
        Target::Address(addr) => {
            let old = bus.read(addr);
            let r = f(cpu, old);
            bus.write(addr, r);
            r
        }
        Target::Implied => return 0,
    };
    cpu.flags.update_zn(result);
    result
}

// ---------------------------------------------------------------------------
// Branch helpers
// ---------------------------------------------------------------------------

/// Apply a resolved branch. Returns the extra cycles: 0 not taken, 1 taken,
/// 2 taken onto another page.
#[inline]
pub(crate) fn branch(cpu: &mut CpuState, take: bool, target: u16, page_crossed: bool) -> u32 {
    if !take {
        return 0;
    }
    cpu.pc = target;
    if page_crossed { 2 } else { 1 }
}
