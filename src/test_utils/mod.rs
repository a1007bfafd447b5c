//! Shared test utilities: minimal iNES (v1) images and CPU harnesses.
//!
//! The image builders de-duplicate iNES construction across the ROM, mapper,
//! CPU, PPU and console tests. They support just what the suite needs
//! (NROM/MMC1 ids, simple flags).
//!
//! Notes on iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => the board carries CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units (0 => 1 by convention)
//! - bytes 9..15 = padding
//!
//! Vectors:
//! - For 16 KiB PRG (NROM-128): vectors are at PRG offset 0x3FFA..=0x3FFF
//! - For 32 KiB PRG (NROM-256): vectors are at PRG offset 0x7FFA..=0x7FFF
//!
//! The CPU harnesses load a program through the real parse -> mapper -> bus path,
//! so every CPU test also exercises bank installation and the reset vector.
//! `RecordingCpu` stands in for the CPU when a PPU test only needs to see what the PPU
//! posted.

use crate::bus::{Bus, PostInterrupt};
use crate::cpu::{Cpu, Interrupt};
use crate::mapper;
use crate::rom::Rom;

/// Where `build_nrom_with_prg` places the first program byte.
pub const PRG_START: u16 = 0x8000;

/// Build a minimal iNES (v1) image with configurable PRG/CHR sizes and flags.
///
/// PRG is filled with 0xAA and CHR with 0xCC so tests can tell them apart.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map(|_| 512).unwrap_or(0) + prg_16k * 16 * 1024 + chr_8k * 8 * 1024,
    );

    // Header
    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }

    bytes.extend(std::iter::repeat_n(0xAA, prg_16k * 16 * 1024));
    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * 8 * 1024));

    bytes
}

/// Build an NROM image with `prg` at the start of a single 16 KiB bank.
///
/// - `chr_8k`: number of 8 KiB CHR units (0 => CHR RAM)
/// - `vectors`: optional (reset, nmi, irq). Defaults to (0x8000, 0x8000, 0x8000)
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(
        prg.len() <= 16 * 1024 - 6,
        "Program must fit below the vectors of a 16 KiB PRG bank"
    );

    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k, None);

    let prg_start = 16;
    let prg_end = prg_start + 16 * 1024;
    rom[prg_start..(prg_start + prg.len())].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((PRG_START, PRG_START, PRG_START));
    set_vectors_in_prg(&mut rom[prg_start..prg_end], reset, nmi, irq);

    rom
}

/// Write CPU vectors (NMI, RESET, IRQ/BRK) into the last six bytes of a 16 KiB
/// or 32 KiB PRG slice. Panics on any other length.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        16384 => 0x3FFA,
        32768 => 0x7FFA,
        other => panic!(
            "Unsupported PRG length for vector placement: {} bytes (expected 16 KiB or 32 KiB)",
            other
        ),
    };
    write_le_u16(prg, base, nmi);
    write_le_u16(prg, base + 2, reset);
    write_le_u16(prg, base + 4, irq);
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value & 0x00FF) as u8;
    buf[offset + 1] = (value >> 8) as u8;
}

/// Parse `image`, install it through its mapper and reset a fresh CPU onto it.
pub fn load_image(image: &[u8]) -> (Cpu, Bus) {
    let rom = Rom::from_bytes(image).expect("test image parses");
    let mut mapper = mapper::for_rom(&rom).expect("test image has a supported mapper");
    let mut bus = Bus::new();
    mapper.load_rom(&mut bus);
    let mut cpu = Cpu::new();
    cpu.total_reset(&bus);
    (cpu, bus)
}

/// CPU and bus with `prg` loaded at $8000 and every vector pointing there.
pub fn setup_cpu(prg: &[u8]) -> (Cpu, Bus) {
    setup_cpu_with_vectors(prg, None, None)
}

/// Like `setup_cpu`, with optional NMI and IRQ/BRK handler addresses.
pub fn setup_cpu_with_vectors(prg: &[u8], nmi: Option<u16>, irq: Option<u16>) -> (Cpu, Bus) {
    let vectors = (PRG_START, nmi.unwrap_or(PRG_START), irq.unwrap_or(PRG_START));
    load_image(&build_nrom_with_prg(prg, 1, 1, Some(vectors)))
}

/// Run `steps` CPU steps over `prg`, collecting the cycles each one returned.
pub fn run_program(prg: &[u8], steps: usize) -> (Cpu, Bus, Vec<u32>) {
    run_program_with_vectors(prg, None, None, steps)
}

pub fn run_program_with_vectors(
    prg: &[u8],
    nmi: Option<u16>,
    irq: Option<u16>,
    steps: usize,
) -> (Cpu, Bus, Vec<u32>) {
    let (mut cpu, mut bus) = setup_cpu_with_vectors(prg, nmi, irq);
    let cycles = (0..steps)
        .map(|_| cpu.execute_next(&mut bus).expect("program step"))
        .collect();
    (cpu, bus, cycles)
}

/// `PostInterrupt` stub that records every request.
#[derive(Debug, Default)]
pub struct RecordingCpu {
    pub interrupts: Vec<Interrupt>,
    pub dma: Vec<u16>,
}

impl PostInterrupt for RecordingCpu {
    fn post_interrupt(&mut self, kind: Interrupt) {
        self.interrupts.push(kind);
    }

    fn start_dma(&mut self, source: u16) {
        self.dma.push(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom[7], 0x00);
        assert_eq!(rom[8], 1);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn writes_vectors_for_32k_prg() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn harness_starts_at_reset_vector() {
        let (cpu, bus) = setup_cpu_with_vectors(&[0xEA], Some(0x8100), Some(0x8200));
        assert_eq!(cpu.pc(), PRG_START);
        assert_eq!(bus.peek_word(0xFFFA), 0x8100);
        assert_eq!(bus.peek_word(0xFFFE), 0x8200);
        // The single bank is mirrored, so its vectors also sit at $BFFA
        assert_eq!(bus.peek_word(0xBFFA), 0x8100);
    }
}
