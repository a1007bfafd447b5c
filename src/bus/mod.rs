#![doc = r#"
Bus module: sole owner of the console's shared memory.

Overview
- `Bus` owns the three shared regions: 64 KiB main memory, 16 KiB video memory and
  the 256-byte object attribute memory (OAM).
- It records the most recent main-memory read and write in two single-slot latches.
  The PPU, mapper and controller monitors inspect these once per CPU step instead of
  polling every byte, and clear them once consumed.
- The CPU, PPU and mapper never hold the bus; each receives `&mut Bus` for the duration
  of a single step, which keeps exactly one writer at a time.

Modules and responsibilities
- ram: main-memory address coercion ($0800-$1FFF and $2008-$3FFF mirrors).
- ppu_space: PPU address-space coercion (pattern/nametable/palette mirrors) and
  nametable folding for the cartridge's mirroring arrangement.
- interfaces: narrow traits (`PostInterrupt`, `RegisterWriteObserver`) that let the PPU,
  mapper and controller talk to the CPU and the bus without holding references to each other.
"#]

use log::warn;

pub mod interfaces;
pub mod ppu_space;
pub mod ram;

pub use interfaces::{BusWrite, PostInterrupt, RegisterWriteObserver};
pub use ppu_space::{fold_nametable_addr, map_palette_addr, mirror_ppu_addr};
pub use ram::mirror_cpu_addr;

/// Size of the CPU-visible address space.
pub const MAIN_MEMORY_SIZE: usize = 0x10000;
/// Size of the PPU-visible address space.
pub const VIDEO_MEMORY_SIZE: usize = 0x4000;
/// 64 sprites, 4 bytes each (Y, tile, attributes, X).
pub const OAM_SIZE: usize = 0x100;

/// First address of cartridge program space. Writes at or above this address are
/// delivered to the mapper through the write latch and never overwrite installed banks.
pub const PRG_ROM_START: u16 = 0x8000;

pub struct Bus {
    main: Box<[u8]>,
    vram: Box<[u8]>,
    oam: Box<[u8]>,

    last_read: Option<u16>,
    last_write: Option<BusWrite>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("last_read", &self.last_read)
            .field("last_write", &self.last_write)
            .finish_non_exhaustive()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self {
            main: vec![0; MAIN_MEMORY_SIZE].into_boxed_slice(),
            vram: vec![0; VIDEO_MEMORY_SIZE].into_boxed_slice(),
            oam: vec![0; OAM_SIZE].into_boxed_slice(),
            last_read: None,
            last_write: None,
        }
    }

    /// Zero-fill all three regions and clear both latches.
    ///
    /// The backing buffers are reused, so anything holding indices into them
    /// (mappers, the PPU's workspaces) stays valid.
    pub fn reset(&mut self) {
        self.main.fill(0);
        self.vram.fill(0);
        self.oam.fill(0);
        self.clear_latches();
    }

    // ---------------------------------------------------------------------
    // CPU-visible access (latched)
    // ---------------------------------------------------------------------

    /// CPU read: applies main-memory mirroring and records the address in the read latch.
    #[inline]
    pub fn read(&mut self, addr: u16) -> u8 {
        let addr = mirror_cpu_addr(addr);
        self.last_read = Some(addr);
        self.main[addr as usize]
    }

    /// CPU write: applies main-memory mirroring and records address and value in the write latch.
    ///
    /// Program space ($8000-$FFFF) is read-only from the CPU's side; the write is only
    /// latched so the mapper can react to it.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = mirror_cpu_addr(addr);
        if addr < PRG_ROM_START {
            self.main[addr as usize] = value;
        }
        self.last_write = Some(BusWrite { addr, value });
    }

    /// Little-endian word read through the latched path (both bytes are CPU reads).
    #[inline]
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Component access (unlatched)
    // ---------------------------------------------------------------------

    /// Mirrored read that leaves the latches untouched. Used for DMA, vectors and
    /// by components publishing register values.
    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        self.main[mirror_cpu_addr(addr) as usize]
    }

    /// Mirrored write that leaves the latches untouched and may target program space.
    #[inline]
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.main[mirror_cpu_addr(addr) as usize] = value;
    }

    #[inline]
    pub fn peek_word(&self, addr: u16) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi = self.peek(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Copy `data` into main memory starting at `base` (bank installation).
    pub fn load_main(&mut self, base: u16, data: &[u8]) {
        let start = base as usize;
        let end = (start + data.len()).min(MAIN_MEMORY_SIZE);
        if end - start < data.len() {
            warn!(
                "bank at ${:04X} truncated from {} to {} bytes",
                base,
                data.len(),
                end - start
            );
        }
        self.main[start..end].copy_from_slice(&data[..end - start]);
    }

    /// Copy `data` into video memory starting at `base` (pattern table installation).
    pub fn load_vram(&mut self, base: u16, data: &[u8]) {
        let start = base as usize;
        let end = (start + data.len()).min(VIDEO_MEMORY_SIZE);
        self.vram[start..end].copy_from_slice(&data[..end - start]);
    }

    // ---------------------------------------------------------------------
    // Raw regions
    // ---------------------------------------------------------------------

    #[inline]
    pub fn main(&self) -> &[u8] {
        &self.main
    }

    #[inline]
    pub fn vram(&self) -> &[u8] {
        &self.vram
    }

    #[inline]
    pub fn vram_mut(&mut self) -> &mut [u8] {
        &mut self.vram
    }

    #[inline]
    pub fn oam(&self) -> &[u8] {
        &self.oam
    }

    #[inline]
    pub fn oam_mut(&mut self) -> &mut [u8] {
        &mut self.oam
    }

    // ---------------------------------------------------------------------
    // Latches
    // ---------------------------------------------------------------------

    #[inline]
    pub fn last_read(&self) -> Option<u16> {
        self.last_read
    }

    #[inline]
    pub fn last_write(&self) -> Option<BusWrite> {
        self.last_write
    }

    /// Consume the write latch so the same write is not observed twice.
    #[inline]
    pub fn take_last_write(&mut self) -> Option<BusWrite> {
        self.last_write.take()
    }

    #[inline]
    pub fn take_last_read(&mut self) -> Option<u16> {
        self.last_read.take()
    }

    #[inline]
    pub fn clear_latches(&mut self) {
        self.last_read = None;
        self.last_write = None;
    }
}
