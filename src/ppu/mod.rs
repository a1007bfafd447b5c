/*!
2C02 PPU: dot/scanline timing, memory-mapped registers and bulk compositing.

OVERVIEW:
- `tick` advances one dot. The driving loop calls it three times per CPU cycle and asks
  for register monitoring on the first of the three only, since register traffic comes
  from the CPU.
- Dot runs 0..=340 and scanline 0..=261:
  * 241/1: VBlank set, NMI posted when enabled, full composite into the frame buffer.
  * 0/1: VBlank cleared.
  * 261 -> 0 rollover: VBlank, sprite-overflow and sprite-zero-hit cleared; the sprite
    layer is rebuilt and the frame's sprite-zero hit and overflow points are predicted.
- Compositing is bulk, not per-dot. Each of the four physical name tables is rendered
  into its own workspace of palette slots, kept current by PPUDATA writes and fully
  refreshed at VBlank. The sprite layer is a second screen-sized buffer. The composite
  scrolls across the workspaces and multiplexes the two layers.

STRUCTURE:
- `registers.rs` - PPUCTRL/PPUMASK/... state and the bus register monitor
- `memory.rs`    - VRAM, OAM and palette access through the bus
- `fetch.rs`     - name-table workspaces (tile, attribute and pattern fetch)
- `sprite.rs`    - sprite layer, sprite-zero and overflow scanning
- `renderer.rs`  - timing (`tick`) and the composite

The PPU holds no memory of its own: VRAM, OAM and the register window all live on the
`Bus`, and every method that touches them borrows it.
*/

use log::debug;

use crate::bus::Bus;
use crate::rom::Mirroring;

pub(crate) mod fetch;
pub(crate) mod memory;
pub mod registers;
pub(crate) mod renderer;
pub(crate) mod sprite;

pub use registers::PpuRegisters;

use sprite::SpritePixel;

/// Screen width in pixels.
pub const NES_WIDTH: usize = 256;
/// Screen height in pixels.
pub const NES_HEIGHT: usize = 240;
/// RGBA bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;
/// Size of the RGBA frame buffer.
pub const FRAME_BUFFER_SIZE: usize = NES_WIDTH * NES_HEIGHT * BYTES_PER_PIXEL;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;

/// PPUSTATUS bits.
pub const STATUS_VBLANK: u8 = 0x80;
pub const STATUS_SPRITE_ZERO_HIT: u8 = 0x40;
pub const STATUS_SPRITE_OVERFLOW: u8 = 0x20;

/// Canonical (approximate) NES master palette (RGB; alpha always 0xFF when rendered).
const NES_PALETTE: [[u8; 3]; 64] = [
    [0x75, 0x75, 0x75], [0x27, 0x1B, 0x8F], [0x00, 0x00, 0xAB], [0x47, 0x00, 0x9F],
    [0x8F, 0x00, 0x77], [0xAB, 0x00, 0x13], [0xA7, 0x00, 0x00], [0x7F, 0x0B, 0x00],
    [0x43, 0x2F, 0x00], [0x00, 0x47, 0x00], [0x00, 0x51, 0x00], [0x00, 0x3F, 0x17],
    [0x1B, 0x3F, 0x5F], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xBC, 0xBC, 0xBC], [0x00, 0x73, 0xEF], [0x23, 0x3B, 0xEF], [0x83, 0x00, 0xF3],
    [0xBF, 0x00, 0xBF], [0xE7, 0x00, 0x5B], [0xDB, 0x2B, 0x00], [0xCB, 0x4F, 0x0F],
    [0x8B, 0x73, 0x00], [0x00, 0x97, 0x00], [0x00, 0xAB, 0x00], [0x00, 0x93, 0x3B],
    [0x00, 0x83, 0x8B], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF], [0x3F, 0xBF, 0xFF], [0x5F, 0x97, 0xFF], [0xA7, 0x8B, 0xFD],
    [0xF7, 0x7B, 0xFF], [0xFF, 0x77, 0xB7], [0xFF, 0x77, 0x63], [0xFF, 0x9B, 0x3B],
    [0xF3, 0xBF, 0x3F], [0x83, 0xD3, 0x13], [0x4F, 0xDF, 0x4B], [0x58, 0xF8, 0x98],
    [0x00, 0xEB, 0xDB], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF], [0xAB, 0xE7, 0xFF], [0xC7, 0xD7, 0xFF], [0xD7, 0xCB, 0xFF],
    [0xFF, 0xC7, 0xFF], [0xFF, 0xC7, 0xDB], [0xFF, 0xBF, 0xB3], [0xFF, 0xDB, 0xAB],
    [0xFF, 0xE7, 0xA3], [0xE3, 0xFF, 0xA3], [0xAB, 0xF3, 0xBF], [0xB3, 0xFF, 0xCF],
    [0x9F, 0xFF, 0xF3], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
];

pub struct Ppu {
    regs: PpuRegisters,
    status: u8,

    // Timing
    dot: u16,
    scanline: u16,
    frame: u64,
    frame_complete: bool,

    // Predicted for the current frame at rollover: (scanline, x)
    sprite_zero_hit_at: Option<(u16, u16)>,
    sprite_overflow_at: Option<u16>,

    // One workspace per physical name table, one palette slot per pixel
    nametables: [Box<[u8]>; 4],
    sprites: Box<[SpritePixel]>,

    // Output framebuffer (RGBA)
    framebuffer: Box<[u8]>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ppu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ppu")
            .field("regs", &self.regs)
            .field("status", &self.status)
            .field("dot", &self.dot)
            .field("scanline", &self.scanline)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

fn workspace() -> Box<[u8]> {
    vec![0; NES_WIDTH * NES_HEIGHT].into_boxed_slice()
}

fn black_frame() -> Box<[u8]> {
    let mut fb = vec![0; FRAME_BUFFER_SIZE].into_boxed_slice();
    for px in fb.chunks_exact_mut(BYTES_PER_PIXEL) {
        px[3] = 0xFF;
    }
    fb
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            regs: PpuRegisters::default(),
            status: 0,
            dot: 0,
            scanline: 0,
            frame: 0,
            frame_complete: false,
            sprite_zero_hit_at: None,
            sprite_overflow_at: None,
            nametables: [workspace(), workspace(), workspace(), workspace()],
            sprites: vec![SpritePixel::default(); NES_WIDTH * NES_HEIGHT].into_boxed_slice(),
            framebuffer: black_frame(),
        }
    }

    /// Power-on state: registers, counters and every buffer. The cartridge's mirroring
    /// survives, since the mapper only reports it at load time.
    pub fn reset(&mut self) {
        let mirroring = self.regs.mirroring;
        *self = Self::new();
        self.regs.mirroring = mirroring;
    }

    /// Nametable arrangement reported by the cartridge.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        if self.regs.mirroring != mirroring {
            debug!("PPU mirroring {:?} -> {:?}", self.regs.mirroring, mirroring);
            self.regs.mirroring = mirroring;
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.regs.mirroring
    }

    pub fn registers(&self) -> &PpuRegisters {
        &self.regs
    }

    /// Read-only framebuffer slice (RGBA, 256x240).
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    // Flag queries
    pub fn status(&self) -> u8 {
        self.status
    }
    pub fn vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }
    pub fn sprite_zero_hit(&self) -> bool {
        self.status & STATUS_SPRITE_ZERO_HIT != 0
    }
    pub fn sprite_overflow(&self) -> bool {
        self.status & STATUS_SPRITE_OVERFLOW != 0
    }
    pub fn nmi_enabled(&self) -> bool {
        self.regs.nmi_enabled
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }
    pub fn scanline(&self) -> u16 {
        self.scanline
    }
    /// Frames started since power-on.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    // Frame completion
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    /// Set or clear PPUSTATUS bits and republish the register at $2002.
    pub(in crate::ppu) fn set_status(&mut self, bus: &mut Bus, bits: u8, on: bool) {
        if on {
            self.status |= bits;
        } else {
            self.status &= !bits;
        }
        bus.poke(registers::PPUSTATUS, self.status);
    }
}
