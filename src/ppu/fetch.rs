#![doc = r#"
PPU fetch helpers

Responsibilities
- Decode name-table tiles into the four background workspaces, one per 1 KiB table
  stored at $2000 + n * $400 in video memory.
- Each workspace holds one palette slot per pixel (group << 2 | color index), with 0
  standing for a transparent pixel that shows the backdrop.
- Incremental redraw after a PPUDATA write; a full refresh at VBlank picks up pattern
  and PPUCTRL changes.
- Scroll-aware background sampling for the compositor.

Notes
- Attribute bytes cover 4x4 tiles; each 2x2 quadrant has its own 2-bit palette group.
- Pattern rows are two bit planes eight bytes apart, MSB first.
"#]

use super::*;
use crate::bus::ppu_space::canonical_table;

const TILES_PER_ROW: usize = 32;
const TILE_ROWS: usize = 30;
const ATTRIBUTE_OFFSET: usize = 0x3C0;

#[inline]
fn table_base(table: usize) -> usize {
    0x2000 + table * 0x400
}

impl Ppu {
    /// Redraw one 8x8 tile of `table` into its workspace.
    pub(in crate::ppu) fn render_tile(&mut self, bus: &Bus, table: usize, col: usize, row: usize) {
        let vram = bus.vram();
        let base = table_base(table);
        let tile = vram[base + row * TILES_PER_ROW + col] as usize;
        let attr = vram[base + ATTRIBUTE_OFFSET + (row / 4) * 8 + col / 4];
        let shift = ((row & 2) << 1) | (col & 2);
        let group = (attr >> shift) & 0x03;

        let pattern = self.regs.bg_pattern_base as usize + tile * 16;
        let workspace = &mut self.nametables[table];
        for y in 0..8 {
            let lo = vram[pattern + y];
            let hi = vram[pattern + y + 8];
            let line = (row * 8 + y) * NES_WIDTH + col * 8;
            for x in 0..8 {
                let bit = 7 - x;
                let ci = (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1);
                workspace[line + x] = if ci == 0 { 0 } else { (group << 2) | ci };
            }
        }
    }

    /// Redraw every tile of all four tables.
    pub(in crate::ppu) fn render_nametables(&mut self, bus: &Bus) {
        for table in 0..4 {
            for row in 0..TILE_ROWS {
                for col in 0..TILES_PER_ROW {
                    self.render_tile(bus, table, col, row);
                }
            }
        }
    }

    /// Keep the workspaces in step with a PPUDATA write to canonical address `addr`.
    pub(in crate::ppu) fn refresh_after_vram_write(&mut self, bus: &Bus, addr: u16) {
        if !(0x2000..0x3000).contains(&addr) {
            return;
        }
        let table = ((addr - 0x2000) >> 10) as usize;
        let offset = (addr & 0x03FF) as usize;
        if offset < ATTRIBUTE_OFFSET {
            self.render_tile(bus, table, offset % TILES_PER_ROW, offset / TILES_PER_ROW);
        } else {
            let index = offset - ATTRIBUTE_OFFSET;
            let left = (index % 8) * 4;
            let top = (index / 8) * 4;
            for row in top..(top + 4).min(TILE_ROWS) {
                for col in left..left + 4 {
                    self.render_tile(bus, table, col, row);
                }
            }
        }
    }

    /// Background palette slot at screen position (x, y) after scrolling.
    ///
    /// The four logical tables form a 512x480 world; PPUCTRL picks the origin table
    /// and PPUSCROLL offsets from it, wrapping at the world's edges.
    pub(in crate::ppu) fn background_slot(&self, x: usize, y: usize) -> u8 {
        let origin = ((self.regs.nametable_base - 0x2000) >> 10) as usize;
        let wx = ((origin & 1) * NES_WIDTH + self.regs.scroll_x as usize + x) % (2 * NES_WIDTH);
        let wy = ((origin >> 1) * NES_HEIGHT + self.regs.scroll_y as usize + y) % (2 * NES_HEIGHT);
        let logical = (wy / NES_HEIGHT) * 2 + wx / NES_WIDTH;
        let table = canonical_table(logical, self.regs.mirroring);
        self.nametables[table][(wy % NES_HEIGHT) * NES_WIDTH + wx % NES_WIDTH]
    }
}
