#![doc = r#"
PPU sprite helpers

Responsibilities
- Rebuild the screen-sized sprite layer from OAM (all 64 sprites, 8x8 or 8x16).
- Scan OAM for the first scanline carrying more than eight sprites.
- Predict where sprite 0 first overlaps opaque background so the timing loop can raise
  the hit flag at the right dot.
- Bit-reversal helper for horizontal flip (`reverse8`).

Notes
- OAM Y is one less than the first scanline the sprite covers.
- Sprites are drawn from 63 down to 0, so a lower index wins where opaque pixels
  overlap, including its behind-background bit.
- In 8x16 mode bit 0 of the tile byte selects the pattern table and the top half uses
  the even tile; vertical flip swaps the halves as well as the rows.
"#]

use super::*;

/// One pixel of the sprite layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::ppu) struct SpritePixel {
    /// Palette slot 0x11-0x1F; 0 when no sprite covers the pixel.
    pub color: u8,
    pub behind_background: bool,
    pub sprite_zero: bool,
}

impl SpritePixel {
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.color != 0
    }
}

impl Ppu {
    pub(in crate::ppu) fn rebuild_sprite_layer(&mut self, bus: &Bus) {
        self.sprites.fill(SpritePixel::default());
        let height = self.regs.sprite_height();
        let tall = self.regs.tall_sprites;
        let pattern_base = self.regs.sprite_pattern_base as usize;
        let oam = bus.oam();
        let vram = bus.vram();

        for index in (0..64).rev() {
            let entry = &oam[index * 4..index * 4 + 4];
            let top = entry[0] as usize + 1;
            let tile = entry[1] as usize;
            let attr = entry[2];
            let left = entry[3] as usize;

            let palette = attr & 0x03;
            let behind_background = attr & 0x20 != 0;
            let hflip = attr & 0x40 != 0;
            let vflip = attr & 0x80 != 0;

            for row in 0..height {
                let y = top + row;
                if y >= NES_HEIGHT {
                    break;
                }
                let src_row = if vflip { height - 1 - row } else { row };
                let addr = if tall {
                    let table = if tile & 1 != 0 { 0x1000 } else { 0x0000 };
                    let half = (tile & 0xFE) + src_row / 8;
                    table + half * 16 + (src_row & 7)
                } else {
                    pattern_base + tile * 16 + src_row
                };

                let mut lo = vram[addr];
                let mut hi = vram[addr + 8];
                if hflip {
                    lo = reverse8(lo);
                    hi = reverse8(hi);
                }

                for col in 0..8 {
                    let x = left + col;
                    if x >= NES_WIDTH {
                        break;
                    }
                    let bit = 7 - col;
                    let ci = (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1);
                    if ci == 0 {
                        continue;
                    }
                    self.sprites[y * NES_WIDTH + x] = SpritePixel {
                        color: 0x10 | (palette << 2) | ci,
                        behind_background,
                        sprite_zero: index == 0,
                    };
                }
            }
        }
    }

    /// First visible scanline covered by more than eight sprites.
    pub(in crate::ppu) fn sprite_overflow_line(&self, bus: &Bus) -> Option<u16> {
        let height = self.regs.sprite_height();
        let oam = bus.oam();
        (0..NES_HEIGHT).find_map(|line| {
            let count = oam
                .chunks_exact(4)
                .filter(|entry| {
                    let top = entry[0] as usize + 1;
                    (top..top + height).contains(&line)
                })
                .count();
            (count > 8).then_some(line as u16)
        })
    }

    /// Sprite 0 may register a hit at screen column `x`.
    #[inline]
    pub(in crate::ppu) fn sprite_zero_hit_allowed(&self, x: usize) -> bool {
        self.regs.show_background
            && self.regs.show_sprites
            && x != NES_WIDTH - 1
            && (x >= 8 || (self.regs.show_background_left && self.regs.show_sprites_left))
    }

    /// First (scanline, x) in raster order where sprite 0 overlaps opaque background.
    pub(in crate::ppu) fn predict_sprite_zero_hit(&self) -> Option<(u16, u16)> {
        self.sprites
            .iter()
            .enumerate()
            .filter(|(_, px)| px.sprite_zero)
            .map(|(i, _)| (i % NES_WIDTH, i / NES_WIDTH))
            .find(|&(x, y)| self.sprite_zero_hit_allowed(x) && self.background_slot(x, y) != 0)
            .map(|(x, y)| (y as u16, x as u16))
    }
}

/// Bit-reversal helper for horizontal flip (crate-visible within `ppu`).
#[inline]
pub(in crate::ppu) fn reverse8(v: u8) -> u8 {
    let mut x = v;
    x = (x & 0xF0) >> 4 | (x & 0x0F) << 4;
    x = (x & 0xCC) >> 2 | (x & 0x33) << 2;
    x = (x & 0xAA) >> 1 | (x & 0x55) << 1;
    x
}
