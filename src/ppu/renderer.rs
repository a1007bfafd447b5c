#![doc = r#"
PPU renderer module

Responsibilities
- `Ppu::tick`: one dot of the 341x262 raster, with the scanline-boundary actions.
- Frame start (scanline 261 -> 0): status bits cleared, sprite layer rebuilt, sprite-zero
  hit and overflow points predicted for the coming frame.
- VBlank entry (241/1): NMI, full name-table refresh, composite into the frame buffer.

Public API
- `Ppu::tick(&mut self, bus, cpu, check_registers)`: advance one dot. The register monitor
  runs first when `check_registers` is set.

Notes
- Compositing happens once per frame, so mid-frame raster effects are not reproduced.
  Sprite-zero hit and overflow are the exception: their timing is predicted at frame
  start and the status bits are raised at the matching dot.
"#]

use log::{debug, trace};

use super::*;
use crate::bus::PostInterrupt;
use crate::cpu::Interrupt;

/// Dot at which sprite evaluation for the next line would report an overflow.
const OVERFLOW_DOT: u16 = 257;

impl Ppu {
    /// Advance one PPU dot (invoked 3x per CPU cycle by the driving loop).
    pub fn tick<P: PostInterrupt>(&mut self, bus: &mut Bus, cpu: &mut P, check_registers: bool) {
        if check_registers {
            self.monitor_registers(bus, cpu);
        }

        self.dot += 1;
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.start_frame(bus);
            }
        }

        match (self.scanline, self.dot) {
            (0, 1) => self.set_status(bus, STATUS_VBLANK, false),
            (VBLANK_SCANLINE, 1) => self.enter_vblank(bus, cpu),
            _ => {}
        }

        if let Some((line, x)) = self.sprite_zero_hit_at {
            if self.scanline == line
                && self.dot == x + 1
                && self.regs.show_background
                && self.regs.show_sprites
            {
                self.set_status(bus, STATUS_SPRITE_ZERO_HIT, true);
            }
        }
        if self.sprite_overflow_at == Some(self.scanline)
            && self.dot == OVERFLOW_DOT
            && self.regs.rendering_enabled()
        {
            self.set_status(bus, STATUS_SPRITE_OVERFLOW, true);
        }
    }

    fn start_frame(&mut self, bus: &mut Bus) {
        self.frame += 1;
        self.set_status(
            bus,
            STATUS_VBLANK | STATUS_SPRITE_ZERO_HIT | STATUS_SPRITE_OVERFLOW,
            false,
        );
        self.rebuild_sprite_layer(bus);
        self.sprite_zero_hit_at = self.predict_sprite_zero_hit();
        self.sprite_overflow_at = self.sprite_overflow_line(bus);
        trace!(
            "frame {} start: sprite 0 hit {:?}, overflow {:?}",
            self.frame, self.sprite_zero_hit_at, self.sprite_overflow_at
        );
    }

    fn enter_vblank<P: PostInterrupt>(&mut self, bus: &mut Bus, cpu: &mut P) {
        self.set_status(bus, STATUS_VBLANK, true);
        if self.regs.nmi_enabled {
            cpu.post_interrupt(Interrupt::Nmi);
        }
        self.render_nametables(bus);
        self.rebuild_sprite_layer(bus);
        self.composite(bus);
        self.frame_complete = true;
        debug!(
            "VBlank: frame {} composited, NMI {}",
            self.frame,
            if self.regs.nmi_enabled { "posted" } else { "disabled" }
        );
    }

    /// Multiplex the background and sprite layers into the RGBA frame buffer.
    pub(in crate::ppu) fn composite(&mut self, bus: &mut Bus) {
        let palette: [[u8; 3]; 32] = std::array::from_fn(|i| self.palette_color(bus, i as u8));
        let mut hit = false;

        for y in 0..NES_HEIGHT {
            for x in 0..NES_WIDTH {
                let bg = if self.regs.show_background && (x >= 8 || self.regs.show_background_left)
                {
                    self.background_slot(x, y)
                } else {
                    0
                };
                let sprite = if self.regs.show_sprites && (x >= 8 || self.regs.show_sprites_left) {
                    self.sprites[y * NES_WIDTH + x]
                } else {
                    SpritePixel::default()
                };

                if sprite.sprite_zero && sprite.is_opaque() && bg != 0 && x != NES_WIDTH - 1 {
                    hit = true;
                }

                let slot = if sprite.is_opaque() && !(sprite.behind_background && bg != 0) {
                    sprite.color
                } else {
                    bg
                };
                let rgb = palette[slot as usize];
                let fi = (y * NES_WIDTH + x) * BYTES_PER_PIXEL;
                self.framebuffer[fi..fi + 3].copy_from_slice(&rgb);
                self.framebuffer[fi + 3] = 0xFF;
            }
        }

        if hit {
            self.set_status(bus, STATUS_SPRITE_ZERO_HIT, true);
        }
    }
}
