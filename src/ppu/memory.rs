#![doc = r#"
PPU memory submodule

Responsibilities
- VRAM access through the PPU's own address mirroring and the cartridge's name-table
  folding, so every caller lands on the byte that actually stores an address.
- Palette lookup from a 5-bit palette slot to an RGB triple.
- OAMDATA port access and republishing of the PPUDATA / OAMDATA read values.

Integration
- Inherent methods on `Ppu`; video memory and OAM themselves are owned by the `Bus`.
"#]

use super::{NES_PALETTE, Ppu};
use crate::bus::{Bus, fold_nametable_addr, map_palette_addr, mirror_ppu_addr};
use crate::ppu::registers::{OAMDATA, PALETTE_START, PPUDATA};

impl Ppu {
    /// Canonical video-memory index for a PPU address.
    #[inline]
    pub(in crate::ppu) fn resolve_vram_addr(&self, addr: u16) -> u16 {
        fold_nametable_addr(mirror_ppu_addr(addr), self.regs.mirroring)
    }

    #[inline]
    pub(in crate::ppu) fn read_vram(&self, bus: &Bus, addr: u16) -> u8 {
        bus.vram()[self.resolve_vram_addr(addr) as usize]
    }

    /// Store `value` and return the canonical address that was written.
    pub(in crate::ppu) fn write_vram(&self, bus: &mut Bus, addr: u16, value: u8) -> u16 {
        let resolved = self.resolve_vram_addr(addr);
        bus.vram_mut()[resolved as usize] = value;
        resolved
    }

    /// RGB for palette slot 0..=31 (background 0x00-0x0F, sprites 0x10-0x1F).
    #[inline]
    pub(in crate::ppu) fn palette_color(&self, bus: &Bus, slot: u8) -> [u8; 3] {
        let entry = bus.vram()[PALETTE_START as usize + map_palette_addr(slot as u16)] & 0x3F;
        NES_PALETTE[entry as usize]
    }

    /// OAMDATA write: store at OAMADDR and post-increment (wrapping).
    pub(in crate::ppu) fn write_oam(&mut self, bus: &mut Bus, value: u8) {
        bus.oam_mut()[self.regs.oam_addr as usize] = value;
        self.regs.oam_addr = self.regs.oam_addr.wrapping_add(1);
    }

    pub(in crate::ppu) fn publish_oam_data(&self, bus: &mut Bus) {
        let value = bus.oam()[self.regs.oam_addr as usize];
        bus.poke(OAMDATA, value);
    }

    /// Place the next PPUDATA read value: palette bytes directly, anything else from
    /// the read buffer.
    pub(in crate::ppu) fn publish_data_port(&self, bus: &mut Bus) {
        let v = self.regs.vram_addr & 0x3FFF;
        let value = if v >= PALETTE_START {
            self.read_vram(bus, v)
        } else {
            self.regs.read_buffer
        };
        bus.poke(PPUDATA, value);
    }
}
