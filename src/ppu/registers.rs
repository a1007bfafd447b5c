#![doc = r#"
PPU registers module

Purpose
- CPU-visible register semantics for $2000-$2007 and $4014.
- `PpuRegisters` is the decoded latch state; its write methods are pure so they can be
  tested without a bus.
- `Ppu::monitor_registers` inspects the bus latches, applies the side effects of the
  CPU's last read and last write, then republishes the values the CPU will read next.

Notes
- The registers live in main memory. A CPU read simply returns whatever byte is there,
  so after every change the PPU pokes the current PPUSTATUS, OAMDATA and PPUDATA values
  back into their slots.
- PPUDATA reads below $3F00 are buffered: the byte returned is the one fetched by the
  previous read. Palette reads return immediately, and the buffer is refilled from the
  name table underneath ($3Fxx - $1000).
- PPUSCROLL and PPUADDR keep separate write toggles. Reading PPUSTATUS resets both.
"#]

use log::debug;

use super::{Ppu, STATUS_VBLANK};
use crate::bus::{Bus, PostInterrupt};
use crate::cpu::Interrupt;
use crate::rom::Mirroring;

pub const PPUCTRL: u16 = 0x2000;
pub const PPUMASK: u16 = 0x2001;
pub const PPUSTATUS: u16 = 0x2002;
pub const OAMADDR: u16 = 0x2003;
pub const OAMDATA: u16 = 0x2004;
pub const PPUSCROLL: u16 = 0x2005;
pub const PPUADDR: u16 = 0x2006;
pub const PPUDATA: u16 = 0x2007;
pub const OAMDMA: u16 = 0x4014;

/// First palette address in PPU space.
pub const PALETTE_START: u16 = 0x3F00;

/// Decoded register and latch state. `Default` is the power-on state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PpuRegisters {
    // PPUCTRL
    pub nametable_base: u16,
    pub bg_pattern_base: u16,
    pub sprite_pattern_base: u16,
    pub tall_sprites: bool,
    pub vram_increment: u16,
    pub nmi_enabled: bool,

    // PPUMASK
    pub show_background: bool,
    pub show_sprites: bool,
    pub show_background_left: bool,
    pub show_sprites_left: bool,

    // PPUSCROLL / PPUADDR
    pub scroll_x: u8,
    pub scroll_y: u8,
    pub scroll_toggle: bool,
    pub addr_toggle: bool,
    pub vram_addr: u16,

    pub read_buffer: u8,
    pub oam_addr: u8,

    pub mirroring: Mirroring,
}

impl Default for PpuRegisters {
    fn default() -> Self {
        Self {
            nametable_base: 0x2000,
            bg_pattern_base: 0x0000,
            sprite_pattern_base: 0x0000,
            tall_sprites: false,
            vram_increment: 1,
            nmi_enabled: false,
            show_background: false,
            show_sprites: false,
            show_background_left: false,
            show_sprites_left: false,
            scroll_x: 0,
            scroll_y: 0,
            scroll_toggle: false,
            addr_toggle: false,
            vram_addr: 0,
            read_buffer: 0,
            oam_addr: 0,
            mirroring: Mirroring::default(),
        }
    }
}

impl PpuRegisters {
    pub fn write_ctrl(&mut self, value: u8) {
        self.nametable_base = 0x2000 + (value as u16 & 0x03) * 0x400;
        self.vram_increment = if value & 0x04 != 0 { 32 } else { 1 };
        self.sprite_pattern_base = if value & 0x08 != 0 { 0x1000 } else { 0x0000 };
        self.bg_pattern_base = if value & 0x10 != 0 { 0x1000 } else { 0x0000 };
        self.tall_sprites = value & 0x20 != 0;
        self.nmi_enabled = value & 0x80 != 0;
    }

    pub fn write_mask(&mut self, value: u8) {
        self.show_background_left = value & 0x02 != 0;
        self.show_sprites_left = value & 0x04 != 0;
        self.show_background = value & 0x08 != 0;
        self.show_sprites = value & 0x10 != 0;
    }

    /// First write sets X, second sets Y.
    pub fn write_scroll(&mut self, value: u8) {
        if !self.scroll_toggle {
            self.scroll_x = value;
        } else {
            self.scroll_y = value;
        }
        self.scroll_toggle = !self.scroll_toggle;
    }

    /// First write sets the high six bits, second the low byte.
    pub fn write_addr(&mut self, value: u8) {
        if !self.addr_toggle {
            self.vram_addr = (self.vram_addr & 0x00FF) | ((value as u16 & 0x3F) << 8);
        } else {
            self.vram_addr = (self.vram_addr & 0x7F00) | value as u16;
        }
        self.addr_toggle = !self.addr_toggle;
    }

    #[inline]
    pub fn advance_vram_addr(&mut self) {
        self.vram_addr = self.vram_addr.wrapping_add(self.vram_increment) & 0x7FFF;
    }

    pub fn reset_toggles(&mut self) {
        self.scroll_toggle = false;
        self.addr_toggle = false;
    }

    #[inline]
    pub fn sprite_height(&self) -> usize {
        if self.tall_sprites { 16 } else { 8 }
    }

    /// Background or sprites enabled.
    #[inline]
    pub fn rendering_enabled(&self) -> bool {
        self.show_background || self.show_sprites
    }
}

impl Ppu {
    /// Apply the CPU's last register read and write, consuming both latches.
    ///
    /// The read is handled first: an instruction like `BIT $2002` only reads, and
    /// a read-modify-write on a register is not something games do.
    pub(in crate::ppu) fn monitor_registers<P: PostInterrupt>(
        &mut self,
        bus: &mut Bus,
        cpu: &mut P,
    ) {
        if let Some(addr) = bus.take_last_read() {
            self.on_register_read(bus, addr);
        }
        if let Some(write) = bus.take_last_write() {
            self.on_register_write(bus, cpu, write.addr, write.value);
        }
        // OAM DMA fills OAM without touching the port
        self.publish_oam_data(bus);
    }

    fn on_register_read(&mut self, bus: &mut Bus, addr: u16) {
        match addr {
            PPUSTATUS => {
                self.regs.reset_toggles();
                self.set_status(bus, STATUS_VBLANK, false);
            }
            PPUDATA => {
                let v = self.regs.vram_addr & 0x3FFF;
                // Palette reads refill the buffer from the name table underneath
                let fill_from = if v >= PALETTE_START { v - 0x1000 } else { v };
                self.regs.read_buffer = self.read_vram(bus, fill_from);
                self.regs.advance_vram_addr();
                self.publish_data_port(bus);
            }
            _ => {}
        }
    }

    fn on_register_write<P: PostInterrupt>(
        &mut self,
        bus: &mut Bus,
        cpu: &mut P,
        addr: u16,
        value: u8,
    ) {
        match addr {
            PPUCTRL => {
                let was_enabled = self.regs.nmi_enabled;
                self.regs.write_ctrl(value);
                // Enabling NMI during VBlank fires immediately
                if !was_enabled && self.regs.nmi_enabled && self.vblank() {
                    cpu.post_interrupt(Interrupt::Nmi);
                }
            }
            PPUMASK => self.regs.write_mask(value),
            PPUSTATUS => {
                // Read-only: undo the CPU's store
                bus.poke(PPUSTATUS, self.status);
            }
            OAMADDR => self.regs.oam_addr = value,
            OAMDATA => self.write_oam(bus, value),
            PPUSCROLL => self.regs.write_scroll(value),
            PPUADDR => {
                self.regs.write_addr(value);
                if !self.regs.addr_toggle {
                    self.publish_data_port(bus);
                }
            }
            PPUDATA => {
                let written = self.write_vram(bus, self.regs.vram_addr, value);
                self.refresh_after_vram_write(bus, written);
                self.regs.advance_vram_addr();
                self.publish_data_port(bus);
            }
            OAMDMA => {
                let source = (value as u16) << 8;
                debug!("OAM DMA from ${:04X}", source);
                cpu.start_dma(source);
            }
            _ => {}
        }
    }
}
