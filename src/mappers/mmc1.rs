//! MMC1 (Mapper 1) implementation.
//!
//! Implements:
//! - Serial shift register writes (5-bit, LSB first) to control / CHR0 / CHR1 / PRG registers
//! - PRG banking modes (32K switch, or 16K with fixed low or high)
//! - CHR banking (8K or 4K+4K); CHR-RAM boards never switch
//! - Runtime mirroring control (single-screen, vertical, horizontal)
//!
//! Every commit re-copies the affected banks into bus memory.
//!
//! Deferred / Simplified:
//! - PRG RAM disable bit (bit 4 of the PRG register) is ignored
//! - Consecutive-cycle write filtering
//! - Large board variants (SUROM / SOROM / etc.)
use log::debug;

use crate::bus::{Bus, BusWrite, RegisterWriteObserver};
use crate::mapper::{CHR_BASE, Mapper, PRG_LOWER_BANK, PRG_UPPER_BANK};
use crate::rom::{Mirroring, Rom};

/// Power-on control value: PRG mode 3 (switch $8000, fix last bank at $C000).
const CONTROL_POWER_ON: u8 = 0x0C;

/// MMC1 mapper core state.
#[derive(Debug, Clone)]
pub struct Mmc1 {
    rom: Rom,

    // 5-bit registers
    control: u8,
    chr_bank0: u8,
    chr_bank1: u8,
    prg_bank: u8,

    // Serial latch
    shift_reg: u8,
    shift_count: u8,

    mirroring: Mirroring,
}

impl Mmc1 {
    /// The header's mirroring applies until the game writes the control register.
    pub fn new(rom: Rom) -> Self {
        let mirroring = rom.mirroring;
        Self {
            rom,
            control: CONTROL_POWER_ON,
            chr_bank0: 0,
            chr_bank1: 0,
            prg_bank: 0,
            shift_reg: 0,
            shift_count: 0,
            mirroring,
        }
    }

    #[inline]
    fn prg_mode(&self) -> u8 {
        (self.control >> 2) & 0x03
    }

    #[inline]
    fn chr_mode(&self) -> u8 {
        (self.control >> 4) & 0x01
    }

    /// 16 KiB bank indices for the $8000 and $C000 windows.
    fn prg_windows(&self) -> (usize, usize) {
        let last = self.rom.prg_banks.saturating_sub(1);
        let select = (self.prg_bank & 0x0F) as usize;
        match self.prg_mode() {
            0 | 1 => {
                let bank = select & !1;
                (bank, bank + 1)
            }
            2 => (0, select),
            _ => (select, last),
        }
    }

    fn install_prg(&self, bus: &mut Bus) {
        let (lo, hi) = self.prg_windows();
        bus.load_main(PRG_LOWER_BANK, self.rom.prg_bank(lo));
        bus.load_main(PRG_UPPER_BANK, self.rom.prg_bank(hi));
        debug!("MMC1 PRG banks {} / {} (mode {})", lo, hi, self.prg_mode());
    }

    fn install_chr(&self, bus: &mut Bus) {
        if self.rom.chr_is_ram() {
            return;
        }
        if self.chr_mode() == 0 {
            let bank = (self.chr_bank0 >> 1) as usize;
            bus.load_vram(CHR_BASE, self.rom.chr_bank_8k(bank));
            debug!("MMC1 CHR 8K bank {}", bank);
        } else {
            bus.load_vram(CHR_BASE, self.rom.chr_bank_4k(self.chr_bank0 as usize));
            bus.load_vram(CHR_BASE + 0x1000, self.rom.chr_bank_4k(self.chr_bank1 as usize));
            debug!("MMC1 CHR 4K banks {} / {}", self.chr_bank0, self.chr_bank1);
        }
    }

    fn commit_register(&mut self, bus: &mut Bus, addr: u16, value5: u8) {
        // Address bits 13-14 pick the register
        match (addr >> 13) & 0x03 {
            0 => {
                self.control = value5;
                self.mirroring = match value5 & 0x03 {
                    0 => Mirroring::SingleScreenLower,
                    1 => Mirroring::SingleScreenUpper,
                    2 => Mirroring::Vertical,
                    _ => Mirroring::Horizontal,
                };
                self.install_prg(bus);
                self.install_chr(bus);
            }
            1 => {
                self.chr_bank0 = value5;
                self.install_chr(bus);
            }
            2 => {
                self.chr_bank1 = value5;
                self.install_chr(bus);
            }
            _ => {
                self.prg_bank = value5;
                self.install_prg(bus);
            }
        }
    }

    fn serial_write(&mut self, bus: &mut Bus, addr: u16, data: u8) {
        if data & 0x80 != 0 {
            self.shift_reg = 0;
            self.shift_count = 0;
            self.control |= CONTROL_POWER_ON;
            self.install_prg(bus);
            return;
        }
        self.shift_reg |= (data & 1) << self.shift_count;
        self.shift_count += 1;
        if self.shift_count == 5 {
            let value5 = self.shift_reg & 0x1F;
            self.shift_reg = 0;
            self.shift_count = 0;
            self.commit_register(bus, addr, value5);
        }
    }
}

impl RegisterWriteObserver for Mmc1 {
    fn notify_write(&mut self, bus: &mut Bus, write: BusWrite) {
        if write.addr >= PRG_LOWER_BANK {
            self.serial_write(bus, write.addr, write.value);
        }
    }
}

impl Mapper for Mmc1 {
    fn mapper_id(&self) -> u8 {
        1
    }

    fn load_rom(&mut self, bus: &mut Bus) {
        self.install_prg(bus);
        self.install_chr(bus);
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn reset(&mut self, bus: &mut Bus) {
        *self = Self::new(self.rom.clone());
        self.load_rom(bus);
    }
}
