/*!
Mapper subsystem: trait definition, NROM (mapper 0) and mapper selection.

Purpose:
- Install a cartridge's PRG and CHR banks into bus memory at load time.
- React to CPU writes into program space ($8000-$FFFF) by re-banking. The CPU never
  stores those writes; the bus only latches them, and the console forwards the latch
  here after each CPU step.
- Report the nametable arrangement, which bank-switching boards may change at runtime.

Banks are copied, not referenced: main memory $8000-$FFFF and video memory
$0000-$1FFF always hold the bytes of the currently selected banks.
*/

use log::{debug, warn};

use crate::bus::{Bus, BusWrite, RegisterWriteObserver};
use crate::error::CartridgeError;
use crate::mappers::Mmc1;
use crate::rom::{Mirroring, Rom};

/// Lower 16 KiB PRG window.
pub const PRG_LOWER_BANK: u16 = 0x8000;
/// Upper 16 KiB PRG window.
pub const PRG_UPPER_BANK: u16 = 0xC000;
/// Pattern tables in video memory.
pub const CHR_BASE: u16 = 0x0000;

/// Common interface all cartridge mappers implement.
///
/// `notify_write` (from `RegisterWriteObserver`) receives every latched CPU write at or
/// above $8000.
pub trait Mapper: RegisterWriteObserver {
    /// iNES mapper number.
    fn mapper_id(&self) -> u8;

    /// Install the power-on banks.
    fn load_rom(&mut self, bus: &mut Bus);

    /// Nametable arrangement currently selected by the board.
    fn mirroring(&self) -> Mirroring;

    /// Return to power-on banking and reinstall the banks.
    fn reset(&mut self, bus: &mut Bus);
}

/// Pick the implementation registered for `rom.mapper_id`.
pub fn for_rom(rom: &Rom) -> Result<Box<dyn Mapper>, CartridgeError> {
    match rom.mapper_id {
        0 => Ok(Box::new(Nrom::new(rom.clone()))),
        1 => Ok(Box::new(Mmc1::new(rom.clone()))),
        id => Err(CartridgeError::UnsupportedMapper(id)),
    }
}

/// NROM (mapper 0).
///
/// - PRG ROM: 16 KiB (NROM-128) mirrored into both windows, or 32 KiB (NROM-256) direct.
/// - CHR: bank 0 at the pattern tables. CHR-RAM boards start zeroed.
/// - No registers: writes are ignored.
#[derive(Clone, Debug)]
pub struct Nrom {
    rom: Rom,
}

impl Nrom {
    pub fn new(rom: Rom) -> Self {
        Self { rom }
    }

    /// Returns true if this is an NROM-128 (16 KiB PRG) ROM.
    pub fn is_nrom_128(&self) -> bool {
        self.rom.prg_banks == 1
    }
}

impl RegisterWriteObserver for Nrom {
    fn notify_write(&mut self, _bus: &mut Bus, write: BusWrite) {
        warn!(
            "write ${:02X} to PRG ROM at ${:04X} ignored (NROM has no registers)",
            write.value, write.addr
        );
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u8 {
        0
    }

    fn load_rom(&mut self, bus: &mut Bus) {
        // bank(1) wraps to bank 0 on NROM-128
        bus.load_main(PRG_LOWER_BANK, self.rom.prg_bank(0));
        bus.load_main(PRG_UPPER_BANK, self.rom.prg_bank(1));
        if !self.rom.chr_is_ram() {
            bus.load_vram(CHR_BASE, self.rom.chr_bank_8k(0));
        }
        debug!(
            "NROM-{} installed, mirroring {:?}",
            if self.is_nrom_128() { 128 } else { 256 },
            self.rom.mirroring
        );
    }

    fn mirroring(&self) -> Mirroring {
        self.rom.mirroring
    }

    fn reset(&mut self, bus: &mut Bus) {
        self.load_rom(bus);
    }
}
