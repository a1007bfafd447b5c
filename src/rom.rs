/*!
iNES (v1) cartridge image parsing.

Features:
- Parse the 16-byte iNES header into cartridge metadata
- Skip the optional 512-byte trainer
- Keep the raw PRG and CHR payloads and hand out bank-sized slices of them

Header layout:
- bytes[0..4] = b"NES\x1A"
- byte 4 = PRG ROM size in 16 KiB units
- byte 5 = CHR ROM size in 8 KiB units (0 => the board carries CHR RAM)
- byte 6 = Flags 6: bit0 vertical mirroring, bit1 battery, bit2 trainer,
           bit3 four-screen VRAM, bits4-7 mapper low nibble
- byte 7 = Flags 7: bits4-7 mapper high nibble
- byte 8 = PRG RAM size in 8 KiB units (0 => 1 by convention)

Validation happens before anything is installed: a bad magic or a file shorter than
its header promises is rejected here, so a mapper never sees a partial image.
*/

use crate::error::CartridgeError;

pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;
pub const CHR_HALF_BANK_SIZE: usize = 4 * 1024;

const MAGIC: &[u8; 4] = b"NES\x1A";

/// Name-table arrangement selected by the cartridge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mirroring {
    /// Top and bottom pairs alias ($2000=$2400, $2800=$2C00): the picture extends vertically.
    #[default]
    Horizontal,
    /// Left and right pairs alias ($2000=$2800, $2400=$2C00): the picture extends horizontally.
    Vertical,
    /// All four tables are distinct.
    FourScreen,
    SingleScreenLower,
    SingleScreenUpper,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Rom {
    prg: Vec<u8>,
    chr: Vec<u8>,
    pub mapper_id: u8,
    pub prg_banks: usize,
    pub chr_banks: usize,
    pub prg_ram_banks: usize,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub trainer: bool,
}

impl std::fmt::Debug for Rom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rom")
            .field("mapper_id", &self.mapper_id)
            .field("prg_banks", &self.prg_banks)
            .field("chr_banks", &self.chr_banks)
            .field("prg_ram_banks", &self.prg_ram_banks)
            .field("mirroring", &self.mirroring)
            .field("battery", &self.battery)
            .field("trainer", &self.trainer)
            .finish()
    }
}

impl Rom {
    /// Parse an iNES image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < MAGIC.len() || &data[0..4] != MAGIC {
            return Err(CartridgeError::InvalidMagic);
        }
        if data.len() < HEADER_SIZE {
            return Err(CartridgeError::Truncated {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let prg_banks = data[4] as usize;
        let chr_banks = data[5] as usize;
        let flags6 = data[6];
        let flags7 = data[7];
        let prg_ram_banks = (data[8] as usize).max(1);

        // Mapper ID: high nibble from flags7 and low nibble from flags6
        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);

        let mirroring = if flags6 & 0b0000_1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let battery = flags6 & 0b0000_0010 != 0;
        let trainer = flags6 & 0b0000_0100 != 0;

        let prg_start = HEADER_SIZE + if trainer { TRAINER_SIZE } else { 0 };
        let prg_end = prg_start + prg_banks * PRG_BANK_SIZE;
        let chr_end = prg_end + chr_banks * CHR_BANK_SIZE;
        if data.len() < chr_end {
            return Err(CartridgeError::Truncated {
                expected: chr_end,
                actual: data.len(),
            });
        }

        Ok(Self {
            prg: data[prg_start..prg_end].to_vec(),
            chr: data[prg_end..chr_end].to_vec(),
            mapper_id,
            prg_banks,
            chr_banks,
            prg_ram_banks,
            mirroring,
            battery,
            trainer,
        })
    }

    /// Raw PRG ROM payload.
    pub fn prg(&self) -> &[u8] {
        &self.prg
    }

    /// Raw CHR ROM payload (empty on CHR-RAM boards).
    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_banks == 0
    }

    /// 16 KiB PRG bank `index`, wrapping modulo the bank count.
    pub fn prg_bank(&self, index: usize) -> &[u8] {
        bank(&self.prg, PRG_BANK_SIZE, index)
    }

    /// 8 KiB CHR bank `index`, wrapping modulo the bank count.
    pub fn chr_bank_8k(&self, index: usize) -> &[u8] {
        bank(&self.chr, CHR_BANK_SIZE, index)
    }

    /// 4 KiB CHR bank `index`, wrapping modulo the 4 KiB bank count.
    pub fn chr_bank_4k(&self, index: usize) -> &[u8] {
        bank(&self.chr, CHR_HALF_BANK_SIZE, index)
    }
}

fn bank(data: &[u8], size: usize, index: usize) -> &[u8] {
    let count = data.len() / size;
    if count == 0 {
        return &[];
    }
    let start = (index % count) * size;
    &data[start..start + size]
}
