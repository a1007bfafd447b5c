#![doc = r#"
PPU address-space helpers: pure mapping functions, no state.

Concepts
- The PPU sees a 14-bit address space ($0000-$3FFF) backed by the bus's 16 KiB video memory.
- $3000-$3EFF mirrors $2000-$2EFF.
- $3F20-$3FFF mirrors the 32-byte palette at $3F00-$3F1F, and inside that range
  $3F10/$3F14/$3F18/$3F1C mirror $3F00/$3F04/$3F08/$3F0C. The second fold must run
  after the first.
- Video memory holds all four 1 KiB name tables; the cartridge's mirroring arrangement
  decides which of them alias each other (`fold_nametable_addr`).
"#]

use crate::rom::Mirroring;

/// Coerce a raw PPU address to its canonical location in video memory.
pub fn mirror_ppu_addr(addr: u16) -> u16 {
    let addr = addr & 0x3FFF;
    match addr {
        0x3000..=0x3EFF => addr - 0x1000,
        0x3F00..=0x3FFF => {
            let folded = 0x3F00 + (addr & 0x1F);
            match folded {
                0x3F10 | 0x3F14 | 0x3F18 | 0x3F1C => folded - 0x10,
                _ => folded,
            }
        }
        _ => addr,
    }
}

/// Palette RAM index (0..=31) for a PPU address in $3F00-$3FFF.
pub fn map_palette_addr(addr: u16) -> usize {
    (mirror_ppu_addr(0x3F00 | (addr & 0x1F)) - 0x3F00) as usize
}

/// The logical name table (0..=3) that backs `table` under `mirroring`.
///
/// Horizontal: (0,1)->0, (2,3)->2. Vertical: (0,2)->0, (1,3)->1.
pub fn canonical_table(table: usize, mirroring: Mirroring) -> usize {
    let table = table & 0x03;
    match mirroring {
        Mirroring::Horizontal => table & !1,
        Mirroring::Vertical => table & 1,
        Mirroring::FourScreen => table,
        Mirroring::SingleScreenLower => 0,
        Mirroring::SingleScreenUpper => 1,
    }
}

/// Fold a name-table address onto the table that actually stores it.
///
/// Addresses outside $2000-$2FFF are returned unchanged, so callers can apply this
/// after `mirror_ppu_addr` on any address.
pub fn fold_nametable_addr(addr: u16, mirroring: Mirroring) -> u16 {
    if !(0x2000..=0x2FFF).contains(&addr) {
        return addr;
    }
    let table = ((addr - 0x2000) >> 10) as usize;
    let offset = addr & 0x03FF;
    0x2000 + ((canonical_table(table, mirroring) as u16) << 10) + offset
}
