/*!
Main-memory address coercion.

CPU address map mirrors:
- $0000-$07FF: 2 KiB internal RAM
- $0800-$1FFF: mirrors of $0000-$07FF (mask with & 0x07FF)
- $2000-$2007: PPU registers
- $2008-$3FFF: mirrors of $2000-$2007 every 8 bytes

Every CPU byte or word access goes through `mirror_cpu_addr`, stack and vector
accesses included, so the canonical address is also what lands in the bus latches.
*/

/// Size of CPU internal RAM (in bytes).
pub const CPU_RAM_SIZE: u16 = 0x0800;

/// Reduce a CPU address to its canonical location in main memory.
#[inline]
pub fn mirror_cpu_addr(addr: u16) -> u16 {
    match addr {
        0x0800..=0x1FFF => addr & (CPU_RAM_SIZE - 1),
        0x2008..=0x3FFF => 0x2000 + (addr & 0x0007),
        _ => addr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;

    #[test]
    fn ram_mirrors_every_2k() {
        for base in [0x0000u16, 0x0123, 0x07FF] {
            for mirror in [base + 0x0800, base + 0x1000, base + 0x1800] {
                assert_eq!(mirror_cpu_addr(mirror), base);
            }
        }
    }

    #[test]
    fn register_window_mirrors_every_8_bytes() {
        assert_eq!(mirror_cpu_addr(0x2008), 0x2000);
        assert_eq!(mirror_cpu_addr(0x200F), 0x2007);
        assert_eq!(mirror_cpu_addr(0x3456), 0x2006);
        assert_eq!(mirror_cpu_addr(0x3FFF), 0x2007);
        assert_eq!(mirror_cpu_addr(0x2007), 0x2007);
    }

    #[test]
    fn unmirrored_ranges_pass_through() {
        for addr in [0x4000u16, 0x4014, 0x6000, 0x8000, 0xFFFF] {
            assert_eq!(mirror_cpu_addr(addr), addr);
        }
    }

    #[test]
    fn mirrored_reads_and_writes() {
        let mut bus = Bus::new();
        bus.write(0x0002, 0x5A);
        assert_eq!(bus.read(0x0802), 0x5A);
        assert_eq!(bus.read(0x1002), 0x5A);
        assert_eq!(bus.read(0x1802), 0x5A);

        bus.write(0x1FFF, 0xA5);
        assert_eq!(bus.read(0x07FF), 0xA5);

        bus.write(0x2003, 0x11);
        for mirror in (0x200Bu16..0x4000).step_by(8) {
            assert_eq!(bus.read(mirror), 0x11);
        }
    }
}
