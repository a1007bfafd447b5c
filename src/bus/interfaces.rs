/*!
interfaces: narrow traits that decouple the components sharing the bus.

- `PostInterrupt` is the only way the PPU reaches the CPU: posting an NMI at VBlank
  and starting OAM DMA when $4014 is written. The PPU takes `&mut impl PostInterrupt`
  per tick, so it can be tested against a recording stub instead of a real CPU.
- `RegisterWriteObserver` is implemented by devices that watch the bus latches after
  each CPU step (the mapper's bank-switch logic, the controller's strobe detector).
*/

use crate::bus::Bus;
use crate::cpu::Interrupt;

/// A latched CPU write: canonical (mirrored) address plus the byte written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWrite {
    pub addr: u16,
    pub value: u8,
}

/// Something that accepts interrupt requests (the CPU's interrupt latch).
pub trait PostInterrupt {
    /// Request an interrupt. A maskable request may be dropped by the receiver.
    fn post_interrupt(&mut self, kind: Interrupt);

    /// Begin a 256-byte OAM transfer from `source` (a page-aligned main-memory address).
    fn start_dma(&mut self, source: u16);
}

/// A device notified of the bus activity latched during the last CPU step.
pub trait RegisterWriteObserver {
    fn notify_write(&mut self, bus: &mut Bus, write: BusWrite);

    /// Reads matter to a few devices only (the controller's serial port).
    fn notify_read(&mut self, _bus: &mut Bus, _addr: u16) {}
}
