/*!
interrupt.rs - The CPU's single-slot interrupt latch and OAM DMA transfer state.

Latch rules
===========
- At most one request is pending.
- IRQ is maskable: posting it while I is set drops it (nothing is queued). It also
  never displaces another pending request.
- NMI and RESET are never masked. RESET displaces anything, including a DMA in progress.
- DMA is a pseudo-interrupt started by a write to $4014. While it runs an NMI cannot take
  the latch; it is held back and latched the moment the transfer finishes.
*/

/// NMI vector ($FFFA/$FFFB).
pub const VECTOR_NMI: u16 = 0xFFFA;
/// RESET vector ($FFFC/$FFFD).
pub const VECTOR_RESET: u16 = 0xFFFC;
/// IRQ / BRK vector ($FFFE/$FFFF).
pub const VECTOR_IRQ: u16 = 0xFFFE;

/// Bytes copied by one OAM DMA transfer.
pub const DMA_LENGTH: u16 = 256;
/// CPU cycles billed for each DMA step that copies a byte.
pub const DMA_STEP_CYCLES: u32 = 2;
/// CPU cycles billed for the terminal DMA step.
pub const DMA_FINAL_CYCLES: u32 = 1;
/// Cycles billed for servicing IRQ, NMI or RESET.
pub const INTERRUPT_CYCLES: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interrupt {
    #[default]
    None,
    Irq,
    Nmi,
    Reset,
    Dma,
}

/// Progress of an OAM DMA transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DmaTransfer {
    pub source: u16,
    pub copied: u16,
}

impl DmaTransfer {
    pub fn new(source: u16) -> Self {
        Self { source, copied: 0 }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.copied >= DMA_LENGTH
    }
}
