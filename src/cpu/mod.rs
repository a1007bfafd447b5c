/*!
cpu - The 6502 instruction engine.

```text
    flags.rs        - Status register as eight booleans + pack/unpack.
    state.rs        - Registers, stack and fetch helpers.
    table.rs        - Opcode -> (mnemonic, addressing mode) table, page-cross side table.
    cycles.rs       - (mnemonic, addressing mode) -> base cycles.
    addressing.rs   - Addressing-mode resolution (address vs. operand).
    execute.rs      - Instruction semantic helpers (ALU, RMW, branch).
    dispatch/       - Fetch/decode/execute of one instruction via family handlers.
    interrupt.rs    - Interrupt latch kinds, vectors and DMA progress.
    core/           - `Cpu` facade: interrupt state machine + `execute_next`.
```

Usage:
```ignore
use nescore::cpu::Cpu;

let mut cpu = Cpu::new();
cpu.total_reset(&bus);
let cycles = cpu.execute_next(&mut bus)?;
```
*/

pub mod addressing;
pub mod core;
pub mod cycles;
mod dispatch;
pub mod execute;
pub mod flags;
pub mod interrupt;
pub mod state;
pub mod table;

pub use crate::cpu::core::{Cpu, Registers};
pub use crate::cpu::flags::{
    BREAK, CARRY, DECIMAL, Flags, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO, byte_to_flags,
    flags_to_byte,
};
pub use crate::cpu::interrupt::Interrupt;
pub use crate::cpu::state::CpuState;
