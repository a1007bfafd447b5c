#![doc = r#"
nescore library crate.

This crate exposes the emulator core modules for use by binaries and tests.

Modules:
- bus: sole owner of main memory, video memory and OAM, plus the read/write latches
- controller: standard joypad on the $4016 serial port
- cpu: 6502 CPU core (facade + state + dispatch + execute modules)
- error: cartridge, CPU and console error types
- mapper: Mapper trait, NROM (mapper 0) and mapper selection
- mappers: bank-switching boards beyond NROM (MMC1)
- nes: the console; owns everything and runs the CPU/PPU lock-step loop
- ppu: 2C02 timing, memory-mapped registers and frame compositing
- rom: iNES v1 parsing

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

// Core emulator modules
pub mod bus;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod mapper;
pub mod mappers;
pub mod nes;
pub mod ppu;
pub mod rom;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use controller::{Button, Controller};
pub use cpu::{Cpu, Registers};
pub use error::{CartridgeError, CpuError, NesError};
pub use nes::{Nes, NesConfig};
pub use ppu::Ppu;
pub use rom::{Mirroring, Rom};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
