//! Error types surfaced by the emulator core.
//!
//! Load-time failures (`CartridgeError`) abort cartridge start before any bank
//! is installed. Runtime decode failures (`CpuError`) halt the instruction loop.
//! `NesError` is the console-level union returned by [`crate::nes::Nes`].

use thiserror::Error;

/// A cartridge image could not be turned into an installed cartridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("not an iNES image: missing NES<EOF> magic")]
    InvalidMagic,
    #[error("iNES image truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("unsupported mapper: {0}")]
    UnsupportedMapper(u8),
}

/// The instruction engine fetched something it cannot execute.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    #[error("undefined opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NesError {
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error("no cartridge loaded")]
    NoCartridge,
}
