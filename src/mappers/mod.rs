/*
Module: mappers

Bank-switching boards. Each lives in its own file and implements
`crate::mapper::Mapper`; NROM, having no registers, stays in `mapper.rs`.

Implemented:
- MMC1 (Mapper 1)
*/

pub mod mmc1;

pub use mmc1::Mmc1;
