/*!
Console: owns the bus and every device on it, and drives them in lock-step.

Order of operations for one `step`:
  1) CPU executes one instruction (or one interrupt / DMA service step).
  2) The controller sees the step's latched write and read ($4016 strobe and polling).
  3) The mapper sees a latched write into program space and may re-bank; its mirroring
     is then forwarded to the PPU so the bank switch is visible to the dots that follow.
  4) The PPU ticks `cycles * 3` dots. The first dot runs the register monitor, which
     consumes the latches; the remaining dots skip it.
  5) Both latches are cleared, so nothing is observed twice.

Lifecycle:
- `load_rom` parses and validates the image before touching any state, so a rejected
  image leaves the previous cartridge running.
- `power_cycle` returns every component to power-on state and has the mapper
  reinstall its power-on banks. `reset` only presses the reset button.
- `eject` drops the cartridge and resets every component in place; the bus keeps its
  buffers.
*/

use log::{info, warn};

use crate::bus::{Bus, PRG_ROM_START, PostInterrupt, RegisterWriteObserver};
use crate::controller::Controller;
use crate::cpu::{Cpu, Interrupt, Registers};
use crate::error::NesError;
use crate::mapper::{self, Mapper};
use crate::ppu::Ppu;
use crate::rom::{Mirroring, Rom};

/// PPU dots per CPU cycle.
pub const DOTS_PER_CPU_CYCLE: u32 = 3;

/// Runtime knobs for the driving loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NesConfig {
    /// CPU clock (NTSC).
    pub cpu_rate_hz: u32,
    /// How many `run_pass` batches make up one emulated second.
    pub passes_per_second: u32,
    /// Runaway guard for `run_frame`.
    pub max_steps_per_frame: usize,
}

impl Default for NesConfig {
    fn default() -> Self {
        Self {
            cpu_rate_hz: 1_789_773,
            passes_per_second: 20,
            max_steps_per_frame: 100_000,
        }
    }
}

impl NesConfig {
    /// CPU cycles in one `run_pass` batch.
    pub fn cycles_per_pass(&self) -> u64 {
        (self.cpu_rate_hz / self.passes_per_second.max(1)) as u64
    }
}

pub struct Nes {
    bus: Bus,
    cpu: Cpu,
    ppu: Ppu,
    controller: Controller,
    mapper: Option<Box<dyn Mapper>>,
    config: NesConfig,
}

impl Default for Nes {
    fn default() -> Self {
        Self::new()
    }
}

impl Nes {
    pub fn new() -> Self {
        Self::with_config(NesConfig::default())
    }

    pub fn with_config(config: NesConfig) -> Self {
        Self {
            bus: Bus::new(),
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            controller: Controller::new(),
            mapper: None,
            config,
        }
    }

    /// Insert a cartridge and power the console on.
    pub fn load_rom(&mut self, image: &[u8]) -> Result<(), NesError> {
        let rom = Rom::from_bytes(image)?;
        let mut mapper = mapper::for_rom(&rom)?;

        self.bus.reset();
        self.ppu.reset();
        self.controller.reset();
        mapper.load_rom(&mut self.bus);
        self.ppu.set_mirroring(mapper.mirroring());
        self.cpu.total_reset(&self.bus);

        info!(
            "cartridge loaded: mapper {}, {} PRG / {} CHR banks, {:?} mirroring, reset ${:04X}",
            mapper.mapper_id(),
            rom.prg_banks,
            rom.chr_banks,
            rom.mirroring,
            self.cpu.pc()
        );
        self.mapper = Some(mapper);
        Ok(())
    }

    /// One CPU step plus the PPU dots it pays for. Returns the CPU cycles consumed.
    pub fn step(&mut self) -> Result<u32, NesError> {
        let mapper = self.mapper.as_mut().ok_or(NesError::NoCartridge)?;
        let cycles = self.cpu.execute_next(&mut self.bus)?;

        if let Some(write) = self.bus.last_write() {
            self.controller.notify_write(&mut self.bus, write);
            if write.addr >= PRG_ROM_START {
                mapper.notify_write(&mut self.bus, write);
            }
        }
        if let Some(addr) = self.bus.last_read() {
            self.controller.notify_read(&mut self.bus, addr);
        }
        self.ppu.set_mirroring(mapper.mirroring());

        for dot in 0..cycles * DOTS_PER_CPU_CYCLE {
            self.ppu.tick(&mut self.bus, &mut self.cpu, dot == 0);
        }
        self.bus.clear_latches();
        Ok(cycles)
    }

    /// Step until the PPU finishes a frame. Returns the CPU cycles spent.
    pub fn run_frame(&mut self) -> Result<u64, NesError> {
        // A frame finished by an earlier `step` does not count
        self.ppu.take_frame_complete();
        let mut cycles = 0u64;
        for _ in 0..self.config.max_steps_per_frame {
            cycles += self.step()? as u64;
            if self.ppu.take_frame_complete() {
                return Ok(cycles);
            }
        }
        warn!(
            "no frame completed within {} steps",
            self.config.max_steps_per_frame
        );
        Ok(cycles)
    }

    /// Step through one batch of `cycles_per_pass` CPU cycles. Returns the cycles spent,
    /// which may overshoot the budget by the last instruction.
    pub fn run_pass(&mut self) -> Result<u64, NesError> {
        let budget = self.config.cycles_per_pass();
        let mut cycles = 0u64;
        while cycles < budget {
            cycles += self.step()? as u64;
        }
        Ok(cycles)
    }

    /// Press the reset button: the CPU services RESET on its next step.
    pub fn reset(&mut self) {
        info!("console reset");
        self.cpu.post_interrupt(Interrupt::Reset);
    }

    /// Switch the console off and on again with the same cartridge.
    pub fn power_cycle(&mut self) -> Result<(), NesError> {
        let mapper = self.mapper.as_mut().ok_or(NesError::NoCartridge)?;
        self.bus.reset();
        self.ppu.reset();
        self.controller.reset();
        mapper.reset(&mut self.bus);
        self.ppu.set_mirroring(mapper.mirroring());
        self.cpu.total_reset(&self.bus);
        info!("power cycle, reset ${:04X}", self.cpu.pc());
        Ok(())
    }

    /// Remove the cartridge and return every component to power-on state.
    pub fn eject(&mut self) {
        self.mapper = None;
        self.bus.reset();
        self.ppu.reset();
        self.ppu.set_mirroring(Mirroring::default());
        self.controller.reset();
        self.cpu.total_reset(&self.bus);
        info!("cartridge ejected");
    }

    pub fn is_loaded(&self) -> bool {
        self.mapper.is_some()
    }

    pub fn config(&self) -> &NesConfig {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    /// RGBA, 256x240.
    pub fn frame_buffer(&self) -> &[u8] {
        self.ppu.framebuffer()
    }

    pub fn registers(&self) -> Registers {
        self.cpu.registers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Button;
    use crate::error::CartridgeError;
    use crate::ppu::FRAME_BUFFER_SIZE;
    use crate::rom::{HEADER_SIZE, PRG_BANK_SIZE};
    use crate::test_utils::{PRG_START, build_ines, build_nrom_with_prg, set_vectors_in_prg};

    const NMI_HANDLER: u16 = 0x8100;

    fn nes_with(prg: &[u8]) -> Nes {
        let mut nes = Nes::new();
        let image = build_nrom_with_prg(prg, 1, 1, Some((PRG_START, NMI_HANDLER, PRG_START)));
        nes.load_rom(&image).expect("load");
        nes
    }

    #[test]
    fn config_defaults() {
        let config = NesConfig::default();
        assert_eq!(config.cycles_per_pass(), 1_789_773 / 20);
        assert_eq!(config.max_steps_per_frame, 100_000);
    }

    #[test]
    fn load_installs_banks() {
        let mut image = build_ines(2, 1, 0, 0, 0, None);
        image[HEADER_SIZE] = 0x11;
        image[HEADER_SIZE + PRG_BANK_SIZE] = 0x22;
        let mut nes = Nes::new();
        nes.load_rom(&image).expect("load");
        assert_eq!(nes.bus().peek(0x8000), 0x11);
        assert_eq!(nes.bus().peek(0xC000), 0x22);

        let mut image = build_ines(1, 1, 0x01, 0, 0, None);
        image[HEADER_SIZE] = 0x33;
        nes.load_rom(&image).expect("load");
        assert_eq!(nes.bus().peek(0x8000), 0x33);
        assert_eq!(nes.bus().peek(0xC000), 0x33);
        assert_eq!(nes.ppu().mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn bad_image_keeps_previous_cartridge() {
        let mut nes = nes_with(&[0xEA]);
        let mut image = build_ines(1, 1, 0, 0, 0, None);
        image[0] = b'X';
        assert_eq!(
            nes.load_rom(&image),
            Err(NesError::Cartridge(CartridgeError::InvalidMagic))
        );
        assert!(nes.is_loaded());
        assert_eq!(nes.bus().peek(0x8000), 0xEA);

        let unsupported = build_ines(1, 1, 0x40, 0, 0, None);
        assert_eq!(
            nes.load_rom(&unsupported),
            Err(NesError::Cartridge(CartridgeError::UnsupportedMapper(4)))
        );
    }

    #[test]
    fn stepping_without_cartridge_fails() {
        let mut nes = Nes::new();
        assert_eq!(nes.step(), Err(NesError::NoCartridge));
        assert_eq!(nes.run_frame(), Err(NesError::NoCartridge));
    }

    #[test]
    fn oam_dma_through_4014() {
        // LDA #$02; STA $4014; JMP self
        let mut nes = nes_with(&[0xA9, 0x02, 0x8D, 0x14, 0x40, 0x4C, 0x05, 0x80]);
        for i in 0..=0xFF {
            nes.bus_mut().poke(0x0200 + i as u16, i as u8 ^ 0x5A);
        }
        assert_eq!(nes.step(), Ok(2));
        assert_eq!(nes.step(), Ok(4));
        assert_eq!(nes.cpu().pending_interrupt(), Interrupt::Dma);

        let mut dma_cycles = 0;
        while nes.cpu().pending_interrupt() == Interrupt::Dma {
            dma_cycles += nes.step().expect("dma step");
        }
        assert_eq!(dma_cycles, 513);
        assert_eq!(nes.cpu().pending_interrupt(), Interrupt::None);
        for i in 0..=0xFF {
            assert_eq!(nes.bus().oam()[i], i as u8 ^ 0x5A);
        }
    }

    #[test]
    fn oamdata_reads_dma_result() {
        // LDA #$02; STA $4014; LDA $2004; JMP self
        let mut nes = nes_with(&[
            0xA9, 0x02, 0x8D, 0x14, 0x40, 0xAD, 0x04, 0x20, 0x4C, 0x08, 0x80,
        ]);
        nes.bus_mut().poke(0x0200, 0x77);
        nes.step().expect("lda");
        nes.step().expect("sta");
        while nes.cpu().pending_interrupt() == Interrupt::Dma {
            nes.step().expect("dma step");
        }
        assert_eq!(nes.bus().oam()[0], 0x77);
        nes.step().expect("lda $2004");
        assert_eq!(nes.cpu().a(), 0x77);
    }

    #[test]
    fn vblank_nmi_reaches_handler() {
        // LDA #$80; STA $2000; JMP self
        let mut nes = nes_with(&[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80]);
        nes.run_frame().expect("frame");
        assert!(nes.ppu().vblank());
        assert_eq!(nes.cpu().pending_interrupt(), Interrupt::Nmi);
        assert_eq!(nes.step(), Ok(7));
        assert_eq!(nes.cpu().pc(), NMI_HANDLER);
        assert_eq!(nes.frame_buffer().len(), FRAME_BUFFER_SIZE);
    }

    #[test]
    fn controller_is_polled_through_4016() {
        // Strobe, then two reads: LDA #1; STA $4016; LDA #0; STA $4016; LDA $4016; LDX $4016
        let mut nes = nes_with(&[
            0xA9, 0x01, 0x8D, 0x16, 0x40, 0xA9, 0x00, 0x8D, 0x16, 0x40, 0xAD, 0x16, 0x40, 0xAE,
            0x16, 0x40,
        ]);
        nes.controller_mut().press(Button::A);
        for _ in 0..6 {
            nes.step().expect("step");
        }
        assert_eq!(nes.cpu().a(), 1);
        assert_eq!(nes.cpu().x(), 0);
        assert!(nes.controller().is_polling());
    }

    #[test]
    fn mapper_mirroring_reaches_ppu() {
        // MMC1, program in the fixed upper bank: five serial writes of 0b00010 to $8000
        let mut image = build_ines(2, 1, 0x10, 0, 0, None);
        let program = [
            0xA9, 0x00, 0x8D, 0x00, 0x80, // bit 0
            0xA9, 0x01, 0x8D, 0x00, 0x80, // bit 1
            0xA9, 0x00, 0x8D, 0x00, 0x80, // bit 2
            0x8D, 0x00, 0x80, // bit 3
            0x8D, 0x00, 0x80, // bit 4
        ];
        let upper = HEADER_SIZE + PRG_BANK_SIZE;
        image[upper..upper + program.len()].copy_from_slice(&program);
        set_vectors_in_prg(&mut image[upper..upper + PRG_BANK_SIZE], 0xC000, 0xC000, 0xC000);

        let mut nes = Nes::new();
        nes.load_rom(&image).expect("load");
        assert_eq!(nes.cpu().pc(), 0xC000);
        assert_eq!(nes.ppu().mirroring(), Mirroring::Horizontal);
        for _ in 0..8 {
            nes.step().expect("step");
        }
        assert_eq!(nes.ppu().mirroring(), Mirroring::Vertical);
        // The program bytes survived the writes into program space
        assert_eq!(nes.bus().peek(0xC000), 0xA9);
    }

    #[test]
    fn run_frame_after_manual_steps_runs_a_whole_frame() {
        let mut nes = nes_with(&[0x4C, 0x00, 0x80]);
        let mut guard = 0;
        while !nes.ppu().frame_complete() {
            nes.step().expect("step");
            guard += 1;
            assert!(guard < 100_000);
        }
        let frame = nes.ppu().frame_count();
        let cycles = nes.run_frame().expect("frame");
        // 262 * 341 / 3 CPU cycles per frame
        assert!(cycles > 29_000, "run_frame returned after {cycles} cycles");
        assert_eq!(nes.ppu().frame_count(), frame + 1);
    }

    #[test]
    fn power_cycle_restores_power_on_banks() {
        let mut image = build_ines(2, 1, 0x10, 0, 0, None);
        // Switch $8000 to bank 1: five serial writes of 0b00001 to $E000
        let program = [
            0xA9, 0x01, 0x8D, 0x00, 0xE0, // bit 0
            0xA9, 0x00, 0x8D, 0x00, 0xE0, // bit 1
            0x8D, 0x00, 0xE0, // bit 2
            0x8D, 0x00, 0xE0, // bit 3
            0x8D, 0x00, 0xE0, // bit 4
        ];
        image[HEADER_SIZE] = 0x11;
        let upper = HEADER_SIZE + PRG_BANK_SIZE;
        image[upper..upper + program.len()].copy_from_slice(&program);
        set_vectors_in_prg(&mut image[upper..upper + PRG_BANK_SIZE], 0xC000, 0xC000, 0xC000);

        let mut nes = Nes::new();
        nes.load_rom(&image).expect("load");
        assert_eq!(nes.bus().peek(0x8000), 0x11);
        for _ in 0..7 {
            nes.step().expect("step");
        }
        assert_eq!(nes.bus().peek(0x8000), 0xA9);

        nes.bus_mut().poke(0x0010, 0x99);
        nes.power_cycle().expect("power cycle");
        assert_eq!(nes.bus().peek(0x8000), 0x11);
        assert_eq!(nes.bus().peek(0x0010), 0);
        assert_eq!(nes.cpu().pc(), 0xC000);

        nes.eject();
        assert_eq!(nes.power_cycle(), Err(NesError::NoCartridge));
    }

    #[test]
    fn reset_returns_to_vector() {
        let mut nes = nes_with(&[0xE8, 0xE8, 0xE8]);
        nes.step().expect("step");
        nes.step().expect("step");
        assert_eq!(nes.cpu().pc(), PRG_START + 2);
        nes.reset();
        assert_eq!(nes.step(), Ok(7));
        assert_eq!(nes.cpu().pc(), PRG_START);
    }

    #[test]
    fn eject_resets_everything() {
        let mut image = build_nrom_with_prg(&[0xE8, 0x4C, 0x00, 0x80], 1, 1, None);
        image[6] |= 0x01;
        let mut nes = Nes::new();
        nes.load_rom(&image).expect("load");
        assert_eq!(nes.ppu().mirroring(), Mirroring::Vertical);
        nes.run_frame().expect("frame");
        nes.eject();
        assert!(!nes.is_loaded());
        assert!(nes.bus().main().iter().all(|&b| b == 0));
        assert!(nes.bus().vram().iter().all(|&b| b == 0));
        assert_eq!(nes.ppu().frame_count(), 0);
        assert_eq!(nes.ppu().scanline(), 0);
        assert_eq!(nes.ppu().mirroring(), Mirroring::Horizontal);
        assert_eq!(nes.registers().x, 0);
        assert_eq!(nes.step(), Err(NesError::NoCartridge));
    }

    #[test]
    fn run_pass_spends_its_budget() {
        let mut nes = nes_with(&[0x4C, 0x00, 0x80]);
        let spent = nes.run_pass().expect("pass");
        let budget = nes.config().cycles_per_pass();
        assert!(spent >= budget && spent < budget + 3);
    }
}
