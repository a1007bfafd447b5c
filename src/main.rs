//! Headless demo: load a cartridge, run some frames, dump the registers.
//!
//! With the `screenshot` feature the last frame is written to `frame.png`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;
use nescore::Nes;

#[derive(Parser)]
#[command(name = "nescore")]
#[command(about = "Run a NES cartridge headless and dump the CPU registers")]
struct Args {
    /// Path to the iNES (.nes) file
    rom: PathBuf,

    /// Frames to emulate before dumping
    #[arg(default_value_t = 60)]
    frames: u32,
}

fn run(path: &Path, frames: u32) -> Result<Nes, Box<dyn std::error::Error>> {
    let image = std::fs::read(path)?;
    let mut nes = Nes::new();
    nes.load_rom(&image)?;
    for _ in 0..frames {
        nes.run_frame()?;
    }
    Ok(nes)
}

#[cfg(feature = "screenshot")]
fn save_frame(nes: &Nes) -> Result<(), image::ImageError> {
    use nescore::ppu::{NES_HEIGHT, NES_WIDTH};

    image::save_buffer(
        "frame.png",
        nes.frame_buffer(),
        NES_WIDTH as u32,
        NES_HEIGHT as u32,
        image::ExtendedColorType::Rgba8,
    )?;
    info!("frame written to frame.png");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let nes = match run(&args.rom, args.frames) {
        Ok(nes) => nes,
        Err(err) => {
            eprintln!("{}: {err}", args.rom.display());
            return ExitCode::FAILURE;
        }
    };
    info!("{} frames done: {}", args.frames, nes.registers());

    #[cfg(feature = "screenshot")]
    if let Err(err) = save_frame(&nes) {
        eprintln!("could not write frame.png: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_default_to_sixty() {
        let args = Args::try_parse_from(["nescore", "game.nes"]).expect("args");
        assert_eq!(args.rom, PathBuf::from("game.nes"));
        assert_eq!(args.frames, 60);

        let args = Args::try_parse_from(["nescore", "game.nes", "5"]).expect("args");
        assert_eq!(args.frames, 5);
        assert!(Args::try_parse_from(["nescore"]).is_err());
        assert!(Args::try_parse_from(["nescore", "game.nes", "many"]).is_err());
    }
}
