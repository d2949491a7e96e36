use std::error::Error;
use std::panic::PanicHookInfo;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;
use wisp::font::STANDARD_FONT;
use wisp::Machine;

pub mod config;
pub mod display_windows;
pub mod keys;
pub mod log;
pub mod pad;
pub mod saves;
pub mod state;

use config::Config;
use log::LogBuffer;
use saves::SaveFile;
use state::AppState;

#[derive(Debug, Parser)]
#[command(version, about = "A terminal frontend for the wisp virtual machine")]
struct Args {
    /// The program image to run.
    #[arg(required_unless_present = "snapshot")]
    program: Option<PathBuf>,
    /// An 80 byte font table to use instead of the standard one.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Emulation speed from 0 to 100. Overrides the config file.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    speed: Option<u8>,
    /// Resume from a save file instead of starting the program fresh.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// The config file to read.
    #[arg(long, default_value = "banshee.toml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (mut config, config_err) = match Config::read(&args.config) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Some(speed) = args.speed {
        config.speed = speed;
    }

    // Everything the machine logs goes into memory and is shown in the TUI
    let log = LogBuffer::default();
    tracing::subscriber::set_global_default(log.subscriber(config.level()))?;
    if let Some(err) = config_err {
        warn!("Ignoring unreadable config {:?}: {err}", args.config);
    }

    let beep = Arc::new(AtomicBool::new(false));
    let (name, mut machine) = load_machine(&args)?;
    let flag = Arc::clone(&beep);
    machine.set_sound_hook(move || flag.store(true, Ordering::Relaxed));
    let state = AppState::new(machine, name, config, log, beep);

    // Setup a clean base for the TUI
    std::panic::set_hook(Box::new(panic_hook));
    execute!(std::io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let res = state.run(&mut term);

    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    Ok(res?)
}

/// Builds the machine either from a save file or from a fresh program image. Returns the name
/// that future save files will be filed under.
fn load_machine(args: &Args) -> Result<(String, Machine), Box<dyn Error>> {
    if let Some(path) = &args.snapshot {
        let save = SaveFile::read_from(path)?;
        let machine = Machine::import(&save.blob)?;
        return Ok((save.name, machine));
    }
    let path = args
        .program
        .as_ref()
        .ok_or("either a program or a snapshot is required")?;
    let program = std::fs::read(path)?;
    let font = match &args.font {
        Some(path) => std::fs::read(path)?,
        None => STANDARD_FONT.to_vec(),
    };
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("program"));
    Ok((name, Machine::new(&program, &font)?))
}

/// A panic hook to properly restore the terminal in the case of a panic. Originally based on
/// [spotify-tui's implementation](https://github.com/Rigellute/spotify-tui/blob/master/src/main.rs).
fn panic_hook(panic_info: &PanicHookInfo<'_>) {
    let mut stdout = std::io::stdout();

    let msg = match panic_info.payload().downcast_ref::<&'static str>() {
        Some(s) => *s,
        None => match panic_info.payload().downcast_ref::<String>() {
            Some(s) => &s[..],
            None => "Box<Any>",
        },
    };

    let _ = disable_raw_mode();
    let _ = execute!(stdout, LeaveAlternateScreen);

    if let Some(location) = panic_info.location() {
        let _ = execute!(
            stdout,
            Print(format!("thread '<unnamed>' panicked at '{msg}', {location}")),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::try_parse_from(["banshee", "pong.ch8", "--speed", "40"]).unwrap();
        assert_eq!(args.program, Some(PathBuf::from("pong.ch8")));
        assert_eq!(args.speed, Some(40));
        assert_eq!(args.config, PathBuf::from("banshee.toml"));

        let args = Args::try_parse_from(["banshee", "--snapshot", "saves/pong#1"]).unwrap();
        assert!(args.program.is_none());

        assert!(Args::try_parse_from(["banshee"]).is_err());
        assert!(Args::try_parse_from(["banshee", "pong.ch8", "--speed", "101"]).is_err());
    }

    #[test]
    fn test_bad_font_is_rejected() {
        let dir = std::env::temp_dir().join(format!("banshee-font-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let program = dir.join("prog.ch8");
        let font = dir.join("font.bin");
        std::fs::write(&program, [0x00, 0xE0]).unwrap();
        std::fs::write(&font, [0xF0; 79]).unwrap();

        let args = Args::try_parse_from([
            OsStr::new("banshee"),
            program.as_os_str(),
            OsStr::new("--font"),
            font.as_os_str(),
        ])
        .unwrap();
        let err = load_machine(&args).unwrap_err();
        assert_eq!(
            err.downcast_ref::<wisp::VmError>(),
            Some(&wisp::VmError::InvalidFontTableLength { len: 79 })
        );

        let args = Args::try_parse_from([OsStr::new("banshee"), program.as_os_str()]).unwrap();
        let (name, machine) = load_machine(&args).unwrap();
        assert_eq!(name, "prog.ch8");
        assert_eq!(machine.fetch(), Ok(0x00E0));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
