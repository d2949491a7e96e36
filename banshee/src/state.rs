use std::collections::HashMap;
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crossterm::event;
use crossterm::event::Event;
use crossterm::execute;
use crossterm::style::Print;
use ratatui::backend::Backend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::Frame;
use ratatui::Terminal;
use tracing::error;
use tracing::info;
use tracing::warn;
use wisp::Machine;
use wisp::VmError;

use crate::config::Config;
use crate::display_windows::render_log;
use crate::display_windows::render_program;
use crate::display_windows::render_registers;
use crate::display_windows::render_screen;
use crate::keys::Keystroke;
use crate::log::LogBuffer;
use crate::pad::HeldKey;
use crate::saves::SaveFile;

/// The side panels are refreshed at least this often even if the screen is unchanged.
const PANEL_REFRESH: Duration = Duration::from_millis(33);

/// Drives the machine and owns everything the TUI displays.
///
/// Each iteration of the loop polls input, steps the machine once, renders if the screen changed,
/// ticks both timers, and then sleeps for the configured interval. A `VmError` halts the machine
/// but not the TUI, so the final state can still be inspected (and saved) before quitting.
pub(crate) struct AppState {
    machine: Machine,
    name: String,
    config: Config,
    keymap: HashMap<char, u8>,
    held: HeldKey,
    log: LogBuffer,
    /// Raised by the sound timer's expiry hook.
    beep: Arc<AtomicBool>,
    paused: bool,
    halted: Option<VmError>,
}

impl AppState {
    pub fn new(
        machine: Machine,
        name: String,
        config: Config,
        log: LogBuffer,
        beep: Arc<AtomicBool>,
    ) -> Self {
        Self {
            machine,
            name,
            keymap: config.keys(),
            held: HeldKey::new(config.key_hold_frames),
            config,
            log,
            beep,
            paused: false,
            halted: None,
        }
    }

    pub fn run<B: Backend>(mut self, term: &mut Terminal<B>) -> io::Result<()> {
        let interval = self.config.interval();
        info!("Running {} with a step interval of {interval:?}", self.name);
        self.draw(term)?;
        let mut last_draw = Instant::now();
        loop {
            while event::poll(Duration::ZERO)? {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                match Keystroke::convert(key, &self.keymap) {
                    Some(Keystroke::Quit) => return Ok(()),
                    Some(stroke) => self.handle(stroke),
                    None => {}
                }
            }

            let redraw = self.advance();
            if self.beep.swap(false, Ordering::Relaxed) {
                execute!(io::stdout(), Print('\u{7}'))?;
            }
            if redraw || last_draw.elapsed() >= PANEL_REFRESH {
                self.draw(term)?;
                last_draw = Instant::now();
            }
            std::thread::sleep(interval);
        }
    }

    fn handle(&mut self, stroke: Keystroke) {
        match stroke {
            Keystroke::Quit => {}
            Keystroke::Save => self.save(),
            Keystroke::Pause => {
                self.paused = !self.paused;
                info!("{}", if self.paused { "Paused" } else { "Resumed" });
            }
            Keystroke::Pad(key) => self.held.press(key),
        }
    }

    /// Runs one iteration of the machine. Returns whether the screen needs to be redrawn.
    fn advance(&mut self) -> bool {
        if self.paused || self.halted.is_some() {
            return false;
        }
        let mut redraw = false;
        if let Err(err) = self.machine.step(&self.held) {
            error!("Halted at 0x{:0>4X}: {err}", self.machine.pointer());
            self.halted = Some(err);
            redraw = true;
        }
        redraw |= self.machine.take_redraw();
        self.machine.tick_timers();
        self.held.tick();
        redraw
    }

    fn save(&self) {
        let res = self
            .machine
            .export()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
            .and_then(|blob| SaveFile::new(self.name.clone(), blob).write_to(&self.config.save_dir));
        if let Err(err) = res {
            warn!("Could not save: {err}");
        }
    }

    fn status(&self) -> &'static str {
        match (&self.halted, self.paused) {
            (Some(_), _) => "(halted) ",
            (None, true) => "(paused) ",
            (None, false) => "",
        }
    }

    fn draw<B: Backend>(&self, term: &mut Terminal<B>) -> io::Result<()> {
        term.draw(|frame| self.render_frame(frame))?;
        Ok(())
    }

    fn render_frame(&self, frame: &mut Frame) {
        let sections = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(66), Constraint::Fill(1)])
            .split(frame.area());
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(18), Constraint::Fill(1)])
            .split(sections[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(14), Constraint::Fill(1)])
            .split(sections[1]);
        render_screen(self.machine.screen(), self.status(), frame, left[0]);
        render_log(&self.log, frame, left[1]);
        render_registers(&self.machine, frame, right[0]);
        render_program(&self.machine, frame, right[1]);
    }
}
