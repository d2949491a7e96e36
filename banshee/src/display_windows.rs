use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use wisp::screen::Screen;
use wisp::screen::SCREEN_HEIGHT;
use wisp::screen::SCREEN_WIDTH;
use wisp::Instruction;
use wisp::Machine;

use crate::log::LogBuffer;

fn titled(title: &str) -> Block<'_> {
    Block::bordered()
        .title(title)
        .title_alignment(Alignment::Center)
}

/// Renders the screen two pixel rows per line of text using half blocks.
pub fn render_screen(screen: &Screen, status: &str, frame: &mut Frame, area: Rect) {
    let title = format!(" Screen {status}");
    let para = Paragraph::new(Text::from_iter(screen_lines(screen))).block(titled(&title));
    frame.render_widget(para, area);
}

pub fn screen_lines(screen: &Screen) -> Vec<String> {
    (0..SCREEN_HEIGHT as i32)
        .step_by(2)
        .map(|y| {
            (0..SCREEN_WIDTH as i32)
                .map(|x| match (screen.get_pixel(x, y), screen.get_pixel(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect()
        })
        .collect()
}

pub fn render_registers(machine: &Machine, frame: &mut Frame, area: Rect) {
    let para = Paragraph::new(Text::from_iter(register_lines(machine))).block(titled(" Registers "));
    frame.render_widget(para, area);
}

pub fn register_lines(machine: &Machine) -> Vec<String> {
    let regs = machine.registers();
    let v: Vec<u8> = regs.general().collect();
    let mut lines: Vec<String> = (0..8)
        .map(|n| {
            format!(
                "V{n:X}: 0x{:0>2X}   V{:X}: 0x{:0>2X}",
                v[n],
                n + 8,
                v[n + 8]
            )
        })
        .collect();
    lines.push(format!("I : 0x{:0>4X}", regs.i()));
    lines.push(format!("PC: 0x{:0>4X}", machine.pointer()));
    lines.push(format!(
        "DT: {:>3}     ST: {:>3}",
        machine.delay_timer().ticks(),
        machine.sound_timer().ticks()
    ));
    lines.push(format!("SP: {}", machine.stack().depth()));
    lines
}

pub fn render_program(machine: &Machine, frame: &mut Frame, area: Rect) {
    let block = titled(" Program ");
    let len = block.inner(area).height as usize;
    let para = Paragraph::new(Text::from_iter(upcoming(machine, len))).block(block);
    frame.render_widget(para, area);
}

/// Disassembles up to `count` words starting at the pointer. Data that happens to sit after the
/// current instruction is shown as raw words.
pub fn upcoming(machine: &Machine, count: usize) -> Vec<String> {
    let mem = machine.memory();
    let start = machine.pointer() as usize;
    (start..)
        .step_by(2)
        .take(count)
        .map_while(|addr| {
            let word = u16::from_be_bytes([mem.load(addr).ok()?, mem.load(addr + 1).ok()?]);
            let ptr = if addr == start { ">" } else { " " };
            Some(match Instruction::decode(word) {
                Ok(op) => format!("{ptr} 0x{addr:0>4X} -> {op}"),
                Err(_) => format!("{ptr} 0x{addr:0>4X} -> 0x{word:0>4X}"),
            })
        })
        .collect()
}

pub fn render_log(log: &LogBuffer, frame: &mut Frame, area: Rect) {
    let block = titled(" Log ");
    let len = block.inner(area).height as usize;
    let para = Paragraph::new(Text::from_iter(log.tail(len))).block(block);
    frame.render_widget(para, area);
}
