use wisp::font::STANDARD_FONT;
use wisp::registers::Reg;
use wisp::Instruction;
use wisp::Machine;
use wisp::VmError;

const NO_KEY: Option<u8> = None;

/// Assembles a list of instruction words into a program image.
macro_rules! program {
    ($($word:expr),* $(,)?) => {{
        let mut bytes: Vec<u8> = Vec::new();
        $(bytes.extend_from_slice(&u16::to_be_bytes($word));)*
        bytes
    }};
}

fn run(machine: &mut Machine, steps: usize) {
    for _ in 0..steps {
        machine.step(&NO_KEY).unwrap();
        machine.tick_timers();
    }
}

#[test_log::test]
fn counting_loop() {
    let program = program![
        0x6005, // LD V0, 5
        0x6100, // LD V1, 0
        0x7101, // ADD V1, 1
        0x70FF, // ADD V0, 0xFF
        0x3000, // SE V0, 0
        0x1204, // JP 0x204
        0x120C, // JP 0x20C
    ];
    let mut machine = Machine::new(&program, &STANDARD_FONT).unwrap();
    run(&mut machine, 40);
    assert_eq!(machine.pointer(), 0x20C);
    assert_eq!(machine.registers().v(Reg(0)), 0);
    assert_eq!(machine.registers().v(Reg(1)), 5);
    assert_eq!(machine.registers().flag(), 0);
}

#[test]
fn subroutine_draws_a_digit() {
    let program = program![
        0x6C7B, // LD VC, 123
        0xA300, // LD I, 0x300
        0xFC33, // LD B, VC
        0xF265, // LD V2, [I]
        0x2210, // CALL 0x210
        0x120A, // JP 0x20A
        0x0000,
        0x0000,
        0xF129, // LD F, V1
        0x6300, // LD V3, 0
        0xD335, // DRW V3, V3, 5
        0x00EE, // RET
    ];
    let mut machine = Machine::new(&program, &STANDARD_FONT).unwrap();
    run(&mut machine, 10);
    assert_eq!(machine.pointer(), 0x20A);
    assert!(machine.stack().is_empty());
    assert_eq!(&machine.memory().as_slice()[0x300..0x303], &[1u8, 2, 3]);
    assert_eq!(machine.registers().v(Reg(2)), 3);
    assert_eq!(machine.registers().i(), 10);
    assert_eq!(machine.registers().flag(), 0);
    assert!(machine.take_redraw());

    let glyph: Vec<u64> = machine.screen().rows()[..5]
        .iter()
        .map(|row| row >> 60)
        .collect();
    assert_eq!(glyph, vec![0b1111, 0b0001, 0b1111, 0b1000, 0b1111]);
    assert_eq!(machine.screen().lit_pixels().count(), 14);
}

#[test]
fn runaway_recursion_overflows_the_stack() {
    let program = program![0x2200]; // CALL 0x200
    let mut machine = Machine::new(&program, &STANDARD_FONT).unwrap();
    for depth in 1..=16 {
        assert_eq!(machine.step(&NO_KEY), Ok(Instruction::Call(0x200)));
        assert_eq!(machine.stack().depth(), depth);
    }
    assert_eq!(machine.step(&NO_KEY), Err(VmError::StackOverflow));
}

#[test]
fn unknown_opcode_is_fatal() {
    let mut machine = Machine::new(&program![0x6001, 0xFFFF], &STANDARD_FONT).unwrap();
    machine.step(&NO_KEY).unwrap();
    assert_eq!(
        machine.step(&NO_KEY),
        Err(VmError::UnknownOpcode { opcode: 0xFFFF })
    );
    assert_eq!(machine.pointer(), 0x202);
    assert_eq!(
        machine.peek(),
        Err(VmError::UnknownOpcode { opcode: 0xFFFF })
    );
}

#[test]
fn keypad_driven_program() {
    let program = program![
        0xF50A, // LD V5, K
        0xE59E, // SKP V5
        0x6801, // LD V8, 1
        0xE5A1, // SKNP V5
        0x6902, // LD V9, 2
        0x120A, // JP 0x20A
    ];
    let mut machine = Machine::new(&program, &STANDARD_FONT).unwrap();
    (0..3).for_each(|_| {
        machine.step(&NO_KEY).unwrap();
    });
    assert_eq!(machine.pointer(), 0x200);

    let key = Some(0x7);
    (0..4).for_each(|_| {
        machine.step(&key).unwrap();
    });
    assert_eq!(machine.registers().v(Reg(5)), 0x7);
    assert_eq!(machine.registers().v(Reg(8)), 0);
    assert_eq!(machine.registers().v(Reg(9)), 2);
    assert_eq!(machine.pointer(), 0x20A);
}

#[test]
fn delay_timer_loop() {
    let program = program![
        0x6003, // LD V0, 3
        0xF015, // LD DT, V0
        0xF107, // LD V1, DT
        0x3100, // SE V1, 0
        0x1204, // JP 0x204
        0x120A, // JP 0x20A
    ];
    let mut machine = Machine::new(&program, &STANDARD_FONT).unwrap();
    run(&mut machine, 20);
    assert_eq!(machine.pointer(), 0x20A);
    assert_eq!(machine.delay_timer().ticks(), 0);
}
