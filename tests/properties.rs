//! Instruction-level checks run through the public API only.

use chip_8_core::emulator::instruction::{Addr, Const, Instruction, Reg};
use chip_8_core::emulator::state::FLAG;
use chip_8_core::emulator::{Emulator, Error, StepOutcome};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn emulator_with(v0: u8, v1: u8) -> Emulator {
    let mut emulator = Emulator::with_seed(7);
    emulator.state_mut().registers[0] = v0;
    emulator.state_mut().registers[1] = v1;
    emulator
}

/// Run `word` on V0 and V1, returning (V0, VF).
fn alu(word: u16, v0: u8, v1: u8) -> (u8, u8) {
    let mut emulator = emulator_with(v0, v1);
    emulator.load_program(&word.to_be_bytes()).unwrap();
    emulator.step().unwrap();
    let registers = emulator.state().registers;
    (registers[0], registers[FLAG])
}

#[test]
fn alu_flags_use_operands_from_before_the_write() {
    let mut emulator = Emulator::with_seed(7);
    let mut run = |word: u16, a: u8, b: u8| {
        let state = emulator.state_mut();
        state.registers[0] = a;
        state.registers[1] = b;
        emulator.execute_single(Instruction::from_u16(word).unwrap()).unwrap();
        let registers = emulator.state().registers;
        (registers[0], registers[FLAG])
    };

    for a in 0..=255u8 {
        for b in 0..=255u8 {
            let carry = (a as u16 + b as u16 > 0xFF) as u8;
            assert_eq!(run(0x8014, a, b), (a.wrapping_add(b), carry));
            assert_eq!(run(0x8015, a, b), (a.wrapping_sub(b), (b > a) as u8));
            assert_eq!(run(0x8017, a, b), (b.wrapping_sub(a), (a > b) as u8));
        }
    }
}

#[test]
fn add_const_wraps_and_keeps_flag() {
    let mut emulator = emulator_with(0xFF, 0);
    emulator.state_mut().registers[FLAG] = 0x5A;
    emulator.load_program(&[0x70, 0x02]).unwrap();
    emulator.step().unwrap();
    assert_eq!(emulator.state().registers[0], 0x01);
    assert_eq!(emulator.state().registers[FLAG], 0x5A);
}

#[test]
fn call_then_return_resumes_after_call() {
    let mut emulator = Emulator::with_seed(7);
    emulator.load_program(&[0x23, 0x00]).unwrap();
    emulator.load(&[0x00, 0xEE], 0x300).unwrap();
    emulator.step().unwrap();
    assert_eq!(emulator.program_counter(), 0x300);
    emulator.step().unwrap();
    assert_eq!(emulator.program_counter(), 0x202);
}

#[test]
fn sprite_drawn_twice_cancels_out() {
    let mut emulator = Emulator::with_seed(7);
    emulator.load(&[0xFF], 0x400).unwrap();
    emulator.execute_many(&[
        Instruction::SetI(Addr(0x400)),
        Instruction::SetRegToConst(Reg(0), Const(20)),
        Instruction::SetRegToConst(Reg(1), Const(12)),
        Instruction::Draw(Reg(0), Reg(1), Const(1)),
    ]).unwrap();
    assert_eq!(emulator.state().registers[FLAG], 0);
    assert_eq!(emulator.framebuffer().lit_pixels(), 8);

    emulator.execute_single(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
    assert_eq!(emulator.state().registers[FLAG], 1);
    assert_eq!(emulator.framebuffer().lit_pixels(), 0);
}

#[test]
fn bcd_of_156() {
    let mut emulator = emulator_with(156, 0);
    emulator.execute_many(&[
        Instruction::SetI(Addr(0x500)),
        Instruction::SetIToBcdOfReg(Reg(0)),
    ]).unwrap();
    assert_eq!(&emulator.state().memory[0x500..0x503], &[1, 5, 6]);
}

#[test]
fn sixteen_pushes_fit_and_the_seventeenth_overflows() {
    let mut emulator = Emulator::with_seed(7);
    for _ in 0..16 {
        emulator.execute_single(Instruction::Call(Addr(0x200))).unwrap();
    }
    assert_eq!(
        emulator.execute_single(Instruction::Call(Addr(0x200))),
        Err(Error::StackOverflow)
    );
    assert_eq!(emulator.state().stack.pointer(), 16);
}

#[test]
fn invalid_word_names_word_and_fetch_address() {
    let mut emulator = Emulator::with_seed(7);
    emulator.load_program(&[0x12, 0x10]).unwrap();
    emulator.load(&[0x80, 0x09], 0x210).unwrap();
    assert_eq!(emulator.step(), Ok(StepOutcome::Executed(Instruction::Goto(Addr(0x210)))));
    assert_eq!(
        emulator.step(),
        Err(Error::InvalidInstruction { word: 0x8009, address: 0x210 })
    );
}

#[test]
fn zero_row_draw_with_index_past_memory_is_reported() {
    let mut emulator = Emulator::with_seed(7);
    emulator.load_program(&[0xAF, 0xFF, 0x60, 0xFF, 0xF0, 0x1E, 0xD0, 0x00]).unwrap();
    for _ in 0..3 {
        emulator.step().unwrap();
    }
    assert_eq!(emulator.step(), Err(Error::MemoryOutOfBounds { address: 0x10FE }));
    assert_eq!(emulator.program_counter(), 0x206);
}

#[test]
fn empty_load_past_end_of_memory_is_reported() {
    let mut emulator = Emulator::with_seed(7);
    assert_eq!(emulator.load(&[], 0x2000), Err(Error::MemoryOutOfBounds { address: 0x2000 }));
}

#[test]
fn timers_tick_down_to_zero() {
    let mut emulator = emulator_with(2, 0);
    emulator.execute_many(&[
        Instruction::SetDelayTimerToReg(Reg(0)),
        Instruction::SetSoundTimerToReg(Reg(0)),
    ]).unwrap();
    for _ in 0..5 {
        emulator.tick_timers();
    }
    assert_eq!((emulator.delay_timer(), emulator.sound_timer()), (0, 0));
}

proptest! {
    #[test]
    fn skips_move_two_instructions_only_when_taken(v0 in any::<u8>(), v1 in any::<u8>(), nn in any::<u8>()) {
        let cases = [
            (0x3000 | nn as u16, v0 == nn),
            (0x4000 | nn as u16, v0 != nn),
            (0x5010, v0 == v1),
            (0x9010, v0 != v1),
        ];
        for &(word, taken) in cases.iter() {
            let mut emulator = emulator_with(v0, v1);
            emulator.load_program(&word.to_be_bytes()).unwrap();
            emulator.step().unwrap();
            let expected = if taken { 0x204 } else { 0x202 };
            prop_assert_eq!(emulator.program_counter(), expected);
        }
    }

    #[test]
    fn shifts_keep_eight_bits(v0 in any::<u8>()) {
        prop_assert_eq!(alu(0x8016, v0, 0), (v0 >> 1, v0 & 1));
        prop_assert_eq!(alu(0x801E, v0, 0), (v0 << 1, v0 >> 7));
    }

    #[test]
    fn store_then_load_restores_registers(values in any::<[u8; 16]>(), x in 0u8..16) {
        let mut emulator = Emulator::with_seed(7);
        emulator.state_mut().registers = values;
        emulator.execute_many(&[
            Instruction::SetI(Addr(0x600)),
            Instruction::RegDump(Reg(x)),
        ]).unwrap();

        emulator.state_mut().registers = [0; 16];
        emulator.execute_single(Instruction::RegLoad(Reg(x))).unwrap();

        let count = x as usize + 1;
        prop_assert_eq!(&emulator.state().registers[..count], &values[..count]);
        prop_assert!(emulator.state().registers[count..].iter().all(|&r| r == 0));
    }
}
