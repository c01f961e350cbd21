use std::fmt;

use crate::util::bit_splitter::BitSplitter;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg, Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg, Reg), // 8XYE
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    SetPcToV0PlusAddr(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    IfKeyEqVx(Reg), // EX9E
    IfKeyNeqVx(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    SetRegToGetKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg) // FX65
}

impl Instruction {

    /// Decode an instruction word, or `None` if no instruction matches.
    pub fn from_u16(value: u16) -> Option<Instruction> {
        Self::decode(BitSplitter::from_u16(value))
    }

    fn decode(opcode: BitSplitter) -> Option<Instruction> {
        let instruction = match opcode.as_four_u8() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Goto(Addr(opcode.nnn())),
            (2, _, _, _) => Instruction::Call(Addr(opcode.nnn())),
            (3, x, _, _) => Instruction::IfRegEqConst(Reg(x), Const(opcode.nn())),
            (4, x, _, _) => Instruction::IfRegNeqConst(Reg(x), Const(opcode.nn())),
            (5, x, y, 0) => Instruction::IfRegEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::SetRegToConst(Reg(x), Const(opcode.nn())),
            (7, x, _, _) => Instruction::IncRegByConst(Reg(x), Const(opcode.nn())),
            (8, x, y, 0) => Instruction::SetRegToReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::BitwiseOr(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::BitwiseAnd(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::BitwiseXor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::IncRegByReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::DecRegByReg(Reg(x), Reg(y)),
            (8, x, y, 6) => Instruction::BitshiftRight(Reg(x), Reg(y)),
            (8, x, y, 7) => Instruction::SetVxVyMinusVx(Reg(x), Reg(y)),
            (8, x, y, 0xE) => Instruction::BitshiftLeft(Reg(x), Reg(y)),
            (9, x, y, 0) => Instruction::IfRegNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetI(Addr(opcode.nnn())),
            (0xB, _, _, _) => Instruction::SetPcToV0PlusAddr(Addr(opcode.nnn())),
            (0xC, x, _, _) => Instruction::SetVxRand(Reg(x), Const(opcode.nn())),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::IfKeyEqVx(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::IfKeyNeqVx(Reg(x)),
            (0xF, x, 0, 7) => Instruction::SetRegToDelayTimer(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::SetRegToGetKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelayTimerToReg(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSoundTimerToReg(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddRegToI(Reg(x)),
            (0xF, x, 2, 9) => Instruction::SetIToSpriteAddrVx(Reg(x)),
            (0xF, x, 3, 3) => Instruction::SetIToBcdOfReg(Reg(x)),
            (0xF, x, 5, 5) => Instruction::RegDump(Reg(x)),
            (0xF, x, 6, 5) => Instruction::RegLoad(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Goto(Addr(a)) => write!(f, "JP {:#05x}", a),
            Call(Addr(a)) => write!(f, "CALL {:#05x}", a),
            IfRegEqConst(Reg(x), Const(n)) => write!(f, "SE V{:X}, {:#04x}", x, n),
            IfRegNeqConst(Reg(x), Const(n)) => write!(f, "SNE V{:X}, {:#04x}", x, n),
            IfRegEqReg(Reg(x), Reg(y)) => write!(f, "SE V{:X}, V{:X}", x, y),
            SetRegToConst(Reg(x), Const(n)) => write!(f, "LD V{:X}, {:#04x}", x, n),
            IncRegByConst(Reg(x), Const(n)) => write!(f, "ADD V{:X}, {:#04x}", x, n),
            SetRegToReg(Reg(x), Reg(y)) => write!(f, "LD V{:X}, V{:X}", x, y),
            BitwiseOr(Reg(x), Reg(y)) => write!(f, "OR V{:X}, V{:X}", x, y),
            BitwiseAnd(Reg(x), Reg(y)) => write!(f, "AND V{:X}, V{:X}", x, y),
            BitwiseXor(Reg(x), Reg(y)) => write!(f, "XOR V{:X}, V{:X}", x, y),
            IncRegByReg(Reg(x), Reg(y)) => write!(f, "ADD V{:X}, V{:X}", x, y),
            DecRegByReg(Reg(x), Reg(y)) => write!(f, "SUB V{:X}, V{:X}", x, y),
            BitshiftRight(Reg(x), Reg(y)) => write!(f, "SHR V{:X}, V{:X}", x, y),
            SetVxVyMinusVx(Reg(x), Reg(y)) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            BitshiftLeft(Reg(x), Reg(y)) => write!(f, "SHL V{:X}, V{:X}", x, y),
            IfRegNeqReg(Reg(x), Reg(y)) => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetI(Addr(a)) => write!(f, "LD I, {:#05x}", a),
            SetPcToV0PlusAddr(Addr(a)) => write!(f, "JP V0, {:#05x}", a),
            SetVxRand(Reg(x), Const(n)) => write!(f, "RND V{:X}, {:#04x}", x, n),
            Draw(Reg(x), Reg(y), Const(n)) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            IfKeyEqVx(Reg(x)) => write!(f, "SKP V{:X}", x),
            IfKeyNeqVx(Reg(x)) => write!(f, "SKNP V{:X}", x),
            SetRegToDelayTimer(Reg(x)) => write!(f, "LD V{:X}, DT", x),
            SetRegToGetKey(Reg(x)) => write!(f, "LD V{:X}, K", x),
            SetDelayTimerToReg(Reg(x)) => write!(f, "LD DT, V{:X}", x),
            SetSoundTimerToReg(Reg(x)) => write!(f, "LD ST, V{:X}", x),
            AddRegToI(Reg(x)) => write!(f, "ADD I, V{:X}", x),
            SetIToSpriteAddrVx(Reg(x)) => write!(f, "LD F, V{:X}", x),
            SetIToBcdOfReg(Reg(x)) => write!(f, "LD B, V{:X}", x),
            RegDump(Reg(x)) => write!(f, "LD [I], V{:X}", x),
            RegLoad(Reg(x)) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
