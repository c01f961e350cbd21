//! The machine state: memory, registers, stack, timers and screen.
//! Only invariants are maintained here; the instruction semantics live in
//! [`Emulator`](super::Emulator).

use crate::emulator::error::{Error, Result};
use crate::emulator::framebuffer::Framebuffer;

pub const MEM_SIZE: usize = 4096;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const PROGRAM_START: u16 = 0x200;
pub const FONT_BASE: u16 = 0x050;
/// Register VF, the carry/borrow/collision flag.
pub const FLAG: usize = 0xF;

/// Each glyph is 5 rows of 4 pixels, stored in the high nibble.
pub const FONT: [u8; 80] = [
	0xF0,0x90,0x90,0x90,0xF0, // 0
	0x20,0x60,0x20,0x20,0x70, // 1
	0xF0,0x10,0xF0,0x80,0xF0, // 2
	0xF0,0x10,0xF0,0x10,0xF0, // 3
	0x90,0x90,0xF0,0x10,0x10, // 4
	0xF0,0x80,0xF0,0x10,0xF0, // 5
	0xF0,0x80,0xF0,0x90,0xF0, // 6
	0xF0,0x10,0x20,0x40,0x40, // 7
	0xF0,0x90,0xF0,0x90,0xF0, // 8
	0xF0,0x90,0xF0,0x10,0xF0, // 9
	0xF0,0x90,0xF0,0x90,0x90, // A
	0xE0,0x90,0xE0,0x90,0xE0, // B
	0xF0,0x80,0x80,0x80,0xF0, // C
	0xE0,0x90,0x90,0x90,0xE0, // D
	0xF0,0x80,0xF0,0x80,0xF0, // E
	0xF0,0x80,0xF0,0x80,0x80, // F
];

/// The call stack. `pointer` is the next free slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    entries: [u16; STACK_SIZE],
    pointer: usize,
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            entries: [0; STACK_SIZE],
            pointer: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        if self.pointer == STACK_SIZE {
            return Err(Error::StackOverflow);
        }
        self.entries[self.pointer] = address;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.pointer == 0 {
            return Err(Error::StackUnderflow);
        }
        self.pointer -= 1;
        Ok(self.entries[self.pointer])
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn is_empty(&self) -> bool {
        self.pointer == 0
    }

    /// Return addresses, oldest first.
    pub fn as_slice(&self) -> &[u16] {
        &self.entries[..self.pointer]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub memory: [u8; MEM_SIZE],
    pub registers: [u8; NUM_REGISTERS],
    pub stack: Stack,
    pub program_counter: u16,
    /// The I register.
    pub index_register: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub framebuffer: Framebuffer,
    /// The key currently held down, if any.
    pub key_latch: Option<u8>,
    pub font_base: u16,
}

impl State {

    /// Fresh state with the built-in font at `FONT_BASE`
    /// and the program counter at the program start.
    pub fn new() -> State {
        let mut state = State::blank();
        let base = FONT_BASE as usize;
        state.memory[base..base + FONT.len()].copy_from_slice(&FONT);
        state.font_base = FONT_BASE;
        state
    }

    /// Like `new`, but with all memory zeroed and no font installed.
    pub fn blank() -> State {
        State {
            memory: [0; MEM_SIZE],
            registers: [0; NUM_REGISTERS],
            stack: Stack::new(),
            program_counter: PROGRAM_START,
            index_register: 0,
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::new(),
            key_latch: None,
            font_base: 0,
        }
    }

    /// Check that `len` bytes starting at `address` lie inside memory.
    /// An empty range must still start at or below the end of memory.
    pub fn check_range(address: usize, len: usize) -> Result<()> {
        if address > MEM_SIZE || len > MEM_SIZE - address {
            return Err(Error::MemoryOutOfBounds {
                address: std::cmp::max(address, MEM_SIZE),
            });
        }
        Ok(())
    }

    /// Copy bytes into memory at `address`.
    /// Nothing is written unless every byte fits.
    pub fn load(&mut self, bytes: &[u8], address: u16) -> Result<()> {
        let start = address as usize;
        Self::check_range(start, bytes.len())?;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Copy the glyph table into memory and remember where it went.
    pub fn install_font(&mut self, glyphs: &[u8; 80], address: u16) -> Result<()> {
        self.load(glyphs, address)?;
        self.font_base = address;
        Ok(())
    }

    pub fn read(&self, address: usize, len: usize) -> Result<&[u8]> {
        Self::check_range(address, len)?;
        Ok(&self.memory[address..address + len])
    }

    pub fn read_u16(&self, address: usize) -> Result<u16> {
        let bytes = self.read(address, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn write(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
        Self::check_range(address, bytes.len())?;
        self.memory[address..address + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn key(&self) -> Option<u8> {
        self.key_latch
    }

    pub fn set_key(&mut self, key: Option<u8>) {
        self.key_latch = key;
    }

    /// Count both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
