//! The CHIP-8 emulator as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::emulator::config::{BorrowFlag, Config, ShiftSource};
use crate::emulator::error::{Error, Result};
use crate::emulator::framebuffer::Framebuffer;
use crate::emulator::instruction::*;
use crate::emulator::state::{State, FLAG, PROGRAM_START};

/// What a call to [`Emulator::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction ran to completion.
    Executed(Instruction),
    /// Nothing was fetched, the machine is waiting for a key press.
    AwaitingKey,
}

pub struct Emulator<R: RngCore = StdRng> {
    state: State,
    config: Config,
    rng: R,
    /// Register to receive the next key press, set by `FX0A`.
    awaiting_key: Option<u8>,
}

impl Emulator<StdRng> {

    /// Create a new emulator with random bytes seeded from the OS.
    pub fn new() -> Emulator<StdRng> {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create a new emulator whose random bytes are reproducible.
    pub fn with_seed(seed: u64) -> Emulator<StdRng> {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_config(config: Config) -> Emulator<StdRng> {
        Emulator::with_rng_and_config(StdRng::from_entropy(), config)
    }
}

impl Default for Emulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Emulator<R> {

    /// Create a new emulator drawing random bytes from `rng`.
    pub fn with_rng(rng: R) -> Emulator<R> {
        Emulator::with_rng_and_config(rng, Config::default())
    }

    pub fn with_rng_and_config(rng: R, config: Config) -> Emulator<R> {
        Emulator {
            state: State::new(),
            config,
            rng,
            awaiting_key: None,
        }
    }

    /// Copy bytes into memory at `address`.
    pub fn load(&mut self, bytes: &[u8], address: u16) -> Result<()> {
        self.state.load(bytes, address)?;
        log::debug!("Loaded {} bytes at {:#06x}", bytes.len(), address);
        Ok(())
    }

    /// Copy a program into memory at 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.load(program, PROGRAM_START)
    }

    /// Install a 16 glyph font, 5 bytes per glyph, at `address`.
    pub fn install_font(&mut self, glyphs: &[u8; 80], address: u16) -> Result<()> {
        self.state.install_font(glyphs, address)?;
        log::debug!("Installed font at {:#06x}", address);
        Ok(())
    }

    /// Fetch, decode and execute a single instruction.
    ///
    /// On error nothing is changed, and the program counter
    /// still points at the offending instruction.
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.awaiting_key.is_some() {
            return Ok(StepOutcome::AwaitingKey);
        }

        // Each opcode is two bytes
        let address = self.state.program_counter;
        let word = self.state.read_u16(address as usize)?;
        let instruction = Instruction::from_u16(word)
            .ok_or(Error::InvalidInstruction { word, address })?;

        log::trace!("{:#06x}: {:#06x} {}", address, word, instruction);

        self.state.program_counter = address + 2;
        if let Err(err) = self.execute_single(instruction) {
            self.state.program_counter = address;
            return Err(err);
        }

        Ok(StepOutcome::Executed(instruction))
    }

    /// Execute several instructions in order, stopping at the first error.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<()> {
        instructions
            .iter()
            .try_for_each(|&instruction| self.execute_single(instruction))
    }

    /// Execute a single instruction without fetching it.
    /// Every check happens before any state is changed.
    pub fn execute_single(&mut self, instruction: Instruction) -> Result<()> {
        match instruction {

            // Clear the screen
            Instruction::ClearScreen => {
                self.state.framebuffer.clear();
            }

            // Return to the previous call site via the stack.
            Instruction::Return => {
                self.state.program_counter = self.state.stack.pop()?;
            }

            // Go to a specific memory address
            Instruction::Goto(Addr(addr)) => {
                self.state.program_counter = addr;
            }

            // Store the current address on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => {
                self.state.stack.push(self.state.program_counter)?;
                self.state.program_counter = addr;
            }

            // If the register equals the constant, skip the next instruction
            Instruction::IfRegEqConst(x, Const(n)) => {
                self.skip_if(self.reg(x) == n);
            }

            Instruction::IfRegNeqConst(x, Const(n)) => {
                self.skip_if(self.reg(x) != n);
            }

            Instruction::IfRegEqReg(x, y) => {
                self.skip_if(self.reg(x) == self.reg(y));
            }

            Instruction::SetRegToConst(x, Const(n)) => {
                self.set_reg(x, n);
            }

            // Wraps around, VF is left alone
            Instruction::IncRegByConst(x, Const(n)) => {
                self.set_reg(x, self.reg(x).wrapping_add(n));
            }

            Instruction::SetRegToReg(x, y) => {
                self.set_reg(x, self.reg(y));
            }

            Instruction::BitwiseOr(x, y) => {
                self.set_reg(x, self.reg(x) | self.reg(y));
            }

            Instruction::BitwiseAnd(x, y) => {
                self.set_reg(x, self.reg(x) & self.reg(y));
            }

            Instruction::BitwiseXor(x, y) => {
                self.set_reg(x, self.reg(x) ^ self.reg(y));
            }

            // VF is set to 1 if there is a carry, 0 otherwise.
            Instruction::IncRegByReg(x, y) => {
                let (sum, carry) = self.reg(x).overflowing_add(self.reg(y));
                self.set_reg_with_flag(x, sum, carry);
            }

            Instruction::DecRegByReg(x, y) => {
                let (difference, borrow) = self.reg(x).overflowing_sub(self.reg(y));
                self.set_reg_with_flag(x, difference, self.borrow_flag(borrow));
            }

            // VF gets the bit shifted out
            Instruction::BitshiftRight(x, y) => {
                let source = self.shift_source(x, y);
                self.set_reg_with_flag(x, source >> 1, source & 0x01 != 0);
            }

            Instruction::SetVxVyMinusVx(x, y) => {
                let (difference, borrow) = self.reg(y).overflowing_sub(self.reg(x));
                self.set_reg_with_flag(x, difference, self.borrow_flag(borrow));
            }

            Instruction::BitshiftLeft(x, y) => {
                let source = self.shift_source(x, y);
                self.set_reg_with_flag(x, source << 1, source & 0x80 != 0);
            }

            Instruction::IfRegNeqReg(x, y) => {
                self.skip_if(self.reg(x) != self.reg(y));
            }

            Instruction::SetI(Addr(addr)) => {
                self.state.index_register = addr;
            }

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => {
                self.state.program_counter = addr + self.state.registers[0] as u16;
            }

            Instruction::SetVxRand(x, Const(n)) => {
                let byte: u8 = self.rng.gen();
                self.set_reg(x, byte & n);
            }

            // XOR an n byte sprite from I onto the screen at (VX, VY).
            // VF is set if any lit pixel was turned off.
            Instruction::Draw(x, y, Const(sprite_height)) => {
                let x_coord = self.reg(x) as usize;
                let y_coord = self.reg(y) as usize;

                // Copy the sprite out first, each row is 8 bits
                let height = sprite_height as usize & 0x0F;
                let mut sprite = [0u8; 0x10];
                sprite[..height].copy_from_slice(self.state.read(self.state.index_register as usize, height)?);

                let framebuffer = &mut self.state.framebuffer;
                let mut any_collisions = false;
                for (row_no, &row) in sprite[..height].iter().enumerate() {
                    any_collisions |= framebuffer.xor_row(x_coord, y_coord + row_no, row);
                }

                self.state.registers[FLAG] = any_collisions as u8;
            }

            // Skip if the key in Vx is pressed
            Instruction::IfKeyEqVx(x) => {
                self.skip_if(self.state.key() == Some(self.reg(x)));
            }

            // Skip if the key in Vx isn't pressed
            Instruction::IfKeyNeqVx(x) => {
                self.skip_if(self.state.key() != Some(self.reg(x)));
            }

            Instruction::SetRegToDelayTimer(x) => {
                self.set_reg(x, self.state.delay_timer);
            }

            // Suspend until the host reports a key press through `set_key`
            Instruction::SetRegToGetKey(Reg(x)) => {
                log::debug!("Waiting for key press into V{:X}", x & 0x0F);
                self.awaiting_key = Some(x & 0x0F);
            }

            Instruction::SetDelayTimerToReg(x) => {
                self.state.delay_timer = self.reg(x);
            }

            Instruction::SetSoundTimerToReg(x) => {
                self.state.sound_timer = self.reg(x);
            }

            Instruction::AddRegToI(x) => {
                self.state.index_register = self.state.index_register.wrapping_add(self.reg(x) as u16);
            }

            // Set i to character address. Each font element is 5 bytes wide.
            Instruction::SetIToSpriteAddrVx(x) => {
                self.state.index_register = self.state.font_base.wrapping_add(5 * self.reg(x) as u16);
            }

            // Hundreds, tens and ones at I, I + 1 and I + 2
            Instruction::SetIToBcdOfReg(x) => {
                let value = self.reg(x);
                let digits = [value / 100, value / 10 % 10, value % 10];
                self.state.write(self.state.index_register as usize, &digits)?;
            }

            // Dump register values up to Vx
            Instruction::RegDump(x) => {
                let count = Self::index(x) + 1;
                let registers = self.state.registers;
                self.state.write(self.state.index_register as usize, &registers[..count])?;
                self.advance_index(count);
            }

            // Load register values up to Vx
            Instruction::RegLoad(x) => {
                let count = Self::index(x) + 1;
                let mut values = [0u8; 0x10];
                values[..count].copy_from_slice(self.state.read(self.state.index_register as usize, count)?);
                self.state.registers[..count].copy_from_slice(&values[..count]);
                self.advance_index(count);
            }
        };

        Ok(())
    }

    /// Count both timers down by one, stopping at zero.
    /// Meant to be called at 60 Hz, independently of `step`.
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Latch the currently pressed key, or release it with `None`.
    /// A press completes a pending `FX0A`.
    pub fn set_key(&mut self, key: Option<u8>) {
        if let Some(k) = key {
            if k > 0xF {
                log::warn!("Ignoring key {:#04x}, keys are 0x0 to 0xF", k);
                return;
            }
        }

        self.state.set_key(key);

        if let (Some(k), Some(x)) = (key, self.awaiting_key) {
            log::debug!("Got key {:X} into V{:X}", k, x);
            self.state.registers[x as usize] = k;
            self.awaiting_key = None;
        }
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.state.framebuffer()
    }

    /// A tone should sound while this is nonzero.
    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn program_counter(&self) -> u16 {
        self.state.program_counter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn index(Reg(x): Reg) -> usize {
        (x & 0x0F) as usize
    }

    fn reg(&self, x: Reg) -> u8 {
        self.state.registers[Self::index(x)]
    }

    fn set_reg(&mut self, x: Reg, value: u8) {
        self.state.registers[Self::index(x)] = value;
    }

    /// The flag is written first, so when X is F the result wins.
    /// Callers compute both from the operands before either write.
    fn set_reg_with_flag(&mut self, x: Reg, value: u8, flag: bool) {
        self.state.registers[FLAG] = flag as u8;
        self.set_reg(x, value);
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.state.program_counter = self.state.program_counter.wrapping_add(2);
        }
    }

    fn borrow_flag(&self, borrow: bool) -> bool {
        match self.config.borrow_flag {
            BorrowFlag::SetOnBorrow => borrow,
            BorrowFlag::SetOnNoBorrow => !borrow,
        }
    }

    fn shift_source(&self, x: Reg, y: Reg) -> u8 {
        match self.config.shift_source {
            ShiftSource::Vx => self.reg(x),
            ShiftSource::Vy => self.reg(y),
        }
    }

    fn advance_index(&mut self, count: usize) {
        if self.config.increment_index {
            self.state.index_register = self.state.index_register.wrapping_add(count as u16);
        }
    }
}
