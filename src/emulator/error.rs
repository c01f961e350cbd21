use thiserror::Error;

/// Failures reported by the emulator.
///
/// These are violations of the programming model by the emulated program,
/// so retrying is never meaningful. The host decides whether to halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A call was made with all 16 stack slots in use.
    #[error("stack overflow")]
    StackOverflow,

    /// A return was made with an empty stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// A fetch or data access reached past the end of memory.
    #[error("memory access out of bounds at {address:#06x}")]
    MemoryOutOfBounds { address: usize },

    /// No handler exists for the instruction word.
    #[error("invalid instruction {word:#06x} at {address:#06x}")]
    InvalidInstruction { word: u16, address: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
