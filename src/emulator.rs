//! The virtual machine: state, instruction decoding and execution.

pub mod config;
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod instruction;
pub mod state;

pub use self::config::Config;
pub use self::emulator::{Emulator, StepOutcome};
pub use self::error::Error;
pub use self::framebuffer::Framebuffer;
pub use self::state::State;
