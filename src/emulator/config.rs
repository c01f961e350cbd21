//! Behavioural variants found among CHIP-8 interpreters.

/// Which register the shift instructions `8XY6` and `8XYE` read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSource {
    /// Shift VX in place.
    Vx,
    /// Store VY shifted into VX, as the COSMAC VIP did.
    Vy,
}

/// What VF holds after the subtractions `8XY5` and `8XY7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowFlag {
    /// VF = 1 when the subtraction borrows.
    SetOnBorrow,
    /// VF = 1 when it does not, as the COSMAC VIP did.
    SetOnNoBorrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub shift_source: ShiftSource,
    pub borrow_flag: BorrowFlag,
    /// Leave I past the last register touched by `FX55` and `FX65`.
    pub increment_index: bool,
}

impl Config {
    /// The quirks of the original COSMAC VIP interpreter.
    pub fn cosmac() -> Config {
        Config {
            shift_source: ShiftSource::Vy,
            borrow_flag: BorrowFlag::SetOnNoBorrow,
            increment_index: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shift_source: ShiftSource::Vx,
            borrow_flag: BorrowFlag::SetOnBorrow,
            increment_index: false,
        }
    }
}
