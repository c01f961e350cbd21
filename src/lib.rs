/*!

The instruction-execution core of a CHIP-8 virtual machine,
as specified at https://en.wikipedia.org/wiki/CHIP-8.

The crate owns the machine state and the fetch-decode-execute cycle.
Rendering, input polling, sound and the 60 Hz timer clock are left to the host,
which talks to the core through a handful of methods on `Emulator`.

# Headless runner

To try the core on a program, run `cargo run --release -- <program>`.
The final screen is printed once the program stops or the step limit is reached.

# Library

The main way of running a program is to load instructions as bytes.

```rust
use chip_8_core::emulator::{Emulator, StepOutcome};
use chip_8_core::emulator::instruction::Instruction;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
emulator.load_program(&clear_display).unwrap();
assert_eq!(emulator.step(), Ok(StepOutcome::Executed(Instruction::ClearScreen)));
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip_8_core::emulator::Emulator;
use chip_8_core::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::with_seed(42);

// Execute instructions manually
emulator.execute_single(Instruction::ClearScreen).unwrap();

// Or many sequentially
emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
]).unwrap();

assert_eq!(emulator.program_counter(), 0x250);
assert_eq!(emulator.state().registers[0xB], 35);
```

## Driving the machine

The host calls `step` as fast as it likes, `tick_timers` at 60 Hz, and feeds
input through `set_key`. An `FX0A` instruction does not block: `step` reports
`StepOutcome::AwaitingKey` until a key arrives.

```rust
use chip_8_core::emulator::{Emulator, StepOutcome};

let mut emulator = Emulator::new();
emulator.load_program(&[0xF3, 0x0A]).unwrap(); // Wait for a key into V3

emulator.step().unwrap();
assert_eq!(emulator.step(), Ok(StepOutcome::AwaitingKey));

emulator.tick_timers();
emulator.set_key(Some(0x9));
assert_eq!(emulator.state().registers[3], 0x9);
assert!(!emulator.is_awaiting_key());
```

Failures are returned, never absorbed.

```rust
use chip_8_core::emulator::{Emulator, Error};

let mut emulator = Emulator::new();
emulator.load_program(&[0x00, 0xEE]).unwrap(); // Return with nothing to return to
assert_eq!(emulator.step(), Err(Error::StackUnderflow));
```
*/

pub mod emulator;
pub mod util;
