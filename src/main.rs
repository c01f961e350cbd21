use std::path::PathBuf;

use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use chip_8_core::emulator::config::{BorrowFlag, Config, ShiftSource};
use chip_8_core::emulator::{Emulator, StepOutcome};

/// Instructions executed per 60 Hz timer tick.
const STEPS_PER_TICK: usize = 10;

/// Run a CHIP-8 program without a screen or keyboard, then print the screen.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip-8-core")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Maximum number of instructions to execute
    #[structopt(long, default_value = "1000")]
    steps: usize,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Shift VY into VX instead of shifting VX in place
    #[structopt(long)]
    shift_vy: bool,

    /// Set VF when a subtraction does not borrow
    #[structopt(long)]
    no_borrow_flag: bool,

    /// Advance I past the registers stored or loaded
    #[structopt(long)]
    increment_index: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

impl Opt {
    fn config(&self) -> Config {
        Config {
            shift_source: if self.shift_vy { ShiftSource::Vy } else { ShiftSource::Vx },
            borrow_flag: if self.no_borrow_flag {
                BorrowFlag::SetOnNoBorrow
            } else {
                BorrowFlag::SetOnBorrow
            },
            increment_index: self.increment_index,
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Get configuration and read input file
    let opt = Opt::from_args();
    env_logger::Builder::new()
        .filter_level(opt.log_level())
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_default())
        .init();

    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    // Load instructions into emulator memory
    let rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut emulator = Emulator::with_rng_and_config(rng, opt.config());
    emulator.load_program(&program)?;

    // Start execution
    let mut executed = 0;
    while executed < opt.steps {
        match emulator.step()? {
            StepOutcome::Executed(_) => executed += 1,
            StepOutcome::AwaitingKey => {
                log::warn!("Program waits for a key, stopping at {:#06x}", emulator.program_counter());
                break;
            }
        }
        if executed % STEPS_PER_TICK == 0 {
            emulator.tick_timers();
        }
    }

    log::info!("Executed {} instructions", executed);
    print!("{}", emulator.framebuffer());

    Ok(())
}
