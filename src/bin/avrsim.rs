use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use libavr::config::{ATMEGA328P_DATA_SIZE, ATMEGA328P_FLASH_SIZE};
use libavr::{hex, Cpu, CpuConfig, StackInit};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StackInitArg {
    /// SP = last data-space address
    Top,
    /// SP = 0 until firmware writes it
    Unset,
}

impl From<StackInitArg> for StackInit {
    fn from(arg: StackInitArg) -> Self {
        match arg {
            StackInitArg::Top => StackInit::TopOfDataMemory,
            StackInitArg::Unset => StackInit::Unset,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "avrsim")]
#[command(about = "Run an Intel HEX image on a simulated AVR core", long_about = None)]
struct Args {
    /// Intel HEX firmware image
    file: PathBuf,

    /// Number of instructions to execute
    #[arg(long, default_value_t = 3)]
    steps: u64,

    /// Dump cycles and registers every K instructions (0 disables)
    #[arg(long, default_value_t = 1)]
    trace_every: u64,

    /// Initial stack pointer policy
    #[arg(long, value_enum, default_value_t = StackInitArg::Top)]
    stack_init: StackInitArg,

    /// Program store size in bytes
    #[arg(long, default_value_t = ATMEGA328P_FLASH_SIZE)]
    flash_size: usize,

    /// Data space size in bytes
    #[arg(long, default_value_t = ATMEGA328P_DATA_SIZE)]
    data_size: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let image = hex::parse_with_capacity(&text, args.flash_size)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let config = CpuConfig {
        program_store_size: args.flash_size,
        data_space_size: args.data_size,
        stack_init: args.stack_init.into(),
    };
    let mut cpu = Cpu::with_config(&image.data, config).context("failed to build CPU")?;

    for i in 0..args.steps {
        cpu.step();

        if args.trace_every != 0 && i % args.trace_every == 0 {
            println!("Cycle {}", cpu.cycles());
            println!("General registers {:02X?}", cpu.registers());
            println!("I/O registers {:02X?}", cpu.io_registers());
        }
    }

    println!(
        "PC={:#06X} SP={:#06X} SREG={:08b} cycles={}",
        cpu.pc(),
        cpu.stack_pointer(),
        cpu.status(),
        cpu.cycles()
    );

    Ok(())
}
