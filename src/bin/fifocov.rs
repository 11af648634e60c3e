use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use fifocov::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Close data coverage on completed reads
    ReadData,
    /// Close data coverage on o_data plus overflow/underflow flags
    FlagStress,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PatternArg {
    Zeros,
    Ones,
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "fifocov", about = "Coverage-driven FIFO testbench")]
struct Args {
    /// Data width in bits
    #[arg(long, default_value_t = 8)]
    width: u32,

    /// Depth of the reference FIFO model
    #[arg(long, default_value_t = 16)]
    depth: usize,

    #[arg(long, value_enum, default_value = "flag-stress")]
    variant: VariantArg,

    /// Random seed; drawn from entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Fill pattern for state left undefined by reset
    #[arg(long, value_enum, default_value = "random")]
    reset_pattern: PatternArg,

    /// Watchdog in milliseconds; 0 disables it
    #[arg(long)]
    watchdog_ms: Option<u64>,

    /// Give up after this many steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Length of the stress write burst
    #[arg(long)]
    stress_writes: Option<u64>,

    /// VCD waveform output
    #[arg(long)]
    trace: Option<PathBuf>,

    /// JUnit results file
    #[arg(long, default_value = "results.xml")]
    report: PathBuf,

    /// Inject a fault into the model: invert this bit of read data
    #[arg(long)]
    flip_bit: Option<u32>,

    /// Inject a fault into the model: signal read completion on empty reads
    #[arg(long)]
    read_done_when_empty: bool,
}

impl Args {
    fn config(&self) -> TbConfig {
        let width = DataWidth::new(self.width);
        let mut cfg = match self.variant {
            VariantArg::ReadData => TbConfig::read_data(width),
            VariantArg::FlagStress => TbConfig::flag_stress(width),
        };
        cfg = cfg
            .with_reset_pattern(match self.reset_pattern {
                PatternArg::Zeros => ResetPattern::Zeros,
                PatternArg::Ones => ResetPattern::Ones,
                PatternArg::Random => ResetPattern::Random,
            })
            .with_max_steps(self.max_steps)
            .with_depth(self.depth)
            .with_report(&self.report);
        if let Some(seed) = self.seed {
            cfg = cfg.with_seed(seed);
        }
        if let Some(ms) = self.watchdog_ms {
            cfg = cfg.with_watchdog((ms > 0).then(|| Duration::from_millis(ms)));
        }
        if let Some(writes) = self.stress_writes {
            cfg = cfg.with_stress_writes(writes);
        }
        if let Some(path) = &self.trace {
            cfg = cfg.with_trace(path);
        }
        cfg
    }

    fn mutation(&self) -> Mutation {
        match (self.flip_bit, self.read_done_when_empty) {
            (Some(bit), _) => Mutation::FlipDataBit(bit),
            (None, true) => Mutation::ReadDoneWhenEmpty,
            (None, false) => Mutation::None,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = args.config();
    let built = FifoModel::new(config.width, args.depth)
        .with_mutation(args.mutation())
        .and_then(|dut| {
            let dut = match config.seed {
                Some(seed) => dut.with_seed(seed),
                None => dut,
            };
            Testbench::new(config, dut)
        });

    let mut tb = match built {
        Ok(tb) => tb,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    match tb.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code()),
    }
}
