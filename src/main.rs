// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use vcd_analysis::{parse_vcd_with_options, BigUint, ParseOptions, VcdError};

/// Query signal values out of a Value Change Dump.
#[derive(Parser)]
#[command(name = "vcd-analysis")]
struct Cli {
    /// The path to the vcd file to read
    #[arg(long)]
    vcd: PathBuf,

    /// Hierarchical name of a clock whose period should be detected
    #[arg(long)]
    clock: Option<String>,

    /// Signal (hierarchical name or identifier) to query, may be repeated
    #[arg(long)]
    signal: Vec<String>,

    /// Time at which the signals are queried
    #[arg(long, default_value = "0")]
    time: BigUint,

    /// Sample the signals every STEP time units starting at --time
    #[arg(long, value_name = "STEP")]
    every: Option<BigUint>,

    /// Number of samples taken with --every
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// List every declared signal
    #[arg(long)]
    list: bool,

    /// Bytes read from the file per refill
    #[arg(long, default_value_t = 64 * 1024)]
    chunk_size: usize,

    /// Fail on words longer than this
    #[arg(long)]
    max_word_len: Option<usize>,

    /// Fail on `$keyword ... $end` blocks holding more words than this
    #[arg(long)]
    max_block_tokens: Option<usize>,
}

fn run(args: &Cli) -> Result<(), VcdError> {
    let options = ParseOptions {
        chunk_size: args.chunk_size,
        max_word_len: args.max_word_len,
        max_block_tokens: args.max_block_tokens,
    };

    let now = Instant::now();
    let file = File::open(&args.vcd)?;
    let store = parse_vcd_with_options(file, &options)?;
    let elapsed = now.elapsed();
    println!("Parsed VCD file {} : {:.2?}", args.vcd.display(), elapsed);

    if args.list {
        for signal in store.signals() {
            let meta = signal.meta();
            println!(
                "{:>6}  {}  ({} bit(s), {} nibble(s))",
                signal.id(),
                signal.name(),
                meta.width,
                meta.nibble_width
            );
        }
    }

    if let Some(clock) = &args.clock {
        match store.clock_period(clock)? {
            Some(period) => println!("clock period of {clock}: {period}"),
            None => println!("no clock period detected for {clock}"),
        }
    }

    for signal in &args.signal {
        match &args.every {
            Some(step) => {
                for (time, value) in store.sample_periodic(signal, &args.time, step, args.count)? {
                    println!("{signal} @ {time} = {value}");
                }
            }
            None => println!("{signal} @ {} = {}", args.time, store.value_at(signal, &args.time)?),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
