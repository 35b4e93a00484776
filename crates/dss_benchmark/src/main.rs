// Copyright contributors to the Derandomized Shallow Shadows project

use std::{
    error::Error,
    io::{self, Write},
};

use clap::Parser;
use log::debug;

/// Print random distinct Pauli strings, one per line.
#[derive(Parser)]
struct Cli {
    qubits: usize,
    count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let observables =
        dss_benchmark::random::distinct_observables(cli.qubits, cli.count, cli.seed)?;
    debug!("Drew {} observables on {} qubits", observables.len(), cli.qubits);

    let mut stdout = io::stdout().lock();
    for observable in observables {
        writeln!(stdout, "{observable}")?;
    }

    Ok(())
}
