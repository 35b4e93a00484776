// Copyright contributors to the Derandomized Shallow Shadows project

use std::{
    error::Error,
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

use clap::Parser;
use dss_derandomize::{load_pauli_strings, load_weights, report, Derandomizer, DssConfig};
use env_logger::Env;
use log::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of qubits
    #[arg(short = 'n', long, default_value_t = 8)]
    qubits: usize,
    /// Layers of two-qubit gates per circuit
    #[arg(long, default_value_t = 3)]
    depth: usize,
    #[arg(long, default_value_t = 0.9)]
    eta: f64,
    /// Maximum number of circuits to produce
    #[arg(long, default_value_t = 100)]
    total_measurements: usize,
    #[arg(long, default_value_t = 100)]
    measurements_per_observable: usize,
    /// One Pauli string per line
    #[arg(long)]
    pauli_file: PathBuf,
    /// One weight per line, matching the Pauli file
    #[arg(long)]
    weights_file: Option<PathBuf>,
    /// Write per-observable coverage as CSV to this path
    #[arg(long)]
    coverage: Option<PathBuf>,
    /// Score candidates on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // By default log INFO.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let observables = load_pauli_strings(BufReader::new(File::open(&cli.pauli_file)?))?;
    let weights = match &cli.weights_file {
        Some(path) => Some(load_weights(BufReader::new(File::open(path)?))?),
        None => None,
    };
    info!(
        "Loaded {} observables from {}",
        observables.len(),
        cli.pauli_file.display()
    );

    let config = DssConfig::new(
        cli.qubits,
        cli.depth,
        cli.eta,
        cli.total_measurements,
        cli.measurements_per_observable,
        observables,
        weights,
    )?;
    let outcome = Derandomizer::new(&config)?
        .with_parallelism(!cli.sequential)
        .run()?;

    let mut stdout = io::stdout().lock();
    for record in &outcome.rounds {
        serde_json::to_writer(&mut stdout, record)?;
        writeln!(stdout)?;
    }

    if let Some(path) = &cli.coverage {
        let rows = report::coverage_rows(&config, &outcome);
        report::write_coverage(File::create(path)?, &rows)?;
        info!("Wrote coverage of {} observables to {}", rows.len(), path.display());
    }
    info!(
        "{} circuits, {} hits, {}",
        outcome.rounds.len(),
        outcome.total_hits(),
        outcome.termination
    );

    Ok(())
}
