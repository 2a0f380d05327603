use clap::Parser;
use clap::error::ErrorKind;
use ksim::sim::{RecordPolicy, SpacedTrace, TraceWrite, load_processes, output_name, summarize};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Fixed-quantum FCFS process scheduler simulation.
///
/// Writes the transition log to `output_<input file name>.txt` in the
/// working directory.
#[derive(Parser)]
#[command(name = "ticksim")]
struct Cli {
    /// Input descriptor file: a header line, then
    /// `pid, arrival, total, io_frequency, io_duration` records.
    input: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    // An unreadable or malformed input is reported and the run is
    // skipped; that is this engine's documented contract.
    let procs = match load_processes(&cli.input, RecordPolicy::Strict) {
        Ok(procs) => procs,
        Err(err) => {
            eprintln!("ticksim: {err}");
            return;
        }
    };

    if let Err(err) = simulate(procs, &cli.input) {
        eprintln!("ticksim: {err}");
        process::exit(1);
    }
}

fn simulate(procs: Vec<ksim::Process>, input: &PathBuf) -> io::Result<()> {
    let out_path = output_name(input);
    let mut trace = SpacedTrace::create(&out_path)?;
    let mut driver = ksim::quantum_fcfs(procs);

    let mut log = Vec::new();
    while !driver.done() {
        for t in driver.step() {
            trace.transition(&t)?;
            log.push(t);
        }
    }
    trace.flush()?;

    debug!("{}", summarize(&log, &driver.ctx.procs));
    Ok(())
}
