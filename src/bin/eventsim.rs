use clap::Parser;
use clap::error::ErrorKind;
use ksim::sim::{CsvTrace, RecordPolicy, TraceWrite, load_processes, summarize};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Event-skip process scheduler simulation with shortest-total-time
/// dispatch. Writes the transition log as CSV to standard output.
#[derive(Parser)]
#[command(name = "eventsim")]
struct Cli {
    /// Input descriptor file: a header line, then
    /// `pid, arrival, total, io_frequency, io_duration` records.
    input: PathBuf,
    /// Verbosity: 0 = transitions only, 1 = progress notes, 2 = debug.
    verbosity: Option<u8>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            process::exit(-1);
        }
    };

    let verbosity = cli.verbosity.unwrap_or(0);
    let filter = match verbosity {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("ksim=info,eventsim=info"),
        _ => EnvFilter::new("ksim=debug,eventsim=debug"),
    };
    // diagnostics go to stderr; stdout carries only the CSV log
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // A load failure ends the run before any simulation state exists.
    let procs = match load_processes(&cli.input, RecordPolicy::Lenient) {
        Ok(procs) => procs,
        Err(err) => {
            eprintln!("eventsim: {err}");
            process::exit(1);
        }
    };

    info!("loaded {} processes", procs.len());
    for proc in &procs {
        info!(
            pid = proc.pid,
            arrival = proc.arrival_time,
            total = proc.total_cpu_time,
            io_frequency = proc.io_frequency,
            io_duration = proc.io_duration,
            "process"
        );
    }

    if let Err(err) = simulate(procs) {
        eprintln!("eventsim: {err}");
        process::exit(1);
    }
}

fn simulate(procs: Vec<ksim::Process>) -> io::Result<()> {
    let stdout = io::stdout().lock();
    let mut trace = CsvTrace::new(stdout)?;
    let mut driver = ksim::shortest_total(procs);

    let mut log = Vec::new();
    while !driver.done() {
        for t in driver.step() {
            trace.transition(&t)?;
            log.push(t);
        }
    }
    trace.flush()?;

    info!("{}", summarize(&log, &driver.ctx.procs));
    Ok(())
}
