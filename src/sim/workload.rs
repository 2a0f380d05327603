use crate::core::state::{Pid, Process, Ticks};
use rand::prelude::*;

/// Parameters for the Bernoulli arrival generator.
#[derive(Debug, Clone, Copy)]
pub struct BernoulliWorkload {
    /// Number of clock ticks to draw arrivals over.
    pub ticks: Ticks,
    /// Per-tick arrival probability.
    pub p_arrival: f64,
    /// Probability that an arriving process is short.
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    /// Inclusive range for the I/O request frequency.
    pub io_frequency: (Ticks, Ticks),
    /// Inclusive range for the I/O duration.
    pub io_duration: (Ticks, Ticks),
}

impl Default for BernoulliWorkload {
    fn default() -> Self {
        Self {
            ticks: 200,
            p_arrival: 0.3,
            p_short: 0.3,
            short_ticks: 2,
            long_ticks: 6,
            io_frequency: (2, 12),
            io_duration: (1, 5),
        }
    }
}

/// Draws a reproducible process set: one coin flip per tick decides an
/// arrival, a second picks short or long CPU demand, and the I/O
/// parameters are drawn uniformly from their ranges.
pub fn bernoulli_processes(params: &BernoulliWorkload, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut procs = Vec::new();

    for t in 0..params.ticks {
        if rng.random::<f64>() >= params.p_arrival {
            continue;
        }
        let total = if rng.random::<f64>() < params.p_short {
            params.short_ticks
        } else {
            params.long_ticks
        };
        let freq = rng.random_range(params.io_frequency.0..=params.io_frequency.1);
        let dur = rng.random_range(params.io_duration.0..=params.io_duration.1);
        procs.push(Process::new(procs.len() as Pid + 1, t, total, freq, dur));
    }

    procs
}
