use crate::core::event::Transition;
use crate::core::state::{Pid, ProcState, Process, Ticks};
use average::{Estimate, Mean};
use rustc_hash::FxHashMap;
use std::fmt;

/// End-of-run summary computed from a finished transition log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub completed: usize,
    /// Last transition time; 0 for an empty run.
    pub makespan: Ticks,
    /// Mean of (termination time - arrival time).
    pub mean_turnaround: f64,
    /// Mean of (first dispatch time - arrival time).
    pub mean_response: f64,
}

pub fn summarize(log: &[Transition], procs: &[Process]) -> RunSummary {
    let arrivals: FxHashMap<Pid, Ticks> =
        procs.iter().map(|p| (p.pid, p.arrival_time)).collect();

    let mut first_run: FxHashMap<Pid, Ticks> = FxHashMap::default();
    let mut finished: FxHashMap<Pid, Ticks> = FxHashMap::default();
    for t in log {
        if t.to == ProcState::Running {
            first_run.entry(t.pid).or_insert(t.at);
        }
        if t.to == ProcState::Terminated {
            finished.insert(t.pid, t.at);
        }
    }

    let turnaround = finished
        .iter()
        .map(|(pid, &end)| (end - arrivals[pid]) as f64);
    let response = first_run
        .iter()
        .map(|(pid, &start)| (start - arrivals[pid]) as f64);

    RunSummary {
        completed: finished.len(),
        makespan: log.last().map_or(0, |t| t.at),
        mean_turnaround: avg(turnaround),
        mean_response: avg(response),
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Completed processes: {}", self.completed)?;
        writeln!(f, "Simulation completed in {} ms", self.makespan)?;
        writeln!(f, "Average turnaround time: {:.2} ms", self.mean_turnaround)?;
        write!(f, "Average response time: {:.2} ms", self.mean_response)
    }
}
