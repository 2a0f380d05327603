pub mod fcfs;
pub mod shortest;

use crate::core::state::{ProcId, QueueShape, SimState, Ticks};
pub use fcfs::{FcfsPolicy, UnitTick};
pub use shortest::{EventSkip, ShortestTotalFirst};

/// How the running process is charged for CPU time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecModel {
    /// The whole CPU-to-I/O burst resolves within the dispatch step.
    Burst,
    /// Timers decrease by the elapsed delta each step.
    Metered,
}

/// Ready-set selection discipline. Non-preemptive: the driver only asks
/// while the CPU is idle.
pub trait SchedPolicy {
    /// Container shape the simulation's ordered sets are built with.
    fn shape(&self) -> QueueShape;

    /// Picks the next process to dispatch from the ready set, or `None`
    /// when nothing is ready.
    fn select_next(&self, ctx: &SimState) -> Option<ProcId>;
}

/// Time-advancement strategy.
pub trait TimeModel {
    fn exec(&self) -> ExecModel;

    /// Simulated time to advance before the next step.
    fn next_delta(&self, ctx: &SimState) -> Ticks;
}
