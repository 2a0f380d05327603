//! Discrete-event models of an OS process scheduler.
//!
//! One generic [`Driver`] replays a fixed process set through the
//! New → Ready → Running → Waiting → Terminated lifecycle. The driver is
//! parameterized over a ready-set selection discipline ([`SchedPolicy`])
//! and a time-advancement strategy ([`TimeModel`]); the two preset
//! pairings are the fixed-quantum FCFS engine and the event-skip
//! shortest-total-time engine.

pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::core::{Driver, Process, ProcState, SimState, Ticks, Transition};
pub use scheduler::{
    EventSkip, ExecModel, FcfsPolicy, SchedPolicy, ShortestTotalFirst, TimeModel, UnitTick,
};
pub use sim::{RecordPolicy, load_processes};

/// The tick engine: FIFO dispatch, unit clock, burst-accounted
/// execution.
pub fn quantum_fcfs(procs: Vec<Process>) -> Driver<FcfsPolicy, UnitTick> {
    Driver::new(procs, FcfsPolicy, UnitTick)
}

/// The event-skip engine: shortest-total-time dispatch, clock jumps to
/// the next state-changing event, unit-metered execution.
pub fn shortest_total(procs: Vec<Process>) -> Driver<ShortestTotalFirst, EventSkip> {
    Driver::new(procs, ShortestTotalFirst, EventSkip)
}
