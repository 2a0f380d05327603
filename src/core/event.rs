use crate::core::state::{Pid, ProcState, Ticks};

/// One entry in the transition log. Emitted by the driver, never
/// retracted; `at` is non-decreasing across a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub at: Ticks,
    pub pid: Pid,
    pub from: ProcState,
    pub to: ProcState,
}
