use crate::core::state::{ProcState, SimState, Ticks};

/// Structural invariant sweep run after every driver step. All checks
/// are debug asserts; release builds pay nothing.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_now: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, state: &SimState) {
        self.step += 1;

        debug_assert!(
            state.now >= self.last_now,
            "clock moved backwards: {} -> {}",
            self.last_now,
            state.now
        );
        self.last_now = state.now;

        if let Some(id) = state.running {
            let proc = state.proc(id);
            debug_assert_eq!(
                proc.state,
                ProcState::Running,
                "running slot holds process {id} in state {:?}",
                proc.state
            );
            debug_assert!(
                !state.in_any_queue(id),
                "running process {id} also sits in a queue"
            );
        }

        for (id, proc) in state.procs.iter().enumerate() {
            let queued = state.membership(id);
            match proc.state {
                ProcState::New => {
                    debug_assert_eq!(queued, Some(state.pending), "New process {id} misplaced");
                }
                ProcState::Ready => {
                    debug_assert_eq!(queued, Some(state.ready), "Ready process {id} misplaced");
                }
                ProcState::Running => {
                    debug_assert_eq!(state.running, Some(id), "Running process {id} not on CPU");
                }
                ProcState::Waiting => {
                    debug_assert_eq!(queued, Some(state.waiting), "Waiting process {id} misplaced");
                }
                ProcState::Terminated => {
                    debug_assert_eq!(
                        queued,
                        Some(state.terminated),
                        "Terminated process {id} misplaced"
                    );
                    debug_assert_eq!(
                        proc.remaining_cpu_time, 0,
                        "Terminated process {id} still has CPU demand"
                    );
                }
            }
            if let Some(queue_id) = queued {
                debug_assert!(
                    state.queue(queue_id).contains(id),
                    "membership map claims process {id} in {queue_id:?}, queue disagrees"
                );
            }
        }
    }
}
