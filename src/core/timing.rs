use crate::core::state::{IoTimer, SimState, Ticks};

/// Sentinel for an empty candidate event class.
pub const NO_EVENT: Ticks = Ticks::MAX;

/// Minimum simulated-time delta until the next state-changing event:
/// CPU exhaustion or I/O request of the running process, the earliest
/// not-yet-arrived process, or the earliest I/O completion in the
/// waiting set. A computed minimum of 0 returns 1 so the event-skip
/// loop always makes forward progress; the floor is load-bearing, not a
/// true event distance.
pub fn time_to_next_event(state: &SimState) -> Ticks {
    let mut next = NO_EVENT;

    if let Some(id) = state.running {
        let proc = state.proc(id);
        next = next.min(proc.remaining_cpu_time);
        if let IoTimer::UntilRequest(t) = proc.io {
            next = next.min(t);
        }
    }

    for id in state.queue(state.pending).iter() {
        next = next.min(state.proc(id).arrival_time.saturating_sub(state.now));
    }

    for id in state.queue(state.waiting).iter() {
        if let IoTimer::UntilCompletion(t) = state.proc(id).io {
            next = next.min(t);
        }
    }

    if next == 0 { 1 } else { next }
}
