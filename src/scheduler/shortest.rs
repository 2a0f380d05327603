use super::{ExecModel, SchedPolicy, TimeModel};
use crate::core::state::{ProcId, QueueShape, SimState, Ticks};
use crate::core::timing;

/// Non-preemptive shortest-total-time priority: the ready process with
/// the smallest total CPU demand (static, not remaining work). The
/// strict `<` scan keeps the earliest-inserted process among equals;
/// that tie break is observable and covered by tests.
pub struct ShortestTotalFirst;

impl SchedPolicy for ShortestTotalFirst {
    fn shape(&self) -> QueueShape {
        QueueShape::List
    }

    fn select_next(&self, ctx: &SimState) -> Option<ProcId> {
        let mut best: Option<ProcId> = None;
        for id in ctx.queue(ctx.ready).iter() {
            match best {
                None => best = Some(id),
                Some(b) if ctx.proc(id).total_cpu_time < ctx.proc(b).total_cpu_time => {
                    best = Some(id)
                }
                Some(_) => {}
            }
        }
        best
    }
}

/// Event-skip clock: jump straight to the next state-changing instant.
pub struct EventSkip;

impl TimeModel for EventSkip {
    fn exec(&self) -> ExecModel {
        ExecModel::Metered
    }

    fn next_delta(&self, ctx: &SimState) -> Ticks {
        timing::time_to_next_event(ctx)
    }
}
