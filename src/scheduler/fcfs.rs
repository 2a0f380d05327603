use super::{ExecModel, SchedPolicy, TimeModel};
use crate::core::state::{ProcId, QueueShape, SimState, Ticks};

/// First-come-first-served dispatch: head of the ready queue.
pub struct FcfsPolicy;

impl SchedPolicy for FcfsPolicy {
    fn shape(&self) -> QueueShape {
        QueueShape::Fifo
    }

    fn select_next(&self, ctx: &SimState) -> Option<ProcId> {
        ctx.queue(ctx.ready).front()
    }
}

/// Fixed-quantum clock: one unit per step, burst-accounted execution.
pub struct UnitTick;

impl TimeModel for UnitTick {
    fn exec(&self) -> ExecModel {
        ExecModel::Burst
    }

    fn next_delta(&self, _ctx: &SimState) -> Ticks {
        1
    }
}
