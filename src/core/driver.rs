use super::{
    event::Transition,
    observer::Observer,
    state::{IoTimer, ProcId, ProcState, Process, SimState, Ticks},
};
use crate::scheduler::{ExecModel, SchedPolicy, TimeModel};
use tracing::{debug, trace};

/// The simulation driver: one loop over discrete steps, parameterized
/// over the ready-set selection discipline and the time-advancement
/// strategy. Only the driver mutates process state.
pub struct Driver<P: SchedPolicy, T: TimeModel> {
    pub ctx: SimState,
    policy: P,
    time: T,
    observer: Observer,
    // Delta applied at the top of the next step; 0 before the first step.
    next_delta: Ticks,
}

impl<P: SchedPolicy, T: TimeModel> Driver<P, T> {
    pub fn new(procs: Vec<Process>, policy: P, time: T) -> Self {
        let ctx = SimState::new(procs, policy.shape());
        Self {
            ctx,
            policy,
            time,
            observer: Observer::new(),
            next_delta: 0,
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn done(&self) -> bool {
        self.ctx.all_terminated()
    }

    /// One simulation step. Returns the transitions it emitted, in
    /// emission order.
    pub fn step(&mut self) -> Vec<Transition> {
        let mut log = Vec::new();
        let delta = self.next_delta;
        self.ctx.advance(delta);
        trace!(clock = self.ctx.now, delta, "step");

        self.elapse(delta);
        self.complete_io(&mut log);
        self.admit_arrivals(&mut log);
        self.execute(&mut log);

        self.next_delta = self.time.next_delta(&self.ctx);
        self.observer.observe(&self.ctx);
        log
    }

    /// Runs to completion and returns the full transition log.
    pub fn run(&mut self) -> Vec<Transition> {
        let mut log = Vec::new();
        while !self.done() {
            log.extend(self.step());
        }
        log
    }

    // Charge elapsed time against the metered countdowns. The burst
    // model accounts at dispatch instead and keeps wall-clock state in
    // `blocked_at`, so it has nothing to elapse.
    fn elapse(&mut self, delta: Ticks) {
        if delta == 0 || self.time.exec() != ExecModel::Metered {
            return;
        }

        if let Some(id) = self.ctx.running {
            let proc = self.ctx.proc_mut(id);
            proc.remaining_cpu_time = proc.remaining_cpu_time.saturating_sub(delta);
            if let IoTimer::UntilRequest(t) = proc.io {
                proc.io = IoTimer::UntilRequest(t.saturating_sub(delta));
            }
        }

        // Collected first: the queue registry and the arena cannot be
        // borrowed through `ctx` at the same time.
        let waiting: Vec<ProcId> = self.ctx.queue(self.ctx.waiting).iter().collect();
        for id in waiting {
            let proc = self.ctx.proc_mut(id);
            if let IoTimer::UntilCompletion(t) = proc.io {
                proc.io = IoTimer::UntilCompletion(t.saturating_sub(delta));
            }
        }
    }

    // Waiting -> Ready for every process whose I/O has finished by now.
    fn complete_io(&mut self, log: &mut Vec<Transition>) {
        let now = self.ctx.now;
        let waiting: Vec<ProcId> = self.ctx.queue(self.ctx.waiting).iter().collect();
        for id in waiting {
            let proc = self.ctx.proc(id);
            let finished = match self.time.exec() {
                ExecModel::Metered => matches!(proc.io, IoTimer::UntilCompletion(0)),
                ExecModel::Burst => proc
                    .blocked_at
                    .is_some_and(|start| now - start >= proc.io_duration),
            };
            if !finished {
                continue;
            }

            let proc = self.ctx.proc_mut(id);
            proc.io = IoTimer::UntilRequest(proc.io_frequency);
            proc.blocked_at = None;

            let removed = self.ctx.take_from(self.ctx.waiting, id);
            debug_assert!(removed);
            self.ctx.mark_ready(id);
            self.ctx.push_to(self.ctx.ready, id);
            self.emit(log, id, ProcState::Waiting, ProcState::Ready);
        }
    }

    // New -> Ready for every process whose arrival time is now.
    fn admit_arrivals(&mut self, log: &mut Vec<Transition>) {
        let now = self.ctx.now;
        let pending: Vec<ProcId> = self.ctx.queue(self.ctx.pending).iter().collect();
        for id in pending {
            if self.ctx.proc(id).arrival_time != now {
                continue;
            }
            let removed = self.ctx.take_from(self.ctx.pending, id);
            debug_assert!(removed);
            self.ctx.mark_ready(id);
            self.ctx.push_to(self.ctx.ready, id);
            self.emit(log, id, ProcState::New, ProcState::Ready);
        }
    }

    fn execute(&mut self, log: &mut Vec<Transition>) {
        match self.time.exec() {
            // The whole CPU-to-I/O burst resolves within the dispatch
            // tick; transition times are the tick the decision was made.
            ExecModel::Burst => {
                if let Some(id) = self.dispatch(log) {
                    let proc = self.ctx.proc(id);
                    if proc.remaining_cpu_time <= proc.io_frequency {
                        self.finish(log, id);
                    } else {
                        let now = self.ctx.now;
                        let proc = self.ctx.proc_mut(id);
                        proc.remaining_cpu_time -= proc.io_frequency;
                        proc.blocked_at = Some(now);
                        self.block(log, id);
                    }
                }
            }
            // Timers were charged in elapse(); resolve whichever
            // threshold the running process crossed, exit before block.
            ExecModel::Metered => {
                if let Some(id) = self.ctx.running {
                    let proc = self.ctx.proc(id);
                    if proc.remaining_cpu_time == 0 {
                        self.finish(log, id);
                    } else if proc.io == IoTimer::UntilRequest(0) {
                        let duration = proc.io_duration;
                        self.ctx.proc_mut(id).io = IoTimer::UntilCompletion(duration);
                        self.block(log, id);
                    }
                }
                // Re-dispatch within the same step if the CPU went idle.
                if self.ctx.cpu_is_idle() {
                    self.dispatch(log);
                }
            }
        }
    }

    // Ready -> Running via the policy's selection rule.
    fn dispatch(&mut self, log: &mut Vec<Transition>) -> Option<ProcId> {
        debug_assert!(self.ctx.cpu_is_idle());
        let Some(id) = self.policy.select_next(&self.ctx) else {
            if !self.ctx.all_terminated() {
                debug!(clock = self.ctx.now, "CPU is idle");
            }
            return None;
        };
        let removed = self.ctx.take_from(self.ctx.ready, id);
        debug_assert!(removed, "selected process must come from the ready set");
        self.ctx.mark_running(id);
        self.emit(log, id, ProcState::Ready, ProcState::Running);
        Some(id)
    }

    // Running -> Terminated. Terminated is absorbing.
    fn finish(&mut self, log: &mut Vec<Transition>, id: ProcId) {
        self.ctx.proc_mut(id).remaining_cpu_time = 0;
        self.ctx.mark_terminated(id);
        self.ctx.push_to(self.ctx.terminated, id);
        self.emit(log, id, ProcState::Running, ProcState::Terminated);
    }

    // Running -> Waiting. Scratch fields are set by the caller.
    fn block(&mut self, log: &mut Vec<Transition>, id: ProcId) {
        self.ctx.mark_waiting(id);
        self.ctx.push_to(self.ctx.waiting, id);
        self.emit(log, id, ProcState::Running, ProcState::Waiting);
    }

    fn emit(&self, log: &mut Vec<Transition>, id: ProcId, from: ProcState, to: ProcState) {
        let t = Transition {
            at: self.ctx.now,
            pid: self.ctx.proc(id).pid,
            from,
            to,
        };
        trace!(at = t.at, pid = t.pid, ?from, ?to, "transition");
        log.push(t);
    }
}
