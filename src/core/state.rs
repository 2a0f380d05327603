use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into the Process arena
pub type ProcId = usize;
// Caller-supplied process identifier from the descriptor file
pub type Pid = u32;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

impl ProcState {
    /// Mixed-case names used by the spaced trace format.
    pub fn mixed_name(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Waiting => "Waiting",
            Self::Terminated => "Terminated",
        }
    }

    /// Upper-case names used by the CSV trace format.
    pub fn upper_name(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Terminated => "TERMINATED",
        }
    }
}

/// Metered I/O countdown. The meaning of the tick count depends on where
/// the process currently is: runnable processes count down to their next
/// I/O request, waiting processes count down to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoTimer {
    UntilRequest(Ticks),
    UntilCompletion(Ticks),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub total_cpu_time: Ticks,
    pub io_frequency: Ticks,
    pub io_duration: Ticks,
    pub remaining_cpu_time: Ticks,
    pub state: ProcState,
    // Event-skip scratch: metered I/O countdown
    pub io: IoTimer,
    // Tick-engine scratch: clock value at the Running -> Waiting transition
    pub blocked_at: Option<Ticks>,
}

impl Process {
    pub fn new(
        pid: Pid,
        arrival_time: Ticks,
        total_cpu_time: Ticks,
        io_frequency: Ticks,
        io_duration: Ticks,
    ) -> Self {
        Self {
            pid,
            arrival_time,
            total_cpu_time,
            io_frequency,
            io_duration,
            remaining_cpu_time: total_cpu_time,
            state: ProcState::New,
            io: IoTimer::UntilRequest(io_frequency),
            blocked_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueShape {
    Fifo,
    List,
}

/// An ordered set of arena indices. `Fifo` is the tick engine's
/// append/pop-front queue; `List` is the event-skip engine's list with
/// interior removal. Both shapes support every operation so one driver
/// can run over either.
#[derive(Debug)]
pub enum RunQueue {
    Fifo(VecDeque<ProcId>),
    List(Vec<ProcId>),
}

impl RunQueue {
    pub fn with_shape(shape: QueueShape) -> Self {
        match shape {
            QueueShape::Fifo => Self::Fifo(VecDeque::new()),
            QueueShape::List => Self::List(Vec::new()),
        }
    }

    pub fn push(&mut self, id: ProcId) {
        match self {
            Self::Fifo(q) => q.push_back(id),
            Self::List(l) => l.push(id),
        }
    }

    pub fn pop_front(&mut self) -> Option<ProcId> {
        match self {
            Self::Fifo(q) => q.pop_front(),
            Self::List(l) => {
                if l.is_empty() {
                    None
                } else {
                    Some(l.remove(0))
                }
            }
        }
    }

    /// Removes `id` wherever it sits. Returns false (a no-op) when the
    /// process is not present.
    pub fn remove(&mut self, id: ProcId) -> bool {
        match self {
            Self::Fifo(q) => match q.iter().position(|&p| p == id) {
                Some(i) => {
                    let _ = q.remove(i);
                    true
                }
                None => false,
            },
            Self::List(l) => match l.iter().position(|&p| p == id) {
                Some(i) => {
                    l.remove(i);
                    true
                }
                None => false,
            },
        }
    }

    pub fn front(&self) -> Option<ProcId> {
        match self {
            Self::Fifo(q) => q.front().copied(),
            Self::List(l) => l.first().copied(),
        }
    }

    pub fn contains(&self, id: ProcId) -> bool {
        match self {
            Self::Fifo(q) => q.contains(&id),
            Self::List(l) => l.contains(&id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo(q) => q.len(),
            Self::List(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> RunQueueIter<'_> {
        match self {
            Self::Fifo(q) => RunQueueIter::Fifo(q.iter()),
            Self::List(l) => RunQueueIter::List(l.iter()),
        }
    }
}

pub enum RunQueueIter<'a> {
    Fifo(std::collections::vec_deque::Iter<'a, ProcId>),
    List(std::slice::Iter<'a, ProcId>),
}

impl Iterator for RunQueueIter<'_> {
    type Item = ProcId;

    fn next(&mut self) -> Option<ProcId> {
        match self {
            Self::Fifo(it) => it.next().copied(),
            Self::List(it) => it.next().copied(),
        }
    }
}

/// The whole simulation state: the clock, the process arena, the four
/// ordered containers, and the single-CPU running slot. Queues hold
/// arena indices; the membership map enforces that a process sits in at
/// most one container at a time.
#[derive(Debug)]
pub struct SimState {
    pub now: Ticks,
    pub procs: Vec<Process>,
    pub queues: SlotMap<QueueId, RunQueue>,
    proc_to_queue: FxHashMap<ProcId, QueueId>,
    pub pending: QueueId,
    pub ready: QueueId,
    pub waiting: QueueId,
    pub terminated: QueueId,
    pub running: Option<ProcId>,
}

impl SimState {
    pub fn new(procs: Vec<Process>, shape: QueueShape) -> Self {
        let mut queues = SlotMap::with_capacity_and_key(4);
        let pending = queues.insert(RunQueue::with_shape(shape));
        let ready = queues.insert(RunQueue::with_shape(shape));
        let waiting = queues.insert(RunQueue::with_shape(shape));
        let terminated = queues.insert(RunQueue::with_shape(shape));

        let mut state = Self {
            now: 0,
            procs,
            queues,
            proc_to_queue: FxHashMap::default(),
            pending,
            ready,
            waiting,
            terminated,
            running: None,
        };

        // All processes start in the not-yet-arrived set, in load order.
        for id in 0..state.procs.len() {
            debug_assert_eq!(state.procs[id].state, ProcState::New);
            state.push_to(state.pending, id);
        }

        state
    }

    pub fn proc(&self, id: ProcId) -> &Process {
        &self.procs[id]
    }

    pub fn proc_mut(&mut self, id: ProcId) -> &mut Process {
        &mut self.procs[id]
    }

    pub fn queue(&self, queue_id: QueueId) -> &RunQueue {
        self.queues.get(queue_id).expect("unknown queue")
    }

    pub fn advance(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn all_terminated(&self) -> bool {
        self.queue(self.terminated).len() == self.procs.len()
    }

    pub fn in_any_queue(&self, id: ProcId) -> bool {
        self.proc_to_queue.contains_key(&id)
    }

    pub fn membership(&self, id: ProcId) -> Option<QueueId> {
        self.proc_to_queue.get(&id).copied()
    }

    pub fn push_to(&mut self, queue_id: QueueId, id: ProcId) {
        assert!(
            !self.proc_to_queue.contains_key(&id),
            "process {id} already present in some queue"
        );
        let queue = self.queues.get_mut(queue_id).expect("unknown queue");
        queue.push(id);
        self.proc_to_queue.insert(id, queue_id);
    }

    pub fn take_from(&mut self, queue_id: QueueId, id: ProcId) -> bool {
        let queue = self.queues.get_mut(queue_id).expect("unknown queue");
        if !queue.remove(id) {
            return false;
        }
        let removed = self.proc_to_queue.remove(&id);
        debug_assert_eq!(removed, Some(queue_id), "process {id} membership mismatch");
        true
    }

    pub fn pop_front(&mut self, queue_id: QueueId) -> Option<ProcId> {
        let queue = self.queues.get_mut(queue_id).expect("unknown queue");
        let id = queue.pop_front()?;
        let removed = self.proc_to_queue.remove(&id);
        debug_assert!(removed.is_some(), "process {id} missing queue membership");
        Some(id)
    }

    pub fn mark_ready(&mut self, id: ProcId) {
        let proc = self.proc_mut(id);
        debug_assert!(
            matches!(proc.state, ProcState::New | ProcState::Waiting),
            "process {id} cannot become Ready from {:?}",
            proc.state
        );
        proc.state = ProcState::Ready;
    }

    pub fn mark_running(&mut self, id: ProcId) {
        debug_assert!(self.running.is_none(), "CPU already running a process");
        debug_assert!(
            !self.in_any_queue(id),
            "running process {id} must not be queued"
        );
        let proc = self.proc_mut(id);
        debug_assert_eq!(proc.state, ProcState::Ready);
        proc.state = ProcState::Running;
        self.running = Some(id);
    }

    pub fn mark_waiting(&mut self, id: ProcId) {
        debug_assert_eq!(self.running, Some(id), "only the running process blocks");
        self.proc_mut(id).state = ProcState::Waiting;
        self.running = None;
    }

    pub fn mark_terminated(&mut self, id: ProcId) {
        debug_assert_eq!(self.running, Some(id), "only the running process exits");
        let proc = self.proc_mut(id);
        debug_assert_eq!(proc.remaining_cpu_time, 0);
        proc.state = ProcState::Terminated;
        self.running = None;
    }
}
