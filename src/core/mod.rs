pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod timing;

pub use driver::Driver;
pub use event::Transition;
pub use state::{
    IoTimer, Pid, ProcId, ProcState, Process, QueueId, QueueShape, RunQueue, SimState, Ticks,
};
