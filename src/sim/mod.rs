pub mod load;
pub mod report;
pub mod trace;
pub mod workload;

pub use load::{LoadError, RecordPolicy, load_processes, output_name};
pub use report::{RunSummary, summarize};
pub use trace::{CsvTrace, SpacedTrace, TraceWrite};
pub use workload::{BernoulliWorkload, bernoulli_processes};
