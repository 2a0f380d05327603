use ksim::core::{ProcState, Process, Transition};
use ksim::sim::workload::{BernoulliWorkload, bernoulli_processes};
use ksim::{quantum_fcfs, shortest_total};
use std::collections::HashMap;

use ProcState::{New, Ready, Running, Terminated, Waiting};

fn t(at: u64, pid: u32, from: ProcState, to: ProcState) -> Transition {
    Transition { at, pid, from, to }
}

fn assert_monotonic(log: &[Transition]) {
    for pair in log.windows(2) {
        assert!(
            pair[0].at <= pair[1].at,
            "transition times must be non-decreasing: {pair:?}"
        );
    }
}

// Every process walks New -> Ready -> (Running -> Waiting -> Ready)* ->
// Running -> Terminated, and Terminated is never left.
fn assert_legal_sequences(log: &[Transition], procs: &[Process]) {
    let mut by_pid: HashMap<u32, Vec<&Transition>> = HashMap::new();
    for tr in log {
        by_pid.entry(tr.pid).or_default().push(tr);
    }

    assert_eq!(by_pid.len(), procs.len(), "every process must transition");
    for proc in procs {
        let seq = &by_pid[&proc.pid];
        assert_eq!((seq[0].from, seq[0].to), (New, Ready));
        for pair in seq.windows(2) {
            assert_eq!(
                pair[0].to, pair[1].from,
                "pid {} left state {:?} without entering it",
                proc.pid, pair[1].from
            );
        }
        for tr in seq.iter() {
            assert!(
                matches!(
                    (tr.from, tr.to),
                    (New, Ready)
                        | (Ready, Running)
                        | (Running, Waiting)
                        | (Waiting, Ready)
                        | (Running, Terminated)
                ),
                "illegal edge {tr:?}"
            );
        }
        let last = seq.last().unwrap();
        assert_eq!((last.from, last.to), (Running, Terminated));
        let exits = seq.iter().filter(|tr| tr.to == Terminated).count();
        assert_eq!(exits, 1, "pid {} terminated {exits} times", proc.pid);
    }
}

#[test]
fn scenario_a_short_process_terminates_in_its_first_burst() {
    // remaining (5) <= io_frequency (10): no I/O ever occurs
    let mut driver = quantum_fcfs(vec![Process::new(1, 0, 5, 10, 0)]);
    let log = driver.run();
    assert_eq!(
        log,
        vec![
            t(0, 1, New, Ready),
            t(0, 1, Ready, Running),
            t(0, 1, Running, Terminated),
        ]
    );
}

#[test]
fn scenario_b_tick_engine_interleaves_bursts_and_io() {
    let mut driver = quantum_fcfs(vec![Process::new(1, 0, 20, 5, 3)]);
    let log = driver.run();
    assert_eq!(
        log,
        vec![
            t(0, 1, New, Ready),
            t(0, 1, Ready, Running),
            t(0, 1, Running, Waiting),
            t(3, 1, Waiting, Ready),
            t(3, 1, Ready, Running),
            t(3, 1, Running, Waiting),
            t(6, 1, Waiting, Ready),
            t(6, 1, Ready, Running),
            t(6, 1, Running, Waiting),
            t(9, 1, Waiting, Ready),
            t(9, 1, Ready, Running),
            t(9, 1, Running, Terminated),
        ]
    );
}

#[test]
fn scenario_c_shortest_total_runs_first_regardless_of_insertion_order() {
    // no I/O: io_frequency >= total for both
    let procs = vec![Process::new(1, 0, 10, 20, 5), Process::new(2, 0, 5, 20, 5)];
    let mut driver = shortest_total(procs);
    let log = driver.run();
    assert_eq!(
        log,
        vec![
            t(0, 1, New, Ready),
            t(0, 2, New, Ready),
            t(0, 2, Ready, Running),
            t(5, 2, Running, Terminated),
            t(5, 1, Ready, Running),
            t(15, 1, Running, Terminated),
        ]
    );
}

#[test]
fn scenario_d_empty_input_terminates_immediately() {
    let mut tick = quantum_fcfs(vec![]);
    assert!(tick.done());
    assert!(tick.run().is_empty());

    let mut skip = shortest_total(vec![]);
    assert!(skip.done());
    assert!(skip.run().is_empty());
    assert_eq!(skip.ctx.queue(skip.ctx.terminated).len(), 0);
}

#[test]
fn event_skip_meters_io_request_and_completion_cycles() {
    let mut driver = shortest_total(vec![Process::new(1, 0, 10, 3, 2)]);
    let log = driver.run();
    assert_eq!(
        log,
        vec![
            t(0, 1, New, Ready),
            t(0, 1, Ready, Running),
            t(3, 1, Running, Waiting),
            t(5, 1, Waiting, Ready),
            t(5, 1, Ready, Running),
            t(8, 1, Running, Waiting),
            t(10, 1, Waiting, Ready),
            t(10, 1, Ready, Running),
            t(13, 1, Running, Waiting),
            t(15, 1, Waiting, Ready),
            t(15, 1, Ready, Running),
            t(16, 1, Running, Terminated),
        ]
    );
}

#[test]
fn event_skip_redispatches_in_the_same_instant_after_an_exit() {
    let procs = vec![Process::new(1, 0, 4, 20, 5), Process::new(2, 0, 4, 20, 5)];
    let mut driver = shortest_total(procs);
    let log = driver.run();
    // pid 2 is dispatched at the very tick pid 1 exits
    assert!(log.contains(&t(4, 1, Running, Terminated)));
    assert!(log.contains(&t(4, 2, Ready, Running)));
}

#[test]
fn tick_engine_admits_late_arrivals() {
    let procs = vec![Process::new(1, 0, 4, 10, 1), Process::new(2, 7, 3, 10, 1)];
    let mut driver = quantum_fcfs(procs);
    let log = driver.run();
    assert!(log.contains(&t(0, 1, New, Ready)));
    assert!(log.contains(&t(7, 2, New, Ready)));
    assert_monotonic(&log);
}

#[test]
fn random_workloads_satisfy_the_lifecycle_properties_on_both_engines() {
    let params = BernoulliWorkload::default();
    for seed in 0..8 {
        let procs = bernoulli_processes(&params, seed);

        let mut tick = quantum_fcfs(procs.clone());
        let log = run_bounded(&mut tick);
        assert_monotonic(&log);
        assert_legal_sequences(&log, &procs);
        assert_eq!(tick.ctx.queue(tick.ctx.terminated).len(), procs.len());

        let mut skip = shortest_total(procs.clone());
        let log = run_bounded(&mut skip);
        assert_monotonic(&log);
        assert_legal_sequences(&log, &procs);
        assert_eq!(skip.ctx.queue(skip.ctx.terminated).len(), procs.len());
    }
}

// run() with a step budget, so a livelock fails the test instead of
// hanging it.
fn run_bounded<P, T>(driver: &mut ksim::Driver<P, T>) -> Vec<Transition>
where
    P: ksim::SchedPolicy,
    T: ksim::TimeModel,
{
    let mut log = Vec::new();
    for _ in 0..1_000_000 {
        if driver.done() {
            return log;
        }
        log.extend(driver.step());
    }
    panic!("simulation failed to terminate within the step budget");
}
