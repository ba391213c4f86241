//! # Worker Pool
//!
//! A fixed number of worker threads consume ranges from a shared channel
//! and hand one outcome back per range. Fan-out/fan-in is the only
//! coordination: workers share no mutable state beyond the two channels.

use crate::planner::Range;
use crate::report::RangeOutcome;
use crossbeam_channel::unbounded;
use log::debug;
use std::thread;

/// Bounded-parallelism executor for range jobs.
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency }
    }

    /// Runs `job` once per range across `min(concurrency, ranges.len())`
    /// workers and returns the outcomes in submission order, regardless of
    /// completion order. An effective worker count below one returns an
    /// empty list without starting any thread.
    ///
    /// Every range is claimed by exactly one worker, exactly once; the pool
    /// joins all workers before returning, so no outcome is observable
    /// until every range has completed.
    ///
    /// There is no cancellation or timeout: a job that blocks forever
    /// blocks its worker forever. Accepted limitation.
    pub fn run<F>(&self, ranges: Vec<Range>, job: F) -> Vec<RangeOutcome>
    where
        F: Fn(&Range) -> RangeOutcome + Send + Sync,
    {
        let worker_count = self.concurrency.min(ranges.len());
        if worker_count < 1 {
            return Vec::new();
        }

        let (job_tx, job_rx) = unbounded::<Range>();
        let (result_tx, result_rx) = unbounded::<RangeOutcome>();
        for range in ranges {
            // Receiver is alive until the end of the scope below.
            job_tx.send(range).expect("job channel open");
        }
        drop(job_tx);

        thread::scope(|scope| {
            let job = &job;
            for id in 0..worker_count {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    debug!("worker {} started", id);
                    while let Ok(range) = job_rx.recv() {
                        let outcome = job(&range);
                        if result_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                    debug!("worker {} finished", id);
                });
            }
        });
        drop(result_tx);

        // All workers have joined; reassemble completion-ordered outcomes
        // into submission order.
        let mut outcomes: Vec<RangeOutcome> = result_rx.try_iter().collect();
        outcomes.sort_by_key(|o| o.range.index);
        outcomes
    }
}
