//! ## qnet-core::report
//! **Run snapshots and multi-run aggregation**
//!
//! A [`SimulationReport`] is the immutable result of one run (or the sum/mean
//! of several). Aggregation works on an explicit accumulator:
//!
//! ```
//! use qnet_core::report::SimulationReport;
//!
//! # fn demo(runs: &[SimulationReport]) -> Result<(), qnet_core::ModelError> {
//! let mean = SimulationReport::mean_of(runs)?;
//! # Ok(()) }
//! ```
//!
//! Stations with unbounded capacity can reach different occupancy levels in
//! different runs, so state vectors of unequal length are zero-padded before
//! index-aligned addition.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueReport {
    pub id: String,
    /// Cumulative time per occupancy level; index = occupancy.
    pub times_in_state: Vec<f64>,
    /// Whole number for a single run, mean after averaging.
    pub clients_lost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub queues: Vec<QueueReport>,
    pub total_time: f64,
}

impl SimulationReport {
    /// Zeroed accumulator with no state entries for each station.
    pub fn empty<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queues: ids
                .into_iter()
                .map(|id| QueueReport {
                    id: id.into(),
                    times_in_state: Vec::new(),
                    clients_lost: 0.0,
                })
                .collect(),
            total_time: 0.0,
        }
    }

    /// Probability of station `queue` being at occupancy `state`. A report
    /// that covers no simulated time has probability 0 everywhere.
    pub fn probability(&self, queue: usize, state: usize) -> Option<f64> {
        let times = &self.queues.get(queue)?.times_in_state;
        times.get(state).map(|&t| self.share(t))
    }

    /// All state probabilities of one station.
    pub fn probabilities(&self, queue: usize) -> Option<Vec<f64>> {
        self.queues.get(queue).map(|q| {
            q.times_in_state
                .iter()
                .map(|&t| self.share(t))
                .collect()
        })
    }

    fn share(&self, time: f64) -> f64 {
        if self.total_time > 0.0 {
            time / self.total_time
        } else {
            0.0
        }
    }

    /// Adds `other` into `self`, zero-padding state vectors where needed.
    /// `other` is left untouched.
    pub fn sum_into(&mut self, other: &SimulationReport) -> Result<(), ModelError> {
        if self.queues.len() != other.queues.len() {
            return Err(ModelError::ReportMismatch(format!(
                "{} stations vs {}",
                self.queues.len(),
                other.queues.len()
            )));
        }
        if let Some((a, b)) = self
            .queues
            .iter()
            .zip(&other.queues)
            .find(|(a, b)| a.id != b.id)
        {
            return Err(ModelError::ReportMismatch(format!(
                "station \"{}\" vs \"{}\"",
                a.id, b.id
            )));
        }

        self.total_time += other.total_time;
        for (acc, run) in self.queues.iter_mut().zip(&other.queues) {
            acc.clients_lost += run.clients_lost;
            if acc.times_in_state.len() < run.times_in_state.len() {
                acc.times_in_state.resize(run.times_in_state.len(), 0.0);
            }
            for (slot, t) in acc.times_in_state.iter_mut().zip(&run.times_in_state) {
                *slot += t;
            }
        }
        Ok(())
    }

    /// Divides every accumulated quantity by `runs`.
    pub fn average(&mut self, runs: usize) -> Result<(), ModelError> {
        if runs == 0 {
            return Err(ModelError::ZeroRuns);
        }
        let n = runs as f64;
        self.total_time /= n;
        for q in &mut self.queues {
            q.clients_lost /= n;
            for t in &mut q.times_in_state {
                *t /= n;
            }
        }
        Ok(())
    }

    /// Mean of `reports`, summed in slice order.
    pub fn mean_of(reports: &[SimulationReport]) -> Result<SimulationReport, ModelError> {
        let first = reports.first().ok_or(ModelError::ZeroRuns)?;
        let mut acc = SimulationReport::empty(first.queues.iter().map(|q| q.id.clone()));
        for report in reports {
            acc.sum_into(report)?;
        }
        acc.average(reports.len())?;
        Ok(acc)
    }

    /// BLAKE3 digest over every number in the report, as hex. Equal
    /// fingerprints mean bit-identical reports.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.total_time.to_bits().to_le_bytes());
        for q in &self.queues {
            hasher.update(q.id.as_bytes());
            hasher.update(&(q.times_in_state.len() as u64).to_le_bytes());
            for t in &q.times_in_state {
                hasher.update(&t.to_bits().to_le_bytes());
            }
            hasher.update(&q.clients_lost.to_bits().to_le_bytes());
        }
        hex::encode(hasher.finalize().as_bytes())
    }
}
