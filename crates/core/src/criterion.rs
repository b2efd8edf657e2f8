//! Stopping policy of the benchmark driver.
//!
//! A solver is run several times with an increasing [`Budget`] until the
//! objective value stops improving. The [`SufficientProgressCriterion`] gives
//! the budget schedule and the [`ProgressMonitor`] tracks the recorded values.
use std::fmt;
use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::budget::Budget;

/// Growth factor of the budget schedule
pub const RHO: f64 = 1.5;
/// Default relative progress threshold
pub const EPS_DEFAULT: f64 = 1e-10;
/// Default number of budgets without progress before stopping
pub const PATIENCE_DEFAULT: usize = 5;
/// Default maximum number of budgets tried
pub const MAX_RUNS_DEFAULT: usize = 100;

/// How the budget escalates between two runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Budgets are iteration counts: 0, 1, 2, 3, 4, 6, 9, 13, ...
    Iteration,
    /// Budgets are tolerances: infinity, 1, 1/1.5, 1/1.5^2, ...
    Tolerance,
}

/// Stop escalating once the relative improvement stays below `eps`
/// for `patience` consecutive budgets
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SufficientProgressCriterion {
    pub eps: f64,
    pub patience: usize,
    pub strategy: Strategy,
    pub max_runs: usize,
    pub timeout: Option<Duration>,
}

impl Default for SufficientProgressCriterion {
    fn default() -> Self {
        SufficientProgressCriterion {
            eps: EPS_DEFAULT,
            patience: PATIENCE_DEFAULT,
            strategy: Strategy::Iteration,
            max_runs: MAX_RUNS_DEFAULT,
            timeout: None,
        }
    }
}

impl SufficientProgressCriterion {
    pub fn eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn max_runs(mut self, max_runs: usize) -> Self {
        self.max_runs = max_runs;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The zero-effort budget of the schedule
    pub fn initial_budget(&self) -> Budget {
        match self.strategy {
            Strategy::Iteration => Budget::Iterations(0),
            Strategy::Tolerance => Budget::Tolerance(f64::INFINITY),
        }
    }

    /// Budget following `budget` in the schedule
    pub fn next_budget(&self, budget: &Budget) -> Budget {
        match *budget {
            Budget::Iterations(n) => {
                Budget::Iterations((n + 1).max((n as f64 * RHO).floor() as usize))
            }
            Budget::Tolerance(tol) if tol.is_infinite() => Budget::Tolerance(1.),
            Budget::Tolerance(tol) => Budget::Tolerance(tol / RHO),
        }
    }

    /// Start monitoring a new budget escalation
    pub fn start(&self) -> ProgressMonitor {
        ProgressMonitor {
            criterion: *self,
            first: None,
            best: f64::INFINITY,
            remaining_patience: self.patience,
            runs: 0,
            started: Instant::now(),
        }
    }
}

/// Why a budget escalation stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// No sufficient progress during `patience` budgets
    Converged,
    /// Objective value is not finite
    Diverged,
    /// `max_runs` budgets were tried
    MaxRuns,
    /// Timeout elapsed
    Timeout,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::Converged => "converged",
            StopReason::Diverged => "diverged",
            StopReason::MaxRuns => "max runs reached",
            StopReason::Timeout => "timeout",
        };
        write!(f, "{reason}")
    }
}

/// Mutable state of one budget escalation
#[derive(Clone, Debug)]
pub struct ProgressMonitor {
    criterion: SufficientProgressCriterion,
    first: Option<f64>,
    best: f64,
    remaining_patience: usize,
    runs: usize,
    started: Instant,
}

impl ProgressMonitor {
    /// Record the objective value reached with the last budget.
    /// Returns the reason to stop, if any.
    pub fn check(&mut self, objective_value: f64) -> Option<StopReason> {
        let reason = self.update(objective_value);
        if let Some(reason) = reason {
            debug!(
                "Stop after {} runs ({reason}): best objective {}",
                self.runs, self.best
            );
        }
        reason
    }

    fn update(&mut self, objective_value: f64) -> Option<StopReason> {
        self.runs += 1;
        if !objective_value.is_finite() {
            return Some(StopReason::Diverged);
        }
        let first = *self.first.get_or_insert(objective_value);
        let scale = first.abs().max(f64::MIN_POSITIVE);
        let delta = (self.best - objective_value) / scale;
        if self.best.is_infinite() || delta >= self.criterion.eps {
            self.best = objective_value;
            self.remaining_patience = self.criterion.patience;
        } else {
            self.remaining_patience = self.remaining_patience.saturating_sub(1);
            if self.remaining_patience == 0 {
                return Some(StopReason::Converged);
            }
        }
        if self.runs >= self.criterion.max_runs {
            return Some(StopReason::MaxRuns);
        }
        if let Some(timeout) = self.criterion.timeout {
            if self.started.elapsed() >= timeout {
                return Some(StopReason::Timeout);
            }
        }
        None
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn best(&self) -> f64 {
        self.best
    }
}
