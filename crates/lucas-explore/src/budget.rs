//! Search budgets and stop reasons.
//!
//! Budgets cap iterations and wall-clock time for the stochastic
//! strategies. Running out of budget is a normal outcome: the strategy
//! stops and hands back the best code it has seen.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Caps for one search run. `None` means no cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchBudget {
    /// Maximum iterations (annealing moves or genetic generations).
    pub max_iterations: Option<u64>,
    /// Maximum wall-clock milliseconds before forced stop.
    pub max_wall_millis: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn iterations(max_iterations: u64) -> Self {
        Self {
            max_iterations: Some(max_iterations),
            max_wall_millis: None,
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A perfect code was found and verified.
    Solved,
    /// Every candidate within the configured bound was examined.
    Exhausted,
    /// Temperature fell below the configured floor.
    Cooled,
    /// The strategy's own iteration or generation count ran out.
    IterationLimit,
    /// The budget's iteration cap was hit.
    BudgetExhausted,
    /// Wall-clock limit exceeded.
    WallTimeExceeded,
    /// Another attempt raised the shared stop flag.
    Cancelled,
}

/// Check progress against a [`SearchBudget`].
#[derive(Debug, Clone)]
pub struct BudgetChecker {
    budget: SearchBudget,
    start_time: Instant,
}

impl BudgetChecker {
    pub fn new(budget: SearchBudget) -> Self {
        Self {
            budget,
            start_time: Instant::now(),
        }
    }

    /// Returns None if all ok, or the reason for stopping.
    pub fn check(&self, iterations: u64) -> Option<StopReason> {
        if self
            .budget
            .max_iterations
            .is_some_and(|max| iterations >= max)
        {
            return Some(StopReason::BudgetExhausted);
        }
        if self.wall_time_exceeded() {
            return Some(StopReason::WallTimeExceeded);
        }
        None
    }

    pub fn wall_time_exceeded(&self) -> bool {
        self.budget
            .max_wall_millis
            .is_some_and(|max| self.start_time.elapsed().as_millis() >= u128::from(max))
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }
}
