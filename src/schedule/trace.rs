//! Step-by-step record of a sweep, for reporting a schedule.

use serde::Serialize;

use crate::schedule::optimizer::{TrimError, Trimmer};
use crate::schedule::state::CacheState;

/// One step of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepStep {
    /// Position 0 was resident and is consumed.
    Advance { state: CacheState },
    /// Position 0 was missing; `cost` positions were recomputed.
    Recompute {
        cost: u64,
        before: CacheState,
        after: CacheState,
    },
}

impl SweepStep {
    pub fn cost(&self) -> u64 {
        match self {
            SweepStep::Advance { .. } => 0,
            SweepStep::Recompute { cost, .. } => *cost,
        }
    }
}

impl Trimmer {
    /// Sweep `state` to completion and record every step taken.
    pub fn sweep_trace(&self, budget: u32, state: CacheState) -> Result<Vec<SweepStep>, TrimError> {
        let mut steps = Vec::new();
        self.search()
            .walk(budget, state, &mut |step| steps.push(step))?;
        Ok(steps)
    }
}
