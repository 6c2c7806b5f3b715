//! Trim optimizer: picks the eviction pattern with the least replay cost.
//!
//! Given a budget and a state holding more resident positions than the
//! budget allows, every candidate trim is scored with the sweep cost model
//! and the cheapest one wins. Scoring a candidate may itself need a nested
//! optimisation at a smaller budget (see [`cost`](crate::schedule::cost)),
//! so the two are mutually recursive.
//!
//! The search is exhaustive. [`SearchConfig::max_candidates`] caps the total
//! number of candidates scored across all nested searches of one call; when
//! the cap is hit the call fails with [`TrimError::SearchTruncated`].

use std::ops::ControlFlow;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::schedule::enumerator::{candidate_count, visit_trims, TrimPolicy};
use crate::schedule::state::CacheState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrimError {
    #[error("No trim of state {state:?} fits within budget {budget}")]
    Infeasible { budget: u32, state: CacheState },

    #[error("Search truncated after scoring {limit} candidates")]
    SearchTruncated { limit: u64 },
}

/// Entry point for schedule searches.
#[derive(Debug, Clone, Default)]
pub struct Trimmer {
    config: SearchConfig,
}

impl Trimmer {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Trim `state` down to at most `budget` resident positions, minimising
    /// the recompute cost of a full sweep.
    ///
    /// Returns `state` unchanged when it already fits.
    pub fn optimize(&self, budget: u32, state: CacheState) -> Result<CacheState, TrimError> {
        let mut search = self.search();
        let result = search.optimize(budget, state);
        match &result {
            Ok(trimmed) => debug!(
                budget,
                input = %state,
                output = %trimmed,
                scored = search.scored,
                "Trim search finished"
            ),
            Err(TrimError::SearchTruncated { limit }) => {
                warn!(budget, input = %state, limit, "Trim search truncated")
            }
            Err(err) => debug!(budget, input = %state, %err, "Trim search failed"),
        }
        result
    }

    /// Total recompute cost of sweeping `state` to completion.
    pub fn sweep_cost(&self, budget: u32, state: CacheState) -> Result<u64, TrimError> {
        self.search().sweep_cost(budget, state)
    }

    /// Recompute the missing run at position 0.
    ///
    /// Returns the number of positions recomputed and the state afterwards,
    /// with position 0 resident.
    pub fn reconstruct_missing_run(
        &self,
        budget: u32,
        state: CacheState,
    ) -> Result<(u64, CacheState), TrimError> {
        self.search().reconstruct_missing_run(budget, state)
    }

    pub(crate) fn search(&self) -> Search {
        Search {
            policy: self.config.policy,
            limit: self.config.max_candidates,
            scored: 0,
        }
    }
}

/// State of a single top-level search. Shared by every nested optimisation
/// so the candidate cap applies to the whole call.
#[derive(Debug)]
pub(crate) struct Search {
    pub(crate) policy: TrimPolicy,
    pub(crate) limit: Option<u64>,
    pub(crate) scored: u64,
}

impl Search {
    pub(crate) fn optimize(&mut self, budget: u32, state: CacheState) -> Result<CacheState, TrimError> {
        let resident = state.resident_count();
        if resident <= budget {
            return Ok(state);
        }

        let n = resident - budget;
        let policy = self.policy;
        debug!(
            budget,
            resident,
            n,
            candidates = candidate_count(n, state, policy),
            state = %state,
            "Trimming"
        );

        let mut best: Option<(u64, CacheState)> = None;
        let flow = visit_trims(n, state, policy, &mut |candidate| {
            match self.score(budget, candidate) {
                Ok(cost) => {
                    trace!(candidate = %candidate, cost, "Scored candidate");
                    if best.map_or(true, |(best_cost, _)| cost < best_cost) {
                        best = Some((cost, candidate));
                    }
                    ControlFlow::Continue(())
                }
                // Candidates that cannot be swept are dropped from the search.
                Err(TrimError::Infeasible { .. }) => ControlFlow::Continue(()),
                Err(err) => ControlFlow::Break(err),
            }
        });

        if let ControlFlow::Break(err) = flow {
            return Err(err);
        }

        best.map(|(_, trimmed)| trimmed)
            .ok_or(TrimError::Infeasible { budget, state })
    }

    fn score(&mut self, budget: u32, candidate: CacheState) -> Result<u64, TrimError> {
        if let Some(limit) = self.limit {
            if self.scored >= limit {
                return Err(TrimError::SearchTruncated { limit });
            }
        }
        self.scored += 1;
        self.sweep_cost(budget, candidate)
    }
}

/// Trim `state` with the default, exhaustive search.
pub fn optimize(budget: u32, state: CacheState) -> Result<CacheState, TrimError> {
    Trimmer::default().optimize(budget, state)
}
