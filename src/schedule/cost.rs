//! Recompute cost model.
//!
//! A sweep walks the chain from position 0 upward. Resident positions cost
//! nothing. A missing position forces recomputation from the nearest
//! resident position above it, which materialises the whole gap; the rest of
//! the chain is then re-trimmed at one less unit of budget while that run is
//! held.
//!
//! ```text
//! sweep_cost(B, 0)           = 0
//! sweep_cost(B, s), s[0] = 1 = sweep_cost(B, s >> 1)
//! sweep_cost(B, s), s[0] = 0 = gap(s) + sweep_cost(B, reconstruct(B, s))
//! ```

use crate::schedule::optimizer::{Search, TrimError, Trimmer};
use crate::schedule::state::CacheState;
use crate::schedule::trace::SweepStep;

impl Search {
    /// Recompute the run of missing positions starting at position 0.
    pub(crate) fn reconstruct_missing_run(
        &mut self,
        budget: u32,
        state: CacheState,
    ) -> Result<(u64, CacheState), TrimError> {
        debug_assert!(!state.is_resident(0), "position 0 is already resident");

        // Nothing above the gap to recompute from.
        if state.is_empty() {
            return Err(TrimError::Infeasible { budget, state });
        }
        let reduced = budget
            .checked_sub(1)
            .ok_or(TrimError::Infeasible { budget, state })?;

        let cost = u64::from(state.gap_length());
        let filled = state.fill_low_gap();
        let rest = self.optimize(reduced, filled.drop_lowest())?;
        Ok((cost, rest.push_resident()))
    }

    pub(crate) fn sweep_cost(&mut self, budget: u32, state: CacheState) -> Result<u64, TrimError> {
        self.walk(budget, state, &mut |_| {})
    }

    /// Sweep `state` to completion, reporting every step to `on_step`.
    pub(crate) fn walk(
        &mut self,
        budget: u32,
        mut state: CacheState,
        on_step: &mut impl FnMut(SweepStep),
    ) -> Result<u64, TrimError> {
        let mut total = 0u64;
        while !state.is_empty() {
            if state.is_resident(0) {
                on_step(SweepStep::Advance { state });
                state = state.drop_lowest();
                continue;
            }
            let (cost, rebuilt) = self.reconstruct_missing_run(budget, state)?;
            on_step(SweepStep::Recompute {
                cost,
                before: state,
                after: rebuilt,
            });
            total += cost;
            state = rebuilt;
        }
        Ok(total)
    }
}

/// Sweep cost of `state` under the default search settings.
pub fn sweep_cost(budget: u32, state: CacheState) -> Result<u64, TrimError> {
    Trimmer::default().sweep_cost(budget, state)
}
