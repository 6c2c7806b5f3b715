//! Property-based tests for the trim search.

use proptest::prelude::*;

use checkpoint_trim::config::SearchConfig;
use checkpoint_trim::schedule::{candidate_trims, CacheState, SweepStep, TrimPolicy, Trimmer};

// Widths stay small: the search is exhaustive.
fn small_state(width: u32) -> impl Strategy<Value = CacheState> {
    (0u64..(1 << width)).prop_map(CacheState::from_bits)
}

fn pinned() -> Trimmer {
    Trimmer::new(SearchConfig {
        policy: TrimPolicy::PinChainEnd,
        ..Default::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A trimmed state is already within budget, so trimming again is a no-op.
    #[test]
    fn optimize_is_idempotent(state in small_state(10), budget in 0u32..8) {
        let trimmer = Trimmer::default();
        if let Ok(once) = trimmer.optimize(budget, state) {
            prop_assert!(once.resident_count() <= budget);
            prop_assert_eq!(trimmer.optimize(budget, once), Ok(once));
        }
    }

    /// Position 0 is never evicted, and nothing is ever added.
    #[test]
    fn optimize_preserves_bit_zero(state in small_state(10), budget in 0u32..8) {
        if let Ok(trimmed) = Trimmer::default().optimize(budget, state) {
            prop_assert_eq!(trimmed.is_resident(0), state.is_resident(0));
            prop_assert_eq!(trimmed.bits() & !state.bits(), 0);
        }
    }

    #[test]
    fn candidates_preserve_bit_zero(state in small_state(10), n in 0u32..5) {
        for candidate in candidate_trims(n, state, TrimPolicy::KeepCurrent) {
            prop_assert_eq!(candidate.is_resident(0), state.is_resident(0));
            prop_assert_eq!(candidate.resident_count() + n, state.resident_count());
        }
    }

    /// With position 0 resident, any positive budget has a schedule.
    #[test]
    fn feasibility_floor(bits in 0u64..(1 << 9), budget in 1u32..6) {
        let state = CacheState::from_bits(bits | 1);
        prop_assert!(Trimmer::default().optimize(budget, state).is_ok());
    }

    /// The recorded sweep adds up to the sweep cost.
    #[test]
    fn trace_sums_to_cost(state in small_state(9), budget in 1u32..6) {
        let trimmer = Trimmer::default();
        let cost = trimmer.sweep_cost(budget, state);
        let traced = trimmer
            .sweep_trace(budget, state)
            .map(|steps| steps.iter().map(SweepStep::cost).sum::<u64>());
        prop_assert_eq!(cost, traced);
    }

    /// With the chain end pinned, more memory never costs more recompute.
    #[test]
    fn pinned_cost_is_monotone_in_budget(state in small_state(8)) {
        let trimmer = pinned();
        let mut previous: Option<u64> = None;
        for budget in 0u32..10 {
            let cost = trimmer
                .optimize(budget, state)
                .and_then(|trimmed| trimmer.sweep_cost(budget, trimmed))
                .ok();
            if let Some(prev) = previous {
                prop_assert!(cost.is_some(), "budget {} lost feasibility", budget);
                prop_assert!(cost.unwrap() <= prev);
            }
            if cost.is_some() {
                previous = cost;
            }
        }
    }
}
