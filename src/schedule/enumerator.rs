//! Trim enumeration: every state reachable by evicting exactly `n` positions.
//!
//! The lowest resident position is never a candidate for eviction. When it
//! is position 0 this keeps the value currently being produced available to
//! the caller. The search is exhaustive; the number of candidates is
//! `C(resident_count - 1, n)` under the default policy.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::schedule::state::CacheState;

/// Which resident positions are protected from eviction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPolicy {
    /// Protect only the lowest resident position.
    #[default]
    KeepCurrent,
    /// Also protect the highest resident position, which marks the end of
    /// the chain. Evicting it would shorten the chain rather than forget a
    /// value.
    PinChainEnd,
}

impl TrimPolicy {
    /// Positions of `state` that may be evicted under this policy, lowest first.
    pub fn evictable(self, state: CacheState) -> Vec<u32> {
        let mut positions: Vec<u32> = state.positions().skip(1).collect();
        if self == TrimPolicy::PinChainEnd {
            positions.pop();
        }
        positions
    }
}

/// Number of candidates [`visit_trims`] produces, saturating at `u64::MAX`.
pub fn candidate_count(n: u32, state: CacheState, policy: TrimPolicy) -> u64 {
    let k = policy.evictable(state).len() as u64;
    let n = u64::from(n);
    if n > k {
        return 0;
    }
    // C(k, n) built up as C(k - n + i, i), which stays integral at every step.
    let n = n.min(k - n);
    let mut count: u128 = 1;
    for i in 1..=n {
        count = count * u128::from(k - n + i) / u128::from(i);
        if count > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    count as u64
}

/// Visit every candidate trim of `state` that clears exactly `n` positions.
///
/// Each candidate is produced once. The visitor can stop the enumeration
/// early by returning [`ControlFlow::Break`].
pub fn visit_trims<B>(
    n: u32,
    state: CacheState,
    policy: TrimPolicy,
    visit: &mut impl FnMut(CacheState) -> ControlFlow<B>,
) -> ControlFlow<B> {
    let evictable = policy.evictable(state);
    if n as usize > evictable.len() {
        return ControlFlow::Continue(());
    }
    visit_from(&evictable, n, state, visit)
}

fn visit_from<B>(
    evictable: &[u32],
    n: u32,
    state: CacheState,
    visit: &mut impl FnMut(CacheState) -> ControlFlow<B>,
) -> ControlFlow<B> {
    if n == 0 {
        return visit(state);
    }
    // Leave enough positions to the right for the remaining evictions.
    let last = evictable.len() + 1 - n as usize;
    for (i, &pos) in evictable[..last].iter().enumerate() {
        visit_from(&evictable[i + 1..], n - 1, state.evict(pos), visit)?;
    }
    ControlFlow::Continue(())
}

/// Collect every candidate trim of `state` that clears exactly `n` positions.
pub fn candidate_trims(n: u32, state: CacheState, policy: TrimPolicy) -> Vec<CacheState> {
    let mut candidates = Vec::new();
    let _ = visit_trims(n, state, policy, &mut |candidate| -> ControlFlow<()> {
        candidates.push(candidate);
        ControlFlow::Continue(())
    });
    candidates
}
