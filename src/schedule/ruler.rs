//! Count-trailing-zeros (CTZ) ruler eviction.
//!
//! A fixed heuristic that needs no search: each newly produced value is
//! kept, and the ruler sequence decides which older value to drop. Values
//! further from the current one are dropped first, so the kept positions
//! look like the ticks of a log2-scale axis:
//!
//! ```text
//! x
//! xx
//! xxx
//! x xx
//! x xxx
//! x x xx
//! x   xxx
//! x   x xx
//! ```
//!
//! After `n` steps exactly `ceil(log2(n)) + 1` values are kept. This is the
//! baseline the optimizer is compared against.

use crate::schedule::optimizer::{TrimError, Trimmer};
use crate::schedule::state::CacheState;

/// Lossily append `items` to `kept`, numbering them from `first_index`.
///
/// The latest item is never evicted and entries already in `kept` are left
/// untouched.
pub fn ctz_extend<T>(kept: &mut Vec<(usize, T)>, first_index: usize, items: impl IntoIterator<Item = T>) {
    let start = kept.len();
    let mut ruler = Ruler::default();
    for (i, item) in items.into_iter().enumerate() {
        kept.push((first_index + i, item));
        if let Some(victim) = ruler.advance() {
            kept.remove(start + victim);
        }
    }
}

/// Ruler sequence state.
#[derive(Debug, Clone)]
struct Ruler {
    count: usize,
    max: i64,
}

impl Default for Ruler {
    fn default() -> Self {
        Self { count: 1, max: -2 }
    }
}

impl Ruler {
    /// Advance by one pushed item. Returns the offset of the item to evict.
    fn advance(&mut self) -> Option<usize> {
        let victim = self.max - i64::from(self.count.trailing_zeros());
        if victim <= 0 {
            self.count = 1;
            self.max += 1;
            None
        } else {
            self.count += 1;
            Some(victim as usize)
        }
    }
}

/// Iterator over the cache states produced by CTZ eviction, one per step.
///
/// Position 0 of each state is the most recently produced value. Stops once
/// the chain no longer fits in a [`CacheState`].
#[derive(Debug, Clone, Default)]
pub struct RulerSchedule {
    kept: Vec<usize>,
    step: usize,
    ruler: Ruler,
}

impl RulerSchedule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for RulerSchedule {
    type Item = CacheState;

    fn next(&mut self) -> Option<CacheState> {
        if self.step >= CacheState::WIDTH as usize {
            return None;
        }
        let current = self.step;
        self.kept.push(current);
        if let Some(victim) = self.ruler.advance() {
            self.kept.remove(victim);
        }
        self.step += 1;
        CacheState::from_positions(self.kept.iter().map(|&index| current - index))
    }
}

/// One row of the ruler-versus-optimizer comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulerComparison {
    /// State kept by CTZ eviction.
    pub ruler: CacheState,
    /// Budget both sides are held to: the ruler state's resident count.
    pub budget: u32,
    /// Sweep cost of the ruler state.
    pub ruler_cost: Result<u64, TrimError>,
    /// Sweep cost of the optimizer's trim of the fully resident chain of
    /// the same span.
    pub optimal_cost: Result<u64, TrimError>,
}

/// Compare a CTZ ruler state against the optimizer at the same budget.
///
/// Each side runs its own search, so a candidate cap applies to each
/// separately.
pub fn compare(trimmer: &Trimmer, ruler: CacheState) -> RulerComparison {
    let budget = ruler.resident_count();
    let full = CacheState::full(ruler.span());
    let optimal_cost = trimmer
        .optimize(budget, full)
        .and_then(|trimmed| trimmer.sweep_cost(budget, trimmed));
    RulerComparison {
        ruler,
        budget,
        ruler_cost: trimmer.sweep_cost(budget, ruler),
        optimal_cost,
    }
}
