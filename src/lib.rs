//! checkpoint-trim: optimal checkpoint/recompute schedules.
//!
//! A linear chain of values is replayed from position 0 upward. Only some
//! positions are held in memory; a missing one is recomputed from the
//! nearest held position above it. Given a memory budget, the trimmer picks
//! which held positions to drop so the replay recomputes as little as
//! possible.
//!
//! ```
//! use checkpoint_trim::schedule::{optimize, sweep_cost, CacheState};
//!
//! let state: CacheState = "xxxxxxx".parse().unwrap();
//! let trimmed = optimize(3, state).unwrap();
//! assert!(trimmed.resident_count() <= 3);
//! assert!(sweep_cost(3, trimmed).is_ok());
//! ```

pub mod config;
pub mod schedule;
