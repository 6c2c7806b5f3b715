//! Checkpoint schedule search.
//!
//! This module contains the trimming engine:
//! - [`state`]: CacheState bit set and its textual notation
//! - [`cost`]: Recompute cost of sweeping a state
//! - [`enumerator`]: Candidate trims of a state
//! - [`optimizer`]: Exhaustive search for the cheapest trim
//! - [`trace`]: Step-by-step sweep records
//! - [`ruler`]: CTZ ruler eviction, a search-free baseline

pub mod cost;
pub mod enumerator;
pub mod optimizer;
pub mod ruler;
pub mod state;
pub mod trace;

pub use cost::sweep_cost;
pub use enumerator::{candidate_trims, TrimPolicy};
pub use optimizer::{optimize, TrimError, Trimmer};
pub use state::{CacheState, NotationError};
pub use trace::SweepStep;
