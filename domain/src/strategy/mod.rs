//! Evaluation strategies and their selection
//!
//! A run is governed by exactly one real [`EvaluationStrategy`]. Users may ask
//! for `random`, which [`selector::select_strategy`] resolves once from the
//! run seed.

pub mod evaluation;
pub mod selector;
