//! A DPLL Boolean-satisfiability solver over a bit-packed CNF representation.
//!
//! This crate implements plain DPLL: decide, propagate, backtrack-with-flip, verify,
//! over clauses stored as dense `u64` membership/polarity bitmaps. It does not do
//! clause learning, restarts, two-watched-literal propagation, preprocessing, or
//! incremental solving; see [`Problem`] for the supported surface.
//!
//! Parsing DIMACS CNF input is a concern of the `dpllsat-bin` crate, not this one:
//! callers build a [`Problem`] by calling [`Problem::add_clause`] once per clause.

mod bitset;
mod decision;
mod error;
mod heuristic;
mod problem;
mod propagation;
mod watch;

pub use error::SolverError;
pub use heuristic::{HeuristicKind, XorShiftRng};
pub use problem::{Problem, SolveOutcome};
