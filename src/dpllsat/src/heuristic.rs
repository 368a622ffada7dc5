//! Splitting heuristics: build-time precomputation plus runtime variable/value selection.
//!
//! Priority tables built here are never re-ranked mid-search — this is DPLL, not CDCL
//! with VSIDS.

use crate::bitset::{Assignment, ClauseStore};

/// Which splitting heuristic a [`crate::Problem`](crate::problem::Problem) was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicKind {
    /// Uniform-random variable and value.
    Random,
    /// Prefer variables occurring most often in 2-literal clauses; always try `true` first.
    TwoClause,
    /// Prefer variables with the most lopsided polarity; try the majority polarity first.
    Polarity,
}

/// A small, fast, seedable xorshift generator. Not cryptographically secure, just a
/// reproducible, fast deterministic pseudo-random generator.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        XorShiftRng {
            state: if seed == 0 { 0x9E3779B97F4A7C15 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// A uniform value in `0..bound`. `bound` must be nonzero.
    pub fn gen_range(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        (self.next_u64() % bound as u64) as u32
    }

    pub fn gen_bool(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }
}

#[derive(Debug)]
pub struct Heuristics {
    kind: HeuristicKind,
    rng: XorShiftRng,
    /// Permutation of `0..variable_count`, sorted by descending occurrence count
    /// (TWO_CLAUSE / POLARITY only). Variable 0 is parked at index 0.
    priority: Vec<u32>,
    /// Per-clause literal count, accumulated during build (TWO_CLAUSE only).
    clause_width: Vec<u32>,
    /// Per-variable positive/negative occurrence counts (POLARITY only).
    pos_count: Vec<u32>,
    neg_count: Vec<u32>,
}

impl Heuristics {
    pub fn new(kind: HeuristicKind, variable_count: u32, clause_count: u32, seed: u64) -> Self {
        let (pos_count, neg_count) = match kind {
            HeuristicKind::Polarity => (
                vec![0u32; variable_count as usize],
                vec![0u32; variable_count as usize],
            ),
            _ => (Vec::new(), Vec::new()),
        };
        let clause_width = match kind {
            HeuristicKind::TwoClause => vec![0u32; clause_count as usize],
            _ => Vec::new(),
        };
        Heuristics {
            kind,
            rng: XorShiftRng::new(seed),
            priority: Vec::new(),
            clause_width,
            pos_count,
            neg_count,
        }
    }

    pub fn kind(&self) -> HeuristicKind {
        self.kind
    }

    /// Called once per literal as the clause store is built.
    pub fn record_literal(&mut self, clause_id: u32, var: u32, negated: bool) {
        match self.kind {
            HeuristicKind::TwoClause => self.clause_width[clause_id as usize] += 1,
            HeuristicKind::Polarity => {
                if negated {
                    self.neg_count[var as usize] += 1;
                } else {
                    self.pos_count[var as usize] += 1;
                }
            }
            HeuristicKind::Random => {}
        }
    }

    /// Builds the static priority permutation once the clause store is fully populated.
    /// Must run before the first call to `choose_variable`.
    pub fn finalize(&mut self, clauses: &ClauseStore, variable_count: u32) {
        match self.kind {
            HeuristicKind::Random => {}
            HeuristicKind::TwoClause => {
                let mut occ = vec![0u32; variable_count as usize];
                let words_per_clause = clauses.words_per_clause() as usize;
                for clause_id in 0..clauses.clause_count() {
                    if self.clause_width[clause_id as usize] != 2 {
                        continue;
                    }
                    let (membership, _) = clauses.clause_words(clause_id);
                    for word_idx in 0..words_per_clause {
                        let mut word = membership[word_idx];
                        while word != 0 {
                            let bit = word.trailing_zeros();
                            let var = (word_idx as u32) * 64 + bit;
                            occ[var as usize] += 1;
                            word &= word - 1;
                        }
                    }
                }
                self.priority = sorted_priority(variable_count, &occ);
            }
            HeuristicKind::Polarity => {
                let occ: Vec<u32> = (0..variable_count)
                    .map(|v| self.pos_count[v as usize].max(self.neg_count[v as usize]))
                    .collect();
                self.priority = sorted_priority(variable_count, &occ);
            }
        }
    }

    /// Returns the next unassigned variable to branch on, or `None` if every variable
    /// (including the sentinel, which is always assigned) is already assigned.
    pub fn choose_variable(&mut self, assignment: &Assignment, variable_count: u32) -> Option<u32> {
        if assignment.all_assigned() {
            return None;
        }
        match self.kind {
            HeuristicKind::Random => loop {
                let var = self.rng.gen_range(variable_count - 1) + 1;
                if !assignment.is_assigned(var) {
                    return Some(var);
                }
            },
            HeuristicKind::TwoClause | HeuristicKind::Polarity => self
                .priority
                .iter()
                .copied()
                .find(|&v| !assignment.is_assigned(v)),
        }
    }

    pub fn choose_value(&mut self, var: u32) -> bool {
        match self.kind {
            HeuristicKind::Random => self.rng.gen_bool(),
            HeuristicKind::Polarity => self.pos_count[var as usize] > self.neg_count[var as usize],
            HeuristicKind::TwoClause => true,
        }
    }
}

/// Variable 0 parked at index 0; `1..variable_count` sorted by descending `occ`, ties
/// broken by ascending variable id (a stable sort over the already-ascending identity
/// permutation achieves this for free).
fn sorted_priority(variable_count: u32, occ: &[u32]) -> Vec<u32> {
    let mut priority: Vec<u32> = (0..variable_count).collect();
    priority[1..].sort_by(|&a, &b| occ[b as usize].cmp(&occ[a as usize]));
    priority
}
