//! Bit-packed clause storage (clause membership/polarity) and assignment state.
//!
//! Both are dense row-major `u64` bitmaps over `0..variable_count`, where `variable_count`
//! already includes the sentinel variable 0 (always true, used to collapse tautological
//! clauses — see `ClauseStore::add_literal`).

/// Number of 64-bit words needed to hold one bit per variable in `0..variable_count`.
pub fn words_for(variable_count: u32) -> u32 {
    ((variable_count as u64 + 63) / 64) as u32
}

fn word_mask(var: u32) -> u64 {
    1u64 << (var & 63)
}

/// Dense storage of clause membership and literal polarity.
///
/// `membership[c]` has bit `v` set iff variable `v` appears in clause `c`; `negations[c]`
/// has bit `v` set iff that appearance is negated. Invariant: `negations[c] & !membership[c] == 0`.
#[derive(Debug, Clone)]
pub struct ClauseStore {
    clause_count: u32,
    words_per_clause: u32,
    membership: Vec<u64>,
    negations: Vec<u64>,
}

impl ClauseStore {
    pub fn new(clause_count: u32, words_per_clause: u32) -> Self {
        let len = clause_count as usize * words_per_clause as usize;
        ClauseStore {
            clause_count,
            words_per_clause,
            membership: vec![0u64; len],
            negations: vec![0u64; len],
        }
    }

    pub fn clause_count(&self) -> u32 {
        self.clause_count
    }

    pub fn words_per_clause(&self) -> u32 {
        self.words_per_clause
    }

    fn word_index(&self, clause_id: u32, var: u32) -> usize {
        clause_id as usize * self.words_per_clause as usize + (var >> 6) as usize
    }

    pub fn has_var(&self, clause_id: u32, var: u32) -> bool {
        self.membership[self.word_index(clause_id, var)] & word_mask(var) != 0
    }

    pub fn is_negated(&self, clause_id: u32, var: u32) -> bool {
        self.negations[self.word_index(clause_id, var)] & word_mask(var) != 0
    }

    /// Sets variable `var` as a member of `clause_id`, negated according to `negated`.
    ///
    /// Returns `false` if the clause already contained `var` (the caller must then perform
    /// the tautological-clause collapse described in `Problem::add_literal`), `true` if the
    /// literal was freshly recorded.
    pub fn add_literal(&mut self, clause_id: u32, var: u32, negated: bool) -> bool {
        let idx = self.word_index(clause_id, var);
        let mask = word_mask(var);
        if self.membership[idx] & mask != 0 {
            return false;
        }
        self.membership[idx] |= mask;
        if negated {
            self.negations[idx] |= mask;
        }
        true
    }

    /// The two aligned word slices (membership, negations) for one clause.
    pub fn clause_words(&self, clause_id: u32) -> (&[u64], &[u64]) {
        let start = clause_id as usize * self.words_per_clause as usize;
        let end = start + self.words_per_clause as usize;
        (&self.membership[start..end], &self.negations[start..end])
    }

    /// Debug-only check of the `negations ⊆ membership` invariant, clause by clause.
    pub fn debug_assert_invariant(&self) {
        debug_assert!(self
            .negations
            .iter()
            .zip(self.membership.iter())
            .all(|(&n, &m)| n & !m == 0));
    }
}

/// Which variables are currently assigned, and to which value.
///
/// Variable 0 (the always-true sentinel) is assigned at construction and must never be
/// touched again.
#[derive(Debug, Clone)]
pub struct Assignment {
    words: u32,
    unassigned: Vec<u64>,
    values: Vec<u64>,
}

impl Assignment {
    pub fn new(variable_count: u32, words: u32) -> Self {
        let mut unassigned = vec![u64::max_value(); words as usize];
        let total_bits = words as u64 * 64;
        if (variable_count as u64) < total_bits {
            let valid_bits = variable_count as u64 - (words as u64 - 1) * 64;
            let last = unassigned.len() - 1;
            unassigned[last] = if valid_bits >= 64 {
                u64::max_value()
            } else {
                (1u64 << valid_bits) - 1
            };
        }
        let mut assignment = Assignment {
            words,
            unassigned,
            values: vec![0u64; words as usize],
        };
        // Sentinel variable 0 is permanently assigned true.
        assignment.unassigned[0] &= !1u64;
        assignment.values[0] |= 1u64;
        assignment
    }

    pub fn is_assigned(&self, var: u32) -> bool {
        self.unassigned[(var >> 6) as usize] & word_mask(var) == 0
    }

    pub fn value(&self, var: u32) -> bool {
        self.values[(var >> 6) as usize] & word_mask(var) != 0
    }

    /// Assigns `var` to `value`. Precondition: `var` is currently unassigned.
    pub fn assign(&mut self, var: u32, value: bool) {
        debug_assert!(
            !self.is_assigned(var),
            "assigning already-assigned variable x{}",
            var
        );
        let w = (var >> 6) as usize;
        let mask = word_mask(var);
        self.unassigned[w] &= !mask;
        if value {
            self.values[w] |= mask;
        } else {
            self.values[w] &= !mask;
        }
    }

    pub fn all_assigned(&self) -> bool {
        self.unassigned.iter().all(|&w| w == 0)
    }

    pub fn unassigned_words(&self) -> &[u64] {
        &self.unassigned
    }

    pub fn value_words(&self) -> &[u64] {
        &self.values
    }

    pub fn word_count(&self) -> u32 {
        self.words
    }

    /// Copies the current `unassigned` bitmap into `buf` (used to populate a decision
    /// frame's snapshot *before* the decision's own assignment is applied).
    pub fn snapshot_into(&self, buf: &mut [u64]) {
        buf.copy_from_slice(&self.unassigned);
    }

    /// Restores `unassigned` from a previously captured snapshot, undoing a decision and
    /// every forced consequence made since it.
    pub fn restore_unassigned(&mut self, snapshot: &[u64]) {
        self.unassigned.copy_from_slice(snapshot);
    }
}
