//! The `Problem` aggregate and the top-level DPLL driver (decide / propagate / backtrack
//! / verify).

use dpllsat_term_allocator::SnapshotArena;
use smallvec::SmallVec;

use crate::bitset::{words_for, Assignment, ClauseStore};
use crate::decision::DecisionStack;
use crate::error::SolverError;
use crate::heuristic::{HeuristicKind, Heuristics};
use crate::propagation::PropagationStack;
use crate::watch::{WatchEntry, WatchIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropagateResult {
    NoConflict,
    Conflict,
}

/// The outcome of checking one clause against the current assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseStatus {
    Satisfied,
    Conflict,
    Unit { var: u32, negated: bool },
    Unresolved,
}

/// The result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A total satisfying assignment. `model[i]` is the value of `x(i + 1)`.
    Sat(Vec<bool>),
    Unsat,
}

/// A CNF problem over variables `1..=num_vars` and `clause_count` clauses, built
/// incrementally via `add_clause` and then solved once via `solve`.
#[derive(Debug)]
pub struct Problem {
    num_vars: u32,
    /// Internal variable count, `num_vars + 1` to account for the sentinel variable 0.
    variable_count: u32,
    clause_count: u32,
    clauses: ClauseStore,
    assignment: Assignment,
    prop_stack: PropagationStack,
    decisions: DecisionStack,
    heuristics: Heuristics,
    arena: SnapshotArena,
    watch: Option<WatchIndex>,
    /// Scratch buffer reused across backtracks to avoid an allocation per flip.
    restore_scratch: Vec<u64>,
    split_count: u64,
    /// Set when a parse-time unit clause directly contradicts an earlier one for the
    /// same variable; short-circuits `solve` to UNSAT without ever touching the watch
    /// index or the decision loop.
    build_conflict: bool,
}

impl Problem {
    pub fn new(num_vars: u32, clause_count: u32, heuristic: HeuristicKind) -> Result<Self, SolverError> {
        Self::new_with_seed(num_vars, clause_count, heuristic, 0xD1B54A32D192ED03)
    }

    pub fn new_with_seed(
        num_vars: u32,
        clause_count: u32,
        heuristic: HeuristicKind,
        seed: u64,
    ) -> Result<Self, SolverError> {
        if num_vars == 0 {
            return Err(SolverError::InvalidVariableCount);
        }
        if clause_count == 0 {
            return Err(SolverError::InvalidClauseCount);
        }

        // Add "variable x0", implicitly assigned true.
        let variable_count = num_vars + 1;
        let words = words_for(variable_count);

        Ok(Problem {
            num_vars,
            variable_count,
            clause_count,
            clauses: ClauseStore::new(clause_count, words),
            assignment: Assignment::new(variable_count, words),
            prop_stack: PropagationStack::new(variable_count),
            decisions: DecisionStack::new(variable_count),
            heuristics: Heuristics::new(heuristic, variable_count, clause_count, seed),
            arena: SnapshotArena::new(variable_count, words as usize),
            watch: None,
            restore_scratch: vec![0u64; words as usize],
            split_count: 0,
            build_conflict: false,
        })
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn clause_count(&self) -> u32 {
        self.clause_count
    }

    pub fn split_count(&self) -> u64 {
        self.split_count
    }

    /// Adds one full clause at once: `literals` is `(variable, is_negated)` pairs. If the
    /// clause has exactly one literal, that variable is immediately force-assigned (or, if
    /// already assigned with the opposite value, the problem is marked unsatisfiable at
    /// the build level, since `Assignment::assign` may never be called on an
    /// already-assigned variable).
    pub fn add_clause(&mut self, clause_id: u32, literals: &[(u32, bool)]) -> Result<(), SolverError> {
        if clause_id >= self.clause_count {
            return Err(SolverError::ClauseIndexOutOfRange {
                clause_id,
                clause_count: self.clause_count,
            });
        }
        for &(var, _) in literals {
            if var == 0 || var >= self.variable_count {
                return Err(SolverError::VariableOutOfRange {
                    var,
                    variable_count: self.num_vars,
                });
            }
        }

        for &(var, negated) in literals {
            self.add_literal(clause_id, var, negated);
        }

        if literals.len() == 1 {
            let (var, negated) = literals[0];
            let desired = !negated;
            if self.assignment.is_assigned(var) {
                if self.assignment.value(var) != desired {
                    self.build_conflict = true;
                }
            } else {
                self.force_assign(var, desired);
            }
        }

        Ok(())
    }

    fn add_literal(&mut self, clause_id: u32, var: u32, negated: bool) {
        self.heuristics.record_literal(clause_id, var, negated);
        if !self.clauses.add_literal(clause_id, var, negated) {
            // The clause already mentions `var` (in either polarity): it contains both
            // x and ~x and is trivially true. Collapse it via the always-true sentinel
            // variable 0 rather than threading a separate `satisfied` flag through the
            // whole representation.
            self.clauses.add_literal(clause_id, 0, false);
        }
    }

    fn force_assign(&mut self, var: u32, value: bool) {
        self.assignment.assign(var, value);
        self.prop_stack.push(var, value);
    }

    /// Runs the DPLL search to completion.
    pub fn solve(&mut self) -> SolveOutcome {
        if self.build_conflict {
            return SolveOutcome::Unsat;
        }

        self.heuristics.finalize(&self.clauses, self.variable_count);
        self.watch = Some(WatchIndex::build(
            &self.clauses,
            &self.assignment,
            self.variable_count,
        ));

        // Resolve every clause pinned entirely by parse-time unit clauses before making
        // the first decision: such a clause has no watch-list entry at all (see
        // `resolve_build_time_pinned_clauses`), so the ordinary watch-driven `propagate`
        // below could never discover a conflict or a forced literal among them on its
        // own. A formula fully pinned down by unit clauses alone (no free variable ever
        // chosen) would otherwise reach verification without ever being checked.
        if self.resolve_build_time_pinned_clauses() == PropagateResult::Conflict {
            return SolveOutcome::Unsat;
        }
        if self.propagate() == PropagateResult::Conflict {
            return SolveOutcome::Unsat;
        }

        loop {
            let var = match self.heuristics.choose_variable(&self.assignment, self.variable_count) {
                Some(v) => v,
                None => break,
            };

            self.split_count += 1;
            let value = self.heuristics.choose_value(var);
            #[cfg(feature = "logging")]
            log::trace!(
                "split #{}: x{} = {} ({:?})",
                self.split_count,
                var,
                value,
                self.heuristics.kind()
            );

            let snapshot = self.arena.alloc();
            {
                let Problem {
                    ref assignment,
                    ref mut arena,
                    ..
                } = *self;
                assignment.snapshot_into(arena.buffer_mut(&snapshot));
            }

            self.assignment.assign(var, value);
            self.prop_stack.push(var, value);
            self.decisions.push(var, value, snapshot);

            while self.propagate() == PropagateResult::Conflict {
                #[cfg(feature = "logging")]
                log::trace!("conflict at decision depth {}", self.decisions.len());
                loop {
                    let tried_both = self
                        .decisions
                        .top()
                        .expect("conflict with an empty decision stack")
                        .tried_both;
                    if !tried_both {
                        break;
                    }
                    let frame = self.decisions.pop().unwrap();
                    self.arena.free(frame.snapshot);
                    if self.decisions.is_empty() {
                        return SolveOutcome::Unsat;
                    }
                }

                let snapshot = self.decisions.top().unwrap().snapshot;
                {
                    let Problem {
                        ref arena,
                        ref mut restore_scratch,
                        ..
                    } = *self;
                    restore_scratch.copy_from_slice(arena.buffer(&snapshot));
                }
                self.assignment.restore_unassigned(&self.restore_scratch);

                self.decisions.flip_top();
                let frame = *self.decisions.top().unwrap();
                // The snapshot predates the decision's own assignment, so restoring it
                // already marked `frame.var` unassigned again; re-assigning it with the
                // flipped value re-enters propagation with the opposite polarity.
                self.assignment.assign(frame.var, frame.value);
                self.prop_stack.push(frame.var, frame.value);
            }
        }

        self.verify();
        SolveOutcome::Sat(self.extract_model())
    }

    /// Classifies `clause_id` against the current assignment: satisfied, conflicting,
    /// unit (with the forced literal), or still having 2+ unassigned literals.
    fn classify_clause(&self, clause_id: u32) -> ClauseStatus {
        let words_per_clause = self.clauses.words_per_clause() as usize;
        let (membership, negations) = self.clauses.clause_words(clause_id);
        let unassigned_words = self.assignment.unassigned_words();
        let value_words = self.assignment.value_words();

        let mut unassigned_count: u32 = 0;
        let mut unit_var = 0u32;
        let mut unit_negated = false;

        for w in 0..words_per_clause {
            let assigned_word = !unassigned_words[w];
            let clause_word = membership[w];
            let neg_word = negations[w];

            let unknown = clause_word & !assigned_word;
            if unknown != 0 {
                if unassigned_count == 0 {
                    let bit = unknown.trailing_zeros();
                    unit_var = (w as u32) * 64 + bit;
                    unit_negated = neg_word & (1u64 << bit) != 0;
                }
                unassigned_count += unknown.count_ones();
            }

            if assigned_word & clause_word & (value_words[w] ^ neg_word) != 0 {
                return ClauseStatus::Satisfied;
            }
        }

        match unassigned_count {
            0 => ClauseStatus::Conflict,
            1 => ClauseStatus::Unit {
                var: unit_var,
                negated: unit_negated,
            },
            _ => ClauseStatus::Unresolved,
        }
    }

    /// A single full pass over every clause, checked directly against the current
    /// assignment rather than via the watch index.
    ///
    /// The watch index omits every variable already assigned at build time (§4.E), so a
    /// clause whose *every* member was pinned by a parse-time unit clause ends up with no
    /// watch-list entry anywhere: none of its variables will ever be popped from the
    /// propagation stack again, so the ordinary watch-driven `propagate` can never visit
    /// it. This pass catches a conflict among such clauses, and forces the lone free
    /// variable of any clause left unit by parse-time pins alone; any further
    /// consequences of that forced variable are then picked up normally by `propagate`,
    /// since a variable forced here was by definition still unassigned when the watch
    /// index was built, and so does have proper watch-list entries of its own.
    fn resolve_build_time_pinned_clauses(&mut self) -> PropagateResult {
        for clause_id in 0..self.clause_count {
            match self.classify_clause(clause_id) {
                ClauseStatus::Satisfied | ClauseStatus::Unresolved => {}
                ClauseStatus::Conflict => {
                    self.prop_stack.clear();
                    return PropagateResult::Conflict;
                }
                ClauseStatus::Unit { var, negated } => self.force_assign(var, !negated),
            }
        }
        PropagateResult::NoConflict
    }

    fn propagate(&mut self) -> PropagateResult {
        while let Some((var, value)) = self.prop_stack.pop() {
            // Copied out to a small owned buffer so the loop body below is free to call
            // `force_assign` (`&mut self`) without holding a live borrow of `self.watch`
            // across it.
            let entries: SmallVec<[WatchEntry; 4]> = self
                .watch
                .as_ref()
                .expect("propagate called before the watch index was built")
                .entries(var)
                .copied()
                .collect();

            for entry in entries {
                let literal_value = value ^ entry.negated;
                if literal_value {
                    // The literal through `var` is true: the clause is satisfied.
                    continue;
                }

                match self.classify_clause(entry.clause_id) {
                    ClauseStatus::Satisfied | ClauseStatus::Unresolved => {}
                    ClauseStatus::Conflict => {
                        self.prop_stack.clear();
                        return PropagateResult::Conflict;
                    }
                    ClauseStatus::Unit { var, negated } => self.force_assign(var, !negated),
                }
            }
        }

        PropagateResult::NoConflict
    }

    fn verify(&self) {
        debug_assert!(self.assignment.all_assigned());
        for clause_id in 0..self.clause_count {
            let (membership, negations) = self.clauses.clause_words(clause_id);
            let mut satisfied = false;
            for w in 0..membership.len() {
                let mut word = membership[w];
                while word != 0 {
                    let bit = word.trailing_zeros();
                    let var = (w as u32) * 64 + bit;
                    word &= word - 1;
                    let value = self.assignment.value(var);
                    let negated = negations[w] & (1u64 << bit) != 0;
                    if value ^ negated {
                        satisfied = true;
                        break;
                    }
                }
                if satisfied {
                    break;
                }
            }
            assert!(satisfied, "verification failed at clause{}", clause_id);
        }
    }

    fn extract_model(&self) -> Vec<bool> {
        (1..=self.num_vars).map(|v| self.assignment.value(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i32) -> (u32, bool) {
        (v.unsigned_abs(), v < 0)
    }

    fn build(num_vars: u32, clauses: &[&[i32]], kind: HeuristicKind) -> Problem {
        let mut p = Problem::new(num_vars, clauses.len() as u32, kind).unwrap();
        for (id, clause) in clauses.iter().enumerate() {
            let literals: Vec<_> = clause.iter().map(|&v| lit(v)).collect();
            p.add_clause(id as u32, &literals).unwrap();
        }
        p
    }

    #[test]
    fn single_unit_clause_is_sat() {
        for kind in [HeuristicKind::Random, HeuristicKind::TwoClause, HeuristicKind::Polarity] {
            let mut p = build(1, &[&[1]], kind);
            match p.solve() {
                SolveOutcome::Sat(model) => assert_eq!(model, vec![true]),
                SolveOutcome::Unsat => panic!("expected SAT"),
            }
        }
    }

    #[test]
    fn contradictory_unit_clauses_are_unsat() {
        for kind in [HeuristicKind::Random, HeuristicKind::TwoClause, HeuristicKind::Polarity] {
            let mut p = build(1, &[&[1], &[-1]], kind);
            assert_eq!(p.solve(), SolveOutcome::Unsat);
        }
    }

    #[test]
    fn tautological_clause_does_not_fault() {
        let mut p = build(1, &[&[1, -1]], HeuristicKind::TwoClause);
        match p.solve() {
            SolveOutcome::Sat(_) => {}
            SolveOutcome::Unsat => panic!("(x v ~x) must be satisfiable"),
        }
    }

    #[test]
    fn conflict_among_entirely_unit_pinned_clauses_is_unsat() {
        // x1 and x2 are both pinned by their own unit clauses, so the third clause
        // (-x1 v -x2) has no free variable left at all by the time the watch index is
        // built: it must be caught by the build-time scan, not by watch-driven
        // propagation, or this would otherwise reach `verify` and panic instead of
        // returning UNSAT.
        for kind in [HeuristicKind::Random, HeuristicKind::TwoClause, HeuristicKind::Polarity] {
            let mut p = build(2, &[&[1], &[2], &[-1, -2]], kind);
            assert_eq!(p.solve(), SolveOutcome::Unsat, "heuristic {:?}", kind);
        }
    }

    #[test]
    fn three_variable_instance_is_sat_across_heuristics() {
        let clauses: &[&[i32]] = &[&[1, 2], &[-1, 3], &[-2, -3]];
        for kind in [HeuristicKind::Random, HeuristicKind::TwoClause, HeuristicKind::Polarity] {
            let mut p = build(3, clauses, kind);
            match p.solve() {
                SolveOutcome::Sat(model) => {
                    assert!(model[0] || model[1]);
                    assert!(!model[0] || model[2]);
                    assert!(!model[1] || !model[2]);
                }
                SolveOutcome::Unsat => panic!("expected SAT"),
            }
        }
    }

    #[test]
    fn pigeonhole_three_into_two_is_unsat() {
        // p1 in h1 or h2; p2 in h1 or h2; p3 in h1 or h2; each hole holds at most one pigeon.
        // Variable encoding: var(p, h) = p*2 + h + 1, p,h in {0,1} for holes, p in {0,1,2}.
        fn var(p: i32, h: i32) -> i32 {
            p * 2 + h + 1
        }
        let mut clauses: Vec<Vec<i32>> = Vec::new();
        for p in 0..3 {
            clauses.push(vec![var(p, 0), var(p, 1)]);
        }
        for h in 0..2 {
            for p1 in 0..3 {
                for p2 in (p1 + 1)..3 {
                    clauses.push(vec![-var(p1, h), -var(p2, h)]);
                }
            }
        }
        for kind in [HeuristicKind::Random, HeuristicKind::TwoClause, HeuristicKind::Polarity] {
            let refs: Vec<&[i32]> = clauses.iter().map(|c| c.as_slice()).collect();
            let mut p = build(6, &refs, kind);
            assert_eq!(p.solve(), SolveOutcome::Unsat, "heuristic {:?}", kind);
        }
    }

    #[test]
    fn word_boundary_variable_counts_solve() {
        for &num_vars in &[64u32, 65, 128] {
            let clauses: Vec<Vec<i32>> = (1..=num_vars as i32).map(|v| vec![v]).collect();
            let refs: Vec<&[i32]> = clauses.iter().map(|c| c.as_slice()).collect();
            let mut p = build(num_vars, &refs, HeuristicKind::TwoClause);
            match p.solve() {
                SolveOutcome::Sat(model) => assert!(model.iter().all(|&v| v)),
                SolveOutcome::Unsat => panic!("all-unit-clause instance must be SAT"),
            }
        }
    }

    #[test]
    fn split_count_matches_decisions_made() {
        let mut p = build(3, &[&[1, 2], &[-1, 3], &[-2, -3]], HeuristicKind::TwoClause);
        let before = p.split_count();
        assert_eq!(before, 0);
        p.solve();
        assert!(p.split_count() >= 1);
    }
}
