//! Crate-level black-box scenarios: full "build a problem, solve it, check the verdict"
//! round trips, as opposed to the unit-level tests living alongside each module.

use dpllsat::{HeuristicKind, Problem, SolveOutcome, XorShiftRng};

const ALL_HEURISTICS: [HeuristicKind; 3] = [
    HeuristicKind::Random,
    HeuristicKind::TwoClause,
    HeuristicKind::Polarity,
];

fn lit(v: i32) -> (u32, bool) {
    (v.unsigned_abs(), v < 0)
}

fn build(num_vars: u32, clauses: &[Vec<i32>], kind: HeuristicKind) -> Problem {
    let mut p = Problem::new(num_vars, clauses.len() as u32, kind).unwrap();
    for (id, clause) in clauses.iter().enumerate() {
        let literals: Vec<_> = clause.iter().map(|&v| lit(v)).collect();
        p.add_clause(id as u32, &literals).unwrap();
    }
    p
}

#[test]
fn scenario_1_single_unit_clause_is_sat() {
    for kind in ALL_HEURISTICS {
        let mut p = build(1, &[vec![1]], kind);
        match p.solve() {
            SolveOutcome::Sat(model) => assert_eq!(model, vec![true]),
            SolveOutcome::Unsat => panic!("x1 alone must be SAT"),
        }
    }
}

#[test]
fn scenario_2_contradictory_units_are_unsat() {
    for kind in ALL_HEURISTICS {
        let mut p = build(1, &[vec![1], vec![-1]], kind);
        assert_eq!(p.solve(), SolveOutcome::Unsat);
    }
}

#[test]
fn scenario_3_three_clause_three_variable_is_sat() {
    let clauses = vec![vec![1, 2], vec![-1, 3], vec![-2, -3]];
    for kind in ALL_HEURISTICS {
        let mut p = build(3, &clauses, kind);
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

/// Pigeonhole: 3 pigeons into 2 holes, var(p, h) = p*2 + h + 1.
fn pigeonhole(pigeons: i32, holes: i32) -> Vec<Vec<i32>> {
    let var = |p: i32, h: i32| p * holes + h + 1;
    let mut clauses = Vec::new();
    for p in 0..pigeons {
        clauses.push((0..holes).map(|h| var(p, h)).collect());
    }
    for h in 0..holes {
        for p1 in 0..pigeons {
            for p2 in (p1 + 1)..pigeons {
                clauses.push(vec![-var(p1, h), -var(p2, h)]);
            }
        }
    }
    clauses
}

#[test]
fn scenario_4_pigeonhole_three_into_two_is_unsat() {
    let clauses = pigeonhole(3, 2);
    for kind in ALL_HEURISTICS {
        let mut p = build(6, &clauses, kind);
        assert_eq!(p.solve(), SolveOutcome::Unsat, "heuristic {:?}", kind);
    }
}

/// Encodes the Einstein/Zebra five-houses riddle: same construction as
/// `demos/riddle-encoder`, inlined here so this crate's tests stay independent of that
/// binary crate.
fn zebra_riddle_clauses() -> Vec<Vec<i32>> {
    let var = |attribute: i32, position: i32| attribute * 5 + position + 1;
    let mut clauses: Vec<Vec<i32>> = Vec::new();

    for attribute in 0..25 {
        clauses.push((0..5).map(|position| var(attribute, position)).collect());
        for m in 0..5 {
            for n in (m + 1)..5 {
                clauses.push(vec![-var(attribute, m), -var(attribute, n)]);
            }
        }
    }
    for category in 0..5 {
        for position in 0..5 {
            for m in 0..5 {
                for n in (m + 1)..5 {
                    clauses.push(vec![
                        -var(category * 5 + m, position),
                        -var(category * 5 + n, position),
                    ]);
                }
            }
        }
    }

    let mut pair = |a: i32, b: i32| {
        for i in 0..5 {
            for k in 0..5 {
                if i != k {
                    clauses.push(vec![-var(a, i), -var(b, k)]);
                }
            }
        }
    };
    // Red=0 Blue=1 Green=2 Yellow=3 White=4
    // Brit=5 Swede=6 Dane=7 Norwegian=8 German=9
    // Dog=10 Bird=11 Cat=12 Horse=13 Fish=14
    // Tea=15 Coffee=16 Milk=17 Beer=18 Water=19
    // PallMall=20 Dunhill=21 Blends=22 Bluemasters=23 Prince=24
    pair(5, 0); // Brit, Red
    pair(6, 10); // Swede, Dog
    pair(7, 15); // Dane, Tea
    pair(2, 16); // Green, Coffee
    pair(20, 11); // PallMall, Bird
    pair(3, 21); // Yellow, Dunhill
    pair(23, 18); // Bluemasters, Beer
    pair(9, 24); // German, Prince

    let left_of = |clauses: &mut Vec<Vec<i32>>, a: i32, b: i32| {
        for i in 0..5 {
            for k in 0..5 {
                if i + 1 != k {
                    clauses.push(vec![-var(a, i), -var(b, k)]);
                }
            }
        }
    };
    left_of(&mut clauses, 2, 4); // Green left of White

    clauses.push(vec![var(17, 2)]); // Milk in house 2
    clauses.push(vec![var(8, 0)]); // Norwegian in house 0

    let next_to = |clauses: &mut Vec<Vec<i32>>, a: i32, b: i32| {
        for i in 0..5 {
            for k in 0..5 {
                if (k - i != 1) && (i - k != 1) {
                    clauses.push(vec![-var(a, i), -var(b, k)]);
                }
            }
        }
    };
    next_to(&mut clauses, 22, 12); // Blends, Cat
    next_to(&mut clauses, 13, 21); // Horse, Dunhill
    next_to(&mut clauses, 8, 1); // Norwegian, Blue
    next_to(&mut clauses, 22, 19); // Blends, Water

    clauses
}

#[test]
fn scenario_5_zebra_riddle_is_sat_with_water_drinker_german() {
    let clauses = zebra_riddle_clauses();
    for kind in ALL_HEURISTICS {
        let mut p = build(125, &clauses, kind);
        match p.solve() {
            SolveOutcome::Sat(model) => {
                // The canonical solution: the German owns the fish.
                let german_house = (0..5).find(|&h| model[(9 * 5 + h) as usize]).unwrap();
                let fish_house = (0..5).find(|&h| model[(14 * 5 + h) as usize]).unwrap();
                assert_eq!(german_house, fish_house, "heuristic {:?}", kind);
            }
            SolveOutcome::Unsat => panic!("zebra riddle must be SAT ({:?})", kind),
        }
    }
}

#[test]
fn scenario_6_random_3cnf_agrees_across_heuristics() {
    let num_vars = 50u32;
    let num_clauses = 150u32;
    let mut rng = XorShiftRng::new(12345);

    let mut clauses: Vec<Vec<i32>> = Vec::new();
    for _ in 0..num_clauses {
        let mut history = Vec::with_capacity(3);
        while history.len() < 3 {
            let candidate = (rng.gen_range(num_vars) + 1) as i32;
            if !history.contains(&candidate) {
                history.push(candidate);
            }
        }
        let clause = history
            .into_iter()
            .map(|v| if rng.gen_bool() { -v } else { v })
            .collect();
        clauses.push(clause);
    }

    let mut outcomes = Vec::new();
    for kind in ALL_HEURISTICS {
        let mut p = build(num_vars, &clauses, kind);
        outcomes.push(matches!(p.solve(), SolveOutcome::Sat(_)));
    }
    assert!(
        outcomes.iter().all(|&sat| sat == outcomes[0]),
        "heuristics disagreed on satisfiability: {:?}",
        outcomes
    );
}

#[test]
fn boundary_word_aligned_variable_counts_round_trip() {
    for &num_vars in &[1u32, 64, 65, 128] {
        let clauses: Vec<Vec<i32>> = (1..=num_vars as i32).map(|v| vec![v]).collect();
        let mut p = build(num_vars, &clauses, HeuristicKind::Polarity);
        match p.solve() {
            SolveOutcome::Sat(model) => assert!(model.iter().all(|&v| v)),
            SolveOutcome::Unsat => panic!("all-positive-unit-clause instance must be SAT"),
        }
    }
}

#[test]
fn boundary_tautological_clause_is_satisfiable() {
    for kind in ALL_HEURISTICS {
        let mut p = build(2, &[vec![1, -1], vec![2]], kind);
        match p.solve() {
            SolveOutcome::Sat(model) => assert!(model[1]),
            SolveOutcome::Unsat => panic!("(x1 v ~x1) ^ x2 must be SAT"),
        }
    }
}
