//! Generates random 3-CNF benchmark instances, one clause of exactly 3 distinct
//! variables at a time, each literal independently negated with 50% probability.
//!
//! Deliberately has no dependency on the `dpllsat` crate: a test-data generator must not
//! be able to accidentally share state or assumptions with the solver it is testing.

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process;

/// Same xorshift construction used by the solver crate's heuristics, but a separate
/// implementation on purpose (see module doc).
struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    fn new(seed: u64) -> Self {
        XorShiftRng {
            state: if seed == 0 { 0x9E3779B97F4A7C15 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn gen_range(&mut self, bound: u32) -> u32 {
        (self.next_u64() % bound as u64) as u32
    }
}

struct Options {
    output: String,
    variable_count: u32,
    clause_count: u32,
    seed: u64,
}

fn parse_args() -> Result<Options, String> {
    let mut args = env::args().skip(1);
    let output = args.next().ok_or("expected usage: dpllsat-gen <output>.cnf [--vars N] [--ratio R] [--seed S]")?;

    let mut variable_count = 50u32;
    let mut ratio = 4.3f64;
    let mut clause_count = None;
    let mut seed = 1u64;

    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| format!("expected a value after {}", flag))?;
        match flag.as_str() {
            "--vars" => variable_count = value.parse().map_err(|_| "invalid --vars value".to_string())?,
            "--clauses" => clause_count = Some(value.parse().map_err(|_| "invalid --clauses value".to_string())?),
            "--ratio" => ratio = value.parse().map_err(|_| "invalid --ratio value".to_string())?,
            "--seed" => seed = value.parse().map_err(|_| "invalid --seed value".to_string())?,
            other => return Err(format!("unrecognized flag {}", other)),
        }
    }

    let clause_count = clause_count.unwrap_or_else(|| (variable_count as f64 * ratio) as u32);

    Ok(Options {
        output,
        variable_count,
        clause_count,
        seed,
    })
}

/// Draws one clause of 3 distinct variables with independently random polarity.
fn generate_clause(rng: &mut XorShiftRng, variable_count: u32) -> [i32; 3] {
    let mut history = [0i32; 3];
    for k in 0..3 {
        let variable_id = loop {
            let candidate = (rng.gen_range(variable_count) + 1) as i32;
            if !history[..k].contains(&candidate) {
                break candidate;
            }
        };
        history[k] = if rng.gen_range(2) == 1 { -variable_id } else { variable_id };
    }
    history
}

fn write_cnf(opts: &Options, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "c Random 3-CNF, {} variables, seed {}", opts.variable_count, opts.seed)?;
    writeln!(out, "c By Calvin Khiddee-Wu")?;
    writeln!(out, "p cnf {} {}", opts.variable_count, opts.clause_count)?;

    let mut rng = XorShiftRng::new(opts.seed);
    for _ in 0..opts.clause_count {
        let clause = generate_clause(&mut rng, opts.variable_count);
        for lit in &clause {
            write!(out, "{} ", lit)?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

fn main() {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("err: {}", message);
            process::exit(1);
        }
    };

    let file = match File::create(&opts.output) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("err: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_cnf(&opts, file) {
        eprintln!("err: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_clauses_have_three_distinct_variables() {
        let mut rng = XorShiftRng::new(42);
        for _ in 0..200 {
            let clause = generate_clause(&mut rng, 50);
            let vars: Vec<i32> = clause.iter().map(|&l| l.unsigned_abs() as i32).collect();
            assert_ne!(vars[0], vars[1]);
            assert_ne!(vars[0], vars[2]);
            assert_ne!(vars[1], vars[2]);
            for v in vars {
                assert!(v >= 1 && v <= 50);
            }
        }
    }

    #[test]
    fn same_seed_reproduces_same_instance() {
        let mut a = XorShiftRng::new(7);
        let mut b = XorShiftRng::new(7);
        for _ in 0..10 {
            assert_eq!(generate_clause(&mut a, 50), generate_clause(&mut b, 50));
        }
    }
}
