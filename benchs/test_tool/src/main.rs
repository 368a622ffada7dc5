//! Benchmark-suite driver: walks a directory tree for `.cnf` files, solves each on a
//! thread pool, and prints a pass/fail line per file plus a colored summary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;
use std::time::Instant;

use ansi_term::Colour::{Green, Red, Yellow};
use threadpool::ThreadPool;
use walkdir::WalkDir;

use dpllsat::{HeuristicKind, Problem, SolveOutcome};

struct Options {
    root: PathBuf,
    heuristic: HeuristicKind,
    workers: usize,
}

fn parse_args() -> Result<Options, String> {
    let mut args = env::args().skip(1);
    let root = args
        .next()
        .ok_or("expected usage: dpllsat-test-tool <directory> [r|t|p] [workers]")?;

    let heuristic = match args.next().as_deref() {
        None | Some("t") => HeuristicKind::TwoClause,
        Some("r") => HeuristicKind::Random,
        Some("p") => HeuristicKind::Polarity,
        Some(other) => return Err(format!("unrecognized heuristic '{}'", other)),
    };

    let workers = match args.next() {
        Some(s) => s.parse().map_err(|_| "invalid worker count".to_string())?,
        None => num_cpus(),
    };

    Ok(Options {
        root: PathBuf::from(root),
        heuristic,
        workers,
    })
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Parses `path` as DIMACS CNF directly, so this benchmark driver has no dependency on
/// `dpllsat-bin`'s parser.
fn parse_and_solve(path: &Path, heuristic: HeuristicKind) -> Result<SolveOutcome, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut lines = text.lines().filter(|l| !l.starts_with('c'));

    let problem_line = lines.next().ok_or("missing problem line")?;
    let mut fields = problem_line.split_whitespace();
    if fields.next() != Some("p") || fields.next() != Some("cnf") {
        return Err("malformed problem line".to_string());
    }
    let num_vars: u32 = fields
        .next()
        .ok_or("missing variable count")?
        .parse()
        .map_err(|_| "invalid variable count".to_string())?;
    let num_clauses: u32 = fields
        .next()
        .ok_or("missing clause count")?
        .parse()
        .map_err(|_| "invalid clause count".to_string())?;

    let mut problem =
        Problem::new(num_vars, num_clauses, heuristic).map_err(|e| e.to_string())?;

    let mut clause_id = 0u32;
    let mut literals = Vec::new();
    for line in lines {
        for token in line.split_whitespace() {
            if token == "%" {
                break;
            }
            let lit: i32 = token.parse().map_err(|_| "invalid literal".to_string())?;
            if lit == 0 {
                problem
                    .add_clause(clause_id, &literals)
                    .map_err(|e| e.to_string())?;
                literals.clear();
                clause_id += 1;
            } else {
                literals.push((lit.unsigned_abs(), lit < 0));
            }
        }
    }

    Ok(problem.solve())
}

fn main() {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("err: {}", message);
            process::exit(1);
        }
    };

    let instances: Vec<PathBuf> = WalkDir::new(&opts.root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("cnf"))
        .map(|entry| entry.path().to_path_buf())
        .collect();

    if instances.is_empty() {
        println!("{}", Yellow.paint(format!("no .cnf files found under {}", opts.root.display())));
        return;
    }

    let pool = ThreadPool::new(opts.workers);
    let (tx, rx) = mpsc::channel();

    for path in instances.clone() {
        let tx = tx.clone();
        let heuristic = opts.heuristic;
        pool.execute(move || {
            let start = Instant::now();
            let result = parse_and_solve(&path, heuristic);
            let elapsed = start.elapsed();
            tx.send((path, result, elapsed)).expect("result channel closed early");
        });
    }
    drop(tx);

    let mut sat_count = 0;
    let mut unsat_count = 0;
    let mut error_count = 0;

    for _ in 0..instances.len() {
        let (path, result, elapsed) = rx.recv().expect("worker thread panicked");
        match result {
            Ok(SolveOutcome::Sat(_)) => {
                sat_count += 1;
                println!(
                    "{} {} ({:.3}s)",
                    Green.paint("SAT  "),
                    path.display(),
                    elapsed.as_secs_f64()
                );
            }
            Ok(SolveOutcome::Unsat) => {
                unsat_count += 1;
                println!(
                    "{} {} ({:.3}s)",
                    Red.paint("UNSAT"),
                    path.display(),
                    elapsed.as_secs_f64()
                );
            }
            Err(message) => {
                error_count += 1;
                println!("{} {}: {}", Yellow.paint("ERROR"), path.display(), message);
            }
        }
    }

    println!(
        "\n{} sat, {} unsat, {} errored, {} total",
        sat_count,
        unsat_count,
        error_count,
        instances.len()
    );

    if error_count > 0 {
        process::exit(1);
    }
}
