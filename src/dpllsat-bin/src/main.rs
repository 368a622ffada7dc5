mod dimacs;
mod error;

use std::fs;
use std::io::Read;
use std::process;

use clap::{App, Arg};
use cpu_time::ProcessTime;

use dpllsat::{HeuristicKind, SolveOutcome};

use crate::error::CliError;

fn parse_heuristic(arg: &str) -> Result<HeuristicKind, CliError> {
    match arg {
        "r" => Ok(HeuristicKind::Random),
        "t" => Ok(HeuristicKind::TwoClause),
        "p" => Ok(HeuristicKind::Polarity),
        other => Err(CliError::Dimacs {
            line: 0,
            message: format!("unrecognized splitting heuristic '{}', expected r, t or p", other),
        }),
    }
}

/// Reads `path`, transparently gunzipping it first if its name ends in `.gz`.
fn read_input(path: &str) -> Result<Vec<u8>, CliError> {
    let raw = fs::read(path)?;
    if path.ends_with(".gz") {
        let mut decoder = flate2::read::GzDecoder::new(&raw[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    } else {
        Ok(raw)
    }
}

fn run() -> Result<bool, CliError> {
    let matches = App::new("dpllsat")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Calvin Khiddee-Wu")
        .about("A DPLL SAT solver over a bit-packed CNF representation")
        .arg(
            Arg::with_name("heuristic")
                .help("Splitting heuristic: r (random), t (two-clause), p (polarity)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("input")
                .help("DIMACS CNF file to solve, optionally gzip-compressed (.cnf.gz)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("stats")
                .short("s")
                .long("stats")
                .help("Also print CPU time to stderr after solving (split count is always printed)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase log verbosity (requires the 'logging' feature)"),
        )
        .get_matches();

    #[cfg(feature = "logging")]
    {
        let verbosity = matches.occurrences_of("verbose");
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    }

    let heuristic = parse_heuristic(matches.value_of("heuristic").unwrap())?;
    let input_path = matches.value_of("input").unwrap();

    let start = ProcessTime::now();
    let data = read_input(input_path)?;
    let mut problem = dimacs::parse(&data, heuristic)?;
    println!(
        "CNF Problem: {} variables, {} clauses",
        problem.num_vars(),
        problem.clause_count()
    );

    let outcome = problem.solve();
    let elapsed = start.elapsed();

    let sat = match &outcome {
        SolveOutcome::Sat(model) => {
            print_model(model);
            true
        }
        SolveOutcome::Unsat => {
            println!("UNSAT");
            false
        }
    };

    if matches.is_present("stats") {
        eprintln!(
            "splits: {}, cpu time: {:.3}s",
            problem.split_count(),
            elapsed.as_secs_f64()
        );
    } else {
        eprintln!("splits: {}", problem.split_count());
    }

    Ok(sat)
}

fn print_model(model: &[bool]) {
    for (i, &value) in model.iter().enumerate() {
        println!("x{} = {}", i + 1, value as u8);
    }
}

fn main() {
    match run() {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("err: {}", e);
            process::exit(1);
        }
    }
}
